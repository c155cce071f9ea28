pub mod error;
pub mod join_link;
pub mod response;
