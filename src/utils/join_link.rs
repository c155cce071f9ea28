//! Participant-facing join links.
//!
//! Derivation is pure: the same code, origin and QR service always yield the
//! same [`JoinLink`], so links can be cached, displayed, and compared freely.

use serde::Serialize;

pub const DEFAULT_QR_SERVICE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/";
pub const DEFAULT_QR_SIZE: u32 = 200;

/// External QR image generator. Only the request URL is built here; the
/// image itself is never fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrService {
    pub endpoint: String,
    pub size: u32,
}

impl Default for QrService {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_QR_SERVICE_URL.to_string(),
            size: DEFAULT_QR_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JoinLink {
    pub url: String,
    pub qr_image_url: String,
}

pub fn derive_join_link(code: &str, origin: &str, qr: &QrService) -> JoinLink {
    let url = format!("{}/listen?code={}", origin.trim_end_matches('/'), code);
    let qr_image_url = format!(
        "{}?size={size}x{size}&data={}",
        qr.endpoint,
        urlencoding::encode(&url),
        size = qr.size
    );

    JoinLink { url, qr_image_url }
}
