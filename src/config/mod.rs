use std::env;
use std::time::Duration;

pub mod polling;

pub use polling::PollIntervals;

use crate::models::Language;
use crate::utils::join_link::{QrService, DEFAULT_QR_SERVICE_URL, DEFAULT_QR_SIZE};

const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
const DEFAULT_JOIN_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub join_origin: String,
    pub qr: QrService,
    pub polling: PollIntervals,
    pub request_timeout: Duration,
    pub language: Language,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base_url = lookup("QA_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let join_origin = lookup("QA_JOIN_ORIGIN")
            .unwrap_or_else(|| DEFAULT_JOIN_ORIGIN.to_string())
            .trim_end_matches('/')
            .to_string();

        let qr = QrService {
            endpoint: lookup("QA_QR_SERVICE_URL")
                .unwrap_or_else(|| DEFAULT_QR_SERVICE_URL.to_string()),
            size: polling::parse_positive(&lookup, "QA_QR_SIZE", DEFAULT_QR_SIZE),
        };

        let request_timeout = Duration::from_millis(polling::parse_positive(
            &lookup,
            "QA_REQUEST_TIMEOUT_MS",
            DEFAULT_REQUEST_TIMEOUT_MS,
        ));

        let language = match lookup("QA_LANGUAGE") {
            Some(raw) => Language::parse(&raw).unwrap_or_else(|| {
                tracing::warn!("Config: Unknown language '{}', using en", raw);
                Language::En
            }),
            None => Language::En,
        };

        Self {
            api_base_url,
            join_origin,
            qr,
            polling: PollIntervals::from_lookup(&lookup),
            request_timeout,
            language,
        }
    }
}
