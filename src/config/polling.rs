use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_EVENTS_POLL_MS: u64 = 5_000;
pub const DEFAULT_QUESTIONS_POLL_MS: u64 = 3_000;

/// Refresh periods of the two polling loops. Questions refresh faster
/// because moderation is time-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    pub events: Duration,
    pub questions: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            events: Duration::from_millis(DEFAULT_EVENTS_POLL_MS),
            questions: Duration::from_millis(DEFAULT_QUESTIONS_POLL_MS),
        }
    }
}

impl PollIntervals {
    pub fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            events: Duration::from_millis(parse_positive(
                lookup,
                "QA_EVENTS_POLL_MS",
                DEFAULT_EVENTS_POLL_MS,
            )),
            questions: Duration::from_millis(parse_positive(
                lookup,
                "QA_QUESTIONS_POLL_MS",
                DEFAULT_QUESTIONS_POLL_MS,
            )),
        }
    }
}

/// Positive integer from `key`. Missing keys give `default`; zero, negative,
/// non-numeric and out-of-range values give `default` with a warning.
pub(crate) fn parse_positive<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T
where
    T: FromStr + Default + PartialOrd + fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return default;
    };

    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => value,
        Ok(_) | Err(_) => {
            tracing::warn!("Config: Invalid {} '{}', using {}", key, raw, default);
            default
        }
    }
}
