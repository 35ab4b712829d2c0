//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use crate::error::Error;

pub const DEFAULT_BUCKET: &str = "posters";
pub const DEFAULT_PAGE_SIZE: usize = 12;
pub const DEFAULT_FEATURED_COUNT: usize = 3;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Project base URL without a trailing slash.
    pub backend_url: String,
    /// Public anon key sent with every request.
    pub anon_key: String,
    /// Storage bucket for event posters.
    pub bucket: String,
    /// Cards per "load more" step on the public listing.
    pub page_size: usize,
    pub timeouts: Timeouts,
}

impl ClientConfig {
    /// Config with defaults for everything but the endpoint and key.
    #[must_use]
    pub fn new(backend_url: &str, anon_key: &str) -> Self {
        Self {
            backend_url: backend_url.trim().trim_end_matches('/').to_owned(),
            anon_key: anon_key.trim().to_owned(),
            bucket: DEFAULT_BUCKET.to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
            timeouts: Timeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
        }
    }

    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `EVENTBOARD_URL`
    /// - `EVENTBOARD_ANON_KEY`
    ///
    /// Optional:
    /// - `EVENTBOARD_BUCKET`: default `posters`
    /// - `EVENTBOARD_PAGE_SIZE`: default 12
    /// - `EVENTBOARD_REQUEST_TIMEOUT_SECS`: default 30
    /// - `EVENTBOARD_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a required variable is missing or blank.
    pub fn from_env() -> Result<Self, Error> {
        let url = required_env("EVENTBOARD_URL")?;
        let key = required_env("EVENTBOARD_ANON_KEY")?;
        let mut config = Self::new(&url, &key);
        if let Ok(bucket) = std::env::var("EVENTBOARD_BUCKET")
            && !bucket.trim().is_empty()
        {
            config.bucket = bucket.trim().to_owned();
        }
        config.page_size = env_parse("EVENTBOARD_PAGE_SIZE", DEFAULT_PAGE_SIZE).max(1);
        config.timeouts = Timeouts {
            request_secs: env_parse("EVENTBOARD_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("EVENTBOARD_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Ok(config)
    }
}

fn required_env(key: &str) -> Result<String, Error> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::Config(format!("{key} must be set")))
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}
