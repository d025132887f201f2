//! Rule source configuration from environment.

use std::env;
use std::time::Duration;

/// Rule server used when none is configured.
pub const DEFAULT_SOURCE_URL: &str = "https://vfpc.tomjmills.co.uk/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Base URL of the rule server, always ending in `/`
    pub source_url: String,
    pub fetch_timeout: Duration,
    /// Interval between reference time refreshes, zero to disable
    pub refresh_period: Duration,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            fetch_timeout: Duration::from_secs(20),
            refresh_period: Duration::from_secs(300),
        }
    }
}

impl SourceConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            source_url: env::var("VFPC_SOURCE_URL")
                .map(|url| normalize_url(&url))
                .unwrap_or(defaults.source_url),
            fetch_timeout: env::var("VFPC_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.fetch_timeout),
            refresh_period: env::var("VFPC_REFRESH_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.refresh_period),
        }
    }
}

/// Ensure `url` ends with `/` so endpoint names can be appended.
pub fn normalize_url(url: &str) -> String {
    let mut url = url.trim().to_string();
    if !url.ends_with('/') {
        url.push('/');
    }
    url
}
