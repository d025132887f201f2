//! Rule server HTTP client.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use vfpc_core::models::{AirportRecord, Version};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Failure to fetch a rule document.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("server has no data at {0}")]
    NotFound(String),

    #[error("server returned {status} for {url}")]
    Status { status: StatusCode, url: String },

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// HTTP client for the rule server.
#[derive(Debug, Clone)]
pub struct RuleClient {
    client: Client,
}

impl RuleClient {
    /// Create a client whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(1))
            .build()?;

        Ok(Self { client })
    }

    /// Fetch the rules for `icao` from the server at `base_url`.
    ///
    /// `base_url` must end with `/`.
    pub async fn fetch_airport(
        &self,
        base_url: &str,
        icao: &str,
    ) -> Result<Vec<AirportRecord>, FetchError> {
        let url = format!("{}airport?icao={}", base_url, icao);
        self.fetch(url).await
    }

    /// Fetch the server version record carrying the reference time.
    pub async fn fetch_version(&self, base_url: &str) -> Result<Version, FetchError> {
        let url = format!("{}version", base_url);
        self.fetch(url).await
    }

    async fn fetch<T: DeserializeOwned>(&self, url: String) -> Result<T, FetchError> {
        tracing::trace!(%url, "fetch");

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url));
        }
        if !status.is_success() {
            return Err(FetchError::Status { status, url });
        }

        Ok(response.json().await?)
    }
}
