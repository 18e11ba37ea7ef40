//! HTTP client for fetching page HTML.

use std::time::Duration;

use reqwest::Client;

use crate::error::ScraperError;

/// Fetches page bodies with a fixed per-request timeout.
///
/// Exactly one GET is issued per call. Failed fetches are not retried.
#[derive(Debug, Clone)]
pub struct PageClient {
    client: Client,
    timeout_secs: u64,
}

impl PageClient {
    /// Creates a `PageClient` with the given total request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            timeout_secs,
        })
    }

    /// Fetches the body of `url` as text.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`]: `url` is not an absolute URL.
    /// - [`ScraperError::Timeout`]: no complete response within the timeout.
    /// - [`ScraperError::UnexpectedStatus`]: any non-2xx status.
    /// - [`ScraperError::Http`]: connection, TLS, or body decoding failure.
    pub async fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        let response = self
            .client
            .get(parsed)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        response.text().await.map_err(|e| self.classify(url, e))
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> ScraperError {
        if err.is_timeout() {
            ScraperError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.timeout_secs,
            }
        } else {
            ScraperError::Http(err)
        }
    }
}
