use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;

use crate::config::AppConfig;
use crate::core::error::IntelError;

/// Thin wrapper over a shared `reqwest::Client` for the upstream feeds.
/// Every fetch is a single best-effort attempt: no retry, no backoff, no
/// caching. Recovery happens at the next scheduled poll.
pub struct FeedClient {
    client: reqwest::Client,
}

impl FeedClient {
    pub fn new(config: &AppConfig) -> Result<Self, IntelError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_millis(config.timeout_ms))
            .redirect(reqwest::redirect::Policy::limited(4))
            .build()?;
        Ok(Self { client })
    }

    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, IntelError> {
        let resp = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(IntelError::Http {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp.json::<T>().await?)
    }
}
