use crate::TracerError;
use async_trait::async_trait;

/// Retrieves source maps and original sources over the network boundary.
#[async_trait]
pub trait MapFetcher: Send + Sync {
    /// Fetch the document at `url` as text. Network failures and non-success
    /// responses are both `MapFetchError`.
    async fn fetch_text(&self, url: &str) -> Result<String, TracerError>;
}

/// Fetches over HTTP(S) with a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MapFetcher for HttpFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String, TracerError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TracerError::MapFetchError(format!("{}: {}", url, e)))?;

        if !resp.status().is_success() {
            return Err(TracerError::MapFetchError(format!(
                "{} returned HTTP {}",
                url,
                resp.status()
            )));
        }

        resp.text()
            .await
            .map_err(|e| TracerError::MapFetchError(format!("{}: {}", url, e)))
    }
}
