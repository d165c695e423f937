//! HTTP implementation of the editor's asset fetcher.

use sd_editor::assets::{AssetError, AssetFetcher};

/// Fetches image bytes over HTTP(S). In the browser this goes through
/// `fetch`, so the usual CORS rules apply.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, AssetError> {
        let fail = |reason: String| AssetError::Fetch {
            url: url.to_string(),
            reason,
        };
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| fail(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(fail(format!("status {}", status.as_u16())));
        }
        let bytes = response.bytes().await.map_err(|e| fail(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}
