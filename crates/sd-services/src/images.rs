//! Stock vector search.

use crate::config::ServiceConfig;
use crate::error::ClientError;
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// One search result. Field names follow the upstream API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageHit {
    pub id: u64,
    #[serde(rename = "previewURL")]
    pub preview_url: String,
    #[serde(rename = "largeImageURL")]
    pub full_url: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub user: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: Vec<ImageHit>,
}

pub struct ImageSearchClient {
    http: reqwest::Client,
    config: ServiceConfig,
}

impl ImageSearchClient {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Full request URL for `query`. A blank query searches for `vector`.
    pub fn search_url(&self, query: &str) -> Result<Url, ClientError> {
        let key = self
            .config
            .pixabay_api_key
            .as_deref()
            .ok_or(ClientError::MissingKey("PIXABAY_API_KEY"))?;
        let query = match query.trim() {
            "" => "vector",
            q => q,
        };
        let per_page = self.config.per_page.to_string();
        Url::parse_with_params(
            &self.config.pixabay_endpoint,
            [
                ("key", key),
                ("q", query),
                ("image_type", "vector"),
                ("safesearch", "true"),
                ("per_page", per_page.as_str()),
            ],
        )
        .map_err(|e| ClientError::Url(e.to_string()))
    }

    /// Vector images matching `query`. Empty on any failure.
    pub async fn search_images(&self, query: &str) -> Vec<ImageHit> {
        match self.search(query).await {
            Ok(hits) => hits,
            Err(e) => {
                log::error!("image search failed: {e}");
                Vec::new()
            }
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<ImageHit>, ClientError> {
        let url = self.search_url(query)?;
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ClientError::Status(response.status().as_u16()));
        }
        let body: SearchResponse = response.json().await?;
        log::debug!("image search '{query}': {} hit(s)", body.hits.len());
        Ok(body.hits)
    }
}
