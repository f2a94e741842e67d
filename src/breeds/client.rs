//! HTTP client for TheCatAPI breed list.
//!
//! Only `GET /v1/breeds` is used. The response is a JSON array of breed objects,
//! of which we keep the `name` field.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::{BreedSource, BreedSourceError};

/// Default base URL of TheCatAPI.
pub const DEFAULT_URL: &str = "https://api.thecatapi.com";

/// Breed source backed by TheCatAPI.
#[derive(Debug, Clone)]
pub struct TheCatApiClient {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl TheCatApiClient {
    /// Create a client whose requests give up after `timeout`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, BreedSourceError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            client,
        })
    }

    fn breeds_url(&self) -> String {
        format!("{}/v1/breeds", self.base_url)
    }
}

#[async_trait]
impl BreedSource for TheCatApiClient {
    async fn fetch_breeds(&self) -> Result<Vec<String>, BreedSourceError> {
        let mut req = self.client.get(self.breeds_url());
        if let Some(ref key) = self.api_key {
            req = req.header("x-api-key", key);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BreedSourceError::Status(status));
        }

        let body: serde_json::Value = response.json().await?;
        let items = body
            .as_array()
            .ok_or_else(|| BreedSourceError::Body("expected a JSON array".to_string()))?;

        Ok(items
            .iter()
            .filter_map(|item| item.get("name").and_then(|name| name.as_str()))
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect())
    }
}
