use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, instrument};

use crate::config::CatalogConfig;

/// The one capability the repository needs from the outside world: fetch
/// a resource path and hand back the deserialized body. Transport
/// concerns (retries, timeouts, auth) live behind this seam.
#[async_trait]
pub trait Adapter: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value>;
}

/// Catalog-backend adapter over reqwest. Appends the API key as a query
/// parameter, which is all the auth the backend wants.
#[derive(Clone)]
pub struct HttpAdapter {
    client: reqwest::Client,
    config: CatalogConfig,
}

impl HttpAdapter {
    pub fn new(config: CatalogConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("cinemeta/0.1.0")
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}?api_key={}",
            self.config.base_url.trim_end_matches('/'),
            path,
            self.config.api_key
        )
    }
}

#[async_trait]
impl Adapter for HttpAdapter {
    #[instrument(skip(self), fields(path = %path))]
    async fn get(&self, path: &str) -> Result<Value> {
        debug!("Making catalog GET request");
        let response = self.client.get(self.url_for(path)).send().await?;

        if !response.status().is_success() {
            error!("Catalog request failed with status: {}", response.status());
            return Err(anyhow::anyhow!(
                "catalog request failed: {}",
                response.status()
            ));
        }

        let body = response.json::<Value>().await?;
        Ok(body)
    }
}
