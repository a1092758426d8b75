//! Catalog service seam and its HTTP client.
//!
//! The session never talks to storage directly: product search, detail,
//! history and reset all go through [`CatalogService`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use shopchat_core::config::CatalogConfig;
use shopchat_core::types::{FilterSet, Product, ProductId, Turn};

use crate::error::CatalogError;

/// Remote operations the chat session depends on.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Stored transcript, used once to hydrate a new session.
    async fn list_conversation(&self) -> Result<Vec<Turn>, CatalogError>;

    /// Products matching `filters`; an empty filter set lists everything.
    async fn search_products(&self, filters: &FilterSet) -> Result<Vec<Product>, CatalogError>;

    /// Full record for one product.
    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError>;

    /// Server-side conversation reset.
    async fn reset_session(&self) -> Result<(), CatalogError>;
}

/// [`CatalogService`] over the catalog's JSON HTTP API.
#[derive(Clone)]
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
}

impl HttpCatalogClient {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        Self::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode a JSON body from a 2xx response.
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, CatalogError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::Decode(e.to_string()))
    }
}

#[async_trait]
impl CatalogService for HttpCatalogClient {
    async fn list_conversation(&self) -> Result<Vec<Turn>, CatalogError> {
        self.fetch_json(self.client.get(self.url("/api/chats"))).await
    }

    async fn search_products(&self, filters: &FilterSet) -> Result<Vec<Product>, CatalogError> {
        let request = self
            .client
            .get(self.url("/api/products"))
            .query(&filters.to_query_pairs());
        self.fetch_json(request).await
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let request = self.client.get(self.url(&format!("/api/products/{}", id)));
        match self.fetch_json(request).await {
            Err(CatalogError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Err(CatalogError::NotFound(id))
            }
            other => other,
        }
    }

    async fn reset_session(&self) -> Result<(), CatalogError> {
        let _ack: serde_json::Value = self
            .fetch_json(self.client.post(self.url("/api/reset")))
            .await?;
        Ok(())
    }
}
