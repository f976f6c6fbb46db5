//! HTTP client for the Android Publisher `inappproducts` resource.

use super::models::{InAppProduct, InAppProductsListResponse};
use crate::config::Config;
use crate::error::ApiError;
use crate::http::{self, bearer};
use async_trait::async_trait;
use tracing::{debug, info};
use wreq::Client;

/// Trait for Play product operations - enables mocking for tests.
#[async_trait]
pub trait PlayPublisher: Send + Sync {
    /// Lists every in-app product of the package.
    async fn list(&self) -> Result<Vec<InAppProduct>, ApiError>;

    /// Fetches one product by SKU.
    async fn get(&self, sku: &str) -> Result<InAppProduct, ApiError>;

    /// Creates a product.
    async fn insert(&self, product: &InAppProduct) -> Result<InAppProduct, ApiError>;

    /// Replaces an existing product.
    async fn update(&self, sku: &str, product: &InAppProduct) -> Result<InAppProduct, ApiError>;
}

/// Android Publisher client bound to one package.
pub struct PlayClient {
    client: Client,
    base_url: String,
    package_name: String,
    access_token: String,
}

impl PlayClient {
    /// Creates a client for the configured package and API root.
    pub fn new(client: Client, config: &Config, access_token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: config.play_base_url.trim_end_matches('/').to_string(),
            package_name: config.package_name.clone(),
            access_token: access_token.into(),
        }
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    fn products_url(&self) -> String {
        format!(
            "{}/applications/{}/inappproducts",
            self.base_url,
            urlencoding::encode(&self.package_name)
        )
    }

    fn product_url(&self, sku: &str) -> String {
        format!("{}/{}", self.products_url(), urlencoding::encode(sku))
    }

    fn body(product: &InAppProduct) -> Result<String, ApiError> {
        Ok(serde_json::to_string(product)?)
    }
}

#[async_trait]
impl PlayPublisher for PlayClient {
    async fn list(&self) -> Result<Vec<InAppProduct>, ApiError> {
        let url = self.products_url();
        let mut products = Vec::new();
        let mut page_token: Option<String> = None;

        info!("Listing products for {}", self.package_name);

        loop {
            let page_url = match &page_token {
                Some(token) => format!("{}?token={}", url, urlencoding::encode(token)),
                None => url.clone(),
            };
            debug!("GET {}", page_url);

            let request = self
                .client
                .get(page_url.as_str())
                .header("Authorization", bearer(&self.access_token))
                .header("Accept", "application/json");
            let page: InAppProductsListResponse = http::send_json(request).await?;

            products.extend(page.inappproduct);

            page_token = page.token_pagination.and_then(|p| p.next_page_token);
            if page_token.is_none() {
                break;
            }
        }

        Ok(products)
    }

    async fn get(&self, sku: &str) -> Result<InAppProduct, ApiError> {
        let url = self.product_url(sku);
        debug!("GET {}", url);

        let request = self
            .client
            .get(url.as_str())
            .header("Authorization", bearer(&self.access_token))
            .header("Accept", "application/json");
        http::send_json(request).await
    }

    async fn insert(&self, product: &InAppProduct) -> Result<InAppProduct, ApiError> {
        let url = self.products_url();
        debug!("POST {}", url);

        let request = self
            .client
            .post(url.as_str())
            .header("Authorization", bearer(&self.access_token))
            .header("Content-Type", "application/json")
            .body(Self::body(product)?);
        http::send_json(request).await
    }

    async fn update(&self, sku: &str, product: &InAppProduct) -> Result<InAppProduct, ApiError> {
        let url = self.product_url(sku);
        debug!("PUT {}", url);

        let request = self
            .client
            .put(url.as_str())
            .header("Authorization", bearer(&self.access_token))
            .header("Content-Type", "application/json")
            .body(Self::body(product)?);
        http::send_json(request).await
    }
}
