//! HTTP client for App Store Connect in-app purchase resources.

use super::models::{
    Document, InAppPurchase, ListDocument, Localization, LocalizationCreateRequest,
    LocalizationUpdateRequest,
};
use crate::config::Config;
use crate::error::ApiError;
use crate::http::{self, bearer};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use wreq::Client;

/// Trait for App Store Connect operations - enables mocking for tests.
#[async_trait]
pub trait AppStoreApi: Send + Sync {
    /// Lists every in-app purchase of the app.
    async fn list_iaps(&self) -> Result<Vec<InAppPurchase>, ApiError>;

    /// Lists the localizations of one in-app purchase.
    async fn list_localizations(&self, iap_id: &str) -> Result<Vec<Localization>, ApiError>;

    /// Adds a localization to an in-app purchase.
    async fn create_localization(
        &self,
        iap_id: &str,
        locale: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Localization, ApiError>;

    /// Changes the name and description of an existing localization.
    async fn update_localization(
        &self,
        localization_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Localization, ApiError>;
}

/// App Store Connect client bound to one app.
pub struct AppStoreClient {
    client: Client,
    base_url: String,
    app_id: String,
    token: String,
}

impl AppStoreClient {
    /// Creates a client for the given app; the token is used for every request.
    pub fn new(
        client: Client,
        config: &Config,
        app_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: config.appstore_base_url.trim_end_matches('/').to_string(),
            app_id: app_id.into(),
            token: token.into(),
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Follows `links.next` until the collection is exhausted.
    async fn get_all<T: DeserializeOwned + Send>(&self, first_url: String) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut next = Some(first_url);

        while let Some(url) = next {
            debug!("GET {}", url);

            let request = self
                .client
                .get(url.as_str())
                .header("Authorization", bearer(&self.token))
                .header("Accept", "application/json");
            let page: ListDocument<T> = http::send_json(request).await?;

            items.extend(page.data);
            next = page.links.and_then(|links| links.next);
        }

        Ok(items)
    }
}

#[async_trait]
impl AppStoreApi for AppStoreClient {
    async fn list_iaps(&self) -> Result<Vec<InAppPurchase>, ApiError> {
        info!("Listing in-app purchases for app {}", self.app_id);
        let url = format!(
            "{}/apps/{}/inAppPurchasesV2?limit=200",
            self.base_url,
            urlencoding::encode(&self.app_id)
        );
        self.get_all(url).await
    }

    async fn list_localizations(&self, iap_id: &str) -> Result<Vec<Localization>, ApiError> {
        info!("Listing localizations for {}", iap_id);
        let url = format!(
            "{}/inAppPurchasesV2/{}/inAppPurchaseLocalizations?limit=200",
            self.base_url,
            urlencoding::encode(iap_id)
        );
        self.get_all(url).await
    }

    async fn create_localization(
        &self,
        iap_id: &str,
        locale: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Localization, ApiError> {
        let url = format!("{}/inAppPurchaseLocalizations", self.base_url);
        let body = LocalizationCreateRequest::new(iap_id, locale, name, description);
        debug!("POST {}", url);

        let request = self
            .client
            .post(url.as_str())
            .header("Authorization", bearer(&self.token))
            .header("Content-Type", "application/json")
            .body(serde_json::to_string(&body)?);
        let doc: Document<Localization> = http::send_json(request).await?;
        Ok(doc.data)
    }

    async fn update_localization(
        &self,
        localization_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<Localization, ApiError> {
        let url = format!(
            "{}/inAppPurchaseLocalizations/{}",
            self.base_url,
            urlencoding::encode(localization_id)
        );
        let body = LocalizationUpdateRequest::new(localization_id, name, description);
        debug!("PATCH {}", url);

        let request = self
            .client
            .patch(url.as_str())
            .header("Authorization", bearer(&self.token))
            .header("Content-Type", "application/json")
            .body(serde_json::to_string(&body)?);
        let doc: Document<Localization> = http::send_json(request).await?;
        Ok(doc.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(base_url: &str) -> AppStoreClient {
        let config = Config { appstore_base_url: base_url.to_string(), ..Config::default() };
        AppStoreClient::new(crate::http::build_client(None).unwrap(), &config, "1234567890", "jwt")
    }

    #[tokio::test]
    async fn test_list_iaps_follows_next_link() {
        let mock_server = MockServer::start().await;
        let next = format!("{}/apps/1234567890/inAppPurchasesV2?cursor=Mg", mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/apps/1234567890/inAppPurchasesV2"))
            .and(query_param("cursor", "Mg"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data": [{"type": "inAppPurchases", "id": "2",
                    "attributes": {"productId": "yearly", "name": "Yearly"}}]}"#,
            ))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/apps/1234567890/inAppPurchasesV2"))
            .and(query_param("limit", "200"))
            .and(header("Authorization", "Bearer jwt"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"{{"data": [{{"type": "inAppPurchases", "id": "1",
                    "attributes": {{"productId": "monthly", "name": "Monthly"}}}}],
                    "links": {{"next": "{}"}}}}"#,
                next
            )))
            .mount(&mock_server)
            .await;

        let client = make_client(&mock_server.uri());
        let iaps = client.list_iaps().await.unwrap();
        let ids: Vec<_> = iaps.iter().filter_map(|i| i.product_id()).collect();
        assert_eq!(ids, vec!["monthly", "yearly"]);
        assert_eq!(client.app_id(), "1234567890");
    }

    #[tokio::test]
    async fn test_list_iaps_unauthorized() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/apps/1234567890/inAppPurchasesV2"))
            .respond_with(ResponseTemplate::new(401).set_body_string(
                r#"{"errors": [{"status": "401", "code": "NOT_AUTHORIZED",
                    "title": "Authentication credentials are missing or invalid."}]}"#,
            ))
            .mount(&mock_server)
            .await;

        let client = make_client(&mock_server.uri());
        let err = client.list_iaps().await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(err.message().contains("Authentication credentials"));
    }

    #[tokio::test]
    async fn test_list_localizations() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/inAppPurchasesV2/6450000001/inAppPurchaseLocalizations"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data": [
                    {"type": "inAppPurchaseLocalizations", "id": "loc-en",
                     "attributes": {"locale": "en-US", "name": "Premium"}},
                    {"type": "inAppPurchaseLocalizations", "id": "loc-ko",
                     "attributes": {"locale": "ko", "name": "프리미엄"}}
                ]}"#,
            ))
            .mount(&mock_server)
            .await;

        let client = make_client(&mock_server.uri());
        let locs = client.list_localizations("6450000001").await.unwrap();
        assert_eq!(locs.len(), 2);
        assert_eq!(locs[1].locale(), Some("ko"));
    }

    #[tokio::test]
    async fn test_create_localization_posts_json_api_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/inAppPurchaseLocalizations"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(serde_json::json!({
                "data": {
                    "type": "inAppPurchaseLocalizations",
                    "attributes": {"locale": "ja", "name": "プレミアム", "description": "全機能"},
                    "relationships": {
                        "inAppPurchaseV2": {"data": {"type": "inAppPurchases", "id": "6450000001"}}
                    }
                }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_string(
                r#"{"data": {"type": "inAppPurchaseLocalizations", "id": "loc-ja",
                    "attributes": {"locale": "ja", "name": "プレミアム"}}}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = make_client(&mock_server.uri());
        let loc = client
            .create_localization("6450000001", "ja", "プレミアム", Some("全機能"))
            .await
            .unwrap();
        assert_eq!(loc.id, "loc-ja");
    }

    #[tokio::test]
    async fn test_update_localization_patches() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/inAppPurchaseLocalizations/loc-en"))
            .and(body_json(serde_json::json!({
                "data": {
                    "type": "inAppPurchaseLocalizations",
                    "id": "loc-en",
                    "attributes": {"name": "Premium", "description": "Everything"}
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data": {"type": "inAppPurchaseLocalizations", "id": "loc-en",
                    "attributes": {"locale": "en-US", "name": "Premium"}}}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = make_client(&mock_server.uri());
        let loc = client.update_localization("loc-en", "Premium", Some("Everything")).await.unwrap();
        assert_eq!(loc.locale(), Some("en-US"));
    }

    #[tokio::test]
    async fn test_create_localization_conflict_detail() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/inAppPurchaseLocalizations"))
            .respond_with(ResponseTemplate::new(409).set_body_string(
                r#"{"errors": [{"status": "409", "code": "ENTITY_ERROR.ATTRIBUTE.INVALID",
                    "title": "An attribute value is invalid.",
                    "detail": "The name must be at most 30 characters."}]}"#,
            ))
            .mount(&mock_server)
            .await;

        let client = make_client(&mock_server.uri());
        let err = client.create_localization("1", "en-US", "x", None).await.unwrap_err();
        assert_eq!(err.message(), "The name must be at most 30 characters.");
    }
}
