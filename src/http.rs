//! Shared HTTP plumbing for the vendor clients.

use crate::error::ApiError;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use wreq::{Client, RequestBuilder};

/// Builds the HTTP client used for every vendor request.
pub fn build_client(proxy: Option<&str>) -> Result<Client> {
    let mut builder = Client::builder()
        .gzip(true)
        .brotli(true)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10));

    if let Some(proxy_url) = proxy {
        debug!("Configuring proxy: {}", proxy_url);
        let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
        builder = builder.proxy(proxy);
    }

    builder.build().context("Failed to build HTTP client")
}

/// Sends a request and returns the body of a successful response.
pub async fn send(request: RequestBuilder) -> Result<String, ApiError> {
    let response = request.send().await?;
    let status = response.status();
    debug!("Response status: {}", status);

    let body = response.text().await?;

    if !status.is_success() {
        return Err(ApiError::from_response(status.as_u16(), &body));
    }

    Ok(body)
}

/// Sends a request and decodes a successful JSON response.
pub async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let body = send(request).await?;
    Ok(serde_json::from_str(&body)?)
}

/// Formats an `Authorization` header value.
pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Echo {
        ok: bool,
    }

    #[test]
    fn test_bearer() {
        assert_eq!(bearer("abc.def"), "Bearer abc.def");
    }

    #[tokio::test]
    async fn test_send_json_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/echo"))
            .and(header("Authorization", "Bearer t0k3n"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok": true}"#))
            .mount(&mock_server)
            .await;

        let client = build_client(None).unwrap();
        let url = format!("{}/echo", mock_server.uri());
        let request = client.get(url.as_str()).header("Authorization", bearer("t0k3n"));

        let echo: Echo = send_json(request).await.unwrap();
        assert!(echo.ok);
    }

    #[tokio::test]
    async fn test_send_maps_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_string(r#"{"error": {"message": "Item not found."}}"#),
            )
            .mount(&mock_server)
            .await;

        let client = build_client(None).unwrap();
        let url = format!("{}/missing", mock_server.uri());

        let err = send(client.get(url.as_str())).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.message(), "Item not found.");
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_send_json_decode_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/garbage"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&mock_server)
            .await;

        let client = build_client(None).unwrap();
        let url = format!("{}/garbage", mock_server.uri());

        let err = send_json::<Echo>(client.get(url.as_str())).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
