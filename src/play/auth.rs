//! Service-account authentication for the Android Publisher API.
//!
//! A JWT assertion signed with the service account's RSA key is exchanged
//! at the key's `token_uri` for a bearer access token.

use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use wreq::Client;

pub const ANDROID_PUBLISHER_SCOPE: &str = "https://www.googleapis.com/auth/androidpublisher";
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// The fields of a service-account JSON key this crate needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl ServiceAccountKey {
    /// Reads a key downloaded from the Google Cloud console.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read service account key: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Invalid service account key: {}", path.display()))
    }

    /// Signs the RS256 assertion presented to the token endpoint.
    pub fn assertion(&self, issued_at: i64) -> Result<String> {
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: ANDROID_PUBLISHER_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };

        let key = EncodingKey::from_rsa_pem(self.private_key.as_bytes())
            .context("Service account private_key is not an RSA PEM key")?;

        encode(&Header::new(Algorithm::RS256), &claims, &key).context("Failed to sign assertion")
    }
}

/// Exchanges a signed assertion for an access token.
pub async fn fetch_access_token(client: &Client, key: &ServiceAccountKey) -> Result<String> {
    let assertion = key.assertion(Utc::now().timestamp())?;
    let form = format!(
        "grant_type={}&assertion={}",
        urlencoding::encode(JWT_BEARER_GRANT),
        urlencoding::encode(&assertion)
    );

    debug!("POST {}", key.token_uri);
    info!("Requesting access token for {}", key.client_email);

    let response = client
        .post(key.token_uri.as_str())
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(form)
        .send()
        .await
        .context("Failed to reach token endpoint")?;

    let status = response.status();
    let body = response.text().await.context("Failed to read token response")?;

    if !status.is_success() {
        anyhow::bail!("Token request failed with status {}: {}", status, body.trim());
    }

    let token: TokenResponse =
        serde_json::from_str(&body).context("Unexpected token endpoint response")?;
    debug!("Access token expires in {:?}s", token.expires_in);

    Ok(token.access_token)
}
