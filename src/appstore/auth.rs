//! ES256 token generation for the App Store Connect API.

use crate::credentials::AppStoreCredentials;
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const AUDIENCE: &str = "appstoreconnect-v1";
/// Apple rejects tokens that live longer than 20 minutes.
pub const TOKEN_LIFETIME_SECS: i64 = 20 * 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub aud: String,
}

/// Signs a token with a `.p8` key's PEM contents.
pub fn sign_token(key_pem: &[u8], key_id: &str, issuer_id: &str, issued_at: i64) -> Result<String> {
    let key = EncodingKey::from_ec_pem(key_pem)
        .context("App Store Connect key is not an EC (P-256) PEM key")?;

    let mut header = Header::new(Algorithm::ES256);
    header.kid = Some(key_id.to_string());

    let claims = Claims {
        iss: issuer_id.to_string(),
        iat: issued_at,
        exp: issued_at + TOKEN_LIFETIME_SECS,
        aud: AUDIENCE.to_string(),
    };

    encode(&header, &claims, &key).context("Failed to sign App Store Connect token")
}

/// Reads the key file and signs a token valid from now.
pub fn generate_token(credentials: &AppStoreCredentials) -> Result<String> {
    let key_pem = std::fs::read(&credentials.key_path).with_context(|| {
        format!("Failed to read private key: {}", credentials.key_path.display())
    })?;

    debug!("Signing App Store Connect token with key {}", credentials.key_id);
    sign_token(&key_pem, &credentials.key_id, &credentials.issuer_id, Utc::now().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};
    use std::path::PathBuf;

    const PRIVATE_KEY: &str = include_str!("../../tests/fixtures/appstore_test_key.p8");
    const PUBLIC_KEY: &str = include_str!("../../tests/fixtures/appstore_test_key.pub.pem");

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::ES256);
        validation.set_audience(&[AUDIENCE]);
        validation
    }

    #[test]
    fn test_sign_token_header_and_claims() {
        let now = Utc::now().timestamp();
        let token = sign_token(PRIVATE_KEY.as_bytes(), "2X9R4HXF34", "issuer-uuid", now).unwrap();

        let header = decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::ES256);
        assert_eq!(header.kid.as_deref(), Some("2X9R4HXF34"));
        assert_eq!(header.typ.as_deref(), Some("JWT"));

        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_ec_pem(PUBLIC_KEY.as_bytes()).unwrap(),
            &validation(),
        )
        .unwrap();
        assert_eq!(data.claims.iss, "issuer-uuid");
        assert_eq!(data.claims.aud, AUDIENCE);
        assert_eq!(data.claims.iat, now);
        assert_eq!(data.claims.exp - data.claims.iat, 1200);
    }

    #[test]
    fn test_sign_token_rejects_non_ec_key() {
        let rsa = include_str!("../../tests/fixtures/play_test_key.pem");
        let err = sign_token(rsa.as_bytes(), "kid", "iss", 0).unwrap_err();
        assert!(err.to_string().contains("not an EC"));
    }

    #[test]
    fn test_generate_token_from_file() {
        let key_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/appstore_test_key.p8");
        let credentials = AppStoreCredentials {
            key_id: "2X9R4HXF34".to_string(),
            issuer_id: "issuer-uuid".to_string(),
            key_path,
            app_id: "1234567890".to_string(),
        };

        let token = generate_token(&credentials).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_generate_token_missing_file() {
        let credentials = AppStoreCredentials {
            key_id: "kid".to_string(),
            issuer_id: "iss".to_string(),
            key_path: PathBuf::from("/nonexistent/AuthKey.p8"),
            app_id: "1".to_string(),
        };
        let err = generate_token(&credentials).unwrap_err();
        assert!(err.to_string().contains("Failed to read private key"));
    }
}
