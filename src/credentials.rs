//! Vendor credentials read from environment variables.

use std::path::PathBuf;
use thiserror::Error;

pub const GOOGLE_PLAY_JSON_KEY_PATH: &str = "GOOGLE_PLAY_JSON_KEY_PATH";
pub const APP_STORE_CONNECT_KEY_ID: &str = "APP_STORE_CONNECT_KEY_ID";
pub const APP_STORE_CONNECT_ISSUER_ID: &str = "APP_STORE_CONNECT_ISSUER_ID";
pub const APP_STORE_CONNECT_KEY_PATH: &str = "APP_STORE_CONNECT_KEY_PATH";
pub const APP_STORE_APP_ID: &str = "APP_STORE_APP_ID";

/// Local misconfiguration detected before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialsError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<&'static str>),

    #[error("Key file not found: {}", .0.display())]
    KeyFileNotFound(PathBuf),
}

/// Google Play service-account credential location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayCredentials {
    pub key_path: PathBuf,
}

impl PlayCredentials {
    /// Reads credentials from the process environment.
    pub fn from_env() -> Result<Self, CredentialsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads credentials from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CredentialsError> {
        let key_path = require(&lookup, GOOGLE_PLAY_JSON_KEY_PATH)
            .map(PathBuf::from)
            .ok_or_else(|| CredentialsError::MissingEnv(vec![GOOGLE_PLAY_JSON_KEY_PATH]))?;

        if !key_path.is_file() {
            return Err(CredentialsError::KeyFileNotFound(key_path));
        }

        Ok(Self { key_path })
    }
}

/// App Store Connect API key and target app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppStoreCredentials {
    pub key_id: String,
    pub issuer_id: String,
    pub key_path: PathBuf,
    pub app_id: String,
}

impl AppStoreCredentials {
    /// Reads credentials from the process environment.
    pub fn from_env() -> Result<Self, CredentialsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads credentials from an arbitrary variable source. Every missing
    /// variable is reported at once.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CredentialsError> {
        let key_id = require(&lookup, APP_STORE_CONNECT_KEY_ID);
        let issuer_id = require(&lookup, APP_STORE_CONNECT_ISSUER_ID);
        let key_path = require(&lookup, APP_STORE_CONNECT_KEY_PATH);
        let app_id = require(&lookup, APP_STORE_APP_ID);

        let (Some(key_id), Some(issuer_id), Some(key_path), Some(app_id)) =
            (key_id.clone(), issuer_id.clone(), key_path.clone(), app_id.clone())
        else {
            let missing = [
                (APP_STORE_CONNECT_KEY_ID, key_id.is_none()),
                (APP_STORE_CONNECT_ISSUER_ID, issuer_id.is_none()),
                (APP_STORE_CONNECT_KEY_PATH, key_path.is_none()),
                (APP_STORE_APP_ID, app_id.is_none()),
            ]
            .into_iter()
            .filter_map(|(name, absent)| absent.then_some(name))
            .collect();
            return Err(CredentialsError::MissingEnv(missing));
        };

        let key_path = PathBuf::from(key_path);
        if !key_path.is_file() {
            return Err(CredentialsError::KeyFileNotFound(key_path));
        }

        Ok(Self { key_id, issuer_id, key_path, app_id })
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
