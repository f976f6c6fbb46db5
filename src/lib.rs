//! iap-sync - Sync in-app purchase metadata to Google Play and App Store Connect
//!
//! Product definitions are read from local JSON files and pushed to each
//! vendor with create-if-absent, update-if-present semantics.

pub mod appstore;
pub mod cli;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod error;
pub mod format;
pub mod http;
pub mod locale;
pub mod play;
pub mod product;
pub mod upsert;

pub use config::Config;
pub use error::ApiError;
pub use locale::LocaleMap;
pub use product::{ProductDefinition, ProductDir};
