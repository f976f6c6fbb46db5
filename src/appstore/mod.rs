//! App Store Connect modules for token signing, HTTP client, and JSON:API models.

pub mod auth;
pub mod client;
pub mod models;

pub use auth::generate_token;
pub use client::{AppStoreApi, AppStoreClient};
pub use models::{InAppPurchase, Localization};
