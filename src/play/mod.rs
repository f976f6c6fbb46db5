//! Google Play Android Publisher modules for auth, HTTP client, and data models.

pub mod auth;
pub mod client;
pub mod models;

pub use auth::{fetch_access_token, ServiceAccountKey};
pub use client::{PlayClient, PlayPublisher};
pub use models::{InAppProduct, InAppProductListing, Price};
