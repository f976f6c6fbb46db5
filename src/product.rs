//! Local product definitions and the directory they live in.

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_STATUS: &str = "active";
pub const DEFAULT_PURCHASE_TYPE: &str = "managedUser";

/// A product as described in a local JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawDefinition")]
pub struct ProductDefinition {
    /// Vendor-facing product identifier, from `sku` or else `productId`
    pub sku: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_type: Option<String>,
    /// Play requires one for new products; passed through when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_price: Option<DefaultPrice>,
    /// Localized listings keyed by locale code
    #[serde(default)]
    pub listings: BTreeMap<String, Listing>,
}

/// Base price in micro-units of the currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultPrice {
    pub currency: String,
    #[serde(deserialize_with = "micros_as_string")]
    pub price_micros: String,
}

/// Display name and description for one locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Empty when the file leaves it out; the vendor decides whether that is valid
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// File layout before the identifier keys are reconciled.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDefinition {
    #[serde(default)]
    sku: Option<String>,
    #[serde(default)]
    product_id: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    purchase_type: Option<String>,
    #[serde(default)]
    default_language: Option<String>,
    #[serde(default)]
    default_price: Option<DefaultPrice>,
    #[serde(default)]
    listings: BTreeMap<String, Listing>,
}

impl TryFrom<RawDefinition> for ProductDefinition {
    type Error = String;

    fn try_from(raw: RawDefinition) -> Result<Self, Self::Error> {
        let sku = raw
            .sku
            .filter(|s| !s.is_empty())
            .or(raw.product_id.filter(|s| !s.is_empty()))
            .ok_or_else(|| "missing field `sku` (or `productId`)".to_string())?;

        Ok(Self {
            sku,
            status: raw.status,
            purchase_type: raw.purchase_type,
            default_language: raw.default_language,
            default_price: raw.default_price,
            listings: raw.listings,
        })
    }
}

/// Play encodes int64 values as strings; accept either form.
fn micros_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Micros {
        Text(String),
        Number(i64),
    }

    Ok(match Micros::deserialize(deserializer)? {
        Micros::Text(s) => s,
        Micros::Number(n) => n.to_string(),
    })
}

impl ProductDefinition {
    /// Parses a definition from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid product definition")
    }

    /// Reads and parses a definition file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading product from: {}", path.display());

        if !path.is_file() {
            anyhow::bail!("Product file not found: {}", path.display());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read product file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse product file: {}", path.display()))
    }

    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or(DEFAULT_STATUS)
    }

    pub fn purchase_type(&self) -> &str {
        self.purchase_type.as_deref().unwrap_or(DEFAULT_PURCHASE_TYPE)
    }
}

/// Directory of product definition files.
#[derive(Debug, Clone)]
pub struct ProductDir {
    root: PathBuf,
}

impl ProductDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves a file argument; relative names are taken from the directory.
    pub fn resolve(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Loads the definition named by a file argument.
    pub fn load(&self, file: &str) -> Result<ProductDefinition> {
        ProductDefinition::from_file(self.resolve(file))
    }

    /// Lists every `*.json` file in the directory, sorted by name.
    pub fn json_files(&self) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.root)
            .with_context(|| format!("Failed to read product directory: {}", self.root.display()))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if is_json && path.is_file() {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}
