//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::locale::LocaleMap;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_PACKAGE_NAME: &str = "com.wearablock.easy_budget";
pub const DEFAULT_PRODUCT_FILE: &str = "easy_budget_premium.json";
pub const DEFAULT_PRODUCT_ID: &str = "easy_budget_premium";
pub const PLAY_BASE_URL: &str = "https://androidpublisher.googleapis.com/androidpublisher/v3";
pub const APPSTORE_BASE_URL: &str = "https://api.appstoreconnect.apple.com/v1";

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Android package name the Play products belong to
    #[serde(default = "default_package_name")]
    pub package_name: String,

    /// Directory holding the product JSON definitions
    #[serde(default = "default_product_dir")]
    pub product_dir: PathBuf,

    /// File used by `create`, `update` and `sync` when none is given
    #[serde(default = "default_product_file")]
    pub default_file: String,

    /// Product id used by `localizations` when none is given
    #[serde(default = "default_product_id")]
    pub default_product_id: String,

    /// Output format for list commands
    #[serde(default)]
    pub format: OutputFormat,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Android Publisher API root
    #[serde(default = "default_play_base_url")]
    pub play_base_url: String,

    /// App Store Connect API root
    #[serde(default = "default_appstore_base_url")]
    pub appstore_base_url: String,

    /// Extra or replacement locale mappings, merged over the built-in table
    #[serde(default)]
    pub locales: BTreeMap<String, String>,
}

fn default_package_name() -> String {
    DEFAULT_PACKAGE_NAME.to_string()
}

fn default_product_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_product_file() -> String {
    DEFAULT_PRODUCT_FILE.to_string()
}

fn default_product_id() -> String {
    DEFAULT_PRODUCT_ID.to_string()
}

fn default_play_base_url() -> String {
    PLAY_BASE_URL.to_string()
}

fn default_appstore_base_url() -> String {
    APPSTORE_BASE_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            package_name: default_package_name(),
            product_dir: default_product_dir(),
            default_file: default_product_file(),
            default_product_id: default_product_id(),
            format: OutputFormat::Table,
            proxy: None,
            play_base_url: default_play_base_url(),
            appstore_base_url: default_appstore_base_url(),
            locales: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("iap-sync.toml");
        if local_config.exists() {
            debug!("Found iap-sync.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("iap-sync").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(self) -> Self {
        self.with_lookup(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary variable source.
    pub fn with_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(package) = lookup("IAP_PACKAGE_NAME").filter(|v| !v.trim().is_empty()) {
            self.package_name = package;
        }

        if let Some(dir) = lookup("IAP_PRODUCT_DIR").filter(|v| !v.trim().is_empty()) {
            self.product_dir = PathBuf::from(dir);
        }

        if let Some(proxy) = lookup("IAP_PROXY").filter(|v| !v.trim().is_empty()) {
            self.proxy = Some(proxy);
        }

        self
    }

    /// Builds the locale table: built-in defaults plus configured entries.
    pub fn locale_map(&self) -> LocaleMap {
        LocaleMap::default().with_overrides(&self.locales)
    }
}

/// Output format for list results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use: table, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
