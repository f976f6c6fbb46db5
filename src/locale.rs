//! Locale code mapping between generic codes and App Store Connect locales.

use std::collections::BTreeMap;

/// Built-in mapping from generic locale codes to App Store Connect codes.
///
/// Many-to-one: both a bare language (`ko`) and a regional code (`ko-KR`)
/// resolve to the same App Store Connect locale.
pub const DEFAULT_MAPPINGS: &[(&str, &str)] = &[
    ("en-US", "en-US"),
    ("ko", "ko"),
    ("ko-KR", "ko"),
    ("ja", "ja"),
    ("ja-JP", "ja"),
    ("zh-Hans", "zh-Hans"),
    ("zh-CN", "zh-Hans"),
    ("zh-Hant", "zh-Hant"),
    ("zh-TW", "zh-Hant"),
    ("de", "de-DE"),
    ("de-DE", "de-DE"),
    ("fr", "fr-FR"),
    ("fr-FR", "fr-FR"),
    ("es", "es-ES"),
    ("es-ES", "es-ES"),
    ("pt-BR", "pt-BR"),
    ("it", "it"),
    ("it-IT", "it"),
    ("ru", "ru"),
    ("ru-RU", "ru"),
    ("ar", "ar-SA"),
    ("th", "th"),
    ("vi", "vi"),
    ("id", "id"),
];

/// Lookup table from generic locale codes to App Store Connect locale codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleMap {
    entries: BTreeMap<String, String>,
}

impl Default for LocaleMap {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_MAPPINGS.iter().copied())
    }
}

impl LocaleMap {
    /// Creates a map with the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a map from arbitrary `(generic, vendor)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        Self { entries }
    }

    /// Merges configured entries over the current table. Later entries win.
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (generic, vendor) in overrides {
            self.entries.insert(generic.clone(), vendor.clone());
        }
        self
    }

    /// Translates a locale code, falling back to the code itself when unmapped.
    pub fn map(&self, code: &str) -> String {
        self.entries.get(code).cloned().unwrap_or_else(|| code.to_string())
    }
}
