//! Check-then-act decisions for products and localizations.

use crate::appstore::models::Localization;
use crate::locale::LocaleMap;
use crate::product::Listing;

/// What to do with a product after the existence check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertAction {
    Create,
    Update,
}

impl UpsertAction {
    pub fn decide(exists: bool) -> Self {
        if exists {
            UpsertAction::Update
        } else {
            UpsertAction::Create
        }
    }
}

/// What to do with one localization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalizationAction {
    Create,
    Update { localization_id: String },
}

impl LocalizationAction {
    /// Updates the first remote localization with the same locale, else creates.
    pub fn decide(existing: &[Localization], locale: &str) -> Self {
        existing
            .iter()
            .find(|loc| loc.locale() == Some(locale))
            .map(|loc| LocalizationAction::Update { localization_id: loc.id.clone() })
            .unwrap_or(LocalizationAction::Create)
    }
}

/// One listing resolved against the remote state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedLocalization {
    /// Locale code as written in the product file
    pub source_locale: String,
    /// App Store Connect locale code
    pub locale: String,
    pub name: String,
    pub description: Option<String>,
    pub action: LocalizationAction,
}

/// Resolves one local listing against the remote localizations.
pub fn plan_localization(
    source_locale: &str,
    listing: &Listing,
    existing: &[Localization],
    locales: &LocaleMap,
) -> PlannedLocalization {
    let locale = locales.map(source_locale);
    let action = LocalizationAction::decide(existing, &locale);
    PlannedLocalization {
        source_locale: source_locale.to_string(),
        locale,
        name: listing.title.clone(),
        description: listing.description.clone(),
        action,
    }
}
