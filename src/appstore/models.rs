//! JSON:API documents exchanged with App Store Connect.

use serde::{Deserialize, Serialize};

pub const IN_APP_PURCHASES: &str = "inAppPurchases";
pub const IN_APP_PURCHASE_LOCALIZATIONS: &str = "inAppPurchaseLocalizations";

/// A collection response: `{"data": [...], "links": {"next": ...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ListDocument<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub links: Option<PagedLinks>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PagedLinks {
    #[serde(default)]
    pub next: Option<String>,
}

/// A single-resource response: `{"data": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct Document<T> {
    pub data: T,
}

/// An in-app purchase resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InAppPurchase {
    pub id: String,
    #[serde(default)]
    pub attributes: InAppPurchaseAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InAppPurchaseAttributes {
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub in_app_purchase_type: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl InAppPurchase {
    pub fn product_id(&self) -> Option<&str> {
        self.attributes.product_id.as_deref()
    }

    pub fn name(&self) -> &str {
        self.attributes.name.as_deref().unwrap_or("")
    }
}

/// A localization resource attached to an in-app purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Localization {
    pub id: String,
    #[serde(default)]
    pub attributes: LocalizationAttributes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizationAttributes {
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

impl Localization {
    pub fn locale(&self) -> Option<&str> {
        self.attributes.locale.as_deref()
    }

    pub fn name(&self) -> &str {
        self.attributes.name.as_deref().unwrap_or("")
    }
}

/// Body of `POST /inAppPurchaseLocalizations`.
#[derive(Debug, Clone, Serialize)]
pub struct LocalizationCreateRequest {
    pub data: LocalizationCreateData,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocalizationCreateData {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub attributes: LocalizationCreateAttributes,
    pub relationships: LocalizationRelationships,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocalizationCreateAttributes {
    pub locale: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizationRelationships {
    pub in_app_purchase_v2: Relationship,
}

#[derive(Debug, Clone, Serialize)]
pub struct Relationship {
    pub data: ResourceIdentifier,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
}

impl LocalizationCreateRequest {
    pub fn new(iap_id: &str, locale: &str, name: &str, description: Option<&str>) -> Self {
        Self {
            data: LocalizationCreateData {
                kind: IN_APP_PURCHASE_LOCALIZATIONS,
                attributes: LocalizationCreateAttributes {
                    locale: locale.to_string(),
                    name: name.to_string(),
                    description: description.map(str::to_string),
                },
                relationships: LocalizationRelationships {
                    in_app_purchase_v2: Relationship {
                        data: ResourceIdentifier { kind: IN_APP_PURCHASES, id: iap_id.to_string() },
                    },
                },
            },
        }
    }
}

/// Body of `PATCH /inAppPurchaseLocalizations/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct LocalizationUpdateRequest {
    pub data: LocalizationUpdateData,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocalizationUpdateData {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: String,
    pub attributes: LocalizationUpdateAttributes,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocalizationUpdateAttributes {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LocalizationUpdateRequest {
    pub fn new(localization_id: &str, name: &str, description: Option<&str>) -> Self {
        Self {
            data: LocalizationUpdateData {
                kind: IN_APP_PURCHASE_LOCALIZATIONS,
                id: localization_id.to_string(),
                attributes: LocalizationUpdateAttributes {
                    name: name.to_string(),
                    description: description.map(str::to_string),
                },
            },
        }
    }
}
