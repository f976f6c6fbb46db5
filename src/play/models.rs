//! Android Publisher `inappproducts` resource types.

use crate::product::ProductDefinition;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// An in-app product as the Play API represents it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InAppProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_name: Option<String>,
    pub sku: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_price: Option<Price>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub listings: BTreeMap<String, InAppProductListing>,
    /// Fields this crate does not model (prices per region, subscription data, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub price_micros: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InAppProductListing {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Response body of `inappproducts.list`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InAppProductsListResponse {
    #[serde(default)]
    pub inappproduct: Vec<InAppProduct>,
    #[serde(default)]
    pub token_pagination: Option<TokenPagination>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPagination {
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl InAppProduct {
    /// Builds the request body for a local definition.
    pub fn from_definition(definition: &ProductDefinition, package_name: &str) -> Self {
        let default_price = definition.default_price.as_ref().map(|price| Price {
            price_micros: price.price_micros.clone(),
            currency: price.currency.clone(),
        });

        let listings = definition
            .listings
            .iter()
            .map(|(locale, listing)| {
                (
                    locale.clone(),
                    InAppProductListing {
                        title: listing.title.clone(),
                        description: listing.description.clone(),
                    },
                )
            })
            .collect();

        Self {
            package_name: Some(package_name.to_string()),
            sku: definition.sku.clone(),
            status: Some(definition.status().to_string()),
            purchase_type: Some(definition.purchase_type().to_string()),
            default_language: definition.default_language.clone(),
            default_price,
            listings,
            extra: Map::new(),
        }
    }

    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("unknown")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_definition_applies_defaults() {
        let def = ProductDefinition::from_json(
            r#"{
                "sku": "easy_budget_premium",
                "defaultPrice": {"currency": "USD", "priceMicros": "2990000"},
                "listings": {"en-US": {"title": "Premium", "description": "All features"}}
            }"#,
        )
        .unwrap();

        let product = InAppProduct::from_definition(&def, "com.example.app");
        assert_eq!(product.package_name.as_deref(), Some("com.example.app"));
        assert_eq!(product.sku, "easy_budget_premium");
        assert_eq!(product.status(), "active");
        assert_eq!(product.purchase_type.as_deref(), Some("managedUser"));
        assert_eq!(
            product.default_price,
            Some(Price { price_micros: "2990000".into(), currency: "USD".into() })
        );
        assert_eq!(product.listings["en-US"].title, "Premium");
    }

    #[test]
    fn test_serialize_wire_names() {
        let def = ProductDefinition::from_json(
            r#"{"sku": "coffee", "defaultPrice": {"currency": "EUR", "priceMicros": 990000}}"#,
        )
        .unwrap();
        let json = serde_json::to_value(InAppProduct::from_definition(&def, "com.example.app")).unwrap();

        assert_eq!(json["packageName"], "com.example.app");
        assert_eq!(json["purchaseType"], "managedUser");
        assert_eq!(json["defaultPrice"]["priceMicros"], "990000");
        assert!(json.get("listings").is_none());
        assert!(json.get("defaultLanguage").is_none());
    }

    #[test]
    fn test_deserialize_keeps_unknown_fields() {
        let json = r#"{
            "packageName": "com.example.app",
            "sku": "coffee",
            "status": "active",
            "prices": {"KR": {"priceMicros": "1200000000", "currency": "KRW"}}
        }"#;
        let product: InAppProduct = serde_json::from_str(json).unwrap();
        assert_eq!(product.sku, "coffee");
        assert!(product.extra.contains_key("prices"));

        let back = serde_json::to_value(&product).unwrap();
        assert_eq!(back["prices"]["KR"]["currency"], "KRW");
    }

    #[test]
    fn test_list_response_empty_body() {
        let list: InAppProductsListResponse = serde_json::from_str("{}").unwrap();
        assert!(list.inappproduct.is_empty());
        assert!(list.token_pagination.is_none());
    }
}
