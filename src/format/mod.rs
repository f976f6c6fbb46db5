//! Output formatting for remote records (table or JSON).

use crate::appstore::{InAppPurchase, Localization};
use crate::config::OutputFormat;
use crate::play::InAppProduct;
use serde::Serialize;

const NAME_WIDTH: usize = 40;

/// Formats vendor records for stdout.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a single Play product as pretty JSON, whatever the list
    /// format, so vendor fields this crate does not model are shown too.
    pub fn format_product(&self, product: &InAppProduct) -> String {
        json(product, "{}")
    }

    /// Formats the Play product list.
    pub fn format_products(&self, products: &[InAppProduct]) -> String {
        match self.format {
            OutputFormat::Json => json(products, "[]"),
            OutputFormat::Table if products.is_empty() => "No products registered.".to_string(),
            OutputFormat::Table => {
                let sku_width = column_width(products.iter().map(|p| p.sku.as_str()), 3);
                let mut lines = vec![
                    format!("{:<sku_width$}  {:<10}  {:<14}  {}", "SKU", "Status", "Price", "Locales"),
                    format!("{:-<sku_width$}  {:-<10}  {:-<14}  {:-<7}", "", "", "", ""),
                ];

                for product in products {
                    let price = product
                        .default_price
                        .as_ref()
                        .map(|p| format!("{} {}", p.currency, micros_to_units(&p.price_micros)))
                        .unwrap_or_else(|| "N/A".to_string());

                    lines.push(format!(
                        "{:<sku_width$}  {:<10}  {:<14}  {}",
                        product.sku,
                        product.status(),
                        price,
                        product.listings.len()
                    ));
                }

                lines.push(String::new());
                lines.push(format!("Total: {} products", products.len()));
                lines.join("\n")
            }
        }
    }

    /// Formats the App Store Connect in-app purchase list.
    pub fn format_iaps(&self, iaps: &[InAppPurchase]) -> String {
        match self.format {
            OutputFormat::Json => json(iaps, "[]"),
            OutputFormat::Table if iaps.is_empty() => "No in-app purchases registered.".to_string(),
            OutputFormat::Table => {
                let id_width = column_width(iaps.iter().filter_map(|i| i.product_id()), 10);
                let mut lines = vec![
                    format!("{:<id_width$}  {:<12}  {}", "Product ID", "Apple ID", "Name"),
                    format!("{:-<id_width$}  {:-<12}  {:-<4}", "", "", ""),
                ];

                for iap in iaps {
                    lines.push(format!(
                        "{:<id_width$}  {:<12}  {}",
                        iap.product_id().unwrap_or("-"),
                        iap.id,
                        truncate(iap.name(), NAME_WIDTH)
                    ));
                }

                lines.push(String::new());
                lines.push(format!("Total: {} in-app purchases", iaps.len()));
                lines.join("\n")
            }
        }
    }

    /// Formats the localizations of one in-app purchase.
    pub fn format_localizations(&self, localizations: &[Localization]) -> String {
        match self.format {
            OutputFormat::Json => json(localizations, "[]"),
            OutputFormat::Table if localizations.is_empty() => "No localizations.".to_string(),
            OutputFormat::Table => localizations
                .iter()
                .map(|loc| format!("  - {}: {}", loc.locale().unwrap_or("?"), loc.name()))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

fn json<T: Serialize + ?Sized>(value: &T, fallback: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| fallback.to_string())
}

/// Renders a micros amount as currency units rounded to two places,
/// e.g. `2990000` -> `2.99`.
fn micros_to_units(micros: &str) -> String {
    match micros.parse::<i64>() {
        Ok(value) => {
            let sign = if value < 0 { "-" } else { "" };
            let cents = (value.unsigned_abs() + 5_000) / 10_000;
            format!("{}{}.{:02}", sign, cents / 100, cents % 100)
        }
        Err(_) => micros.to_string(),
    }
}

fn column_width<'a>(values: impl Iterator<Item = &'a str>, min: usize) -> usize {
    values.map(|v| v.chars().count()).max().unwrap_or(0).max(min)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let head: String = text.chars().take(width - 3).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appstore::models::{InAppPurchaseAttributes, LocalizationAttributes};
    use crate::product::ProductDefinition;

    fn make_product() -> InAppProduct {
        let def = ProductDefinition::from_json(
            r#"{
                "sku": "easy_budget_premium",
                "defaultPrice": {"currency": "USD", "priceMicros": "2990000"},
                "listings": {
                    "en-US": {"title": "Premium"},
                    "ko-KR": {"title": "프리미엄"}
                }
            }"#,
        )
        .unwrap();
        InAppProduct::from_definition(&def, "com.example.app")
    }

    fn make_iap(id: &str, product_id: &str, name: &str) -> InAppPurchase {
        InAppPurchase {
            id: id.to_string(),
            attributes: InAppPurchaseAttributes {
                product_id: Some(product_id.to_string()),
                name: Some(name.to_string()),
                ..InAppPurchaseAttributes::default()
            },
        }
    }

    #[test]
    fn test_micros_to_units() {
        assert_eq!(micros_to_units("2990000"), "2.99");
        assert_eq!(micros_to_units("1000000"), "1.00");
        assert_eq!(micros_to_units("3300000000"), "3300.00");
        assert_eq!(micros_to_units("abc"), "abc");
    }

    #[test]
    fn test_micros_to_units_sign_and_rounding() {
        assert_eq!(micros_to_units("-500000"), "-0.50");
        assert_eq!(micros_to_units("-2990000"), "-2.99");
        assert_eq!(micros_to_units("2995000"), "3.00");
        assert_eq!(micros_to_units("994999"), "0.99");
        assert_eq!(micros_to_units("0"), "0.00");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("프리미엄 구독", 5), "프리...");
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_single_product_is_json_in_table_mode() {
        let output = Formatter::new(OutputFormat::Table).format_product(&make_product());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["sku"], "easy_budget_premium");
        assert_eq!(value["listings"]["ko-KR"]["title"], "프리미엄");
    }

    #[test]
    fn test_json_single_product() {
        let output = Formatter::new(OutputFormat::Json).format_product(&make_product());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["sku"], "easy_budget_premium");
        assert_eq!(value["defaultPrice"]["priceMicros"], "2990000");
    }

    #[test]
    fn test_table_products() {
        let output = Formatter::new(OutputFormat::Table).format_products(&[make_product()]);
        assert!(output.contains("SKU"));
        assert!(output.contains("easy_budget_premium"));
        assert!(output.contains("USD 2.99"));
        assert!(output.contains("Total: 1 products"));
    }

    #[test]
    fn test_empty_lists() {
        let table = Formatter::new(OutputFormat::Table);
        assert_eq!(table.format_products(&[]), "No products registered.");
        assert_eq!(table.format_iaps(&[]), "No in-app purchases registered.");
        assert_eq!(table.format_localizations(&[]), "No localizations.");

        let json = Formatter::new(OutputFormat::Json);
        assert_eq!(json.format_products(&[]), "[]");
        assert_eq!(json.format_iaps(&[]), "[]");
    }

    #[test]
    fn test_table_iaps() {
        let iaps = vec![
            make_iap("6450000001", "easy_budget_premium", "Premium"),
            make_iap("6450000002", "tip", "Tip jar"),
        ];
        let output = Formatter::new(OutputFormat::Table).format_iaps(&iaps);
        assert!(output.contains("Product ID"));
        assert!(output.contains("6450000001"));
        assert!(output.contains("Tip jar"));
        assert!(output.contains("Total: 2 in-app purchases"));
    }

    #[test]
    fn test_json_iaps() {
        let output = Formatter::new(OutputFormat::Json)
            .format_iaps(&[make_iap("6450000001", "easy_budget_premium", "Premium")]);
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["attributes"]["productId"], "easy_budget_premium");
    }

    #[test]
    fn test_table_localizations() {
        let locs = vec![Localization {
            id: "loc-ko".to_string(),
            attributes: LocalizationAttributes {
                locale: Some("ko".to_string()),
                name: Some("프리미엄".to_string()),
                ..LocalizationAttributes::default()
            },
        }];
        let output = Formatter::new(OutputFormat::Table).format_localizations(&locs);
        assert_eq!(output, "  - ko: 프리미엄");
    }
}
