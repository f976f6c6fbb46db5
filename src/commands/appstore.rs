//! App Store Connect localization sync commands.

use crate::appstore::{AppStoreApi, InAppPurchase, Localization};
use crate::config::Config;
use crate::format::Formatter;
use crate::locale::LocaleMap;
use crate::product::ProductDir;
use crate::upsert::{plan_localization, LocalizationAction};
use anyhow::Result;
use tracing::{debug, info, warn};

/// Result of writing one localization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalizationOutcome {
    Created,
    Updated,
    Failed(String),
}

/// One listing of a product file after sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizationResult {
    /// App Store Connect locale code
    pub locale: String,
    pub action: LocalizationAction,
    pub outcome: LocalizationOutcome,
}

/// What a localization sync did for one product file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizationSyncReport {
    pub product_id: String,
    /// Remote in-app purchase id, `None` when the product is not registered
    pub iap_id: Option<String>,
    pub results: Vec<LocalizationResult>,
}

impl LocalizationSyncReport {
    pub fn iap_missing(&self) -> bool {
        self.iap_id.is_none()
    }

    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, LocalizationOutcome::Created))
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, LocalizationOutcome::Updated))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, LocalizationOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&LocalizationOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Executes in-app purchase operations against App Store Connect.
pub struct AppStoreCommand {
    config: Config,
    products: ProductDir,
    locales: LocaleMap,
}

impl AppStoreCommand {
    /// Creates a new App Store command.
    pub fn new(config: Config) -> Self {
        let products = ProductDir::new(config.product_dir.clone());
        let locales = config.locale_map();
        Self { config, products, locales }
    }

    /// Fetches and prints every in-app purchase of the app.
    pub async fn list_iaps(&self, client: &impl AppStoreApi) -> Vec<InAppPurchase> {
        println!("Listing in-app purchases...");

        match client.list_iaps().await {
            Ok(iaps) => {
                println!("{}", Formatter::new(self.config.format).format_iaps(&iaps));
                iaps
            }
            Err(e) => {
                warn!("List failed: {}", e);
                println!("Failed to list in-app purchases: {}", e);
                Vec::new()
            }
        }
    }

    /// Finds the in-app purchase registered under a product id. The list
    /// is filtered locally.
    pub async fn find_iap_by_product_id(
        &self,
        client: &impl AppStoreApi,
        product_id: &str,
    ) -> Option<InAppPurchase> {
        match client.list_iaps().await {
            Ok(iaps) => {
                debug!("Searching {} in-app purchases for {}", iaps.len(), product_id);
                iaps.into_iter().find(|iap| iap.product_id() == Some(product_id))
            }
            Err(e) => {
                println!("Failed to list in-app purchases: {}", e);
                None
            }
        }
    }

    /// Fetches and prints the localizations of one in-app purchase.
    pub async fn list_localizations(&self, client: &impl AppStoreApi, iap_id: &str) -> Vec<Localization> {
        println!("Listing localizations...");

        match client.list_localizations(iap_id).await {
            Ok(localizations) => {
                println!("{}", Formatter::new(self.config.format).format_localizations(&localizations));
                localizations
            }
            Err(e) => {
                println!("Failed to list localizations: {}", e);
                Vec::new()
            }
        }
    }

    /// Resolves a product id and prints its localizations.
    pub async fn show_localizations(
        &self,
        client: &impl AppStoreApi,
        product_id: &str,
    ) -> Option<Vec<Localization>> {
        let Some(iap) = self.find_iap_by_product_id(client, product_id).await else {
            println!("In-app purchase not found: {}", product_id);
            return None;
        };

        println!("Found in-app purchase: {} ({})", product_id, iap.id);
        Some(self.list_localizations(client, &iap.id).await)
    }

    /// Pushes every listing of a product file to App Store Connect. The
    /// in-app purchase itself must already exist.
    pub async fn sync_localizations(
        &self,
        client: &impl AppStoreApi,
        file: &str,
    ) -> Result<LocalizationSyncReport> {
        let definition = self.products.load(file)?;
        let product_id = definition.sku.clone();
        println!("Syncing localizations: {}", product_id);
        println!();

        let mut report =
            LocalizationSyncReport { product_id: product_id.clone(), iap_id: None, results: Vec::new() };

        let Some(iap) = self.find_iap_by_product_id(client, &product_id).await else {
            println!("In-app purchase not found: {}", product_id);
            println!("Create the product in App Store Connect first.");
            return Ok(report);
        };

        println!("Found in-app purchase: {}", iap.id);
        println!();
        report.iap_id = Some(iap.id.clone());

        let mut known = self.list_localizations(client, &iap.id).await;
        println!();

        for (source_locale, listing) in &definition.listings {
            let plan = plan_localization(source_locale, listing, &known, &self.locales);
            info!("{} -> {} ({:?})", plan.source_locale, plan.locale, plan.action);

            let outcome = match &plan.action {
                LocalizationAction::Create => {
                    let (outcome, created) = self
                        .create_localization(
                            client,
                            &iap.id,
                            &plan.locale,
                            &plan.name,
                            plan.description.as_deref(),
                        )
                        .await;
                    // Listings that map to the same vendor locale update the new record.
                    known.extend(created);
                    outcome
                }
                LocalizationAction::Update { localization_id } => {
                    self.update_localization(
                        client,
                        localization_id,
                        &plan.locale,
                        &plan.name,
                        plan.description.as_deref(),
                    )
                    .await
                }
            };

            report.results.push(LocalizationResult { locale: plan.locale, action: plan.action, outcome });
        }

        println!();
        println!(
            "Localization sync finished: {} created, {} updated, {} failed",
            report.created(),
            report.updated(),
            report.failed()
        );
        Ok(report)
    }

    /// Adds one localization; returns the created record on success.
    pub async fn create_localization(
        &self,
        client: &impl AppStoreApi,
        iap_id: &str,
        locale: &str,
        name: &str,
        description: Option<&str>,
    ) -> (LocalizationOutcome, Option<Localization>) {
        match client.create_localization(iap_id, locale, name, description).await {
            Ok(mut created) => {
                println!("  + {} created", locale);
                created.attributes.locale.get_or_insert_with(|| locale.to_string());
                (LocalizationOutcome::Created, Some(created))
            }
            Err(e) => {
                println!("  + {} create failed: {}", locale, e.message());
                (LocalizationOutcome::Failed(e.to_string()), None)
            }
        }
    }

    /// Changes one existing localization.
    pub async fn update_localization(
        &self,
        client: &impl AppStoreApi,
        localization_id: &str,
        locale: &str,
        name: &str,
        description: Option<&str>,
    ) -> LocalizationOutcome {
        match client.update_localization(localization_id, name, description).await {
            Ok(_) => {
                println!("  ~ {} updated", locale);
                LocalizationOutcome::Updated
            }
            Err(e) => {
                println!("  ~ {} update failed: {}", locale, e.message());
                LocalizationOutcome::Failed(e.to_string())
            }
        }
    }
}
