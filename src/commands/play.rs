//! Google Play product sync commands.

use crate::config::Config;
use crate::format::Formatter;
use crate::play::{InAppProduct, PlayPublisher};
use crate::product::{ProductDefinition, ProductDir};
use crate::upsert::UpsertAction;
use anyhow::Result;
use tracing::{info, warn};

/// Result of a create, update or upsert for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    Updated,
    /// Create refused because the SKU is already registered
    AlreadyExists,
    /// Update refused because the SKU is unknown
    NotFound,
    Failed(String),
}

impl SyncOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SyncOutcome::Created | SyncOutcome::Updated)
    }
}

/// Result of looking up one product.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Found(Box<InAppProduct>),
    NotFound,
    Failed(String),
}

/// Tally of a directory-wide sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub processed: usize,
    pub created: usize,
    pub updated: usize,
    /// Expected branch conditions that stopped a product
    pub skipped: usize,
    pub failed: usize,
}

impl SyncSummary {
    fn record(&mut self, outcome: &SyncOutcome) {
        self.processed += 1;
        match outcome {
            SyncOutcome::Created => self.created += 1,
            SyncOutcome::Updated => self.updated += 1,
            SyncOutcome::AlreadyExists | SyncOutcome::NotFound => self.skipped += 1,
            SyncOutcome::Failed(_) => self.failed += 1,
        }
    }

    fn record_error(&mut self) {
        self.processed += 1;
        self.failed += 1;
    }
}

/// Executes product operations against the Play API.
pub struct PlayCommand {
    config: Config,
    products: ProductDir,
}

impl PlayCommand {
    /// Creates a new Play command.
    pub fn new(config: Config) -> Self {
        let products = ProductDir::new(config.product_dir.clone());
        Self { config, products }
    }

    /// Fetches and prints every product of the package.
    pub async fn list_products(&self, client: &impl PlayPublisher) -> Vec<InAppProduct> {
        println!("Listing in-app products for {}...", self.config.package_name);

        match client.list().await {
            Ok(products) => {
                println!("{}", Formatter::new(self.config.format).format_products(&products));
                products
            }
            Err(e) => {
                warn!("List failed: {}", e);
                println!("Failed to list products: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetches and prints one product.
    pub async fn get_product(&self, client: &impl PlayPublisher, sku: &str) -> LookupOutcome {
        println!("Looking up product: {}", sku);

        match client.get(sku).await {
            Ok(product) => {
                println!("{}", Formatter::new(self.config.format).format_product(&product));
                LookupOutcome::Found(Box::new(product))
            }
            Err(e) if e.is_not_found() || e.is_client_error() => {
                println!("Product not found: {}", e.message());
                LookupOutcome::NotFound
            }
            Err(e) => {
                println!("Lookup failed: {}", e);
                LookupOutcome::Failed(e.to_string())
            }
        }
    }

    /// Creates the product described by a file.
    pub async fn create_product(&self, client: &impl PlayPublisher, file: &str) -> Result<SyncOutcome> {
        let definition = self.products.load(file)?;
        Ok(self.insert(client, &definition).await)
    }

    /// Updates the product described by a file.
    pub async fn update_product(&self, client: &impl PlayPublisher, file: &str) -> Result<SyncOutcome> {
        let definition = self.products.load(file)?;
        Ok(self.replace(client, &definition).await)
    }

    /// Creates or updates the product described by a file, depending on
    /// whether its SKU is already registered.
    pub async fn upsert_product(&self, client: &impl PlayPublisher, file: &str) -> Result<SyncOutcome> {
        let definition = self.products.load(file)?;
        println!("Syncing product: {}", definition.sku);

        let exists = match client.get(&definition.sku).await {
            Ok(_) => true,
            Err(e) if e.is_client_error() => false,
            Err(e) => {
                println!("  Existence check failed: {}", e);
                return Ok(SyncOutcome::Failed(e.to_string()));
            }
        };

        let outcome = match UpsertAction::decide(exists) {
            UpsertAction::Create => self.insert(client, &definition).await,
            UpsertAction::Update => self.replace(client, &definition).await,
        };
        Ok(outcome)
    }

    /// Upserts every JSON file in the product directory. A failing file
    /// does not stop the ones after it.
    pub async fn sync_all(&self, client: &impl PlayPublisher) -> Result<SyncSummary> {
        println!("Syncing all in-app products in {}", self.products.root().display());
        println!();

        let files = self.products.json_files()?;
        let mut summary = SyncSummary::default();

        if files.is_empty() {
            println!("No JSON files found.");
            return Ok(summary);
        }

        for path in files {
            let file = path.to_string_lossy();
            info!("Processing {}", file);

            match self.upsert_product(client, &file).await {
                Ok(outcome) => {
                    if !outcome.is_success() {
                        warn!("{} not synced: {:?}", file, outcome);
                    }
                    summary.record(&outcome);
                }
                Err(e) => {
                    println!("Skipping {}: {:#}", file, e);
                    summary.record_error();
                }
            }
            println!();
        }

        println!(
            "Sync finished: {} processed, {} created, {} updated, {} skipped, {} failed",
            summary.processed, summary.created, summary.updated, summary.skipped, summary.failed
        );
        Ok(summary)
    }

    async fn insert(&self, client: &impl PlayPublisher, definition: &ProductDefinition) -> SyncOutcome {
        println!("Creating product: {}", definition.sku);
        let product = InAppProduct::from_definition(definition, &self.config.package_name);

        match client.insert(&product).await {
            Ok(_) => {
                println!("  Created: {}", definition.sku);
                SyncOutcome::Created
            }
            Err(e) if e.is_already_exists() => {
                println!("  Product already exists. Use the update command instead.");
                SyncOutcome::AlreadyExists
            }
            Err(e) => {
                warn!("Create failed for {}: {}", definition.sku, e);
                println!("  Create failed: {}", e);
                SyncOutcome::Failed(e.to_string())
            }
        }
    }

    async fn replace(&self, client: &impl PlayPublisher, definition: &ProductDefinition) -> SyncOutcome {
        println!("Updating product: {}", definition.sku);
        let product = InAppProduct::from_definition(definition, &self.config.package_name);

        match client.update(&definition.sku, &product).await {
            Ok(_) => {
                println!("  Updated: {}", definition.sku);
                SyncOutcome::Updated
            }
            Err(e) if e.is_not_found() => {
                println!("  Product does not exist. Use the create command instead.");
                SyncOutcome::NotFound
            }
            Err(e) => {
                warn!("Update failed for {}: {}", definition.sku, e);
                println!("  Update failed: {}", e);
                SyncOutcome::Failed(e.to_string())
            }
        }
    }
}
