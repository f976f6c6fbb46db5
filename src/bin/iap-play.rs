//! iap-play - Sync in-app product metadata to Google Play

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use iap_sync::cli::{self, GlobalArgs};
use iap_sync::commands::PlayCommand;
use iap_sync::credentials::PlayCredentials;
use iap_sync::http::build_client;
use iap_sync::play::{fetch_access_token, PlayClient, ServiceAccountKey};
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "iap-play",
    version,
    about = "Sync in-app product metadata to Google Play",
    long_about = "Creates and updates Google Play in-app products from local JSON files using a service account."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or update every product file in the product directory
    Sync,

    /// Create a product from a file
    Create {
        /// Product JSON file (defaults to the configured file)
        file: Option<String>,
    },

    /// Update a product from a file
    Update {
        /// Product JSON file (defaults to the configured file)
        file: Option<String>,
    },

    /// Show one registered product
    Get {
        /// Product SKU
        sku: Option<String>,
    },

    /// List registered products
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let Some(cli) = cli::parse_or_usage::<Cli>()? else {
        return Ok(());
    };
    let Some(command) = cli.command else {
        cli::print_usage::<Cli>()?;
        return Ok(());
    };

    cli::init_tracing(cli.global.verbose);
    let config = cli.global.load_config()?;

    if let Commands::Get { sku: None } = command {
        bail!("Missing SKU. Usage: iap-play get <sku>");
    }

    let credentials = PlayCredentials::from_env()?;
    let key = ServiceAccountKey::from_file(&credentials.key_path)?;
    debug!("Using service account {}", key.client_email);

    let http = build_client(config.proxy.as_deref())?;
    let token = fetch_access_token(&http, &key)
        .await
        .context("Failed to obtain a Google Play access token")?;
    let client = PlayClient::new(http, &config, token);
    debug!("Targeting package {}", client.package_name());

    let default_file = config.default_file.clone();
    let cmd = PlayCommand::new(config);

    match command {
        Commands::Sync => {
            cmd.sync_all(&client).await?;
        }
        Commands::Create { file } => {
            cmd.create_product(&client, file.as_deref().unwrap_or(&default_file)).await?;
        }
        Commands::Update { file } => {
            cmd.update_product(&client, file.as_deref().unwrap_or(&default_file)).await?;
        }
        Commands::Get { sku } => {
            if let Some(sku) = sku {
                cmd.get_product(&client, &sku).await;
            }
        }
        Commands::List => {
            cmd.list_products(&client).await;
        }
    }

    Ok(())
}
