//! iap-appstore - Sync in-app purchase localizations to App Store Connect

use anyhow::Result;
use clap::{Parser, Subcommand};
use iap_sync::appstore::{generate_token, AppStoreClient};
use iap_sync::cli::{self, GlobalArgs};
use iap_sync::commands::AppStoreCommand;
use iap_sync::credentials::AppStoreCredentials;
use iap_sync::http::build_client;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "iap-appstore",
    version,
    about = "Sync in-app purchase localizations to App Store Connect",
    long_about = "Pushes the listings of local product JSON files to existing App Store Connect in-app purchases."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or update the localizations of one product
    Sync {
        /// Product JSON file (defaults to the configured file)
        file: Option<String>,
    },

    /// List the app's in-app purchases
    List,

    /// Show the localizations of one in-app purchase
    Localizations {
        /// Product ID (defaults to the configured product)
        product_id: Option<String>,
    },
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

    let credentials = AppStoreCredentials::from_env()?;
    let token = generate_token(&credentials)?;

    let http = build_client(config.proxy.as_deref())?;
    let client = AppStoreClient::new(http, &config, credentials.app_id, token);
    debug!("Targeting app {}", client.app_id());

    let default_file = config.default_file.clone();
    let default_product_id = config.default_product_id.clone();
    let cmd = AppStoreCommand::new(config);

    match command {
        Commands::Sync { file } => {
            cmd.sync_localizations(&client, file.as_deref().unwrap_or(&default_file)).await?;
        }
        Commands::List => {
            cmd.list_iaps(&client).await;
        }
        Commands::Localizations { product_id } => {
            cmd.show_localizations(&client, product_id.as_deref().unwrap_or(&default_product_id))
                .await;
        }
    }

    Ok(())
}
