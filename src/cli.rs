//! Setup shared by the `iap-play` and `iap-appstore` binaries.

use crate::config::{Config, OutputFormat};
use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Args, CommandFactory, Parser};
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Flags accepted by every subcommand of both binaries.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the product JSON files
    #[arg(long, global = true)]
    pub product_dir: Option<PathBuf>,

    /// Output format for list commands (table, json)
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Loads config with layered overrides: file, environment, then flags.
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?.with_env();

        if let Some(dir) = &self.product_dir {
            config.product_dir = dir.clone();
        }
        if let Some(format) = self.format {
            config.format = format;
        }

        Ok(config)
    }
}

/// Installs the tracing subscriber.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

/// Parses the process arguments. Unknown commands print usage and yield
/// `None` instead of failing.
pub fn parse_or_usage<P: Parser>() -> Result<Option<P>> {
    parse_from_or_usage(std::env::args_os())
}

/// Like [`parse_or_usage`], for an explicit argument list.
pub fn parse_from_or_usage<P, I, T>(args: I) -> Result<Option<P>>
where
    P: Parser,
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match P::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(err) => match err.kind() {
            ErrorKind::InvalidSubcommand | ErrorKind::UnknownArgument => {
                print_usage::<P>()?;
                Ok(None)
            }
            _ => err.exit(),
        },
    }
}

/// Prints the help text of a command to stdout.
pub fn print_usage<P: Parser>() -> Result<()> {
    P::command().print_help()?;
    println!();
    Ok(())
}
