use std::{env, env::VarError, sync::Arc};

use clap::{Parser, Subcommand};
use lightspeed_tools::{LightspeedApi, TokenPair};
use log::*;
use shopify_tools::ShopifyApi;

use crate::{
    config::SyncConfig,
    errors::SyncError,
    sync::{CatalogSync, SyncDirection},
    sync_worker::start_sync_worker,
};

#[derive(Parser, Debug)]
#[command(version, about = "Keeps a Shopify catalog in step with Lightspeed Retail inventory")]
pub struct Arguments {
    /// What to do. Defaults to `run`.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sync on a timer until interrupted
    #[clap(name = "run")]
    Run {
        /// Overrides CATALOG_SYNC_DIRECTION
        #[arg(short = 'd', long = "direction")]
        direction: Option<SyncDirection>,
    },
    /// Run a single sync cycle and exit
    #[clap(name = "once")]
    Once {
        /// Overrides CATALOG_SYNC_DIRECTION
        #[arg(short = 'd', long = "direction")]
        direction: Option<SyncDirection>,
    },
    /// Print the Lightspeed authorization URL
    #[clap(name = "authorize-url")]
    AuthorizeUrl,
    /// Exchange a Lightspeed authorization code for a new token pair
    #[clap(name = "exchange-code")]
    ExchangeCode {
        /// The `code` query parameter Lightspeed appended to the redirect URI
        code: String,
        /// Print the tokens in full, rather than masked
        #[arg(long = "reveal")]
        reveal: bool,
    },
    /// Print the current (non-secret) configuration values
    #[clap(name = "env")]
    Env,
}

pub async fn handle_command(command: Option<Command>, config: SyncConfig) -> Result<(), SyncError> {
    match command.unwrap_or(Command::Run { direction: None }) {
        Command::Run { direction } => {
            let direction = direction.unwrap_or(config.direction);
            run_worker(config, direction).await
        },
        Command::Once { direction } => {
            let direction = direction.unwrap_or(config.direction);
            let sync = build_sync(&config)?;
            sync.run_cycle(direction).await;
            Ok(())
        },
        Command::AuthorizeUrl => {
            let api = LightspeedApi::new(config.lightspeed)?;
            let url = api.token_manager().authorization_url()?;
            println!("Open this URL in a browser and approve access. Then run `exchange-code` with the returned code:");
            println!("{url}");
            Ok(())
        },
        Command::ExchangeCode { code, reveal } => {
            let api = LightspeedApi::new(config.lightspeed)?;
            let tokens = api.token_manager().exchange_code(&code).await?;
            print_tokens(&tokens, reveal);
            Ok(())
        },
        Command::Env => {
            display_envs();
            Ok(())
        },
    }
}

pub fn build_sync(config: &SyncConfig) -> Result<CatalogSync<ShopifyApi, LightspeedApi>, SyncError> {
    let shopify = ShopifyApi::new(config.shopify.clone())?;
    let lightspeed = LightspeedApi::new(config.lightspeed.clone())?;
    Ok(CatalogSync::new(shopify, lightspeed, config.item_filter()))
}

async fn run_worker(config: SyncConfig, direction: SyncDirection) -> Result<(), SyncError> {
    let sync = Arc::new(build_sync(&config)?);
    info!("🚀️ Starting {direction} catalog sync every {}s", config.interval.as_secs());
    let worker = start_sync_worker(config.interval, config.run_on_start, move || {
        let sync = Arc::clone(&sync);
        async move {
            sync.run_cycle(direction).await;
        }
    });
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("🚀️ Interrupted. Stopping the catalog sync."),
        Err(e) => error!("🚀️ Could not listen for the interrupt signal. Stopping the catalog sync. {e}"),
    }
    worker.abort();
    Ok(())
}

fn print_tokens(tokens: &TokenPair, reveal: bool) {
    if reveal {
        println!("LIGHTSPEED_ACCESS_TOKEN={}", tokens.access_token.reveal());
        println!("LIGHTSPEED_REFRESH_TOKEN={}", tokens.refresh_token.reveal());
    } else {
        println!("LIGHTSPEED_ACCESS_TOKEN={}", tokens.access_token);
        println!("LIGHTSPEED_REFRESH_TOKEN={}", tokens.refresh_token);
        println!("Tokens are masked. Re-run with --reveal to print them in full.");
    }
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 13] = [
        "RUST_LOG",
        "SHOPIFY_STORE",
        "SHOPIFY_API_KEY",
        "SHOPIFY_API_VERSION",
        "LIGHTSPEED_ACCOUNT_ID",
        "LIGHTSPEED_CLIENT_ID",
        "LIGHTSPEED_REDIRECT_URI",
        "LIGHTSPEED_API_URL",
        "LIGHTSPEED_OAUTH_URL",
        "CATALOG_SYNC_INTERVAL",
        "CATALOG_SYNC_DIRECTION",
        "CATALOG_SYNC_MANUFACTURER_SKU",
        "CATALOG_SYNC_RUN_ON_START",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Arguments::command().debug_assert();
    }

    #[test]
    fn parse_commands() {
        let args = Arguments::try_parse_from(["catalog_sync"]).unwrap();
        assert!(args.command.is_none());
        let args = Arguments::try_parse_from(["catalog_sync", "once", "-d", "storefront-to-inventory"]).unwrap();
        assert!(matches!(args.command, Some(Command::Once { direction: Some(SyncDirection::StorefrontToInventory) })));
        let args = Arguments::try_parse_from(["catalog_sync", "exchange-code", "abc123", "--reveal"]).unwrap();
        assert!(matches!(args.command, Some(Command::ExchangeCode { code, reveal: true }) if code == "abc123"));
        assert!(Arguments::try_parse_from(["catalog_sync", "run", "--direction", "up"]).is_err());
    }
}
