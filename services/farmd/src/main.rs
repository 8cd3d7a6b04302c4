//! Fintopio farming daemon
//!
//! Single binary that:
//! 1. Loads the account store and config
//! 2. Spawns one farming runner per enrolled account
//! 3. Runs them forever, isolating failures per account
//! 4. Stops every runner on ctrl-c via a shared cancellation token
//!
//! `add-account` and `accounts` are the thin enrollment/listing surface
//! around the store.

mod config;
mod enroll;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use farm_engine::{AccountStore, ThreadRngJitter, run_accounts};
use telegram_bridge::HelperBridge;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "fintopio-farmd", version, about = "Fintopio farming daemon")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start farming for every enrolled account (default)
    Farm,
    /// Enroll a new account interactively
    AddAccount,
    /// List enrolled accounts
    Accounts,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Console tool: ANSI fmt output with LOG_LEVEL / RUST_LOG support.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config_path = Config::resolve_path(cli.config.as_deref());
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let store = AccountStore::load(config.store_path.clone())
        .await
        .context("failed to load account store")?;

    match cli.command.unwrap_or(Command::Farm) {
        Command::Farm => farm(&config, &store).await,
        Command::AddAccount => enroll::add_account(&store).await?,
        Command::Accounts => enroll::list_accounts(&store).await,
    }

    Ok(())
}

/// Spawn all runners and block until shutdown.
async fn farm(config: &Config, store: &AccountStore) {
    let records = store.accounts().await;
    info!(accounts = records.len(), "starting farming");

    let bridge = Arc::new(HelperBridge::new(
        config.bridge.command.clone(),
        config.bridge.args.clone(),
        Duration::from_secs(config.bridge.timeout_secs),
    ));

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            warn!("cannot listen for ctrl-c, shutdown only via kill");
            return;
        }
        info!("shutdown requested, stopping account runners");
        signal_token.cancel();
    });

    run_accounts(
        records,
        &config.api.base_url,
        bridge,
        Arc::new(ThreadRngJitter),
        shutdown,
    )
    .await;
}
