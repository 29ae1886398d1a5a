//! Cartly entry point.
//!
//! Binary name: `cartly`
//!
//! Resolves the bot token, registers the command menu with Telegram, then
//! runs the update loop until ctrl-c.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use cartly_core::dispatch::Dispatcher;
use cartly_telegram::TelegramClient;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cartly", version, about = "Shared shopping-list bot for Telegram")]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Path to the config file
    #[arg(long, default_value = "cartly.toml")]
    config: PathBuf,

    /// Bot token (overrides the config file)
    #[arg(long, env = "CARTLY_BOT_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,cartly=debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let config = config::load_config(&cli.config).await;
    let token = cli
        .token
        .or(config.token)
        .context("no bot token: pass --token, set CARTLY_BOT_TOKEN, or add `token` to cartly.toml")?;

    let client = Arc::new(TelegramClient::new(
        token,
        config.api_base,
        config.poll_timeout_secs,
    )?);
    client
        .set_my_commands()
        .await
        .context("failed to register bot commands")?;
    info!("bot commands registered");

    let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&client)));

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            shutdown.cancel();
        }
    });

    cartly_telegram::run_update_loop(client, dispatcher, cancel).await;
    Ok(())
}
