//! okpay
//!
//! Builds Hive HBD payment requests from the terminal: validates the
//! recipient, converts local-currency amounts and hands the transfer to a
//! signer.

mod commands;
mod config;
mod navigator;
mod shutdown;
mod state;

use clap::Parser;
use commands::Command;
use config::{ConfigLoader, Overrides};
use shutdown::spawn_shutdown_watch;
use state::AppState;
use std::path::PathBuf;
use time::UtcOffset;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// okpay - Hive HBD payment request builder
#[derive(Parser, Debug)]
#[command(name = "okpay")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "OKPAY_CONFIG", default_value = "./okpay.toml", global = true)]
    config: PathBuf,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the account registry JSON-RPC endpoint
    #[arg(long, global = true)]
    rpc: Option<Url>,

    /// Override the exchange rate endpoint
    #[arg(long, global = true)]
    rates: Option<Url>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_tracing(args.verbose);

    // Must be read before any worker thread exists.
    let utc_offset = UtcOffset::current_local_offset().unwrap_or_else(|e| {
        tracing::debug!("Local UTC offset unavailable, using UTC: {}", e);
        UtcOffset::UTC
    });

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(args, utc_offset))
}

async fn run(args: Args, utc_offset: UtcOffset) -> anyhow::Result<()> {
    let overrides = Overrides {
        registry_rpc: args.rpc,
        exchange_rates: args.rates,
    };
    let config = ConfigLoader::new(&args.config, overrides)
        .load()
        .map_err(|e| {
            tracing::error!("Failed to load configuration: {}", e);
            e
        })?;
    tracing::debug!("Configuration loaded from {:?}", args.config);

    let state = AppState::new(config, utc_offset)?;
    let mut shutdown_rx = spawn_shutdown_watch();

    tokio::select! {
        result = commands::run(args.command, &state, shutdown_rx.clone()) => result,
        _ = shutdown_rx.wait_for(|stop| *stop) => {
            anyhow::bail!("interrupted");
        }
    }
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Logs go to stderr; stdout carries command output.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info,reqwest=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
