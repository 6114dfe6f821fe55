//! fx-summary: EUR→USD rate summary service.
//!
//! Single-binary Tokio application that:
//! 1. Fetches EUR→USD rates from the Frankfurter API (cached for a few minutes)
//! 2. Falls back to a static dataset when the API is unavailable
//! 3. Computes daily changes and range totals
//! 4. Serves them as JSON or an HTML chart page

mod config;
mod server;
mod view;

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use common::{parse_date, AppConfig, Error, SYMBOL_CURRENCY};
use fx_client::{FallbackStore, FrankfurterSource, RateClient, RateSource};

/// EUR→USD rate summary service
#[derive(Parser)]
#[command(name = "fx-summary", about = "EUR→USD rate summary service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (the default).
    Serve,
    /// Fetch a date range from the live API and save it as a fallback dataset.
    Snapshot {
        #[arg(long, default_value = "2025-01-01")]
        start: String,
        #[arg(long, default_value = "2025-01-31")]
        end: String,
        #[arg(long, default_value = "crates/fx_client/data/sample_fx.json")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "fx_summary=info,fx_client=info,calculator=info,tower_http=info".into()
            }),
        )
        .with_target(true)
        .init();

    let cli = Cli::parse();

    let cfg = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let result = match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => run_server(cfg).await,
        Command::Snapshot { start, end, out } => snapshot(&cfg, &start, &end, &out).await,
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn bundled_or_empty() -> FallbackStore {
    FallbackStore::bundled().unwrap_or_else(|e| {
        warn!("Bundled fallback data unreadable, running without fallback: {}", e);
        FallbackStore::empty()
    })
}

fn load_fallback(cfg: &AppConfig) -> FallbackStore {
    match &cfg.fallback_path {
        Some(path) => FallbackStore::load(path).unwrap_or_else(|e| {
            warn!(
                "Failed to load fallback data from {}: {}; using bundled dataset",
                path.display(),
                e
            );
            bundled_or_empty()
        }),
        None => bundled_or_empty(),
    }
}

async fn run_server(cfg: AppConfig) -> Result<(), Error> {
    info!("FX summary service starting up...");
    info!(
        "Upstream: {} (timeout {}s), cache TTL {}s",
        cfg.api_base_url, cfg.http_timeout_secs, cfg.cache_ttl_secs
    );

    let fallback = load_fallback(&cfg);
    info!("Fallback dataset: {} days", fallback.len());

    let client = RateClient::from_config(&cfg, fallback);
    server::serve(client, &cfg.bind_addr).await
}

async fn snapshot(cfg: &AppConfig, start: &str, end: &str, out: &Path) -> Result<(), Error> {
    let start = parse_date(start)?;
    let end = parse_date(end)?;
    if start > end {
        return Err(Error::InvalidRange { start, end });
    }

    let source = FrankfurterSource::new(
        cfg.api_base_url.clone(),
        Duration::from_secs(cfg.http_timeout_secs),
    );
    info!("Fetching sample data for {}..{} from {}", start, end, source.base_url());

    let payload = source
        .fetch_range(start, end)
        .await
        .map_err(|e| Error::Http(e.to_string()))?;

    let days = payload.to_series(SYMBOL_CURRENCY).len();
    if days == 0 {
        return Err(Error::NoDataAvailable(format!("{start}..{end}")));
    }

    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(out, serde_json::to_string_pretty(&payload)? + "\n")?;

    info!("Saved {} days of FX rates to {}", days, out.display());
    Ok(())
}
