//! # harvest: Farm Expense & Profitability CLI
//!
//! ```text
//! harvest list --name padi --min-revenue 100000
//! harvest add --file padi.json
//! harvest update 665f1c2e9b1d --file padi.json
//! harvest delete 665f1c2e9b1d
//! harvest --offline --seed crops.json list
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Initialize Logging ──► RUST_LOG or "info,harvest=debug"            │
//! │  2. Load Config ─────────► defaults → harvest.toml → HARVEST_* env     │
//! │  3. Build Store ─────────► Retrying<HttpCropStore> or in-memory        │
//! │  4. Run Command ─────────► FarmLedger action, print result             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod commands;
mod table;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use harvest_client::api::CropsResponse;
use harvest_client::{
    ClientConfig, ClientError, CropStore, FarmLedger, HttpCropStore, InMemoryCropStore, Retrying,
};
use harvest_core::FilterCriteria;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "harvest")]
#[command(about = "Track crop expenses and profitability")]
struct Cli {
    /// Config file (defaults to the platform config dir's harvest.toml).
    #[arg(long, global = true, env = "HARVEST_CONFIG")]
    config: Option<PathBuf>,

    /// Use an in-process store instead of the crop service.
    #[arg(long, global = true)]
    offline: bool,

    /// Records to seed the offline store with (`{"crops": [...]}`).
    #[arg(long, global = true, requires = "offline")]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show crops with revenue and profit/loss.
    List(ListArgs),

    /// Add a crop from a JSON draft file.
    Add {
        #[arg(long)]
        file: PathBuf,
    },

    /// Replace a crop with a JSON draft file.
    Update {
        id: String,
        #[arg(long)]
        file: PathBuf,
    },

    /// Delete a crop.
    Delete { id: String },
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Case-insensitive substring of the crop name.
    #[arg(long, default_value = "")]
    name: String,

    #[arg(long, default_value = "")]
    min_revenue: String,

    #[arg(long, default_value = "")]
    max_revenue: String,

    #[arg(long = "min-qty", default_value = "")]
    min_quantity: String,

    #[arg(long = "max-qty", default_value = "")]
    max_quantity: String,

    /// Print rows as JSON.
    #[arg(long)]
    json: bool,
}

impl ListArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria::default()
            .with_crop_name(&self.name)
            .with_min_revenue(&self.min_revenue)
            .with_max_revenue(&self.max_revenue)
            .with_min_quantity(&self.min_quantity)
            .with_max_quantity(&self.max_quantity)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if cli.offline {
        let store = match &cli.seed {
            Some(path) => InMemoryCropStore::with_records(read_seed(path)?),
            None => InMemoryCropStore::new(),
        };
        info!("Running against the offline store");
        return run(FarmLedger::new(store), cli.command).await;
    }

    let config = ClientConfig::load(cli.config.clone()).map_err(startup_error)?;
    info!(api = %config.base_url(), "Configuration loaded");

    let http = HttpCropStore::new(&config).map_err(startup_error)?;
    let store = Retrying::new(http, config.retry.clone());
    run(FarmLedger::new(store), cli.command).await
}

async fn run<S: CropStore>(ledger: FarmLedger<S>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List(args) => commands::list(&ledger, &args.criteria(), args.json).await,
        Command::Add { file } => commands::submit(&ledger, &file, None).await,
        Command::Update { id, file } => commands::submit(&ledger, &file, Some(&id)).await,
        Command::Delete { id } => commands::delete(&ledger, &id).await,
    }
}

/// Points configuration failures at the places a user can fix them.
fn startup_error(err: ClientError) -> anyhow::Error {
    if err.is_config_error() {
        anyhow::Error::new(err)
            .context("Invalid configuration (check harvest.toml, --config and HARVEST_* variables)")
    } else {
        err.into()
    }
}

fn read_seed(path: &Path) -> anyhow::Result<Vec<harvest_core::CropRecord>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    let body: CropsResponse = serde_json::from_str(&contents)
        .with_context(|| format!("Seed file {} is not a crop list", path.display()))?;
    Ok(body.crops)
}

/// Initializes the tracing subscriber; logs go to stderr.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,harvest=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
