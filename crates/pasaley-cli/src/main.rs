mod db;
mod nearby;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::db::DbCommands;

#[derive(Debug, Parser)]
#[command(name = "pasaley-cli")]
#[command(about = "Pasaley nearby-store locator command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Acquire the current position from the configured location service
    Locate,
    /// List active stores nearest to a reference point
    Nearby {
        /// Reference latitude (requires --lng)
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Reference longitude (requires --lat)
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
        /// Maximum distance in kilometers (defaults to PASALEY_DEFAULT_RADIUS_KM)
        #[arg(long)]
        radius_km: Option<f64>,
        /// Acquire the reference point from the location service instead of the default
        #[arg(long, conflicts_with_all = ["lat", "lng"])]
        locate: bool,
        /// Maximum number of stores to show
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("pasaley-cli: run with --help to list commands");
        return Ok(());
    };

    let config = pasaley_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match command {
        Commands::Db { command } => match command {
            DbCommands::Ping => db::run_db_ping(&config).await,
            DbCommands::Migrate => db::run_db_migrate(&config).await,
            DbCommands::Seed { path } => {
                let path: PathBuf = path.unwrap_or_else(|| config.catalog_path.clone());
                db::run_db_seed(&config, &path).await
            }
        },
        Commands::Locate => nearby::run_locate(&config).await,
        Commands::Nearby {
            lat,
            lng,
            radius_km,
            locate,
            limit,
        } => {
            let args = nearby::NearbyArgs {
                lat,
                lng,
                radius_km,
                locate,
                limit,
            };
            nearby::run_nearby(&config, &args).await
        }
    }
}
