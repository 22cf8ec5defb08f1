//! Database maintenance command handlers.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use pasaley_core::AppConfig;

/// Sub-commands available under `db`.
#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Load the sample store catalog into the database
    Seed {
        /// Catalog file (defaults to PASALEY_CATALOG_PATH)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

pub(crate) async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = pasaley_db::PoolConfig::from_app_config(config);
    let pool = pasaley_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}

pub(crate) async fn run_db_ping(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    pasaley_db::health_check(&pool).await?;
    println!("database ok");
    Ok(())
}

pub(crate) async fn run_db_migrate(config: &AppConfig) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    let applied = pasaley_db::run_migrations(&pool).await?;
    println!("applied {applied} migration(s)");
    Ok(())
}

/// Validate the catalog file, then upsert its stores and products.
///
/// # Errors
///
/// Returns an error if the catalog fails to load or validate, or if any
/// database write fails (in which case nothing is written).
pub(crate) async fn run_db_seed(config: &AppConfig, path: &Path) -> anyhow::Result<()> {
    let catalog = pasaley_core::load_catalog(path)?;
    tracing::info!(path = %path.display(), stores = catalog.stores.len(), "catalog loaded");

    let pool = connect(config).await?;
    pasaley_db::run_migrations(&pool).await?;
    let summary = pasaley_db::seed_catalog(&pool, &catalog.stores).await?;

    println!(
        "seeded {} stores and {} products from {}",
        summary.stores,
        summary.products,
        path.display()
    );
    Ok(())
}
