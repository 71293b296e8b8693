//! Seed-and-time commands
//!
//! Commands: optimize-queries (book → author), optimize-relations (adds book → categories)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use querylab_core::{bench, Console, DemoConfig, SeedPlan, Store, Variant};
use tracing::info;

/// Store selection shared by every command
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// SQLite database URL (e.g. sqlite://querylab.db)
    #[arg(long, env = "QUERYLAB_DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// TOML config file with database_url / max_connections
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

pub async fn run_optimize(store_args: &StoreArgs, variant: Variant) -> Result<()> {
    let config = DemoConfig::load(
        store_args.config.as_deref(),
        store_args.database_url.as_deref(),
    )
    .context("Failed to resolve store configuration")?;

    let store = Store::open(&config)
        .await
        .with_context(|| format!("Failed to open store at {}", config.database_url))?;

    let mut session = store
        .session()
        .await
        .context("Failed to acquire a store connection")?;

    let mut console = Console::stdout();
    let summary = bench::run(&mut session, variant, &SeedPlan::default(), &mut console).await?;

    info!(
        ?variant,
        seeded = summary.seed.was_created(),
        passes = summary.passes.len(),
        "run complete"
    );

    drop(session);
    store.close().await;
    Ok(())
}
