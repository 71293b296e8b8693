//! querylab CLI - seed a sample library and time N+1 queries against their eager-loading fixes
//!
//! - `optimize-queries`: book → author, lazy per-book lookups vs a join
//! - `optimize-relations`: adds book → categories, lazy per-book lookups vs one batched prefetch

use anyhow::Result;
use clap::{Parser, Subcommand};
use querylab_core::Variant;

mod commands;
mod tracing_setup;

use commands::StoreArgs;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "querylab",
    author,
    version,
    about = "Demonstrate and fix N+1 query patterns against a SQLite store",
    long_about = "Seeds 5 authors with 20 books each (and 5 categories for optimize-relations) \
                  when the store is empty, then times each relation's lazy traversal against \
                  its eager-loading counterpart."
)]
struct Cli {
    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Time book → author lookups: N+1 vs join
    OptimizeQueries,
    /// Time book → author and book → categories: N+1 vs join / batched prefetch
    OptimizeRelations,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // .env must be loaded before clap reads env-backed args
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::OptimizeQueries => commands::run_optimize(&cli.store, Variant::Basic).await?,
        Commands::OptimizeRelations => {
            commands::run_optimize(&cli.store, Variant::Extended).await?
        }
    }
    Ok(())
}
