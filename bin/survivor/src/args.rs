use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::commands::Commands;

/// Loot Survivor leaderboards by Moonstream.
#[derive(Parser, Debug)]
#[command(name = "survivor", author, version, about, long_about = None)]
pub struct SurvivorArgs {
    #[command(subcommand)]
    pub command: Commands,
}

impl SurvivorArgs {
    pub fn init_logging(&self) -> Result<(), Box<dyn std::error::Error>> {
        const DEFAULT_LOG_FILTER: &str = "info,survivor=info,survivor_core=info";

        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
            )
            // stdout carries the crawled event stream; keep logs off it.
            .with_writer(std::io::stderr)
            .finish();

        Ok(tracing::subscriber::set_global_default(subscriber)?)
    }
}
