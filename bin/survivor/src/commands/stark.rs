use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use starknet::core::utils::parse_cairo_short_string;
use survivor_core::crawler::{crawl_contract_events, CrawlerConfig};
use survivor_core::deployment::deployment_block;
use survivor_core::events::{DecodedEvent, ParsedEvent, EVENT_UNKNOWN};
use survivor_core::felt::felt_from_hex;
use survivor_core::provider::ChainProvider;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::options::starknet::StarknetOptions;

pub(crate) const LOG_TARGET: &str = "survivor::cli::commands::stark";

/// Buffered events between the crawler task and the stdout writer.
const EVENTS_CHANNEL_CAPACITY: usize = 100;

#[derive(Debug, Args)]
pub struct StarkArgs {
    #[command(flatten)]
    starknet: StarknetOptions,

    #[command(subcommand)]
    command: StarkCommands,
}

#[derive(Debug, Subcommand)]
enum StarkCommands {
    #[command(about = "Get the current block number on your Starknet RPC provider")]
    BlockNumber,
    #[command(about = "Get the chain ID of the chain that your Starknet RPC provider is \
                       connected to")]
    ChainId,
    #[command(about = "Crawl events from your Starknet RPC provider as line-delimited JSON")]
    Events(EventsArgs),
}

#[derive(Debug, Args)]
struct EventsArgs {
    #[arg(short, long)]
    #[arg(help = "The address of the contract from which to crawl events (if not provided, no \
                  contract constraint will be specified).")]
    contract: Option<String>,

    #[arg(long = "from", default_value_t = 0)]
    #[arg(help = "The block number from which to start crawling (0 resolves the contract's \
                  deployment block).")]
    from_block: u64,

    #[arg(long = "to", default_value_t = 0)]
    #[arg(help = "The block number to which to crawl (set to 0 for continuous crawl).")]
    to_block: u64,

    #[arg(short = 'N', long, default_value_t = 100)]
    #[arg(help = "The number of events to fetch per batch.")]
    batch_size: u64,

    #[arg(long, default_value_t = 2)]
    #[arg(help = "Number of successive iterations which must return events before we consider \
                  the crawler hot.")]
    hot_threshold: u32,

    #[arg(long, default_value_t = 100, value_name = "MILLISECONDS")]
    #[arg(help = "Polling cadence while the crawl is hot.")]
    hot_interval: u64,

    #[arg(long, default_value_t = 10_000, value_name = "MILLISECONDS")]
    #[arg(help = "Polling cadence while the crawl is cold.")]
    cold_interval: u64,

    #[arg(long, default_value_t = 5)]
    #[arg(help = "Number of confirmations to wait for before considering a block canonical.")]
    confirmations: u64,
}

impl StarkArgs {
    pub async fn run(self) -> Result<()> {
        let provider = self.starknet.provider()?;

        match self.command {
            StarkCommands::BlockNumber => {
                let block_number = provider.block_number().await?;
                println!("{block_number}");
                Ok(())
            }
            StarkCommands::ChainId => {
                let chain_id = provider.chain_id().await?;
                println!("{}", parse_cairo_short_string(&chain_id)?);
                Ok(())
            }
            StarkCommands::Events(args) => args.run(provider).await,
        }
    }
}

impl EventsArgs {
    async fn run<P>(self, provider: P) -> Result<()>
    where
        P: ChainProvider + 'static,
    {
        let contract_address = match &self.contract {
            Some(contract) => Some(felt_from_hex(contract)?),
            None => None,
        };

        let mut from_block = self.from_block;
        if from_block == 0 {
            let address = contract_address
                .ok_or_else(|| anyhow!("resolving the deployment block requires a contract \
                                        address; pass --from to crawl without one"))?;
            from_block = deployment_block(&provider, address).await?;
            info!(target: LOG_TARGET, from_block, "Resolved contract deployment block.");
        }

        let config = CrawlerConfig {
            contract_address,
            from_block,
            to_block: self.to_block,
            confirmations: self.confirmations,
            batch_size: self.batch_size,
            hot_threshold: self.hot_threshold,
            hot_interval: Duration::from_millis(self.hot_interval),
            cold_interval: Duration::from_millis(self.cold_interval),
        };

        let (events_tx, mut events_rx) = mpsc::channel(EVENTS_CHANNEL_CAPACITY);
        let cancellation = CancellationToken::new();

        tokio::spawn({
            let cancellation = cancellation.clone();
            async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    cancellation.cancel();
                }
            }
        });

        let crawler = tokio::spawn(async move {
            crawl_contract_events(&provider, config, events_tx, cancellation).await
        });

        while let Some(event) = events_rx.recv().await {
            let line = serde_json::to_string(&ParsedEvent {
                name: EVENT_UNKNOWN.to_string(),
                event: DecodedEvent::Raw(event),
            })?;
            println!("{line}");
        }

        crawler.await??;
        Ok(())
    }
}
