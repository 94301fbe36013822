use core::fmt;

use anyhow::Result;
use clap::Subcommand;
use tracing::info_span;

pub(crate) mod abi;
pub(crate) mod completions;
pub(crate) mod find_deployment_block;
pub(crate) mod leaderboards;
pub(crate) mod options;
pub(crate) mod parse;
pub(crate) mod stark;
pub(crate) mod version;

use abi::AbiArgs;
use completions::CompletionsArgs;
use find_deployment_block::FindDeploymentBlockArgs;
use leaderboards::LeaderboardsArgs;
use parse::ParseArgs;
use stark::StarkArgs;
use version::VersionArgs;

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(about = "Inspect contract ABIs")]
    Abi(AbiArgs),
    #[command(about = "Interact with your Starknet RPC provider")]
    Stark(StarkArgs),
    #[command(about = "Discover the block in which a contract was deployed")]
    FindDeploymentBlock(FindDeploymentBlockArgs),
    #[command(about = "Generate Loot Survivor leaderboards and push them to the Moonstream \
                       Leaderboards API")]
    Leaderboards(LeaderboardsArgs),
    #[command(about = "Re-parse previously unknown events from a crawled event stream")]
    Parse(ParseArgs),
    #[command(about = "Generate shell completion scripts for survivor")]
    Completions(CompletionsArgs),
    #[command(about = "Print the version of survivor that you are currently using")]
    Version(VersionArgs),
}

impl fmt::Display for Commands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Commands::Abi(_) => write!(f, "Abi"),
            Commands::Stark(_) => write!(f, "Stark"),
            Commands::FindDeploymentBlock(_) => write!(f, "FindDeploymentBlock"),
            Commands::Leaderboards(_) => write!(f, "Leaderboards"),
            Commands::Parse(_) => write!(f, "Parse"),
            Commands::Completions(_) => write!(f, "Completions"),
            Commands::Version(_) => write!(f, "Version"),
        }
    }
}

pub async fn run(command: Commands) -> Result<()> {
    let name = command.to_string();
    let span = info_span!("Subcommand", name);
    let _span = span.enter();

    match command {
        Commands::Abi(args) => args.run(),
        Commands::Stark(args) => args.run().await,
        Commands::FindDeploymentBlock(args) => args.run().await,
        Commands::Leaderboards(args) => args.run().await,
        Commands::Parse(args) => args.run(),
        Commands::Completions(args) => args.run(),
        Commands::Version(args) => args.run(),
    }
}
