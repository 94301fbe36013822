use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use survivor_core::abi;

#[derive(Debug, Args)]
pub struct AbiArgs {
    #[command(subcommand)]
    command: AbiCommands,
}

#[derive(Debug, Subcommand)]
enum AbiCommands {
    #[command(about = "List the events declared in an ABI file")]
    Events(AbiEventsArgs),
}

#[derive(Debug, Args)]
struct AbiEventsArgs {
    #[arg(short, long)]
    #[arg(help = "The ABI file to inspect.")]
    abi: PathBuf,
}

impl AbiArgs {
    pub fn run(self) -> Result<()> {
        match self.command {
            AbiCommands::Events(args) => args.run(),
        }
    }
}

impl AbiEventsArgs {
    fn run(self) -> Result<()> {
        let contents = std::fs::read_to_string(&self.abi)?;
        let entries = abi::abi_from_json(&contents)?;

        for event in abi::events(&entries)? {
            println!("{} -- hash: {}", event.name, event.selector);
        }

        Ok(())
    }
}
