use std::process::exit;

use args::SurvivorArgs;
use clap::Parser;

mod args;
mod commands;

#[tokio::main]
async fn main() {
    let args = SurvivorArgs::parse();
    let _ = args.init_logging();

    if let Err(err) = commands::run(args.command).await {
        eprintln!("Error: {err:#}");
        exit(1);
    }
}
