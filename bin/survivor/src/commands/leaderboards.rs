use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use survivor_core::leaderboard::{self, total_leaderboard};
use survivor_core::stream;

#[derive(Debug, Args)]
pub struct LeaderboardsArgs {
    #[command(subcommand)]
    command: LeaderboardCommands,
}

#[derive(Debug, Subcommand)]
enum LeaderboardCommands {
    #[command(about = "Leaderboard of all player events in Loot Survivor")]
    #[command(long_about = "Leaderboard of all player events in Loot Survivor.\n\nNOTE: This is \
                            a leaderboard of adventurers, not their owners.\n\nEvery event an \
                            adventurer can be subject to is awarded a number of points, and the \
                            weighted sum is the adventurer's total score. The individual event \
                            counts are reported in the \"points_data\" field of each row.")]
    Total(TotalArgs),
}

#[derive(Debug, Args)]
struct TotalArgs {
    #[arg(short, long)]
    #[arg(help = "File containing crawled events from which to build the leaderboard (as \
                  produced by the \"survivor stark events\" command, defaults to stdin).")]
    infile: Option<PathBuf>,

    #[arg(short, long)]
    #[arg(help = "File to write the leaderboard to (defaults to stdout).")]
    outfile: Option<PathBuf>,

    #[arg(long)]
    #[arg(help = "Push the leaderboard to the Moonstream Leaderboards API.")]
    push: bool,

    #[arg(short, long, env = "MOONSTREAM_LEADERBOARD_ID")]
    #[arg(required_if_eq("push", "true"))]
    #[arg(help = "Leaderboard ID for the Moonstream Leaderboard (look up or generate at \
                  https://moonstream.to).")]
    leaderboard_id: Option<String>,

    #[arg(short = 't', long, env = "MOONSTREAM_ACCESS_TOKEN")]
    #[arg(required_if_eq("push", "true"))]
    #[arg(help = "Access token for the Moonstream API (get from https://moonstream.to).")]
    access_token: Option<String>,
}

impl LeaderboardsArgs {
    pub async fn run(self) -> Result<()> {
        match self.command {
            LeaderboardCommands::Total(args) => args.run().await,
        }
    }
}

impl TotalArgs {
    async fn run(self) -> Result<()> {
        let reader = stream::reader(self.infile.as_deref())?;
        let leaderboard = total_leaderboard(reader)?;

        let mut writer = stream::writer(self.outfile.as_deref())?;
        serde_json::to_writer(&mut writer, &leaderboard)?;
        writeln!(writer)?;
        writer.flush()?;

        if self.push {
            let leaderboard_id = self
                .leaderboard_id
                .as_deref()
                .ok_or_else(|| anyhow!("pushing requires a leaderboard ID"))?;
            let access_token = self
                .access_token
                .as_deref()
                .ok_or_else(|| anyhow!("pushing requires an access token"))?;
            leaderboard::push(leaderboard_id, access_token, &leaderboard, true).await?;
        }

        Ok(())
    }
}
