use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use survivor_core::crawler::CrawledEvent;
use survivor_core::events::{EventParser, PartialEvent, EVENT_UNKNOWN};
use survivor_core::stream;

#[derive(Debug, Args)]
pub struct ParseArgs {
    #[arg(short, long)]
    #[arg(help = "File containing crawled events (as produced by the \"survivor stark events\" \
                  command, defaults to stdin).")]
    infile: Option<PathBuf>,

    #[arg(short, long)]
    #[arg(help = "File to write reparsed events to (defaults to stdout).")]
    outfile: Option<PathBuf>,
}

impl ParseArgs {
    pub fn run(self) -> Result<()> {
        let parser = EventParser::new();
        let reader = stream::reader(self.infile.as_deref())?;
        let mut writer = stream::writer(self.outfile.as_deref())?;

        for line in reader.lines() {
            let partial: PartialEvent = serde_json::from_str(&line?)?;

            if partial.name == EVENT_UNKNOWN {
                if let Ok(event) = serde_json::from_value::<CrawledEvent>(partial.event.clone()) {
                    if let Ok(parsed) = parser.parse(&event) {
                        writeln!(writer, "{}", serde_json::to_string(&parsed)?)?;
                        continue;
                    }
                }
                // A payload that still cannot be decoded is forwarded
                // untouched so downstream stages see no data loss.
            }

            writeln!(writer, "{}", serde_json::to_string(&partial)?)?;
        }

        writer.flush()?;
        Ok(())
    }
}
