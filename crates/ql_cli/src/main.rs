//! qlstats CLI
//!
//! Query surface over ql_core: parse a game log and report per-match kill
//! statistics as JSON, either the full result set or one match.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ql_core::{fingerprint_file, LogIngestor, ResultCache, MATCH_ID_PREFIX};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qlstats")]
#[command(about = "Per-match kill statistics from Quake-style server logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a log file and print match statistics as JSON
    Report {
        /// Input log file path
        #[arg(long)]
        log: PathBuf,

        /// Directory holding cached parse results
        #[arg(long, default_value = ".qlstats-cache")]
        cache_dir: PathBuf,

        /// Report a single match by its 1-based sequence number
        #[arg(long)]
        game: Option<u32>,

        /// Pretty-print the JSON output
        #[arg(long, default_value = "false")]
        pretty: bool,
    },

    /// Print the content fingerprint of a log file
    Fingerprint {
        /// Input log file path
        #[arg(long)]
        log: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            log,
            cache_dir,
            game,
            pretty,
        } => {
            let ingestor = LogIngestor::new(ResultCache::new(cache_dir));
            let results = ingestor.parse(&log)?;

            let payload = match game {
                Some(number) => {
                    let id = format!("{}{}", MATCH_ID_PREFIX, number);
                    let Some(stats) = results.get(&id) else {
                        bail!(
                            "No match {} in {} ({} match(es) parsed)",
                            id,
                            log.display(),
                            results.len()
                        );
                    };
                    let mut single = serde_json::Map::new();
                    single.insert(id, serde_json::to_value(stats)?);
                    serde_json::Value::Object(single)
                }
                None => serde_json::to_value(&results)?,
            };

            if pretty {
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("{}", serde_json::to_string(&payload)?);
            }
        }

        Commands::Fingerprint { log } => {
            let fingerprint = fingerprint_file(&log)
                .with_context(|| format!("Failed to read log file: {}", log.display()))?;
            println!("{}", fingerprint);
        }
    }

    Ok(())
}
