//! Command line entry point that exports GoingToCamp campsite availability.
//! The JSON array of records is the only thing written to stdout; logs and
//! skipped units go to stderr.

use std::io::{self, Write};

use anyhow::Context;
use campground_availability::*;
use clap::Parser;
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(name = "availability_export")]
#[command(about = "Export GoingToCamp campsite availability as JSON")]
struct Cli {
    /// Scan a single region: 3 (Washington), 12 (BC Parks) or 14 (Parks Canada)
    #[arg(long = "rec-area", value_parser = parse_region)]
    rec_area: Option<Region>,

    /// Maximum campgrounds scanned per region, 0 for no limit
    #[arg(long, default_value_t = 0)]
    limit: usize,
}

impl Cli {
    fn executor_config(&self) -> ScanExecutorConfig {
        let mut config = ScanExecutorConfig {
            facility_limit: self.limit,
            ..ScanExecutorConfig::default()
        };
        if let Some(region) = self.rec_area {
            config.regions = vec![region];
        }
        config
    }
}

fn parse_region(raw: &str) -> Result<Region, String> {
    raw.parse::<Region>().map_err(|e| e.to_string())
}

/// Write records as a JSON array with one value per line and no indentation
fn write_records<W: Write, T: Serialize>(writer: W, records: &[T]) -> anyhow::Result<()> {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    records
        .serialize(&mut serializer)
        .context("Failed to serialize availability records")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let cli = Cli::parse();
    let executor_config = cli.executor_config();

    let client_config = ClientConfig::from_env()?;
    let client = GoingToCampClient::new(client_config)?;

    log::info!(
        "Exporting availability (regions: {:?}, limit: {})",
        executor_config
            .regions
            .iter()
            .map(|r| r.id())
            .collect::<Vec<_>>(),
        if cli.limit == 0 {
            "none".to_string()
        } else {
            cli.limit.to_string()
        }
    );

    let run = ScanExecutor::new(client, Some(executor_config)).run().await;

    let mut stdout = io::stdout().lock();
    write_records(&mut stdout, &run.records)?;
    writeln!(stdout)?;
    stdout.flush()?;

    Ok(())
}
