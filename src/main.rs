use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use events_scraper::config::{Config, DEFAULT_CONFIG_PATH};
use events_scraper::constants::OUTPUT_FILE_PREFIX;
use events_scraper::logging;
use events_scraper::pipeline::{self, HarvestOutcome};
use events_scraper::RawEventRecord;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "events_scraper")]
#[command(about = "Scrapes event listings into a timezone-normalized spreadsheet")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape all listings and write the spreadsheet
    Scrape,
    /// Scrape all listings and write the raw records as JSON
    Harvest {
        #[arg(long, default_value = "events_output.json")]
        output: PathBuf,
    },
    /// Convert previously harvested JSON records into the spreadsheet
    Convert {
        #[arg(long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _log_guard = logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;

    match cli.command {
        Commands::Scrape => {
            println!("🚀 Starting events scraper...");
            let outcome = run_scrape(&config).await?;
            write_spreadsheet(outcome.records, &config)?;
        }
        Commands::Harvest { output } => {
            println!("📡 Harvesting events...");
            let outcome = run_scrape(&config).await?;
            let json = serde_json::to_string_pretty(&outcome.records)?;
            fs::write(&output, json).with_context(|| format!("writing {}", output.display()))?;
            println!("💾 Saved {} events to {}", outcome.records.len(), output.display());
        }
        Commands::Convert { input } => {
            println!("🔨 Converting {} to Excel...", input.display());
            let records = read_records(&input)?;
            println!("✓ Found {} events", records.len());
            write_spreadsheet(records, &config)?;
        }
    }
    Ok(())
}

async fn run_scrape(config: &Config) -> anyhow::Result<HarvestOutcome> {
    let outcome = pipeline::scrape(config).await.map_err(|e| {
        error!("Failed to initialize Chrome driver: {}", e);
        e
    })?;
    let stats = &outcome.stats;
    println!("\n📊 Harvest results:");
    println!("   Listings: {}", stats.listings);
    println!("   Event pages: {}", stats.pages);
    println!("   Admitted: {}", stats.admitted);
    println!("   Rejected by location: {}", stats.rejected_location);
    println!("   Without name: {}", stats.nameless);
    Ok(outcome)
}

fn read_records(path: &Path) -> anyhow::Result<Vec<RawEventRecord>> {
    let content = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let records = serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(records)
}

/// Writes `<prefix>_<timestamp>.xlsx` into the output directory. A run
/// without events writes nothing.
fn write_spreadsheet(records: Vec<RawEventRecord>, config: &Config) -> anyhow::Result<()> {
    if records.is_empty() {
        println!("No events found to convert");
        info!("No events found; skipping spreadsheet");
        return Ok(());
    }

    let bytes = pipeline::emit(records, config)?;

    let dir = &config.output.output_dir;
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let filename = format!(
        "{}_{}.xlsx",
        OUTPUT_FILE_PREFIX,
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let path = dir.join(filename);
    fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;

    info!("Excel file saved: {}", path.display());
    println!("✅ Excel file saved: {}", path.display());
    Ok(())
}
