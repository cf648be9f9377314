mod config;
mod error;
mod export;
mod models;
mod pipeline;
mod scrapers;

use clap::Parser;
use config::{OnMissingNext, ScoutConfig, SearchOptions, DEFAULT_BASE_URL, DEFAULT_OPTIONS_PATH};
use scrapers::{HttpFetcher, SearchParameters};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Scrape rental listings from krisha.kz into a dated CSV file
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Location code, 0 (whole country) to 20; see --list-locations
    #[arg(short, long, default_value_t = 1)]
    location: u32,

    /// Only furnished flats
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    furniture: bool,

    /// Room count, 0 to 4
    #[arg(short, long, default_value_t = 1)]
    rooms: u32,

    /// Minimum monthly rent
    #[arg(long, default_value_t = 100_000)]
    price_from: u64,

    /// Maximum monthly rent
    #[arg(long, default_value_t = 300_000)]
    price_to: u64,

    /// Only listings published by the owner
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    owner_only: bool,

    /// Search option tables (JSON)
    #[arg(long, default_value = DEFAULT_OPTIONS_PATH)]
    options: PathBuf,

    /// Directory the CSV export is written to
    #[arg(short, long, default_value = "data")]
    output_dir: PathBuf,

    /// Site root the search and listing links are built from
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Pause between page fetches in milliseconds
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,

    /// End pagination at the first page without a "next" link
    #[arg(long)]
    stop_on_missing_next: bool,

    /// Print the location codes and exit
    #[arg(long)]
    list_locations: bool,
}

impl Args {
    fn search_parameters(&self) -> SearchParameters {
        SearchParameters {
            location: self.location,
            wants_furniture: self.furniture,
            room_count: self.rooms,
            price_from: self.price_from,
            price_to: self.price_to,
            owner_only: self.owner_only,
        }
    }

    fn scout_config(&self) -> ScoutConfig {
        ScoutConfig {
            base_url: self.base_url.clone(),
            pacing_delay: Duration::from_millis(self.delay_ms),
            output_dir: self.output_dir.clone(),
            on_missing_next: if self.stop_on_missing_next {
                OnMissingNext::Stop
            } else {
                OnMissingNext::Repeat
            },
            ..ScoutConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let options = SearchOptions::load(&args.options)?;

    if args.list_locations {
        for (code, location) in options.locations.iter().enumerate() {
            println!("{:>2} {}", code, location.name);
        }
        return Ok(());
    }

    info!("🏠 Flat Scout - krisha.kz rental scraper");

    let fetcher = HttpFetcher::new()?;
    let summary = pipeline::run(&fetcher, &options, &args.scout_config(), &args.search_parameters()).await?;
    println!("{}", summary);

    Ok(())
}
