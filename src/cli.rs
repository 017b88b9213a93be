//! Command-line interface for the scraper.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;

use crate::dates::list_available_dates;
use crate::engine::scrape_and_store;
use crate::error::Result;
use crate::http::create_client;
use crate::register::HttpRegisterSource;
use crate::store::{JsonFileStore, RecordFilter, RecordStore};
use crate::types::DateToken;

/// Default path of the JSON record store.
const DEFAULT_STORE: &str = "fmcsa_records.json";

/// FMCSA Register scraper - discover, fetch, parse and reconcile register publications.
#[derive(Parser)]
#[command(name = "fmcsa-register")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List register dates currently published upstream.
    Dates,

    /// Scrape one register date and reconcile it into the store.
    Scrape {
        /// Register date token (e.g. 20-FEB-26)
        date: String,

        /// Store file (default: fmcsa_records.json)
        #[arg(short, long)]
        store: Option<PathBuf>,
    },

    /// List stored records with optional filters.
    Records {
        /// Filter by register date token
        #[arg(short, long)]
        date: Option<String>,

        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,

        /// Search in docket number or carrier info
        #[arg(long)]
        search: Option<String>,

        /// Records to skip
        #[arg(long, default_value_t = 0)]
        skip: usize,

        /// Maximum records to show
        #[arg(long, default_value_t = 500)]
        limit: usize,

        /// Store file (default: fmcsa_records.json)
        #[arg(short, long)]
        store: Option<PathBuf>,
    },

    /// List register dates that have records in the store.
    StoredDates {
        /// Store file (default: fmcsa_records.json)
        #[arg(short, long)]
        store: Option<PathBuf>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Dates => dates_command(),
        Commands::Scrape { date, store } => scrape_command(&date, store),
        Commands::Records {
            date,
            category,
            search,
            skip,
            limit,
            store,
        } => records_command(date, category, search, skip, limit, store),
        Commands::StoredDates { store } => stored_dates_command(store),
    }
}

fn store_path(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| PathBuf::from(DEFAULT_STORE))
}

fn dates_command() -> Result<()> {
    let client = create_client()?;
    let dates = list_available_dates(&client)?;

    println!("{}", style("Available register dates:").bold());
    for date in dates {
        println!("  {}  {}", style(&date.token).cyan(), date.label);
    }
    Ok(())
}

fn scrape_command(date: &str, store: Option<PathBuf>) -> Result<()> {
    // Validate the token before opening anything or touching the network
    let token = DateToken::parse(date)?;

    let mut store = JsonFileStore::open(store_path(store))?;
    let source = HttpRegisterSource::new()?;

    println!(
        "{} register for {}",
        style("Scraping").bold(),
        style(token.as_str()).green()
    );

    let outcome = scrape_and_store(&mut store, &source, &token)?;

    if outcome.total_parsed == 0 {
        println!(
            "No records found for {}. The register may not be published yet for this date.",
            token.as_str()
        );
        return Ok(());
    }

    println!(
        "{} {} of {} records for {}",
        style("Saved").green().bold(),
        outcome.saved_count,
        outcome.total_parsed,
        token.as_str()
    );
    for failure in &outcome.failures {
        println!(
            "  {} {}: {}",
            style("skipped").yellow(),
            failure.candidate.docket_number,
            failure.reason
        );
    }
    Ok(())
}

fn records_command(
    date: Option<String>,
    category: Option<String>,
    search: Option<String>,
    skip: usize,
    limit: usize,
    store: Option<PathBuf>,
) -> Result<()> {
    let store = JsonFileStore::open(store_path(store))?;
    let filter = RecordFilter {
        register_date: date,
        category,
        search,
    };

    let page = store.list(&filter, skip, limit)?;

    println!(
        "{} {} (showing {})",
        style("Total:").bold(),
        page.total,
        page.items.len()
    );
    for record in &page.items {
        println!(
            "  {}  {}  [{}]  {}",
            style(&record.register_date).cyan(),
            style(&record.docket_number).green(),
            record.category,
            record.carrier_info
        );
    }
    if !page.categories.is_empty() {
        println!("{} {}", style("Categories:").bold(), page.categories.join(", "));
    }
    Ok(())
}

fn stored_dates_command(store: Option<PathBuf>) -> Result<()> {
    let store = JsonFileStore::open(store_path(store))?;
    let dates = store.stored_dates()?;

    println!("{}", style("Stored register dates:").bold());
    for date in dates {
        println!("  {date}");
    }
    Ok(())
}
