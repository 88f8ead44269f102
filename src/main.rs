//! Siteharvest main entry point
//!
//! This is the command-line interface for the siteharvest web scraper.

use clap::{Parser, Subcommand};
use siteharvest::config::{load_config_or_default, Config};
use siteharvest::scraper::build_frontier;
use siteharvest::storage::{open_store, DocumentRecord, DocumentStore};
use siteharvest::url::normalize_url;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Siteharvest: a bounded same-domain web scraper
///
/// Siteharvest crawls a website breadth-first within its domain, extracts
/// page text and metadata, and stores the documents for later text search.
#[derive(Parser, Debug)]
#[command(name = "siteharvest")]
#[command(version)]
#[command(about = "A bounded same-domain web scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a website and store the extracted documents
    Scrape {
        /// Start URL (scheme optional; https is assumed)
        url: String,

        /// Override the configured maximum crawl depth
        #[arg(long)]
        max_depth: Option<u32>,

        /// Override the configured page budget
        #[arg(long)]
        max_pages: Option<usize>,

        /// Override the configured delay between fetches, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Override the configured per-request timeout, in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Print the crawl summary without storing documents
        #[arg(long)]
        no_store: bool,
    },

    /// Search stored documents
    Search {
        /// Query text
        query: String,

        /// Restrict results to one site (its normalized start URL)
        #[arg(long)]
        site: Option<String>,

        /// Maximum number of results
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// Show document store statistics
    Stats,

    /// Delete stored documents
    Clear {
        /// Delete only one site's documents (everything when omitted)
        #[arg(long)]
        site: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match load_config_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    match cli.command {
        Command::Scrape {
            url,
            max_depth,
            max_pages,
            delay_ms,
            timeout_secs,
            no_store,
        } => {
            handle_scrape(
                config, &url, max_depth, max_pages, delay_ms, timeout_secs, no_store,
            )
            .await?
        }
        Command::Search { query, site, limit } => handle_search(&config, &query, site, limit)?,
        Command::Stats => handle_stats(&config)?,
        Command::Clear { site } => handle_clear(&config, site)?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("siteharvest=info,warn"),
            1 => EnvFilter::new("siteharvest=debug,info"),
            2 => EnvFilter::new("siteharvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the scrape subcommand: crawl, report, store
#[allow(clippy::too_many_arguments)]
async fn handle_scrape(
    mut config: Config,
    url: &str,
    max_depth: Option<u32>,
    max_pages: Option<usize>,
    delay_ms: Option<u64>,
    timeout_secs: Option<u64>,
    no_store: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(depth) = max_depth {
        config.scraper.max_depth = depth;
    }
    if let Some(pages) = max_pages {
        config.scraper.max_pages = pages;
    }
    if let Some(delay) = delay_ms {
        config.scraper.delay_ms = delay;
    }
    if let Some(timeout) = timeout_secs {
        config.scraper.timeout_secs = timeout;
    }
    siteharvest::config::validate(&config)?;

    // The normalized start URL doubles as the storage grouping key.
    let site = normalize_url(url)?.to_string();

    let mut frontier = build_frontier(config.scraper.clone())?;

    // Ctrl-C requests cooperative cancellation; the session finishes the
    // current page and returns a partial result.
    let cancel = frontier.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current page");
            cancel.cancel();
        }
    });

    let report = frontier.scrape_website(url).await?;

    println!("=== Crawl Summary ===");
    println!("{}", report.summary());
    if !report.failures.is_empty() {
        println!("\nFailures ({}):", report.failures.len());
        for failure in &report.failures {
            println!("  {} (depth {}): {}", failure.url, failure.depth, failure.error);
        }
    }

    if no_store {
        return Ok(());
    }

    let records: Vec<DocumentRecord> = report
        .pages
        .iter()
        .map(|page| DocumentRecord::from_page(page, &site))
        .collect();

    let mut store = open_store(&config.database)?;
    store.add_documents(&records)?;
    println!("\nStored {} documents for site {}", records.len(), site);

    Ok(())
}

/// Handles the search subcommand: prints ranked hits
fn handle_search(
    config: &Config,
    query: &str,
    site: Option<String>,
    limit: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&config.database)?;
    let hits = store.search(query, limit, site.as_deref())?;

    if hits.is_empty() {
        println!("No documents match '{}'", query);
        return Ok(());
    }

    for (i, hit) in hits.iter().enumerate() {
        let title = if hit.record.title.is_empty() {
            "(untitled)"
        } else {
            &hit.record.title
        };
        match hit.score {
            Some(score) => println!("{}. {} [score {}]", i + 1, title, score),
            None => println!("{}. {}", i + 1, title),
        }
        println!("   {}", hit.record.url);
        println!("   {}", snippet(&hit.record.content, 120));
    }

    Ok(())
}

/// Handles the stats subcommand
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&config.database)?;
    let stats = store.stats()?;

    println!("Backend: {}", stats.backend);
    println!("Documents: {}", stats.total_documents);
    println!("Sites: {}", stats.distinct_sites);

    Ok(())
}

/// Handles the clear subcommand
fn handle_clear(config: &Config, site: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store(&config.database)?;
    store.clear(site.as_deref())?;

    match site {
        Some(site) => println!("Cleared documents for site {}", site),
        None => println!("Cleared all documents"),
    }

    Ok(())
}

/// First `max` characters of the content, on a char boundary, single line.
fn snippet(content: &str, max: usize) -> String {
    let single_line = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= max {
        single_line
    } else {
        let cut: String = single_line.chars().take(max).collect();
        format!("{}...", cut.trim_end())
    }
}
