//! Backmap main entry point
//!
//! Command-line interface for the Backmap backlink crawler.

use backmap::config::load_config_with_hash;
use backmap::crawler::Orchestrator;
use backmap::store::{provision, StoreClient};
use backmap::Blacklist;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Backmap: a polite breadth-first backlink mapper
///
/// Backmap crawls pages reachable from a seed URL, extracts inter-page
/// links, and persists page metadata and a backlink graph into an external
/// wide-column store.
#[derive(Parser, Debug)]
#[command(name = "backmap")]
#[command(version)]
#[command(about = "A polite breadth-first backlink mapper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        Ok(())
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("backmap=info,warn"),
            1 => EnvFilter::new("backmap=debug,info"),
            2 => EnvFilter::new("backmap=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the crawl plan
fn handle_dry_run(config: &backmap::Config) {
    println!("=== Backmap Dry Run ===\n");

    println!("Store:");
    println!("  Endpoint: {}", config.store.endpoint);
    println!("  Main table: {}", config.store.main_table);
    println!("  Queue table: {}", config.store.queue_table);

    println!("\nCrawler:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    match &config.crawler.scope_root {
        Some(scope_root) => println!("  Scope root: {}", scope_root),
        None => println!("  Scope root: (none, follows all hosts)"),
    }
    println!("  Store sub-pages: {}", config.crawler.store_sub_pages);
    println!(
        "  Store full document: {}",
        config.crawler.store_full_document
    );
    println!("  Parallelism: {}", config.crawler.parallelism);
    println!("  Max rounds: {}", config.crawler.max_rounds);
    println!("  Fetch timeout: {}ms", config.crawler.fetch_timeout_ms);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nBlacklist log: {}", config.blacklist.path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: backmap::Config) -> anyhow::Result<()> {
    // Provision the storage schema; failure here is fatal.
    let store = StoreClient::new(&config.store.endpoint)?;
    if let Err(e) = provision(&store, &config.store).await {
        tracing::error!("Failed to provision store schema: {}", e);
        return Err(e.into());
    }

    let blacklist = Arc::new(Blacklist::load(Path::new(&config.blacklist.path))?);

    let orchestrator = Orchestrator::new(config, blacklist, store)?;

    match orchestrator.run().await {
        Ok(()) => {
            tracing::info!("Crawl completed");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
