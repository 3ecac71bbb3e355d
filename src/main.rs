//! Classifind main entry point
//!
//! This is the command-line interface for the Classifind crawler.

use anyhow::Context;
use clap::Parser;
use classifind::config::{load_config_with_hash, Config};
use classifind::crawler::{CrawlParams, CrawlSession};
use classifind::fetcher::HttpFetcher;
use classifind::output::{load_statistics, print_items, print_report, print_statistics};
use classifind::site::{AvitoAdapter, PageQuery, SiteAdapter};
use classifind::storage::{open_storage, ItemStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Classifind: an incremental classifieds crawler
///
/// Classifind pages through marketplace search results, keeps the listings
/// it has not seen before, stores them in SQLite and downloads their photos.
#[derive(Parser, Debug)]
#[command(name = "classifind")]
#[command(version = "1.0.0")]
#[command(about = "An incremental classifieds crawler", long_about = None)]
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

    /// Ignore items already in the database when deciding what is new
    #[arg(long)]
    fresh: bool,

    /// Validate config and show the first page of every search without fetching
    #[arg(long, conflicts_with_all = ["stats", "list"])]
    dry_run: bool,

    /// Show statistics from the database and exit
    #[arg(long, conflicts_with_all = ["dry_run", "list"])]
    stats: bool,

    /// Print every stored item and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats"])]
    list: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    let adapter = AvitoAdapter::new(&config.site).context("Invalid site base URL")?;

    if cli.dry_run {
        handle_dry_run(&config, &adapter)?;
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.list {
        handle_list(&config, &adapter)?;
    } else {
        handle_crawl(&config, adapter, cli.fresh)?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("classifind=info,warn"),
            1 => EnvFilter::new("classifind=debug,info"),
            2 => EnvFilter::new("classifind=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, adapter: &AvitoAdapter) -> anyhow::Result<()> {
    println!("=== Classifind Dry Run ===\n");

    println!("Site: {} ({})", config.site.base_url, config.site.location);
    println!("  Max pages per search: {}", config.crawl.max_pages);
    println!("  Page delay: {}ms", config.crawl.page_delay);
    if config.crawl.max_price > 0 {
        println!(
            "  Price range: {} - {}",
            config.crawl.min_price, config.crawl.max_price
        );
    } else {
        println!("  Price range: {} and up", config.crawl.min_price);
    }

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Photos: {}", config.output.photo_dir);

    println!("\nFirst page of each search:");
    for terms in &config.crawl.queries {
        for category in &config.crawl.categories {
            let query = PageQuery {
                terms: terms.clone(),
                category: category.clone(),
                page: 1,
            };
            println!("  - {}", adapter.build_url(&query)?);
        }
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would run {} searches",
        config.crawl.queries.len() * config.crawl.categories.len()
    );

    Ok(())
}

/// Handles the --stats mode: shows statistics from the database
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let store = open_storage(Path::new(&config.output.database_path))?;
    let stats = load_statistics(&store)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --list mode: renders every stored item
fn handle_list(config: &Config, adapter: &AvitoAdapter) -> anyhow::Result<()> {
    let store = open_storage(Path::new(&config.output.database_path))?;
    let items = store.load_all()?;
    print_items(adapter, items.values());
    Ok(())
}

/// Handles the main crawl operation
fn handle_crawl(config: &Config, adapter: AvitoAdapter, fresh: bool) -> anyhow::Result<()> {
    let mut store = open_storage(Path::new(&config.output.database_path))?;
    let fetcher = HttpFetcher::new(&config.user_agent)?;
    let params = CrawlParams::from_config(config);

    std::fs::create_dir_all(&params.photo_dir).with_context(|| {
        format!(
            "Failed to create photo directory {}",
            params.photo_dir.display()
        )
    })?;

    tracing::info!("Searches to run: {}", params.pair_count());

    let mut session = CrawlSession::new(adapter, fetcher, params);

    if fresh {
        tracing::info!("Starting fresh (ignoring stored items)");
    } else {
        session.load(&store)?;
    }

    let new_hashes = session.refresh();

    let new_items = new_hashes
        .iter()
        .filter_map(|hash| session.known().get(hash));
    print_items(session.adapter(), new_items);

    let inserted = session.save(&mut store, None)?;
    tracing::info!("{} items written to {}", inserted.len(), config.output.database_path);

    print_report(session.report());

    Ok(())
}
