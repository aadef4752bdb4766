//! Folio-Crawl main entry point
//!
//! This is the command-line interface for the Folio-Crawl catalog crawler.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use folio_crawl::config::{load_config_with_hash, Config, CrawlOptions};
use folio_crawl::crawler::run_crawl;
use folio_crawl::output::{dump_collection, print_report, restore_collections};
use folio_crawl::storage::{open_sink, SqliteDocumentStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Folio-Crawl: a link-following book catalog crawler
///
/// Starting from one book page, Folio-Crawl visits a bounded number of
/// books and then authors, following the links between them, and stores
/// every record it discovers.
#[derive(Parser, Debug)]
#[command(name = "folio-crawl")]
#[command(version)]
#[command(about = "A link-following book catalog crawler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to TOML configuration file (built-in defaults when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl books from a seed page, then their authors
    Crawl {
        /// Number of book pages to visit
        book_count: usize,

        /// Number of author pages to visit
        author_count: usize,

        /// Absolute URL of the first book page
        seed_url: String,

        /// Persist each record as soon as it is visited
        #[arg(long)]
        real_time: bool,
    },

    /// Import previously exported interchange files into the configured sink
    Restore,

    /// Write one stored collection (books or authors) to a JSON file
    Export {
        /// Collection name
        collection: String,

        /// Destination file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Crawl {
            book_count,
            author_count,
            seed_url,
            real_time,
        } => {
            let options =
                CrawlOptions::new(book_count, author_count, seed_url).real_time(real_time);
            handle_crawl(&config, &options).await
        }
        Command::Restore => handle_restore(&config),
        Command::Export { collection, path } => handle_export(&config, &collection, &path),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("folio_crawl=info,warn"),
            1 => EnvFilter::new("folio_crawl=debug,info"),
            2 => EnvFilter::new("folio_crawl=trace,debug"),
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

fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, options: &CrawlOptions) -> Result<()> {
    let report = run_crawl(config, options)
        .await
        .context("Crawl failed")?;

    print_report(&report);
    Ok(())
}

/// Handles `restore`: re-imports the export directory into the sink
fn handle_restore(config: &Config) -> Result<()> {
    let export_dir = Path::new(&config.output.export_dir);
    let mut sink = open_sink(&config.output).context("Failed to open sink")?;

    let (books, authors) = restore_collections(export_dir, sink.as_mut())
        .with_context(|| format!("Failed to restore from {}", export_dir.display()))?;

    println!(
        "✓ Restored {} books and {} authors from {}",
        books,
        authors,
        export_dir.display()
    );
    Ok(())
}

/// Handles `export`: dumps one collection of the SQLite document store
fn handle_export(config: &Config, collection: &str, path: &Path) -> Result<()> {
    let store = SqliteDocumentStore::new(Path::new(&config.output.database_path))
        .with_context(|| format!("Failed to open {}", config.output.database_path))?;

    let count = dump_collection(&store, collection, path)
        .with_context(|| format!("Failed to export {}", collection))?;

    if count == 0 {
        println!("Nothing exported for collection '{}'", collection);
    } else {
        println!("✓ Exported {} documents to {}", count, path.display());
    }
    Ok(())
}
