use std::path::PathBuf;
use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cclaw2epub::{CclawCrawler, EpubBuilder};

#[derive(Parser)]
#[command(name = "cclaw2epub")]
#[command(about = "Build an EPUB from a CClaw Translations table of contents")]
#[command(version)]
struct Args {
    /// Book author metadata
    #[arg(short = 'a', long = "author")]
    author: String,

    /// URL of the table of contents page
    #[arg(short = 't', long = "toc")]
    toc: String,

    /// Volume to extract from a multi-volume table of contents
    #[arg(short = 'v', long = "volume")]
    volume: Option<u32>,

    /// Chapters per volume, for TOC pages without volume headings
    #[arg(long = "chapters-per-volume")]
    chapters_per_volume: Option<usize>,

    /// Language metadata for the generated book
    #[arg(long, default_value = "eng")]
    language: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// Delay between chapter requests in milliseconds
    #[arg(long = "delay-ms", default_value_t = 500)]
    delay_ms: u64,

    /// Output EPUB path
    output: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        error!("{e:#}");
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let crawler = CclawCrawler::new(
        Duration::from_secs(args.timeout),
        Duration::from_millis(args.delay_ms),
    )
    .context("building HTTP client")?;

    let book = crawler
        .crawl(
            &args.toc,
            &args.author,
            &args.language,
            args.volume,
            args.chapters_per_volume,
        )
        .await
        .context("scraping table of contents")?;

    info!(
        "assembling '{}' ({} chapters)",
        book.metadata.title,
        book.chapters.len()
    );
    let path = EpubBuilder::new()
        .book(book)
        .output(&args.output)
        .build()
        .context("writing EPUB")?;

    info!("done: {}", path.display());
    Ok(())
}
