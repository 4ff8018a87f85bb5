//! CLI entry point: watch a directory and report counts until
//! interrupted.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use gallery_watch::{Gallery, WatchConfig};

/// Watch a directory and keep live counts of PNG images and
/// subdirectories.
#[derive(Debug, Parser)]
#[command(name = "gallery-watch", version)]
struct Args {
    /// Directory to watch; created if absent.
    #[arg(default_value = "gallery")]
    root: PathBuf,

    /// Poll interval in milliseconds.
    #[arg(long, default_value_t = 1000)]
    interval_ms: u64,

    /// Suffix that counts as a matching image.
    #[arg(long, default_value = ".png")]
    suffix: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config = WatchConfig::new(&args.root)
        .with_poll_interval(Duration::from_millis(args.interval_ms))
        .with_match_suffix(args.suffix);

    let mut gallery = Gallery::new(config)?;
    gallery.start().await?;
    info!(
        "watching {} (images: {}, subdirectories: {})",
        gallery.root().display(),
        gallery.png_count().await?,
        gallery.dir_count().await?
    );

    tokio::signal::ctrl_c().await?;
    gallery.stop().await;
    Ok(())
}
