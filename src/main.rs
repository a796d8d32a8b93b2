mod clock;
mod engine;
mod model;
mod render;
mod schedule;
mod source;
mod state;
mod timer;

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use crate::clock::SystemClock;
use crate::source::{CachedItemSource, HttpItemSource};

/// Application configuration from CLI
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Config {
    /// Playlist to activate on startup
    #[arg(long)]
    playlist: Option<String>,
    /// Base URL of the signage API
    #[arg(long, default_value = "http://localhost:8080/api")]
    api_url: String,
    /// Path to the offline playlist cache (optional)
    #[arg(long)]
    cache: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = Config::parse();

    let http = HttpItemSource::new(cfg.api_url.clone());
    let (handle, update_rx) = if let Some(path) = cfg.cache.clone() {
        engine::spawn(CachedItemSource::open(http, path).await, SystemClock)
    } else {
        engine::spawn(http, SystemClock)
    };

    handle.set_playlist(cfg.playlist.clone()).await;
    let renderer = tokio::spawn(render::display_pipe(update_rx));

    tokio::signal::ctrl_c().await?;
    handle.shutdown().await;
    // The engine drops the update channel on shutdown; the renderer drains
    // and exits on its own.
    renderer.await?;
    Ok(())
}
