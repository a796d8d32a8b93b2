// source/mod.rs - the playlist item retrieval boundary.

pub mod cache;
pub mod http;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use thiserror::Error;

use crate::model::PlaylistItem;

// Shared HTTP client with reasonable defaults for timeouts
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("Slidecast/0.5")
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .expect("failed to build HTTP client")
});

pub(crate) fn http_client() -> &'static Client {
    &HTTP_CLIENT
}

/// Fetch result: the playlist's items sorted ascending by `order`.
pub type SourceResult = Result<Vec<PlaylistItem>, SourceError>;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("API error: {0}")]
    Api(String),
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Abstract supplier of ordered playlist items.
///
/// Implementations must fail loudly rather than return partial or corrupt
/// data; the engine treats any error here as a failed fetch and surfaces it.
#[async_trait]
pub trait ItemSource: Send + Sync {
    async fn fetch_items(&self, playlist_id: &str) -> SourceResult;
}

pub use cache::CachedItemSource;
pub use http::HttpItemSource;
