//! Offline playlist cache.
//!
//! Write-through JSON snapshot of the last successfully fetched item list
//! per playlist. Screens run 24/7 unattended; when the network or API is
//! down, the last known list keeps content on the glass until a fetch
//! succeeds again.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::model::PlaylistItem;
use crate::source::{ItemSource, SourceResult};

/// On-disk cache structure: playlist id -> last good item list.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct CacheFile {
    playlists: HashMap<String, Vec<PlaylistItem>>,
}

/// Wraps any [`ItemSource`] with a JSON file fallback.
///
/// Successful fetches are written through; failed fetches are answered from
/// the cache when a previous list for that playlist exists, and propagated
/// otherwise.
pub struct CachedItemSource<S> {
    inner: S,
    path: PathBuf,
    cache: Mutex<CacheFile>,
}

impl<S: ItemSource> CachedItemSource<S> {
    /// Load the cache from `path`, starting empty when the file is missing
    /// or unreadable.
    pub async fn open(inner: S, path: PathBuf) -> Self {
        let cache = load_cache(&path).await;
        Self {
            inner,
            path,
            cache: Mutex::new(cache),
        }
    }
}

async fn load_cache(path: &Path) -> CacheFile {
    let contents = match fs::read_to_string(path).await {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            // First run - file doesn't exist yet
            tracing::info!(
                path = %path.display(),
                "Creating new playlist cache"
            );
            return CacheFile::default();
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to load playlist cache, starting empty"
            );
            return CacheFile::default();
        }
    };
    match serde_json::from_str::<CacheFile>(&contents) {
        Ok(cache) => {
            if !cache.playlists.is_empty() {
                tracing::info!(
                    path = %path.display(),
                    playlists = cache.playlists.len(),
                    "Loaded playlist cache"
                );
            }
            cache
        }
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to parse playlist cache, starting empty"
            );
            CacheFile::default()
        }
    }
}

async fn save_cache(cache: &CacheFile, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(cache)?;
    let mut file = fs::File::create(path).await?;
    file.write_all(json.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

#[async_trait]
impl<S: ItemSource> ItemSource for CachedItemSource<S> {
    async fn fetch_items(&self, playlist_id: &str) -> SourceResult {
        match self.inner.fetch_items(playlist_id).await {
            Ok(items) => {
                let mut cache = self.cache.lock().await;
                cache
                    .playlists
                    .insert(playlist_id.to_string(), items.clone());
                if let Err(e) = save_cache(&cache, &self.path).await {
                    tracing::warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Failed to save playlist cache"
                    );
                }
                Ok(items)
            }
            Err(e) => {
                let cache = self.cache.lock().await;
                match cache.playlists.get(playlist_id) {
                    Some(items) => {
                        tracing::warn!(
                            playlist_id,
                            error = %e,
                            "Fetch failed, serving cached items"
                        );
                        Ok(items.clone())
                    }
                    None => Err(e),
                }
            }
        }
    }
}
