use async_trait::async_trait;
use tracing::debug;

use crate::model::PlaylistItem;
use crate::source::{ItemSource, SourceError, SourceResult, http_client};

/// Playlist items from the signage REST API.
pub struct HttpItemSource {
    base_url: String,
}

impl HttpItemSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }
}

#[async_trait]
impl ItemSource for HttpItemSource {
    async fn fetch_items(&self, playlist_id: &str) -> SourceResult {
        let url = format!("{}/playlists/{}/items", self.base_url, playlist_id);
        debug!(%url, "fetching playlist items");

        let resp = http_client().get(&url).send().await?;

        if !resp.status().is_success() {
            return Err(SourceError::Api(format!(
                "playlist items: HTTP {}",
                resp.status()
            )));
        }

        let mut items: Vec<PlaylistItem> = resp.json().await?;
        // The API serves rank order already; re-sorting keeps the engine's
        // iteration contract independent of server behavior.
        items.sort_by_key(|item| item.order);
        Ok(items)
    }
}
