// state.rs: scheduler state and the public projection pushed to the renderer.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::model::{Orientation, PlaylistItem, SlideContent};

/// Scheduler lifecycle. All changes go through [`StateBundle::transition`]
/// so the loop's timer discipline stays auditable in one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    /// No active playlist, no timer armed.
    #[default]
    Idle,
    /// Item fetch in flight for a newly activated playlist.
    Loading,
    /// A current item is selected and its duration timer is armed.
    Running,
    /// Nothing is currently eligible; the fixed retry timer is armed.
    Starved,
}

/// Snapshot sent to the consumer whenever anything observable changes.
///
/// `next_content` exists purely so the renderer can preload off-screen; the
/// engine never advances into it automatically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Update {
    pub current_content: Option<Arc<SlideContent>>,
    pub next_content: Option<Arc<SlideContent>>,
    pub current_item_id: Option<String>,
    /// True only during the initial fetch of a newly activated playlist.
    pub is_loading: bool,
    pub error: Option<String>,
    pub orientation: Orientation,
    /// Incremented on any state change.
    pub version: u64,
}

/// Mutable scheduler state, owned exclusively by the engine task.
pub struct StateBundle {
    pub state: EngineState,
    /// Ordered item list for the active cycle; replaced wholesale by a fetch.
    pub items: Vec<PlaylistItem>,
    /// Pointer into `items`; `None` before the first selection of a cycle.
    pub current_index: Option<usize>,
    pub current_content: Option<Arc<SlideContent>>,
    pub next_content: Option<Arc<SlideContent>>,
    pub current_item_id: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub version: u64,
    last_sent_version: u64,
}

impl StateBundle {
    pub fn new() -> Self {
        Self {
            state: EngineState::Idle,
            items: Vec::new(),
            current_index: None,
            current_content: None,
            next_content: None,
            current_item_id: None,
            is_loading: false,
            error: None,
            version: 0,
            last_sent_version: 0,
        }
    }

    pub fn transition(&mut self, next: EngineState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "engine state transition");
            self.state = next;
        }
    }

    /// Replace the item list wholesale and reset the iteration pointer.
    pub fn set_items(&mut self, items: Vec<PlaylistItem>) {
        self.items = items;
        self.current_index = None;
        self.is_loading = false;
        self.error = None;
        self.version += 1;
    }

    /// Make `items[idx]` the current selection.
    pub fn set_current(&mut self, idx: usize) {
        let item = &self.items[idx];
        self.current_index = Some(idx);
        self.current_content = Some(Arc::new(item.content.clone()));
        self.current_item_id = Some(item.id.clone());
        self.version += 1;
    }

    /// Expose the preview candidate for preloading. Does not move the
    /// pointer and shares the version bump of the selection it belongs to.
    pub fn set_preview(&mut self, idx: Option<usize>) {
        self.next_content = idx.map(|i| Arc::new(self.items[i].content.clone()));
    }

    /// Clear the visible selection but keep the item list and pointer, so a
    /// later advance resumes from the same position.
    pub fn clear_playback(&mut self) {
        self.current_content = None;
        self.next_content = None;
        self.current_item_id = None;
        self.version += 1;
    }

    /// Full reset: item list, pointer, and all public fields.
    pub fn clear_all(&mut self) {
        self.items.clear();
        self.current_index = None;
        self.current_content = None;
        self.next_content = None;
        self.current_item_id = None;
        self.is_loading = false;
        self.error = None;
        self.version += 1;
    }

    pub fn begin_loading(&mut self) {
        self.is_loading = true;
        self.error = None;
        self.version += 1;
    }

    pub fn fail(&mut self, error: String) {
        self.is_loading = false;
        self.error = Some(error);
        self.version += 1;
    }

    /// Orientation of the current item's content, landscape when nothing is
    /// showing.
    pub fn orientation(&self) -> Orientation {
        self.current_content
            .as_ref()
            .map(|c| c.orientation)
            .unwrap_or_default()
    }

    fn snapshot(&self) -> Update {
        Update {
            current_content: self.current_content.clone(),
            next_content: self.next_content.clone(),
            current_item_id: self.current_item_id.clone(),
            is_loading: self.is_loading,
            error: self.error.clone(),
            orientation: self.orientation(),
            version: self.version,
        }
    }

    /// Push a snapshot when the version moved since the last successful send.
    pub async fn send_update(&mut self, update_tx: &mpsc::Sender<Update>) {
        if self.version == self.last_sent_version {
            return;
        }
        if update_tx.send(self.snapshot()).await.is_ok() {
            self.last_sent_version = self.version;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScheduleRule;

    fn item(id: &str, orientation: Orientation) -> PlaylistItem {
        PlaylistItem {
            id: id.to_string(),
            content_ref: format!("slide-{id}"),
            order: 0,
            duration_seconds: 5,
            schedule_rule: None::<ScheduleRule>,
            content: SlideContent {
                orientation,
                body: serde_json::Value::Null,
            },
        }
    }

    #[test]
    fn set_current_exposes_content_and_id() {
        let mut bundle = StateBundle::new();
        bundle.set_items(vec![item("a", Orientation::Portrait)]);
        bundle.set_current(0);
        assert_eq!(bundle.current_item_id.as_deref(), Some("a"));
        assert_eq!(bundle.orientation(), Orientation::Portrait);
    }

    #[test]
    fn orientation_defaults_to_landscape_without_selection() {
        let bundle = StateBundle::new();
        assert_eq!(bundle.orientation(), Orientation::Landscape);
    }

    #[test]
    fn clear_playback_keeps_pointer() {
        let mut bundle = StateBundle::new();
        bundle.set_items(vec![item("a", Orientation::Landscape)]);
        bundle.set_current(0);
        bundle.clear_playback();
        assert!(bundle.current_item_id.is_none());
        assert_eq!(bundle.current_index, Some(0));
        assert_eq!(bundle.items.len(), 1);
    }

    #[test]
    fn every_mutation_bumps_version() {
        let mut bundle = StateBundle::new();
        let v0 = bundle.version;
        bundle.begin_loading();
        assert!(bundle.version > v0);
        let v1 = bundle.version;
        bundle.set_items(vec![item("a", Orientation::Landscape)]);
        assert!(bundle.version > v1);
        let v2 = bundle.version;
        bundle.fail("boom".into());
        assert!(bundle.version > v2);
        assert_eq!(bundle.error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn send_update_skips_unchanged_state() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut bundle = StateBundle::new();
        bundle.begin_loading();
        bundle.send_update(&tx).await;
        bundle.send_update(&tx).await;
        assert!(rx.recv().await.unwrap().is_loading);
        assert!(rx.try_recv().is_err());
    }
}
