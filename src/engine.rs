// engine.rs: the playlist scheduling loop.
//
// One tokio task owns the item list, the iteration pointer and the single
// timer. Commands and timer fires are serviced by the same `select!` loop,
// so advance steps are strictly sequential and can never race.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::schedule::find_next_eligible;
use crate::source::ItemSource;
use crate::state::{EngineState, StateBundle, Update};
use crate::timer::OneShotTimer;

/// Fixed starvation retry interval. Eligibility windows are wall-clock
/// bound, so a short fixed poll is enough to notice a newly opened window;
/// backoff would only delay recovery on an unattended screen.
pub const STARVED_RETRY: Duration = Duration::from_secs(10);

/// Control input for the engine task.
#[derive(Debug)]
pub enum Command {
    /// Activate a playlist, or deactivate with `None`. A changed id tears
    /// the previous cycle down and starts a fresh fetch.
    SetPlaylist(Option<String>),
    Shutdown,
}

/// Cloneable handle for activating playlists and shutting the engine down.
///
/// This is the seam a realtime invalidation channel plugs into: whatever
/// learns that the screen's playlist changed calls `set_playlist`.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<Command>,
}

impl EngineHandle {
    pub async fn set_playlist(&self, playlist_id: Option<String>) {
        let _ = self.cmd_tx.send(Command::SetPlaylist(playlist_id)).await;
    }

    pub async fn shutdown(&self) {
        let _ = self.cmd_tx.send(Command::Shutdown).await;
    }
}

/// Spawn the engine task; returns the control handle and the update stream.
pub fn spawn<S, C>(source: S, clock: C) -> (EngineHandle, mpsc::Receiver<Update>)
where
    S: ItemSource + 'static,
    C: Clock,
{
    let (cmd_tx, cmd_rx) = mpsc::channel(8);
    let (update_tx, update_rx) = mpsc::channel(32);
    tokio::spawn(run(source, clock, cmd_rx, update_tx));
    (EngineHandle { cmd_tx }, update_rx)
}

/// Engine task body. Exits when a `Shutdown` arrives or all handles drop,
/// closing the update stream behind it.
pub async fn run<S, C>(
    source: S,
    clock: C,
    mut cmd_rx: mpsc::Receiver<Command>,
    update_tx: mpsc::Sender<Update>,
) where
    S: ItemSource,
    C: Clock,
{
    let mut bundle = StateBundle::new();
    let mut timer = OneShotTimer::new();

    loop {
        tokio::select! {
            maybe_cmd = cmd_rx.recv() => {
                match maybe_cmd {
                    Some(Command::SetPlaylist(id)) => {
                        handle_set_playlist(id, &source, &clock, &mut bundle, &mut timer, &update_tx).await;
                    }
                    Some(Command::Shutdown) | None => {
                        timer.cancel();
                        break;
                    }
                }
            }
            _ = timer.fired() => {
                advance(&mut bundle, &mut timer, &clock, &update_tx).await;
            }
        }
    }
    debug!("engine loop stopped");
}

/// Activation / deactivation. Cancelling the timer comes first on every
/// path so no stale advance can fire while a fetch is in flight or after
/// teardown.
async fn handle_set_playlist<S, C>(
    playlist_id: Option<String>,
    source: &S,
    clock: &C,
    bundle: &mut StateBundle,
    timer: &mut OneShotTimer,
    update_tx: &mpsc::Sender<Update>,
) where
    S: ItemSource,
    C: Clock,
{
    timer.cancel();

    let Some(id) = playlist_id else {
        bundle.clear_all();
        bundle.transition(EngineState::Idle);
        bundle.send_update(update_tx).await;
        return;
    };

    info!(playlist_id = %id, "activating playlist");
    bundle.clear_all();
    bundle.begin_loading();
    bundle.transition(EngineState::Loading);
    bundle.send_update(update_tx).await;

    match source.fetch_items(&id).await {
        Ok(items) => {
            info!(playlist_id = %id, count = items.len(), "playlist loaded");
            bundle.set_items(items);
            advance(bundle, timer, clock, update_tx).await;
        }
        Err(e) => {
            warn!(playlist_id = %id, error = %e, "playlist fetch failed");
            bundle.fail(e.to_string());
            bundle.transition(EngineState::Idle);
            bundle.send_update(update_tx).await;
        }
    }
}

/// Core step, run after a fetch and after every timer fire: select the next
/// eligible item from pointer + 1, expose it together with the preview
/// candidate, and arm the follow-up timer.
async fn advance<C>(
    bundle: &mut StateBundle,
    timer: &mut OneShotTimer,
    clock: &C,
    update_tx: &mpsc::Sender<Update>,
) where
    C: Clock,
{
    timer.cancel();

    if bundle.items.is_empty() {
        // Nothing will ever become eligible without a new fetch, so no
        // retry timer either.
        bundle.clear_playback();
        bundle.transition(EngineState::Idle);
        bundle.send_update(update_tx).await;
        return;
    }

    let now = clock.now();
    let start = bundle.current_index.map_or(0, |i| i + 1);

    match find_next_eligible(start, &bundle.items, now) {
        Some(idx) => {
            bundle.set_current(idx);
            // Preview candidate for preloading only; the pointer stays put.
            let preview = find_next_eligible(idx + 1, &bundle.items, now);
            bundle.set_preview(preview);

            let item = &bundle.items[idx];
            let duration = Duration::from_secs(item.duration_seconds);
            debug!(
                item_id = %item.id,
                content_ref = %item.content_ref,
                duration_secs = item.duration_seconds,
                "item selected"
            );
            bundle.transition(EngineState::Running);
            timer.arm(duration);
        }
        None => {
            debug!(
                retry_secs = STARVED_RETRY.as_secs(),
                "no item currently eligible"
            );
            bundle.clear_playback();
            bundle.transition(EngineState::Starved);
            timer.arm(STARVED_RETRY);
        }
    }
    bundle.send_update(update_tx).await;
}
