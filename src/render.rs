use tokio::sync::mpsc;

use crate::state::Update;

/// Report content transitions on stdout (for scripting and diagnostics).
///
/// The real slide renderer consumes the same update stream and draws
/// `current_content` while preloading `next_content`; this sink only prints
/// what would be on the glass, deduplicated against the last printed state.
pub async fn display_pipe(mut update_rx: mpsc::Receiver<Update>) {
    let mut last_item_id: Option<String> = None;
    let mut last_error: Option<String> = None;
    let mut printed_empty = false;

    while let Some(upd) = update_rx.recv().await {
        if upd.is_loading {
            continue;
        }

        if upd.error != last_error {
            if let Some(err) = &upd.error {
                println!("error: {err}");
            }
            last_error = upd.error.clone();
        }

        match &upd.current_item_id {
            Some(id) => {
                if last_item_id.as_deref() != Some(id.as_str()) {
                    println!("showing {id} ({})", upd.orientation);
                    last_item_id = Some(id.clone());
                    printed_empty = false;
                }
            }
            None => {
                if !printed_empty && upd.error.is_none() {
                    println!("(no content)");
                    printed_empty = true;
                }
                last_item_id = None;
            }
        }
    }
}
