//! Progress display for the client: a counter of heartbeats received while the server searches.

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

// Progress bar type alias
pub type ProgressBar = Arc<Mutex<Bar>>;

/// Create a counter for unknown total (shows count without percentage)
pub fn create_counter(desc: &'static str) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = " heartbeats"
    )))
}

/// Update progress bar if available
/// Uses try_lock so a slow terminal never holds up frame processing.
pub fn update_progress_bar(pb: &ProgressBar, n: usize) {
    if let Ok(mut pb) = pb.try_lock() {
        let _ = pb.update(n);
    }
}

/// Erase the counter line before printing the final result.
pub fn clear_bar(pb: &ProgressBar) {
    if let Ok(mut pb) = pb.lock() {
        let _ = pb.clear();
    }
}

/// Callback for [`crate::client::search`]: bumps `bar` once per `Pending` frame.
pub fn heartbeat_callback(bar: Option<ProgressBar>) -> impl FnMut(&crate::SearchResponse) {
    move |resp| {
        log::debug!("{}", resp.payload);
        if let Some(bar) = bar.as_ref() {
            update_progress_bar(bar, 1);
        }
    }
}
