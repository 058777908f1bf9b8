//! Heartbeat coordinator: run a search while a second thread reports progress on the same sink.
//!
//! Ordering guarantees per task:
//! 1. heartbeats and the terminal response never write concurrently (task mutex);
//! 2. the completion flag is set under that mutex, so a heartbeat either lands before it or not at all;
//! 3. the heartbeat thread is joined before the terminal response is written and before [`run_task`] returns.

use crossbeam_channel::{Receiver, RecvTimeoutError, bounded};
use log::{debug, error, info};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crate::engine::lister::DirLister;
use crate::engine::search::find_in_tree;
use crate::engine::task::{ResponseSink, SearchTask, TaskOutcome};
use crate::engine::tools::{path_payload, resolve_root};
use crate::error::SearchError;
use crate::{SearchOpts, SearchRequest, SearchResponse, SearchStats};

/// Result of the search path, including a panic caught on it.
pub type SearchResult = thread::Result<Result<Option<PathBuf>, SearchError>>;

/// Heartbeat loop: wake every `interval`, emit `Pending`, stop when the search side drops its sender.
fn heartbeat_loop<S: ResponseSink>(task: &SearchTask<S>, interval: Duration, stop_rx: Receiver<()>) {
    loop {
        match stop_rx.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {
                if !task.emit_heartbeat() {
                    break;
                }
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Flatten a search result into the terminal response. Causes other than a missing root only reach the log.
pub fn terminal_response(request: &SearchRequest, result: SearchResult) -> SearchResponse {
    match result {
        Ok(Ok(Some(path))) => SearchResponse::found(path_payload(&path)),
        Ok(Ok(None)) => SearchResponse::not_found(),
        Ok(Err(e)) => {
            match &e {
                SearchError::RootNotFound(_) => info!("{}", e),
                _ => error!("search for '{}' failed: {}", request.filename, e),
            }
            SearchResponse::error(e.wire_message())
        }
        Err(payload) => {
            let e = SearchError::Internal(panic_message(payload.as_ref()));
            error!("search for '{}' panicked: {}", request.filename, e);
            SearchResponse::error(e.wire_message())
        }
    }
}

/// Run `search` on the calling thread with heartbeats every `interval`, then send exactly one terminal response.
///
/// Returns after the heartbeat thread has exited. Write failures (peer gone) are logged and
/// reported through [`TaskOutcome::delivered`], never propagated.
pub fn run_task<S, F>(task: &SearchTask<S>, interval: Duration, search: F) -> TaskOutcome
where
    S: ResponseSink,
    F: FnOnce(&SearchRequest, &SearchStats) -> Result<Option<PathBuf>, SearchError>,
{
    let (stop_tx, stop_rx) = bounded::<()>(0);

    let result = thread::scope(|s| {
        let heartbeat = s.spawn(move || heartbeat_loop(task, interval, stop_rx));

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            search(task.request(), task.stats())
        }));

        if !task.mark_completed() {
            error!("task for '{}' completed twice", task.request().filename);
        }
        // Disconnecting wakes the heartbeat immediately instead of after its next interval.
        drop(stop_tx);
        if heartbeat.join().is_err() {
            error!("heartbeat thread panicked");
        }
        result
    });

    let response = terminal_response(task.request(), result);
    let delivered = match task.send_terminal(&response) {
        Ok(()) => true,
        Err(e) => {
            info!(
                "could not deliver result for '{}' (peer likely gone): {}",
                task.request().filename,
                e
            );
            false
        }
    };

    let outcome = TaskOutcome {
        status: response.status,
        heartbeats: task.heartbeats_sent(),
        dirs_visited: task.stats().dirs_visited(),
        delivered,
    };
    debug!("task '{}' finished: {:?}", task.request().filename, outcome);
    outcome
}

/// Run a filesystem search for the task's request with the given lister and options.
pub fn run_search_task<S: ResponseSink>(
    task: &SearchTask<S>,
    lister: &dyn DirLister,
    opts: &SearchOpts,
    interval: Duration,
) -> TaskOutcome {
    run_task(task, interval, |request, stats| {
        let root = resolve_root(&request.root_path, opts);
        find_in_tree(&request.filename, &root, lister, opts, stats)
    })
}
