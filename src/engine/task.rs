//! A search task: one request, one response sink, one completion flag.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::{SearchRequest, SearchResponse, SearchStats, Status};

/// Where a task's responses go: zero or more `Pending`, then exactly one terminal response.
pub trait ResponseSink: Send {
    fn send(&mut self, response: &SearchResponse) -> io::Result<()>;
}

/// Collects responses in memory. Handy for lib callers that want the whole sequence.
impl ResponseSink for Vec<SearchResponse> {
    fn send(&mut self, response: &SearchResponse) -> io::Result<()> {
        self.push(response.clone());
        Ok(())
    }
}

struct SinkState<S> {
    sink: S,
    heartbeats_sent: usize,
    /// Set after a failed write; nothing else is attempted except the terminal response.
    broken: bool,
    terminal_sent: bool,
}

/// What happened to a task, for the operator log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskOutcome {
    pub status: Status,
    pub heartbeats: usize,
    pub dirs_visited: usize,
    /// False when the terminal frame could not be written (peer likely gone).
    pub delivered: bool,
}

/// Ties a request to its sink. Every sink call goes through one mutex, and the
/// completion flag is only flipped while that mutex is held.
pub struct SearchTask<S> {
    request: SearchRequest,
    state: Mutex<SinkState<S>>,
    completed: AtomicBool,
    stats: SearchStats,
}

impl<S: ResponseSink> SearchTask<S> {
    pub fn new(request: SearchRequest, sink: S) -> Self {
        Self {
            request,
            state: Mutex::new(SinkState {
                sink,
                heartbeats_sent: 0,
                broken: false,
                terminal_sent: false,
            }),
            completed: AtomicBool::new(false),
            stats: SearchStats::default(),
        }
    }

    pub fn request(&self) -> &SearchRequest {
        &self.request
    }

    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    pub fn is_completed(&self) -> bool {
        self.completed.load(Ordering::Acquire)
    }

    /// A panic while holding the lock cannot leave the state half-written, so recover from poisoning.
    fn lock(&self) -> MutexGuard<'_, SinkState<S>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Send one `Pending` unless the task has completed. Returns false once heartbeats must stop.
    pub fn emit_heartbeat(&self) -> bool {
        let mut state = self.lock();
        if self.completed.load(Ordering::Acquire) || state.broken {
            return false;
        }
        let response = SearchResponse::pending(format!(
            "Searching for '{}'... {} directories scanned",
            self.request.filename,
            self.stats.dirs_visited()
        ));
        match state.sink.send(&response) {
            Ok(()) => {
                state.heartbeats_sent += 1;
                true
            }
            Err(e) => {
                log::debug!("heartbeat write failed, stopping heartbeats: {}", e);
                state.broken = true;
                false
            }
        }
    }

    /// Flip `Running -> Completed`. Returns false if it was already completed.
    pub fn mark_completed(&self) -> bool {
        let _state = self.lock();
        !self.completed.swap(true, Ordering::AcqRel)
    }

    /// Write the terminal response. Only valid after [`Self::mark_completed`]; a second call is refused.
    pub fn send_terminal(&self, response: &SearchResponse) -> io::Result<()> {
        debug_assert!(response.status.is_terminal());
        let mut state = self.lock();
        if !self.completed.load(Ordering::Acquire) || state.terminal_sent {
            return Err(io::Error::other(
                "terminal response out of order for this task",
            ));
        }
        state.terminal_sent = true;
        state.sink.send(response)
    }

    pub fn heartbeats_sent(&self) -> usize {
        self.lock().heartbeats_sent
    }

    /// Give back the sink once the task is finished (e.g. to close the connection).
    pub fn into_sink(self) -> S {
        self.state
            .into_inner()
            .unwrap_or_else(|e| e.into_inner())
            .sink
    }
}
