//! Public and internal types for the fileseek protocol, engine and server.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::utils::config::{DefaultServer, HeartbeatConsts, platform_default_root};

/// One request: find `filename` under `root_path`. Empty `root_path` means "server default root".
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub filename: String,
    pub root_path: String,
}

impl SearchRequest {
    pub fn new(filename: impl Into<String>, root_path: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            root_path: root_path.into(),
        }
    }
}

/// Response status. Wire values: 0 = Pending, 1 = Ok, 2 = Error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Pending,
    Ok,
    Error,
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Status::Pending => 0,
            Status::Ok => 1,
            Status::Error => 2,
        }
    }

    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            0 => Some(Status::Pending),
            1 => Some(Status::Ok),
            2 => Some(Status::Error),
            _ => None,
        }
    }

    /// `Ok` and `Error` end a task; nothing may follow them.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Status::Pending)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Status::Pending => "PENDING",
            Status::Ok => "OK",
            Status::Error => "ERROR",
        };
        f.write_str(s)
    }
}

/// One response frame. `Ok` with an empty payload means the file was not found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResponse {
    pub status: Status,
    pub payload: String,
}

impl SearchResponse {
    pub fn pending(payload: impl Into<String>) -> Self {
        Self {
            status: Status::Pending,
            payload: payload.into(),
        }
    }

    pub fn found(path: impl Into<String>) -> Self {
        Self {
            status: Status::Ok,
            payload: path.into(),
        }
    }

    pub fn not_found() -> Self {
        Self {
            status: Status::Ok,
            payload: String::new(),
        }
    }

    pub fn error(payload: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            payload: payload.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Status::Ok && self.payload.is_empty()
    }
}

/// Counters for one search, shared between the search path and the heartbeat path.
#[derive(Debug, Default)]
pub struct SearchStats {
    dirs_visited: AtomicUsize,
    dirs_skipped: AtomicUsize,
}

impl SearchStats {
    pub fn record_visited(&self) {
        self.dirs_visited.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self) {
        self.dirs_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dirs_visited(&self) -> usize {
        self.dirs_visited.load(Ordering::Relaxed)
    }

    pub fn dirs_skipped(&self) -> usize {
        self.dirs_skipped.load(Ordering::Relaxed)
    }
}

/// Options for the directory walk. Lib callers can build this directly; the server derives it from [`ServerOpts`].
#[derive(Clone, Debug)]
pub struct SearchOpts {
    /// Root used when a request carries an empty `root_path`.
    pub default_root: PathBuf,
    /// Directory exclude patterns (glob syntax, e.g. `proc`, `node_*`). Excluded directories are not descended into.
    pub exclude: Vec<String>,
    /// Follow symbolic links to directories. No loop protection: a cyclic link tree is walked until the process gives up.
    pub follow_links: bool,
}

impl Default for SearchOpts {
    fn default() -> Self {
        Self {
            default_root: platform_default_root(),
            exclude: Vec::new(),
            follow_links: false,
        }
    }
}

/// Full server options (CLI, config file, or lib).
#[derive(Clone, Debug)]
pub struct ServerOpts {
    /// Address to bind, e.g. `127.0.0.1`.
    pub bind: String,
    /// TCP port. `0` lets the OS pick one (useful in tests).
    pub port: u16,
    /// Walk options applied to every request.
    pub search: SearchOpts,
    /// Maximum connections served at once. Accepting pauses while at the limit.
    pub max_connections: usize,
    /// Interval between `Pending` heartbeats.
    pub heartbeat_interval: Duration,
    /// Read timeout while waiting for the request frame. `None` waits forever.
    pub read_timeout: Option<Duration>,
    /// Verbose (debug) logging.
    pub verbose: bool,
}

impl Default for ServerOpts {
    fn default() -> Self {
        Self {
            bind: DefaultServer::ADDRESS.to_string(),
            port: DefaultServer::PORT,
            search: SearchOpts::default(),
            max_connections: DefaultServer::MAX_CONNECTIONS,
            heartbeat_interval: HeartbeatConsts::INTERVAL,
            read_timeout: Some(DefaultServer::READ_TIMEOUT),
            verbose: false,
        }
    }
}

impl ServerOpts {
    /// `bind:port` for the listener.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
