//! Application configuration constants.
//! Protocol limits, server defaults and timing in one place.

use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Config file looked up in the working directory (e.g. `.fileseek.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Server ----

/// Listener defaults.
pub struct DefaultServer;

impl DefaultServer {
    pub const ADDRESS: &'static str = "127.0.0.1";
    pub const PORT: u16 = 8080;
    /// Upper bound on connections served at once; further capped by the FD limit.
    pub const MAX_CONNECTIONS: usize = 256;
    /// How long a connection may take to deliver its request frame.
    pub const READ_TIMEOUT: Duration = Duration::from_secs(30);
    /// Sleep between accept polls when no connection is ready (or the limit is reached).
    pub const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(20);
}

// ---- Heartbeat ----

pub struct HeartbeatConsts;

impl HeartbeatConsts {
    /// Fixed interval between `Pending` frames.
    pub const INTERVAL: Duration = Duration::from_millis(500);
}

// ---- Protocol ----

/// Size of the `total_length` prefix and of every field length prefix.
pub const LEN_PREFIX: usize = 4;

/// Largest `total_length` accepted from the wire (1 MiB). Checked before allocating.
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Initial read buffer for frame assembly.
pub const READ_CHUNK_SIZE: usize = 4 * 1024;

// ---- Search ----

/// Root used when a request carries an empty root path.
#[cfg(not(windows))]
pub fn platform_default_root() -> PathBuf {
    PathBuf::from("/")
}

#[cfg(windows)]
pub fn platform_default_root() -> PathBuf {
    PathBuf::from("C:\\")
}
