//! fileseek: find a file by name on a remote machine, with heartbeats while the search runs.

pub mod client;
pub mod engine;
pub mod error;
pub mod protocol;
pub mod server;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use error::{FrameError, SearchError};
pub use server::Server;
pub use types::*;

use log::debug;
use std::path::PathBuf;

use engine::lister::FsLister;

/// Result alias used by public fileseek API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Search the local filesystem for `request` without a server.
///
/// Same semantics as a served request: empty `root_path` uses `opts.default_root`,
/// `Ok(None)` means not found, a missing root is [`SearchError::RootNotFound`].
pub fn find_file(
    request: &SearchRequest,
    opts: &SearchOpts,
) -> std::result::Result<Option<PathBuf>, SearchError> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    let root = engine::resolve_root(&request.root_path, opts);
    let lister = FsLister::new(opts.follow_links);
    engine::find_in_tree(
        &request.filename,
        &root,
        &lister,
        opts,
        &SearchStats::default(),
    )
}
