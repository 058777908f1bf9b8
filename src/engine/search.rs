//! Breadth-first file search.
//!
//! Directories are visited in FIFO order starting at the root, so a match closer to the root
//! always wins over a deeper one. Sibling order is whatever the lister returns. Symlinks are only
//! followed when [`SearchOpts::follow_links`] is set, and there is no loop detection in that mode.

use log::debug;
use std::collections::VecDeque;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::engine::lister::{DirItem, DirLister};
use crate::engine::tools::should_descend;
use crate::error::SearchError;
use crate::{SearchOpts, SearchStats};

/// Find the first entry named exactly `filename` under `root`.
///
/// - `Ok(Some(path))`: `path` is `<dir>/<filename>` for the shallowest directory holding a match.
/// - `Ok(None)`: the whole tree was walked without a match.
/// - `Err(RootNotFound)`: `root` does not exist or is not a directory.
/// - `Err(Io)`: `root` exists but could not be listed. Unreadable subdirectories are skipped instead.
pub fn find_in_tree(
    filename: &str,
    root: &Path,
    lister: &dyn DirLister,
    opts: &SearchOpts,
    stats: &SearchStats,
) -> Result<Option<PathBuf>, SearchError> {
    let root_items = lister.list(root).map_err(|e| match e.kind() {
        ErrorKind::NotFound | ErrorKind::NotADirectory => {
            SearchError::RootNotFound(root.to_path_buf())
        }
        _ => SearchError::Io {
            path: root.to_path_buf(),
            source: e,
        },
    })?;

    let mut queue: VecDeque<PathBuf> = VecDeque::new();
    let mut current = Some((root.to_path_buf(), root_items));
    while let Some((dir, items)) = current
        .take()
        .or_else(|| next_listing(&mut queue, lister, stats))
    {
        stats.record_visited();
        if let Some(found) = scan_dir(&dir, items, filename, &opts.exclude, &mut queue) {
            return Ok(Some(found));
        }
    }

    if stats.dirs_skipped() > 0 {
        log::warn!(
            "Skipped {} directories under {} due to permission errors or access issues",
            stats.dirs_skipped(),
            root.display()
        );
    }
    Ok(None)
}

/// Pop queued directories until one can be listed. Unlistable ones are counted and dropped.
fn next_listing(
    queue: &mut VecDeque<PathBuf>,
    lister: &dyn DirLister,
    stats: &SearchStats,
) -> Option<(PathBuf, Vec<DirItem>)> {
    while let Some(dir) = queue.pop_front() {
        match lister.list(&dir) {
            Ok(items) => return Some((dir, items)),
            Err(e) => {
                debug!("skipping {}: {}", dir.display(), e);
                stats.record_skipped();
            }
        }
    }
    None
}

/// Check one listing for a match; queue its subdirectories otherwise.
fn scan_dir(
    dir: &Path,
    items: Vec<DirItem>,
    filename: &str,
    exclude: &[String],
    queue: &mut VecDeque<PathBuf>,
) -> Option<PathBuf> {
    for item in items {
        if item.name == filename {
            return Some(dir.join(&item.name));
        }
        if item.is_dir && item.name != "." && item.name != ".." {
            let sub = dir.join(&item.name);
            if should_descend(&sub, exclude) {
                queue.push_back(sub);
            } else {
                debug!("excluded {}", sub.display());
            }
        }
    }
    None
}
