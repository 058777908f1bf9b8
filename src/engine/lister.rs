//! Directory listing capability used by the search: one directory at a time.

use std::ffi::OsString;
use std::io::{self, ErrorKind};
use std::path::Path;

use walkdir::WalkDir;

/// One entry of a listed directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirItem {
    pub name: OsString,
    pub is_dir: bool,
}

impl DirItem {
    pub fn new(name: impl Into<OsString>, is_dir: bool) -> Self {
        Self {
            name: name.into(),
            is_dir,
        }
    }
}

/// Lists the direct children of a directory.
///
/// Implementations report a missing path (or a path that is not a directory) with
/// [`ErrorKind::NotFound`] or [`ErrorKind::NotADirectory`]; the search maps those to
/// "root not found". `.` and `..` must not be returned.
pub trait DirLister: Send + Sync {
    fn list(&self, dir: &Path) -> io::Result<Vec<DirItem>>;
}

/// Filesystem lister: a depth-1 walk per directory, so each call opens and closes exactly one handle.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsLister {
    follow_links: bool,
}

impl FsLister {
    pub fn new(follow_links: bool) -> Self {
        Self { follow_links }
    }
}

impl DirLister for FsLister {
    fn list(&self, dir: &Path) -> io::Result<Vec<DirItem>> {
        // walkdir yields a non-directory root as a plain entry; report it the way read_dir would.
        if !std::fs::metadata(dir)?.is_dir() {
            return Err(io::Error::new(
                ErrorKind::NotADirectory,
                format!("{} is not a directory", dir.display()),
            ));
        }

        let mut items = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.follow_links)
        {
            match entry {
                Ok(entry) => {
                    let name = entry.file_name();
                    if name == "." || name == ".." {
                        continue;
                    }
                    items.push(DirItem::new(name, entry.file_type().is_dir()));
                }
                Err(err) if err.depth() == 0 || err.path() == Some(dir) => {
                    return Err(io::Error::from(err));
                }
                // A child that cannot be stat'ed (e.g. dangling link with follow_links): skip it.
                Err(err) => log::debug!("skipping entry in {}: {}", dir.display(), err),
            }
        }
        Ok(items)
    }
}
