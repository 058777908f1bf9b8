//! Directory search tests: BFS order, not found, missing root, skipped subdirectories, excludes.

use fileseek::engine::{DirItem, DirLister, FsLister, find_in_tree};
use fileseek::{SearchError, SearchOpts, SearchRequest, SearchStats, find_file};
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create `root/<rel>` files (parents included).
fn tree(files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for rel in files {
        let path = dir.path().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, b"x").unwrap();
    }
    dir
}

fn search(filename: &str, root: &Path, opts: &SearchOpts) -> Result<Option<PathBuf>, SearchError> {
    find_in_tree(
        filename,
        root,
        &FsLister::new(opts.follow_links),
        opts,
        &SearchStats::default(),
    )
}

/// Real filesystem, except listing any path in `denied` fails with PermissionDenied.
struct DenyingLister {
    denied: Vec<PathBuf>,
}

impl DirLister for DenyingLister {
    fn list(&self, dir: &Path) -> io::Result<Vec<DirItem>> {
        if self.denied.iter().any(|d| d == dir) {
            return Err(io::Error::new(ErrorKind::PermissionDenied, "denied"));
        }
        FsLister::default().list(dir)
    }
}

// --- BFS order ---

#[test]
fn test_shallower_match_wins() {
    let dir = tree(&["b/c/target", "a/target"]);
    let found = search("target", dir.path(), &SearchOpts::default()).unwrap();
    assert_eq!(found, Some(dir.path().join("a").join("target")));
}

#[test]
fn test_match_in_root() {
    let dir = tree(&["target", "a/target"]);
    let found = search("target", dir.path(), &SearchOpts::default()).unwrap();
    assert_eq!(found, Some(dir.path().join("target")));
}

#[test]
fn test_deep_match_found() {
    let dir = tree(&["a/b/c/d/e/deep.txt", "x/y/other.txt"]);
    let found = search("deep.txt", dir.path(), &SearchOpts::default()).unwrap();
    assert_eq!(found, Some(dir.path().join("a/b/c/d/e/deep.txt")));
}

#[test]
fn test_breadth_before_depth_across_siblings() {
    // Depth 3 under "a" vs depth 2 under "z": sibling order must not matter.
    let dir = tree(&["a/b/c/target", "z/y/target"]);
    let found = search("target", dir.path(), &SearchOpts::default()).unwrap();
    assert_eq!(found, Some(dir.path().join("z/y/target")));
}

#[test]
fn test_directory_name_matches() {
    let dir = tree(&["a/wanted/inner.txt"]);
    let found = search("wanted", dir.path(), &SearchOpts::default()).unwrap();
    assert_eq!(found, Some(dir.path().join("a/wanted")));
}

#[test]
fn test_exact_name_only() {
    let dir = tree(&["a/target.txt.bak", "a/xtarget.txt"]);
    let found = search("target.txt", dir.path(), &SearchOpts::default()).unwrap();
    assert_eq!(found, None);
}

// --- not found / root errors ---

#[test]
fn test_not_found_is_not_an_error() {
    let dir = tree(&["a/one", "b/c/two"]);
    let stats = SearchStats::default();
    let found = find_in_tree(
        "missing.txt",
        dir.path(),
        &FsLister::default(),
        &SearchOpts::default(),
        &stats,
    )
    .unwrap();
    assert_eq!(found, None);
    // root, a, b, b/c
    assert_eq!(stats.dirs_visited(), 4);
    assert_eq!(stats.dirs_skipped(), 0);
}

#[test]
fn test_missing_root() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("does/not/exist");
    match search("anything", &root, &SearchOpts::default()) {
        Err(SearchError::RootNotFound(p)) => assert_eq!(p, root),
        other => panic!("expected RootNotFound, got {other:?}"),
    }
}

#[test]
fn test_root_is_a_file() {
    let dir = tree(&["plain.txt"]);
    let root = dir.path().join("plain.txt");
    assert!(matches!(
        search("plain.txt", &root, &SearchOpts::default()),
        Err(SearchError::RootNotFound(_))
    ));
}

#[test]
fn test_root_not_found_message_contains_path() {
    let err = SearchError::RootNotFound(PathBuf::from("/does/not/exist"));
    assert_eq!(
        err.wire_message(),
        "Specified root directory not found: /does/not/exist"
    );
}

#[test]
fn test_unreadable_root_is_io_failure() {
    let dir = tree(&["a/target"]);
    let lister = DenyingLister {
        denied: vec![dir.path().to_path_buf()],
    };
    let err = find_in_tree(
        "target",
        dir.path(),
        &lister,
        &SearchOpts::default(),
        &SearchStats::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SearchError::Io { .. }));
    assert_eq!(err.wire_message(), "Failed to read root directory");
}

#[test]
fn test_unreadable_subdirectory_is_skipped() {
    let dir = tree(&["a/target", "b/c/target"]);
    let lister = DenyingLister {
        denied: vec![dir.path().join("a")],
    };
    let stats = SearchStats::default();
    let found = find_in_tree("target", dir.path(), &lister, &SearchOpts::default(), &stats)
        .unwrap();
    assert_eq!(found, Some(dir.path().join("b/c/target")));
    assert_eq!(stats.dirs_skipped(), 1);
}

// --- options ---

#[test]
fn test_excluded_directory_not_descended() {
    let dir = tree(&["node_modules/target", "src/deeper/target"]);
    let opts = SearchOpts {
        exclude: vec!["node_*".to_string()],
        ..Default::default()
    };
    let found = search("target", dir.path(), &opts).unwrap();
    assert_eq!(found, Some(dir.path().join("src/deeper/target")));
}

#[test]
fn test_empty_root_uses_default_root() {
    let dir = tree(&["x/needle"]);
    let opts = SearchOpts {
        default_root: dir.path().to_path_buf(),
        ..Default::default()
    };
    let found = find_file(&SearchRequest::new("needle", ""), &opts).unwrap();
    assert_eq!(found, Some(dir.path().join("x/needle")));
}

#[cfg(unix)]
#[test]
fn test_symlinked_directory_not_followed_by_default() {
    let dir = tree(&["real/target"]);
    let outside = tree(&["linked_target"]);
    std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();

    let found = search("linked_target", dir.path(), &SearchOpts::default()).unwrap();
    assert_eq!(found, None);

    let opts = SearchOpts {
        follow_links: true,
        ..Default::default()
    };
    let found = search("linked_target", dir.path(), &opts).unwrap();
    assert_eq!(found, Some(dir.path().join("link/linked_target")));
}

// --- lister ---

#[test]
fn test_fs_lister_reports_children() {
    let dir = tree(&["a/inner", "file.txt"]);
    let mut items = FsLister::default().list(dir.path()).unwrap();
    items.sort_by(|x, y| x.name.cmp(&y.name));
    assert_eq!(
        items,
        vec![DirItem::new("a", true), DirItem::new("file.txt", false)]
    );
}

#[test]
fn test_fs_lister_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = FsLister::default().list(&dir.path().join("gone")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
