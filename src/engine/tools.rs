//! Path and filter utilities

use std::path::{Path, PathBuf};

use crate::SearchOpts;

/// Root to search for a request: the request's root, or the configured default when empty.
pub fn resolve_root(root_path: &str, opts: &SearchOpts) -> PathBuf {
    if root_path.is_empty() {
        opts.default_root.clone()
    } else {
        PathBuf::from(root_path)
    }
}

/// Render a path for the wire. Payloads are text, so non-UTF-8 bytes are replaced.
pub fn path_payload(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// True if the directory at `path` should be queued for traversal.
pub fn should_descend(path: &Path, exclude_patterns: &[String]) -> bool {
    if exclude_patterns.is_empty() {
        return true;
    }
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return true,
    };
    let path_str = path.to_str().unwrap_or("");
    !exclude_patterns
        .iter()
        .any(|pattern| glob_match(pattern, name) || glob_match(pattern, path_str))
}

/// Simple glob pattern matching (supports `*` and `?`). A leading `!` is ignored.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.strip_prefix('!').unwrap_or(pattern).chars().collect();
    let text: Vec<char> = text.chars().collect();

    // Greedy match with backtracking to the most recent '*'.
    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                star = Some((p, t));
                p += 1;
            }
            Some(&c) if c == '?' || c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match star {
                Some((sp, st)) => {
                    p = sp + 1;
                    t = st + 1;
                    star = Some((sp, st + 1));
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|&c| c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_backtracks() {
        assert!(glob_match("a*b*c", "axxbyyc"));
        assert!(!glob_match("a*b*c", "axxbyy"));
    }
}
