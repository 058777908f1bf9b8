//! Load `.fileseek.toml` (CLI only). Lib callers build [`ServerOpts`] themselves.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::ServerOpts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Default, Deserialize)]
pub struct FileseekToml {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    client: ClientSection,
}

#[derive(Debug, Default, Deserialize)]
struct ServerSection {
    bind: Option<String>,
    port: Option<u16>,
    default_root: Option<String>,
    exclude: Option<Vec<String>>,
    follow_links: Option<bool>,
    max_connections: Option<usize>,
    read_timeout_secs: Option<u64>,
    verbose: Option<bool>,
}

/// Where `fileseek find` connects when no flag is given.
#[derive(Debug, Default, Deserialize)]
pub struct ClientSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl FileseekToml {
    pub fn client(&self) -> &ClientSection {
        &self.client
    }
}

/// Parse config text. Unknown keys are ignored.
pub fn parse_fileseek_toml(s: &str) -> Result<FileseekToml> {
    toml::from_str(s).context("parse fileseek config")
}

/// Load the config from `explicit` (must exist) or from `.fileseek.toml` in `dir` (optional).
/// Runs before logging is set up, so a malformed file is returned as an error rather than logged.
pub fn load_fileseek_toml(explicit: Option<&Path>, dir: &Path) -> Result<Option<FileseekToml>> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let p = dir.join(PackagePaths::get().config_filename());
            if !p.is_file() {
                return Ok(None);
            }
            p
        }
    };
    let s = std::fs::read_to_string(&path)
        .with_context(|| format!("read config {}", path.display()))?;
    parse_fileseek_toml(&s)
        .with_context(|| format!("config {}", path.display()))
        .map(Some)
}

/// `verbose` from the file, if set. Needed before logging is initialized.
pub fn file_verbose(file: &FileseekToml) -> Option<bool> {
    file.server.verbose
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $($opts_field:ident).+) => {
        if let Some(v) = $sec.$sec_field.clone() {
            $opts.$($opts_field).+ = v;
        }
    };
}

/// Apply file config to opts (only set fields present in the file). Call before applying CLI flags.
pub fn apply_file_to_opts(file: &FileseekToml, opts: &mut ServerOpts) {
    let sec = &file.server;
    apply_file_opt!(sec, opts, bind => bind);
    apply_file_opt!(sec, opts, port => port);
    if let Some(ref root) = sec.default_root {
        opts.search.default_root = PathBuf::from(root);
    }
    apply_file_opt!(sec, opts, exclude => search.exclude);
    apply_file_opt!(sec, opts, follow_links => search.follow_links);
    apply_file_opt!(sec, opts, max_connections => max_connections);
    if let Some(secs) = sec.read_timeout_secs {
        opts.read_timeout = (secs > 0).then(|| Duration::from_secs(secs));
    }
    apply_file_opt!(sec, opts, verbose => verbose);
}
