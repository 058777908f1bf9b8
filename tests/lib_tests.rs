use clap::Parser;
use fileseek::engine::handlers::server_opts;
use fileseek::engine::{Cli, Commands, glob_match, path_payload, resolve_root, should_descend};
use fileseek::utils::{apply_file_to_opts, file_verbose, load_fileseek_toml, parse_fileseek_toml};
use fileseek::{SearchOpts, ServerOpts};
use std::path::{Path, PathBuf};
use std::time::Duration;

// --- glob_match ---

#[test]
fn test_glob_star_and_question() {
    assert!(glob_match("node_*", "node_modules"));
    assert!(glob_match("*.git", ".git"));
    assert!(glob_match("?ar", "bar"));
    assert!(!glob_match("?ar", "ar"));
    assert!(glob_match("*", ""));
    assert!(!glob_match("proc", "procfs"));
}

#[test]
fn test_glob_leading_bang_ignored() {
    assert!(glob_match("!tmp", "tmp"));
}

// --- should_descend ---

#[test]
fn test_should_descend_without_excludes() {
    assert!(should_descend(Path::new("/a/node_modules"), &[]));
}

#[test]
fn test_should_descend_matches_name_or_full_path() {
    let exclude = vec!["node_*".to_string(), "/proc".to_string()];
    assert!(!should_descend(Path::new("/src/node_modules"), &exclude));
    assert!(!should_descend(Path::new("/proc"), &exclude));
    assert!(should_descend(Path::new("/home/proc_notes"), &exclude));
}

// --- resolve_root / path_payload ---

#[test]
fn test_resolve_root_empty_uses_default() {
    let opts = SearchOpts {
        default_root: PathBuf::from("/srv/data"),
        ..Default::default()
    };
    assert_eq!(resolve_root("", &opts), PathBuf::from("/srv/data"));
    assert_eq!(resolve_root("/home", &opts), PathBuf::from("/home"));
}

#[cfg(not(windows))]
#[test]
fn test_default_root_is_filesystem_root() {
    assert_eq!(SearchOpts::default().default_root, PathBuf::from("/"));
}

#[test]
fn test_path_payload() {
    assert_eq!(path_payload(Path::new("/a/b/c.txt")), "/a/b/c.txt");
}

// --- defaults ---

#[test]
fn test_server_defaults() {
    let opts = ServerOpts::default();
    assert_eq!(opts.listen_addr(), "127.0.0.1:8080");
    assert_eq!(opts.heartbeat_interval, Duration::from_millis(500));
    assert!(!opts.search.follow_links);
    assert!(opts.search.exclude.is_empty());
}

// --- config file ---

#[test]
fn test_parse_and_apply_config() {
    let file = parse_fileseek_toml(
        r#"
[server]
bind = "0.0.0.0"
port = 9000
default_root = "/data"
exclude = ["proc", "sys"]
follow_links = true
max_connections = 8
read_timeout_secs = 0
verbose = true

[client]
host = "files.local"
port = 9001
"#,
    )
    .unwrap();

    let mut opts = ServerOpts::default();
    apply_file_to_opts(&file, &mut opts);
    assert_eq!(opts.listen_addr(), "0.0.0.0:9000");
    assert_eq!(opts.search.default_root, PathBuf::from("/data"));
    assert_eq!(opts.search.exclude, vec!["proc", "sys"]);
    assert!(opts.search.follow_links);
    assert_eq!(opts.max_connections, 8);
    assert_eq!(opts.read_timeout, None);
    assert!(opts.verbose);
    assert_eq!(file_verbose(&file), Some(true));
    assert_eq!(file.client().host.as_deref(), Some("files.local"));
    assert_eq!(file.client().port, Some(9001));
}

#[test]
fn test_partial_config_keeps_defaults() {
    let file = parse_fileseek_toml("[server]\nport = 7000\n").unwrap();
    let mut opts = ServerOpts::default();
    apply_file_to_opts(&file, &mut opts);
    assert_eq!(opts.listen_addr(), "127.0.0.1:7000");
    assert_eq!(opts.read_timeout, ServerOpts::default().read_timeout);
    assert_eq!(file_verbose(&file), None);
}

#[test]
fn test_malformed_config_is_error() {
    assert!(parse_fileseek_toml("[server]\nport = \"eighty\"\n").is_err());
}

#[test]
fn test_missing_default_config_is_none() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_fileseek_toml(None, dir.path()).unwrap().is_none());
}

#[test]
fn test_missing_explicit_config_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.toml");
    assert!(load_fileseek_toml(Some(&path), dir.path()).is_err());
}

#[test]
fn test_default_config_file_is_loaded() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".fileseek.toml"), "[server]\nport = 6000\n").unwrap();
    let file = load_fileseek_toml(None, dir.path()).unwrap().unwrap();
    let mut opts = ServerOpts::default();
    apply_file_to_opts(&file, &mut opts);
    assert_eq!(opts.port, 6000);
}

// --- CLI overlay ---

#[test]
fn test_cli_flags_override_config_file() {
    let file = parse_fileseek_toml("[server]\nport = 9000\nbind = \"0.0.0.0\"\n").unwrap();
    let cli = Cli::parse_from(["fileseek", "serve", "--port", "9100", "-e", "proc", "sys"]);
    let Commands::Serve(ref args) = cli.command else {
        panic!("expected serve");
    };
    let opts = server_opts(&cli, args, Some(&file));
    assert_eq!(opts.listen_addr(), "0.0.0.0:9100");
    assert_eq!(opts.search.exclude, vec!["proc", "sys"]);
}

#[test]
fn test_find_root_defaults_to_empty() {
    let cli = Cli::parse_from(["fileseek", "find", "server.cpp"]);
    let Commands::Find(ref args) = cli.command else {
        panic!("expected find");
    };
    assert_eq!(args.filename, "server.cpp");
    assert_eq!(args.root, "");
    assert_eq!(args.port, None);
}
