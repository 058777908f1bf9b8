use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Find files by name on a remote machine.
#[derive(Clone, Parser)]
#[command(name = "fileseek")]
#[command(about = "Serve file-name searches over TCP, or ask a server to find a file.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output.
    #[arg(long, short = 'v', global = true, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Config file. Default: `.fileseek.toml` in the current directory, if present.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Subcommand)]
pub enum Commands {
    /// Listen for search requests until Ctrl+C.
    Serve(ServeArgs),
    /// Ask a server to find FILENAME under ROOT and wait for the result.
    Find(FindArgs),
}

#[derive(Clone, Args)]
pub struct ServeArgs {
    /// Address to bind. Default: 127.0.0.1.
    #[arg(long, short = 'b')]
    pub bind: Option<String>,

    /// Port to listen on. Default: 8080.
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Root searched when a request has an empty root path. Default: `/` (Windows: `C:\`).
    #[arg(long, short = 'r', value_name = "DIR")]
    pub default_root: Option<PathBuf>,

    /// Directories to skip (glob syntax). Can specify multiple: -e proc sys 'node_*'
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Follow symbolic links to directories (no loop protection).
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Maximum connections served at once (capped by the open-file limit).
    #[arg(long, short = 'm')]
    pub max_connections: Option<usize>,
}

#[derive(Clone, Args)]
pub struct FindArgs {
    /// File name to look for (exact match).
    #[arg(value_name = "FILENAME")]
    pub filename: String,

    /// Root directory on the server. Default: the server's default root.
    #[arg(value_name = "ROOT", default_value = "")]
    pub root: String,

    /// Server address. Default: 127.0.0.1.
    #[arg(long, short = 'H')]
    pub host: Option<String>,

    /// Server port. Default: 8080.
    #[arg(long, short = 'p')]
    pub port: Option<u16>,
}
