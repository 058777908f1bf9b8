pub mod config;
pub mod fd_limit;
pub mod fileseek_toml;
pub mod logger;

pub use config::*;
pub use fd_limit::{FDS_PER_CONNECTION, cap_connections, max_connections_by_fd_limit, max_open_fds};
pub use fileseek_toml::{
    FileseekToml, apply_file_to_opts, file_verbose, load_fileseek_toml, parse_fileseek_toml,
};
pub use logger::setup_logging;
