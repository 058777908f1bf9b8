//! Engine module: search, heartbeat coordination, CLI plumbing

pub mod arg_parser;
pub mod handlers;
pub mod heartbeat;
pub mod lister;
pub mod progress;
pub mod search;
pub mod task;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::{Cli, Commands, FindArgs, ServeArgs};
pub use handlers::handle_run;
pub use heartbeat::{run_search_task, run_task, terminal_response};
pub use lister::{DirItem, DirLister, FsLister};
pub use search::find_in_tree;
pub use task::{ResponseSink, SearchTask, TaskOutcome};
pub use tools::{glob_match, path_payload, resolve_root, should_descend};
