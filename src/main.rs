//! fileseek CLI: `serve` answers file-name searches over TCP; `find` asks a server for one.

use anyhow::Result;
use clap::Parser;
use fileseek::engine::arg_parser::Cli;
use fileseek::engine::handle_run;
use std::process::ExitCode;
use std::time::Instant;

fn main() -> Result<ExitCode> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    let code = handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(code)
}
