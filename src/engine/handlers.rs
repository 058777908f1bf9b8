//! CLI command handlers: `serve` runs the dispatch loop, `find` runs one client search.

use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::process::ExitCode;
use std::sync::atomic::Ordering;

use crate::engine::arg_parser::{Cli, Commands, FindArgs, ServeArgs};
use crate::engine::progress::{clear_bar, create_counter, heartbeat_callback};
use crate::server::Server;
use crate::utils::config::DefaultServer;
use crate::utils::{FileseekToml, apply_file_to_opts, file_verbose, load_fileseek_toml, setup_logging};
use crate::{SearchRequest, ServerOpts, Status, client};

/// Exit codes of `find`.
pub struct FindExit;

impl FindExit {
    pub const FOUND: u8 = 0;
    pub const NOT_FOUND: u8 = 1;
    pub const ERROR: u8 = 2;
}

/// Config file (if any) → defaults overlaid → CLI flags overlaid.
pub fn server_opts(cli: &Cli, args: &ServeArgs, file: Option<&FileseekToml>) -> ServerOpts {
    let mut opts = ServerOpts::default();
    if let Some(file) = file {
        apply_file_to_opts(file, &mut opts);
    }
    if let Some(ref bind) = args.bind {
        opts.bind = bind.clone();
    }
    if let Some(port) = args.port {
        opts.port = port;
    }
    if let Some(ref root) = args.default_root {
        opts.search.default_root = root.clone();
    }
    if !args.exclude.is_empty() {
        opts.search.exclude = args.exclude.clone();
    }
    if let Some(follow) = args.follow_links {
        opts.search.follow_links = follow;
    }
    if let Some(max) = args.max_connections {
        opts.max_connections = max;
    }
    if let Some(verbose) = cli.verbose {
        opts.verbose = verbose;
    }
    opts
}

/// Dispatch to `serve` or `find`.
pub fn handle_run(cli: &Cli) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("current directory")?;
    let file = load_fileseek_toml(cli.config.as_deref(), &cwd)?;
    let verbose = cli
        .verbose
        .or_else(|| file.as_ref().and_then(file_verbose))
        .unwrap_or(false);
    setup_logging(verbose);

    match &cli.command {
        Commands::Serve(args) => {
            let opts = server_opts(cli, args, file.as_ref());
            handle_serve(opts)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Find(args) => handle_find(args, file.as_ref(), verbose),
    }
}

/// Bind and serve until Ctrl+C.
pub fn handle_serve(opts: ServerOpts) -> Result<()> {
    let config_str = format!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    debug!("{}", config_str);

    let server = Server::bind(opts)?;
    let shutdown = server.shutdown_handle();
    ctrlc::set_handler(move || {
        shutdown.store(true, Ordering::Release);
    })
    .context("set Ctrl+C handler")?;

    info!("Listening on {}", server.local_addr()?);
    let summary = server.run()?;
    info!("Served {} connections", summary.accepted);
    Ok(())
}

/// Run one search against a server and print the result.
pub fn handle_find(args: &FindArgs, file: Option<&FileseekToml>, verbose: bool) -> Result<ExitCode> {
    let client_cfg = file.map(|f| f.client());
    let host = args
        .host
        .clone()
        .or_else(|| client_cfg.and_then(|c| c.host.clone()))
        .unwrap_or_else(|| DefaultServer::ADDRESS.to_string());
    let port = args
        .port
        .or_else(|| client_cfg.and_then(|c| c.port))
        .unwrap_or(DefaultServer::PORT);
    let addr = format!("{host}:{port}");

    if args.filename.is_empty() {
        warn!("Filename cannot be empty");
        return Ok(ExitCode::from(FindExit::ERROR));
    }
    let request = SearchRequest::new(args.filename.clone(), args.root.clone());

    let bar = verbose.then(|| create_counter("Searching"));
    let result = client::search(
        &addr,
        &request,
        Some(DefaultServer::READ_TIMEOUT),
        heartbeat_callback(bar.clone()),
    );
    if let Some(bar) = bar.as_ref() {
        clear_bar(bar);
    }

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            error!("{:#}", e);
            return Ok(ExitCode::from(FindExit::ERROR));
        }
    };
    match response.status {
        Status::Ok if response.is_not_found() => {
            println!("File not found.");
            Ok(ExitCode::from(FindExit::NOT_FOUND))
        }
        Status::Ok => {
            println!("File found: {}", response.payload);
            Ok(ExitCode::from(FindExit::FOUND))
        }
        _ => {
            eprintln!("{}", response.payload);
            Ok(ExitCode::from(FindExit::ERROR))
        }
    }
}
