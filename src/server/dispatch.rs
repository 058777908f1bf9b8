//! Connection dispatch: poll for connections, one thread per connection, one request per connection.

use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::io::{ErrorKind, Read};
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use crate::engine::heartbeat::run_search_task;
use crate::engine::lister::{DirLister, FsLister};
use crate::engine::task::SearchTask;
use crate::error::FrameError;
use crate::protocol::{decode_request, read_frame};
use crate::utils::config::DefaultServer;
use crate::utils::fd_limit::cap_connections;
use crate::{SearchRequest, ServerOpts};

use super::sink::FrameSink;
use super::transport::{Connection, TcpTransport, Transport};

/// Totals reported when the loop exits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ServeSummary {
    pub accepted: usize,
}

/// Decrements the active-connection count when the handler thread ends, however it ends.
struct ActiveGuard(Arc<AtomicUsize>);

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Search server over any [`Transport`].
pub struct Server<T: Transport> {
    transport: T,
    opts: Arc<ServerOpts>,
    lister: Arc<dyn DirLister>,
    shutdown: Arc<AtomicBool>,
    active: Arc<AtomicUsize>,
}

impl Server<TcpTransport> {
    /// Bind `opts.listen_addr()` and search the real filesystem.
    pub fn bind(opts: ServerOpts) -> Result<Self> {
        let transport = TcpTransport::bind(&opts.listen_addr())?;
        let lister = Arc::new(FsLister::new(opts.search.follow_links));
        Ok(Self::with_transport(transport, opts, lister))
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.transport.local_addr()
    }
}

impl<T: Transport> Server<T> {
    pub fn with_transport(transport: T, opts: ServerOpts, lister: Arc<dyn DirLister>) -> Self {
        Self {
            transport,
            opts: Arc::new(opts),
            lister,
            shutdown: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Flag that stops [`Self::run`] once set (e.g. from a Ctrl+C handler).
    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::Acquire)
    }

    /// Accept until shutdown is requested, then wait for in-flight connections to finish.
    pub fn run(&self) -> Result<ServeSummary> {
        let max_connections = cap_connections(self.opts.max_connections);
        debug!("Serving up to {} connections at once", max_connections);

        let mut summary = ServeSummary::default();
        let mut handles: Vec<JoinHandle<()>> = Vec::new();

        while !self.shutdown.load(Ordering::Acquire) {
            handles.retain(|h| !h.is_finished());

            // At the limit: leave new connections in the listen backlog.
            if self.active.load(Ordering::Acquire) >= max_connections {
                thread::sleep(DefaultServer::ACCEPT_POLL_INTERVAL);
                continue;
            }

            match self.transport.poll_accept() {
                Ok(Some((conn, peer))) => {
                    summary.accepted += 1;
                    if let Some(h) = self.spawn_handler(conn, peer, summary.accepted) {
                        handles.push(h);
                    }
                }
                Ok(None) => thread::sleep(DefaultServer::ACCEPT_POLL_INTERVAL),
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::Interrupted | ErrorKind::ConnectionAborted
                    ) =>
                {
                    continue;
                }
                Err(e) => {
                    warn!("accept failed: {}", e);
                    thread::sleep(DefaultServer::ACCEPT_POLL_INTERVAL);
                }
            }
        }

        info!(
            "Shutting down; waiting for {} in-flight connections",
            handles.len()
        );
        for h in handles {
            if h.join().is_err() {
                error!("connection thread panicked");
            }
        }
        Ok(summary)
    }

    fn spawn_handler(&self, conn: T::Conn, peer: String, id: usize) -> Option<JoinHandle<()>> {
        self.active.fetch_add(1, Ordering::AcqRel);
        let guard = ActiveGuard(Arc::clone(&self.active));
        let opts = Arc::clone(&self.opts);
        let lister = Arc::clone(&self.lister);

        let spawned = thread::Builder::new()
            .name(format!("conn-{id}"))
            .spawn(move || {
                let _guard = guard;
                handle_connection(conn, &peer, &opts, lister.as_ref());
            })
            .context("spawn connection thread");
        match spawned {
            Ok(h) => Some(h),
            // The closure (connection and guard) is dropped with the error.
            Err(e) => {
                error!("{:#}", e);
                None
            }
        }
    }
}

/// Read and decode the single request frame of a connection. `Ok(None)`: peer closed first.
pub fn read_request<R: Read>(reader: &mut R) -> Result<Option<SearchRequest>, FrameError> {
    match read_frame(reader)? {
        Some(frame) => decode_request(&frame).map(Some),
        None => Ok(None),
    }
}

fn close_connection<C: Connection>(conn: C, peer: &str) {
    if let Err(e) = conn.close() {
        debug!("{}: close failed: {}", peer, e);
    }
}

/// Serve one connection: read one request, stream heartbeats and the result, close.
pub fn handle_connection<C: Connection>(
    mut conn: C,
    peer: &str,
    opts: &ServerOpts,
    lister: &dyn DirLister,
) {
    if let Err(e) = conn.set_timeouts(opts.read_timeout) {
        debug!("{}: could not set timeouts: {}", peer, e);
    }

    let request = match read_request(&mut conn) {
        Ok(Some(request)) => request,
        Ok(None) => {
            debug!("{}: closed before sending a complete request", peer);
            close_connection(conn, peer);
            return;
        }
        Err(e) => {
            warn!("{}: dropping connection: {}", peer, e);
            close_connection(conn, peer);
            return;
        }
    };
    info!(
        "{}: searching for '{}' under '{}'",
        peer,
        request.filename,
        if request.root_path.is_empty() {
            opts.search.default_root.to_string_lossy()
        } else {
            request.root_path.as_str().into()
        }
    );

    let task = SearchTask::new(request, FrameSink::new(conn));
    let outcome = run_search_task(&task, lister, &opts.search, opts.heartbeat_interval);
    let sink = task.into_sink();
    debug!(
        "{}: {} after {} heartbeats, {} directories, {} frames written (delivered: {})",
        peer,
        outcome.status,
        outcome.heartbeats,
        outcome.dirs_visited,
        sink.frames_written(),
        outcome.delivered
    );

    close_connection(sink.into_inner(), peer);
}
