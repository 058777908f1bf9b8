//! Transport seam: the dispatch loop only needs non-blocking accept and blocking byte streams.

use anyhow::{Context, Result};
use std::io::{self, ErrorKind, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::time::Duration;

/// One accepted byte stream.
pub trait Connection: Read + Write + Send + 'static {
    /// Apply read and write timeouts. `None` blocks forever.
    fn set_timeouts(&self, timeout: Option<Duration>) -> io::Result<()>;

    /// Shut the stream down in both directions. The handle is released when dropped.
    fn close(&self) -> io::Result<()>;
}

/// Source of connections.
pub trait Transport: Send {
    type Conn: Connection;

    /// Accept one ready connection without blocking. `Ok(None)` when nothing is pending.
    fn poll_accept(&self) -> io::Result<Option<(Self::Conn, String)>>;
}

impl Connection for TcpStream {
    fn set_timeouts(&self, timeout: Option<Duration>) -> io::Result<()> {
        self.set_read_timeout(timeout)?;
        self.set_write_timeout(timeout)
    }

    fn close(&self) -> io::Result<()> {
        match self.shutdown(Shutdown::Both) {
            // Peer already gone.
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }
}

/// TCP listener in non-blocking mode.
pub struct TcpTransport {
    listener: TcpListener,
}

impl TcpTransport {
    pub fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr).with_context(|| format!("bind {addr}"))?;
        listener
            .set_nonblocking(true)
            .context("set listener non-blocking")?;
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().context("listener address")
    }
}

impl Transport for TcpTransport {
    type Conn = TcpStream;

    fn poll_accept(&self) -> io::Result<Option<(TcpStream, String)>> {
        match self.listener.accept() {
            Ok((stream, peer)) => {
                // Accepted sockets inherit non-blocking mode on some platforms; handlers expect blocking I/O.
                stream.set_nonblocking(false)?;
                Ok(Some((stream, peer.to_string())))
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }
}
