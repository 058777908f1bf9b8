//! Server side: transport seam, frame sink, connection dispatch loop.

pub mod dispatch;
pub mod sink;
pub mod transport;

pub use dispatch::{ServeSummary, Server, handle_connection, read_request};
pub use sink::FrameSink;
pub use transport::{Connection, TcpTransport, Transport};
