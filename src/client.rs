//! Client side: send one request, follow heartbeats, return the terminal response.

use anyhow::{Context, Result, bail};
use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::Duration;

use crate::protocol::{decode_response, encode_request, read_frame, write_frame};
use crate::{SearchRequest, SearchResponse};

/// Send `request` over an already-connected stream and read frames until the terminal one.
/// `on_progress` sees every `Pending` response in arrival order.
pub fn search_over<S, F>(stream: &mut S, request: &SearchRequest, mut on_progress: F) -> Result<SearchResponse>
where
    S: Read + Write,
    F: FnMut(&SearchResponse),
{
    let frame = encode_request(request).context("encode request")?;
    write_frame(stream, &frame).context("send request")?;

    loop {
        let Some(frame) = read_frame(stream).context("read response")? else {
            bail!("server closed the connection before sending a result");
        };
        let response = decode_response(&frame).context("decode response")?;
        if response.status.is_terminal() {
            return Ok(response);
        }
        on_progress(&response);
    }
}

/// Connect to `addr` (`host:port`) and run one search. `timeout` bounds each read and write, not the whole search.
pub fn search<F>(
    addr: &str,
    request: &SearchRequest,
    timeout: Option<Duration>,
    on_progress: F,
) -> Result<SearchResponse>
where
    F: FnMut(&SearchResponse),
{
    let mut stream = TcpStream::connect(addr).with_context(|| format!("connect to {addr}"))?;
    stream.set_read_timeout(timeout).context("set read timeout")?;
    stream.set_write_timeout(timeout).context("set write timeout")?;
    log::debug!("connected to {}", addr);
    search_over(&mut stream, request, on_progress)
}
