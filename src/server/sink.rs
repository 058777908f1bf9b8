use std::io::{self, Write};

use crate::SearchResponse;
use crate::engine::task::ResponseSink;
use crate::protocol::{encode_response, write_frame};

/// Sink that encodes each response as one frame and writes it to the connection.
pub struct FrameSink<W> {
    writer: W,
    frames_written: usize,
}

impl<W: Write> FrameSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            frames_written: 0,
        }
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> ResponseSink for FrameSink<W> {
    fn send(&mut self, response: &SearchResponse) -> io::Result<()> {
        let frame = encode_response(response).map_err(io::Error::other)?;
        write_frame(&mut self.writer, &frame)?;
        self.frames_written += 1;
        Ok(())
    }
}
