//! Frame assembly over byte streams: buffer across short reads until a whole frame is present.

use std::io::{ErrorKind, Read, Write};

use crate::error::FrameError;
use crate::utils::config::{LEN_PREFIX, MAX_FRAME_LEN, READ_CHUNK_SIZE};

use super::codec::declared_len;

/// Read into `buf[filled..]` until it is full. Returns the new fill level; stops early only on EOF.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8], mut filled: usize) -> std::io::Result<usize> {
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// Read exactly one frame (length prefix included) from `reader`.
///
/// Returns `Ok(None)` when the peer closes before a complete frame arrived, including a clean
/// close with zero bytes. Never reads past the end of the frame, so consecutive calls on the
/// same stream return consecutive frames.
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Option<Vec<u8>>, FrameError> {
    let mut frame = vec![0u8; LEN_PREFIX];
    let got = fill(reader, &mut frame, 0)?;
    if got < LEN_PREFIX {
        if got > 0 {
            log::debug!("peer closed after {} bytes of length prefix", got);
        }
        return Ok(None);
    }

    let total = declared_len(&frame).unwrap_or_default();
    if total > MAX_FRAME_LEN {
        return Err(FrameError::malformed(format!(
            "declared length {total} exceeds limit of {MAX_FRAME_LEN}"
        )));
    }

    // Grow in chunks so a lying length prefix cannot make us allocate the whole limit up front.
    let end = LEN_PREFIX + total;
    let mut filled = LEN_PREFIX;
    while filled < end {
        let next = (filled + READ_CHUNK_SIZE).min(end);
        frame.resize(next, 0);
        let now = fill(reader, &mut frame, filled)?;
        if now < next {
            log::debug!("peer closed after {} of {} frame bytes", now, end);
            return Ok(None);
        }
        filled = now;
    }
    Ok(Some(frame))
}

/// Write one encoded frame and flush it.
pub fn write_frame<W: Write>(writer: &mut W, frame: &[u8]) -> std::io::Result<()> {
    writer.write_all(frame)?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn empty_stream_is_clean_close() {
        let mut r = Cursor::new(Vec::<u8>::new());
        assert!(read_frame(&mut r).unwrap().is_none());
    }

    #[test]
    fn zero_length_frame() {
        let mut r = Cursor::new(vec![0, 0, 0, 0]);
        assert_eq!(read_frame(&mut r).unwrap(), Some(vec![0, 0, 0, 0]));
    }
}
