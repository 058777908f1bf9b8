//! Request/response frame encoding with explicit, bounds-checked field extraction.
//!
//! Request:  `total_len:u32 | filename_len:u32 | filename | root_path_len:u32 | root_path`
//! Response: `total_len:u32 | status:u16 | payload_len:u32 | payload`
//!
//! All integers are big-endian; `total_len` counts every byte after itself.

use crate::error::FrameError;
use crate::utils::config::{LEN_PREFIX, MAX_FRAME_LEN};
use crate::{SearchRequest, SearchResponse, Status};

type Result<T> = std::result::Result<T, FrameError>;

/// Sequential reader over one frame body. Every read checks the remaining length first.
struct FieldReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> FieldReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        let remaining = self.buf.len() - self.pos;
        if n > remaining {
            return Err(FrameError::malformed(format!(
                "{what}: needs {n} bytes, {remaining} left in frame"
            )));
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    fn u16(&mut self, what: &str) -> Result<u16> {
        let b = self.take(2, what)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self, what: &str) -> Result<u32> {
        let b = self.take(4, what)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Length-prefixed UTF-8 string.
    fn string(&mut self, what: &str) -> Result<String> {
        let len = self.u32(what)? as usize;
        let bytes = self.take(len, what)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| FrameError::malformed(format!("{what}: not valid UTF-8")))
    }

    /// Every byte inside the declared frame must belong to a field.
    fn finish(self) -> Result<()> {
        let left = self.buf.len() - self.pos;
        if left != 0 {
            return Err(FrameError::malformed(format!(
                "{left} trailing bytes inside frame"
            )));
        }
        Ok(())
    }
}

/// Declared body length from the 4-byte prefix, or `None` if fewer than 4 bytes are present.
pub fn declared_len(buf: &[u8]) -> Option<usize> {
    let prefix: [u8; LEN_PREFIX] = buf.get(..LEN_PREFIX)?.try_into().ok()?;
    Some(u32::from_be_bytes(prefix) as usize)
}

/// Body of the frame at the start of `buf`. Bytes after the declared frame are ignored.
fn frame_body(buf: &[u8]) -> Result<&[u8]> {
    let total = declared_len(buf).ok_or_else(|| {
        FrameError::malformed(format!("buffer of {} bytes has no length prefix", buf.len()))
    })?;
    let available = buf.len() - LEN_PREFIX;
    if total > available {
        return Err(FrameError::malformed(format!(
            "declared length {total} exceeds {available} available bytes"
        )));
    }
    Ok(&buf[LEN_PREFIX..LEN_PREFIX + total])
}

fn put_u32(out: &mut Vec<u8>, v: usize) -> Result<()> {
    let v = u32::try_from(v)
        .map_err(|_| FrameError::malformed(format!("length {v} does not fit in u32")))?;
    out.extend_from_slice(&v.to_be_bytes());
    Ok(())
}

fn put_str(out: &mut Vec<u8>, s: &str) -> Result<()> {
    put_u32(out, s.len())?;
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Prefix `body` with its length. Frames above [`MAX_FRAME_LEN`] are refused so a peer never has to reject them.
fn seal(body: Vec<u8>) -> Result<Vec<u8>> {
    if body.len() > MAX_FRAME_LEN {
        return Err(FrameError::malformed(format!(
            "frame body of {} bytes exceeds limit of {MAX_FRAME_LEN}",
            body.len()
        )));
    }
    let mut out = Vec::with_capacity(LEN_PREFIX + body.len());
    put_u32(&mut out, body.len())?;
    out.extend_from_slice(&body);
    Ok(out)
}

pub fn encode_request(req: &SearchRequest) -> Result<Vec<u8>> {
    let mut body = Vec::with_capacity(2 * LEN_PREFIX + req.filename.len() + req.root_path.len());
    put_str(&mut body, &req.filename)?;
    put_str(&mut body, &req.root_path)?;
    seal(body)
}

/// Decode a request frame. An empty filename is rejected: such a frame cannot name a search.
pub fn decode_request(buf: &[u8]) -> Result<SearchRequest> {
    let mut r = FieldReader::new(frame_body(buf)?);
    let filename = r.string("filename")?;
    let root_path = r.string("root_path")?;
    r.finish()?;
    if filename.is_empty() {
        return Err(FrameError::malformed("empty filename"));
    }
    Ok(SearchRequest {
        filename,
        root_path,
    })
}

pub fn encode_response(resp: &SearchResponse) -> Result<Vec<u8>> {
    let mut body = Vec::with_capacity(2 + LEN_PREFIX + resp.payload.len());
    body.extend_from_slice(&resp.status.code().to_be_bytes());
    put_str(&mut body, &resp.payload)?;
    seal(body)
}

pub fn decode_response(buf: &[u8]) -> Result<SearchResponse> {
    let mut r = FieldReader::new(frame_body(buf)?);
    let code = r.u16("status")?;
    let status = Status::from_code(code)
        .ok_or_else(|| FrameError::malformed(format!("unknown status code {code}")))?;
    let payload = r.string("payload")?;
    r.finish()?;
    Ok(SearchResponse { status, payload })
}
