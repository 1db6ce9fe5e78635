//! Length-prefixed framing: a 10-byte ASCII decimal length, left-justified and
//! space-padded, followed by exactly that many bytes of UTF-8.

use std::io::{self, Read, Write};
use thiserror::Error;

pub const HEADER_LEN: usize = 10;
pub const MAX_PAYLOAD_LEN: usize = 16 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("peer closed mid-frame after {got} of {expected} bytes")]
    Truncated { expected: usize, got: usize },
    #[error("malformed length header {0:?}")]
    BadHeader(String),
    #[error("declared payload of {0} bytes exceeds the limit")]
    TooLarge(usize),
    #[error("payload is not valid UTF-8")]
    NotUtf8,
}

/// Reads one frame. `Ok(None)` means the peer closed cleanly between frames.
pub fn read_frame<R: Read>(r: &mut R) -> Result<Option<String>, FrameError> {
    let mut header = [0u8; HEADER_LEN];
    let mut filled = 0;
    while filled < HEADER_LEN {
        match r.read(&mut header[filled..]) {
            Ok(0) if filled == 0 => return Ok(None),
            Ok(0) => {
                return Err(FrameError::Truncated {
                    expected: HEADER_LEN,
                    got: filled,
                })
            }
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    let len = parse_header(&header)?;
    let mut body = Vec::with_capacity(len.min(64 * 1024));
    r.take(len as u64).read_to_end(&mut body)?;
    if body.len() < len {
        return Err(FrameError::Truncated {
            expected: len,
            got: body.len(),
        });
    }
    String::from_utf8(body)
        .map(Some)
        .map_err(|_| FrameError::NotUtf8)
}

fn parse_header(header: &[u8; HEADER_LEN]) -> Result<usize, FrameError> {
    let text = std::str::from_utf8(header)
        .map_err(|_| FrameError::BadHeader(String::from_utf8_lossy(header).into_owned()))?;
    let len = text
        .trim()
        .parse::<usize>()
        .map_err(|_| FrameError::BadHeader(text.to_string()))?;
    if len > MAX_PAYLOAD_LEN {
        return Err(FrameError::TooLarge(len));
    }
    Ok(len)
}

pub fn write_frame<W: Write>(w: &mut W, payload: &str) -> io::Result<()> {
    let bytes = payload.as_bytes();
    let mut out = Vec::with_capacity(HEADER_LEN + bytes.len());
    out.extend_from_slice(format!("{:<width$}", bytes.len(), width = HEADER_LEN).as_bytes());
    out.extend_from_slice(bytes);
    w.write_all(&out)?;
    w.flush()
}
