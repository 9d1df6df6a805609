//! Owned input buffer backing every slice the key table hands out.

use crate::error::CssError;
use crate::types::MAX_OFFSET;
use std::io::Read;

/// Largest payload this buffer will hold: one byte short of 1 MiB, so
/// the 20-bit offset field can address every byte including one past
/// the end (for the NUL lookahead sentinel).
pub const MAX_LEN: usize = MAX_OFFSET - 1;

const READ_CHUNK: usize = 8 * 1024;

/// An owned, length-prefixed byte buffer holding raw source text.
///
/// `payload()` always returns exactly `len()` bytes; one further NUL
/// byte is kept past the end so scanners doing a one-byte lookahead
/// never need a bounds check on the last token.
#[derive(Debug)]
pub struct CssString {
    capacity: usize,
    len: usize,
    bytes: Vec<u8>,
}

impl CssString {
    /// Copies `data` into a new buffer. Fails if `data.len() >= 2^20`.
    pub fn new_from_bytes(data: &[u8]) -> Result<Self, CssError> {
        if data.len() > MAX_LEN {
            return Err(CssError::InputTooLarge { len: data.len(), max: MAX_LEN });
        }
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(data.len() + 1)
            .map_err(|_| CssError::OutOfMemory)?;
        bytes.extend_from_slice(data);
        bytes.push(0);
        Ok(Self { capacity: data.len(), len: data.len(), bytes })
    }

    /// Drains `reader` to end-of-input in fixed-size chunks, rejecting
    /// the stream as soon as it would exceed the size cap rather than
    /// buffering an unbounded amount of data first.
    pub fn new_from_stream<R: Read>(mut reader: R) -> Result<Self, CssError> {
        let mut data = Vec::new();
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            let n = reader.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            if data.len() + n > MAX_LEN {
                return Err(CssError::InputTooLarge { len: data.len() + n, max: MAX_LEN });
            }
            data.try_reserve(n).map_err(|_| CssError::OutOfMemory)?;
            data.extend_from_slice(&chunk[..n]);
        }
        Self::new_from_bytes(&data)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The `[0, len)` payload bytes, never including the trailing NUL.
    pub fn payload(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}
