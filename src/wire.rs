//! Length-prefixed wire framing.
//!
//! A frame is a big-endian `u32` length prefix followed by that many payload
//! bytes. Envelope discriminators are written as raw tag bytes ahead of the
//! frames they introduce. Counters travel as frames of exactly four bytes.

use alloc::vec::Vec;

use thiserror::Error;

// CONSTANTS
// ================================================================================================

/// Number of bytes in a frame length prefix.
pub const LEN_PREFIX_SIZE: usize = 4;

// ERROR TYPE
// ================================================================================================

/// Errors produced while reading or writing frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WireError {
    /// The input ended before a tag, length prefix, or counter was complete.
    #[error("input truncated mid-frame")]
    Truncated,
    /// A length prefix declared more bytes than remain in the input.
    #[error("frame length exceeds remaining input")]
    Oversized,
    /// A payload is too long for its length to fit in the prefix.
    #[error("frame payload exceeds the encodable length")]
    TooLong,
}

// FRAME WRITER
// ================================================================================================

/// Serializes tag bytes and length-prefixed frames into a growable buffer.
#[derive(Debug, Default)]
pub struct FrameWriter {
    buf: Vec<u8>,
}

impl FrameWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates an empty writer with space reserved for `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: Vec::with_capacity(capacity) }
    }

    /// Appends a raw tag byte without a length prefix.
    pub fn write_tag(&mut self, tag: u8) {
        self.buf.push(tag);
    }

    /// Appends a length-prefixed frame.
    pub fn write_frame(&mut self, data: &[u8]) -> Result<(), WireError> {
        write_frame_into(&mut self.buf, data)
    }

    /// Appends a `u32` value as a frame of exactly four bytes.
    pub fn write_u32(&mut self, value: u32) -> Result<(), WireError> {
        self.write_frame(&value.to_be_bytes())
    }

    /// Consumes the writer and returns the serialized bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Appends a length-prefixed frame to an existing buffer.
///
/// Exposed separately so callers can frame into buffers with their own
/// lifecycle, e.g. ones that are zeroized on drop.
pub fn write_frame_into(buf: &mut Vec<u8>, data: &[u8]) -> Result<(), WireError> {
    let len = u32::try_from(data.len()).map_err(|_| WireError::TooLong)?;
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(data);
    Ok(())
}

// FRAME READER
// ================================================================================================

/// Reads tag bytes and length-prefixed frames from a byte slice without
/// copying.
#[derive(Debug)]
pub struct FrameReader<'a> {
    buf: &'a [u8],
}

impl<'a> FrameReader<'a> {
    /// Creates a reader over `buf`.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Reads a raw tag byte.
    pub fn read_tag(&mut self) -> Result<u8, WireError> {
        let (&tag, rest) = self.buf.split_first().ok_or(WireError::Truncated)?;
        self.buf = rest;
        Ok(tag)
    }

    /// Reads the next length-prefixed frame.
    pub fn next_frame(&mut self) -> Result<&'a [u8], WireError> {
        if self.buf.len() < LEN_PREFIX_SIZE {
            return Err(WireError::Truncated);
        }
        let (prefix, rest) = self.buf.split_at(LEN_PREFIX_SIZE);
        let prefix: [u8; LEN_PREFIX_SIZE] =
            prefix.try_into().expect("prefix is exactly LEN_PREFIX_SIZE bytes");
        let len = u32::from_be_bytes(prefix) as usize;
        if len > rest.len() {
            return Err(WireError::Oversized);
        }
        let (frame, remaining) = rest.split_at(len);
        self.buf = remaining;
        Ok(frame)
    }

    /// Reads a frame that must contain exactly one big-endian `u32`.
    pub fn next_u32(&mut self) -> Result<u32, WireError> {
        let frame = self.next_frame()?;
        let bytes: [u8; 4] = frame.try_into().map_err(|_| WireError::Truncated)?;
        Ok(u32::from_be_bytes(bytes))
    }

    /// Returns true when no bytes remain.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

// TESTS
// ================================================================================================
