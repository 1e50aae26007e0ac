//! Byte source and sink utilities for msgpack-bind.
//!
//! # Overview
//!
//! - [`Writer`] - Writes binary data to an auto-growing buffer
//! - [`Reader`] - Reads binary data from a byte slice with cursor tracking;
//!   every read is bounds-checked and returns a [`BufferError`] instead of
//!   panicking
//! - [`ByteSource`] / [`ByteSink`] - the "read one byte" / "write bytes"
//!   seams the codec is written against
//! - [`IoSource`] / [`IoSink`] - adapters over [`std::io::Read`] and
//!   [`std::io::Write`]
//!
//! # Example
//!
//! ```
//! use msgpack_bind_buffers::{Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.u8(0x01);
//! writer.u16(0x0203);
//! writer.buf(b"hello");
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8(), Ok(0x01));
//! assert_eq!(reader.u16(), Ok(0x0203));
//! assert_eq!(reader.buf(5), Ok(&b"hello"[..]));
//! assert!(reader.u8().is_err());
//! ```

mod print_octets;
mod reader;
mod source;
mod writer;

pub use print_octets::{print_octets, print_octets_default};
pub use reader::Reader;
pub use source::{ByteSink, ByteSource, IoSink, IoSource};
pub use writer::Writer;

use std::io;

/// Error type for buffer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the input.
    EndOfBuffer,
    /// The underlying I/O object failed.
    Io(io::ErrorKind),
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer => write!(f, "end of buffer"),
            BufferError::Io(kind) => write!(f, "I/O error: {kind}"),
        }
    }
}

impl std::error::Error for BufferError {}

impl From<io::Error> for BufferError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::UnexpectedEof => BufferError::EndOfBuffer,
            kind => BufferError::Io(kind),
        }
    }
}
