//! Encoder, decoder and binder error types.

use msgpack_bind_buffers::BufferError;
use thiserror::Error;

use crate::value::{ElementType, ValueKind};

/// Which length prefix overflowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthKind {
    Str,
    Bin,
    Array,
    Map,
}

impl std::fmt::Display for LengthKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            LengthKind::Str => "string",
            LengthKind::Bin => "binary",
            LengthKind::Array => "array",
            LengthKind::Map => "map",
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("{kind} length {length} exceeds the largest MessagePack length prefix")]
    LengthOverflow { kind: LengthKind, length: usize },
    #[error("map keys cannot be maps")]
    InvalidMapKey,
    #[error("write failed: {0}")]
    Write(#[from] BufferError),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("read failed: {0}")]
    Read(#[from] BufferError),
    #[error("unsupported MessagePack format byte 0x{0:02x}")]
    Unsupported(u8),
    #[error("map keys cannot be maps")]
    InvalidMapKey,
    #[error("invalid UTF-8 in string")]
    InvalidUtf8,
    #[error("{kind} length {length} exceeds the decode limit")]
    LengthOverflow { kind: LengthKind, length: usize },
    #[error("nesting deeper than {0} levels")]
    DepthExceeded(usize),
    #[error("{0} trailing bytes after value")]
    TrailingBytes(usize),
}

/// Why a record destination rejected a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldMismatch {
    /// The map has a different number of entries than the record has fields.
    Count { fields: usize, entries: usize },
    /// No entry is keyed by this external field name.
    Missing(&'static str),
    /// The entry for this field did not bind.
    Field {
        name: &'static str,
        source: Box<BindError>,
    },
}

impl std::fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldMismatch::Count { fields, entries } => {
                write!(f, "record has {fields} fields but map has {entries} entries")
            }
            FieldMismatch::Missing(name) => write!(f, "missing field `{name}`"),
            FieldMismatch::Field { name, source } => write!(f, "field `{name}`: {source}"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("no compatible destination")]
    NoCompatibleDestination,
    #[error("expected {expected}, found {found}")]
    KindMismatch {
        expected: &'static str,
        found: ValueKind,
    },
    #[error("element type {0:?} does not match the destination")]
    ElementMismatch(ElementType),
    #[error("record mismatch: {0}")]
    FieldMismatch(FieldMismatch),
}

impl BindError {
    pub(crate) fn mismatch(expected: &'static str, found: ValueKind) -> Self {
        BindError::KindMismatch { expected, found }
    }
}

/// Umbrella error for the codec facade.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("MessagePack encode error: {0}")]
    Encode(#[from] EncodeError),
    #[error("MessagePack decode error: {0}")]
    Decode(#[from] DecodeError),
    #[error("bind error: {0}")]
    Bind(#[from] BindError),
}
