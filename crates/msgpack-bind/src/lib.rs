//! MessagePack encoder, decoder and structural binder.
//!
//! - [`MsgPackEncoder`] writes a [`Value`] in the narrowest wire form.
//! - [`MsgPackDecoder`] reads one [`Value`] from any [`ByteSource`].
//! - [`bind`] projects a decoded value onto the first compatible of an
//!   ordered list of typed destinations.
//!
//! Native Rust values reach the encoder through [`ToValue`]; structs opt in
//! with [`msgpack_record!`].
//!
//! ```
//! use msgpack_bind::{decode, encode, Value};
//!
//! let bytes = encode(&vec![1i64, 2, 3]).unwrap();
//! assert_eq!(bytes, vec![0x93, 0x01, 0x02, 0x03]);
//! assert_eq!(
//!     decode(&bytes).unwrap(),
//!     Value::Arr(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
//! );
//! ```

mod bind;
mod codec;
mod constants;
mod decoder;
mod encoder;
mod error;
mod json;
mod limits;
pub mod record;
mod to_value;
mod value;

pub use msgpack_bind_buffers::{
    BufferError, ByteSink, ByteSource, IoSink, IoSource, Reader, Writer,
};

pub use bind::{bind, bind_index, Bind};
pub use codec::{decode, decode_into, encode, MsgPackCodec};
pub use decoder::MsgPackDecoder;
pub use encoder::MsgPackEncoder;
pub use error::{BindError, DecodeError, EncodeError, Error, FieldMismatch, LengthKind};
pub use limits::DecodeLimits;
pub use record::{Field, Record};
pub use to_value::ToValue;
pub use value::{Bytes, ElementType, Value, ValueKind};
