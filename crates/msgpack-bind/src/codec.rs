//! Encoder and decoder bundled with the binder.

use crate::bind::{bind, Bind};
use crate::decoder::MsgPackDecoder;
use crate::encoder::MsgPackEncoder;
use crate::error::{DecodeError, EncodeError, Error};
use crate::limits::DecodeLimits;
use crate::to_value::ToValue;
use crate::value::Value;

/// An encoder/decoder pair. The encoder's buffer is reused across calls.
pub struct MsgPackCodec {
    pub encoder: MsgPackEncoder,
    pub decoder: MsgPackDecoder,
}

impl Default for MsgPackCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl MsgPackCodec {
    pub fn new() -> Self {
        Self {
            encoder: MsgPackEncoder::new(),
            decoder: MsgPackDecoder::new(),
        }
    }

    pub fn with_limits(limits: DecodeLimits) -> Self {
        Self {
            encoder: MsgPackEncoder::new(),
            decoder: MsgPackDecoder::with_limits(limits),
        }
    }

    pub fn id(&self) -> &'static str {
        "msgpack"
    }

    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, Error> {
        Ok(self.encoder.encode(value)?)
    }

    pub fn encode_native<T: ToValue + ?Sized>(&mut self, value: &T) -> Result<Vec<u8>, Error> {
        Ok(self.encoder.encode_native(value)?)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Value, Error> {
        Ok(self.decoder.decode_slice(bytes)?)
    }

    /// Decodes `bytes` and binds the value into the first compatible
    /// destination. Returns the value along with the destination index.
    pub fn decode_into(
        &self,
        bytes: &[u8],
        destinations: &mut [&mut dyn Bind],
    ) -> Result<(Value, usize), Error> {
        let value = self.decoder.decode_slice(bytes)?;
        let index = bind(&value, destinations)?;
        Ok((value, index))
    }
}

/// Encodes a native value with a fresh encoder.
pub fn encode<T: ToValue + ?Sized>(value: &T) -> Result<Vec<u8>, EncodeError> {
    MsgPackEncoder::new().encode_native(value)
}

/// Decodes a byte slice holding exactly one value, with default limits.
pub fn decode(bytes: &[u8]) -> Result<Value, DecodeError> {
    MsgPackDecoder::new().decode_slice(bytes)
}

/// Decodes a byte slice and binds it; returns the destination index.
pub fn decode_into(bytes: &[u8], destinations: &mut [&mut dyn Bind]) -> Result<usize, Error> {
    let value = decode(bytes)?;
    Ok(bind(&value, destinations)?)
}
