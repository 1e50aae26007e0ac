//! MessagePack decoding from any [`ByteSource`].

use msgpack_bind_buffers::{print_octets_default, ByteSource, Reader};
use tracing::{debug, trace};

use crate::constants::*;
use crate::error::{DecodeError, LengthKind};
use crate::limits::DecodeLimits;
use crate::value::Value;

/// MessagePack decoder.
///
/// Holds only its [`DecodeLimits`]; every call reads from the source it is
/// given, so one decoder can serve any number of sources.
#[derive(Debug, Clone, Default)]
pub struct MsgPackDecoder {
    limits: DecodeLimits,
}

impl MsgPackDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: DecodeLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    /// Decodes exactly one value from `source`, leaving anything after it
    /// unread.
    pub fn decode<S: ByteSource>(&self, source: &mut S) -> Result<Value, DecodeError> {
        self.read_any(source, 0)
    }

    /// Decodes a byte slice holding exactly one value.
    pub fn decode_slice(&self, bytes: &[u8]) -> Result<Value, DecodeError> {
        let mut reader = Reader::new(bytes);
        let result = self.read_any(&mut reader, 0).and_then(|value| match reader.size() {
            0 => Ok(value),
            n => Err(DecodeError::TrailingBytes(n)),
        });
        if let Err(err) = &result {
            let at = reader.x.min(bytes.len());
            debug!(
                offset = at,
                near = %print_octets_default(&bytes[at..]),
                "MessagePack decode failed: {err}"
            );
        }
        result
    }

    fn read_any<S: ByteSource>(&self, src: &mut S, depth: usize) -> Result<Value, DecodeError> {
        let byte = src.read_u8()?;
        trace!(byte, depth, "format byte");
        match byte >> 4 {
            0x0..=0x7 => return Ok(Value::Int(byte as i64)),
            0x8 => return self.read_map(src, (byte & 0x0f) as usize, depth),
            0x9 => return self.read_arr(src, (byte & 0x0f) as usize, depth),
            0xa | 0xb => return self.read_str(src, (byte & 0x1f) as usize),
            0xe | 0xf => return Ok(Value::Int(byte as i8 as i64)),
            _ => {}
        }
        match byte {
            NIL => Ok(Value::Nil),
            FALSE => Ok(Value::Bool(false)),
            TRUE => Ok(Value::Bool(true)),
            BIN8 => {
                let len = src.read_u8()? as usize;
                self.read_bin(src, len)
            }
            BIN16 => {
                let len = read_u16(src)? as usize;
                self.read_bin(src, len)
            }
            BIN32 => {
                let len = read_u32(src)? as usize;
                self.read_bin(src, len)
            }
            FLOAT32 => Ok(Value::Float32(f32::from_bits(read_u32(src)?))),
            FLOAT64 => Ok(Value::Float64(f64::from_bits(read_u64(src)?))),
            UINT8 => Ok(Value::UInt(src.read_u8()? as u64)),
            UINT16 => Ok(Value::UInt(read_u16(src)? as u64)),
            UINT32 => Ok(Value::UInt(read_u32(src)? as u64)),
            UINT64 => Ok(Value::UInt(read_u64(src)?)),
            INT8 => Ok(Value::Int(src.read_u8()? as i8 as i64)),
            INT16 => Ok(Value::Int(read_u16(src)? as i16 as i64)),
            INT32 => Ok(Value::Int(read_u32(src)? as i32 as i64)),
            INT64 => Ok(Value::Int(read_u64(src)? as i64)),
            STR8 => {
                let len = src.read_u8()? as usize;
                self.read_str(src, len)
            }
            STR16 => {
                let len = read_u16(src)? as usize;
                self.read_str(src, len)
            }
            STR32 => {
                let len = read_u32(src)? as usize;
                self.read_str(src, len)
            }
            ARRAY16 => {
                let len = read_u16(src)? as usize;
                self.read_arr(src, len, depth)
            }
            ARRAY32 => {
                let len = read_u32(src)? as usize;
                self.read_arr(src, len, depth)
            }
            MAP16 => {
                let len = read_u16(src)? as usize;
                self.read_map(src, len, depth)
            }
            MAP32 => {
                let len = read_u32(src)? as usize;
                self.read_map(src, len, depth)
            }
            _ => {
                debug!(byte, "unsupported format byte");
                Err(DecodeError::Unsupported(byte))
            }
        }
    }

    fn read_str<S: ByteSource>(&self, src: &mut S, len: usize) -> Result<Value, DecodeError> {
        check_len(LengthKind::Str, len, self.limits.max_str_len)?;
        let bytes = src.read_vec(len)?;
        String::from_utf8(bytes)
            .map(Value::Str)
            .map_err(|_| DecodeError::InvalidUtf8)
    }

    fn read_bin<S: ByteSource>(&self, src: &mut S, len: usize) -> Result<Value, DecodeError> {
        check_len(LengthKind::Bin, len, self.limits.max_bin_len)?;
        Ok(Value::Bin(src.read_vec(len)?))
    }

    fn read_arr<S: ByteSource>(
        &self,
        src: &mut S,
        len: usize,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        check_len(LengthKind::Array, len, self.limits.max_array_len)?;
        let depth = self.enter(depth)?;
        let mut items = Vec::with_capacity(prealloc(src, len));
        for _ in 0..len {
            items.push(self.read_any(src, depth)?);
        }
        Ok(Value::Arr(items))
    }

    fn read_map<S: ByteSource>(
        &self,
        src: &mut S,
        len: usize,
        depth: usize,
    ) -> Result<Value, DecodeError> {
        check_len(LengthKind::Map, len, self.limits.max_map_len)?;
        let depth = self.enter(depth)?;
        let mut entries = Vec::with_capacity(prealloc(src, len));
        for _ in 0..len {
            let key = self.read_any(src, depth)?;
            if let Value::Map(_) = key {
                debug!("map key is itself a map");
                return Err(DecodeError::InvalidMapKey);
            }
            let value = self.read_any(src, depth)?;
            entries.push((key, value));
        }
        Ok(Value::Map(entries))
    }

    fn enter(&self, depth: usize) -> Result<usize, DecodeError> {
        let depth = depth + 1;
        if depth > self.limits.max_depth {
            debug!(depth, "MessagePack nesting limit reached");
            return Err(DecodeError::DepthExceeded(self.limits.max_depth));
        }
        Ok(depth)
    }
}

fn check_len(kind: LengthKind, length: usize, max: usize) -> Result<(), DecodeError> {
    if length > max {
        debug!(%kind, length, max, "MessagePack length over limit");
        return Err(DecodeError::LengthOverflow { kind, length });
    }
    Ok(())
}

/// Every child takes at least one byte, so a source that knows its size
/// bounds the allocation; otherwise cap it and let the vector grow.
fn prealloc<S: ByteSource>(src: &S, len: usize) -> usize {
    match src.remaining_hint() {
        Some(remaining) => len.min(remaining),
        None => len.min(1024),
    }
}

fn read_u16<S: ByteSource>(src: &mut S) -> Result<u16, DecodeError> {
    Ok(u16::from_be_bytes(src.read_array()?))
}

fn read_u32<S: ByteSource>(src: &mut S) -> Result<u32, DecodeError> {
    Ok(u32::from_be_bytes(src.read_array()?))
}

fn read_u64<S: ByteSource>(src: &mut S) -> Result<u64, DecodeError> {
    Ok(u64::from_be_bytes(src.read_array()?))
}

#[cfg(test)]
mod tests {
    use msgpack_bind_buffers::{BufferError, IoSource};

    use super::*;

    fn dec(bytes: &[u8]) -> Result<Value, DecodeError> {
        MsgPackDecoder::new().decode_slice(bytes)
    }

    #[test]
    fn primitives() {
        assert_eq!(dec(&[0xc0]), Ok(Value::Nil));
        assert_eq!(dec(&[0xc3]), Ok(Value::Bool(true)));
        assert_eq!(dec(&[0xc2]), Ok(Value::Bool(false)));
        assert_eq!(dec(&[0x7f]), Ok(Value::Int(127)));
        assert_eq!(dec(&[0xff]), Ok(Value::Int(-1)));
        assert_eq!(dec(&[0xe0]), Ok(Value::Int(-32)));
    }

    #[test]
    fn signed_fixed_width_forms() {
        assert_eq!(dec(&[0xd0, 0xdf]), Ok(Value::Int(-33)));
        assert_eq!(dec(&[0xd1, 0x80, 0x00]), Ok(Value::Int(-32768)));
        assert_eq!(dec(&[0xd2, 0x00, 0x00, 0x80, 0x00]), Ok(Value::Int(32768)));
        assert_eq!(
            dec(&[0xd3, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfe]),
            Ok(Value::Int(-2))
        );
    }

    #[test]
    fn unsigned_forms() {
        assert_eq!(dec(&[0xcc, 0xff]), Ok(Value::UInt(255)));
        assert_eq!(dec(&[0xcd, 0x01, 0x00]), Ok(Value::UInt(256)));
        assert_eq!(
            dec(&[0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
            Ok(Value::UInt(u64::MAX))
        );
    }

    #[test]
    fn strings_longer_than_32_bytes() {
        let text = "x".repeat(100);
        let mut bytes = vec![0xd9, 100];
        bytes.extend_from_slice(text.as_bytes());
        assert_eq!(dec(&bytes), Ok(Value::Str(text)));
    }

    #[test]
    fn bin32_uses_four_byte_length() {
        let mut bytes = vec![0xc6, 0x00, 0x00, 0x00, 0x03];
        bytes.extend_from_slice(&[9, 8, 7]);
        assert_eq!(dec(&bytes), Ok(Value::Bin(vec![9, 8, 7])));
    }

    #[test]
    fn empty_and_truncated_input() {
        assert_eq!(dec(&[]), Err(DecodeError::Read(BufferError::EndOfBuffer)));
        assert_eq!(
            dec(&[0xd9, 0x05, b'h', b'i']),
            Err(DecodeError::Read(BufferError::EndOfBuffer))
        );
        assert_eq!(
            dec(&[0x92, 0x01]),
            Err(DecodeError::Read(BufferError::EndOfBuffer))
        );
    }

    #[test]
    fn unsupported_bytes() {
        assert_eq!(dec(&[0xc1]), Err(DecodeError::Unsupported(0xc1)));
        assert_eq!(
            dec(&[0xc7, 0x01, 0x01, 0x00]),
            Err(DecodeError::Unsupported(0xc7))
        );
        assert_eq!(dec(&[0xd6]), Err(DecodeError::Unsupported(0xd6)));
    }

    #[test]
    fn map_key_cannot_be_map() {
        assert_eq!(dec(&[0x81, 0x80, 0x01]), Err(DecodeError::InvalidMapKey));
        // Arrays are allowed as keys.
        assert_eq!(
            dec(&[0x81, 0x90, 0x01]),
            Ok(Value::Map(vec![(Value::Arr(vec![]), Value::Int(1))]))
        );
    }

    #[test]
    fn invalid_utf8() {
        assert_eq!(dec(&[0xa2, 0xc3, 0x28]), Err(DecodeError::InvalidUtf8));
    }

    #[test]
    fn trailing_bytes() {
        assert_eq!(dec(&[0x01, 0x02]), Err(DecodeError::TrailingBytes(1)));
    }

    #[test]
    fn limits_reject_before_allocating() {
        let decoder = MsgPackDecoder::with_limits(DecodeLimits::default().with_max_str_len(4));
        assert_eq!(
            decoder.decode_slice(&[0xdb, 0xff, 0xff, 0xff, 0xff]),
            Err(DecodeError::LengthOverflow {
                kind: LengthKind::Str,
                length: 0xffff_ffff
            })
        );
        // A huge claimed array length on a short input fails on read, not on
        // allocation.
        assert_eq!(
            MsgPackDecoder::new().decode_slice(&[0xdd, 0xff, 0xff, 0xff, 0xff]),
            Err(DecodeError::Read(BufferError::EndOfBuffer))
        );
    }

    #[test]
    fn depth_limit() {
        let decoder = MsgPackDecoder::with_limits(DecodeLimits::default().with_max_depth(2));
        assert_eq!(
            decoder.decode_slice(&[0x91, 0x90]),
            Ok(Value::Arr(vec![Value::Arr(vec![])]))
        );
        assert_eq!(
            decoder.decode_slice(&[0x91, 0x91, 0x90]),
            Err(DecodeError::DepthExceeded(2))
        );
    }

    #[test]
    fn decodes_from_io_source_one_value_at_a_time() {
        let bytes: &[u8] = &[0x01, 0xa1, b'z', 0xc0];
        let mut source = IoSource::new(bytes);
        let decoder = MsgPackDecoder::new();
        assert_eq!(decoder.decode(&mut source), Ok(Value::Int(1)));
        assert_eq!(decoder.decode(&mut source), Ok(Value::from("z")));
        assert_eq!(decoder.decode(&mut source), Ok(Value::Nil));
        assert_eq!(
            decoder.decode(&mut source),
            Err(DecodeError::Read(BufferError::EndOfBuffer))
        );
    }
}
