//! MessagePack encoding in the narrowest wire form.

use msgpack_bind_buffers::{ByteSink, Writer};

use crate::constants::*;
use crate::error::{EncodeError, LengthKind};
use crate::to_value::ToValue;
use crate::value::Value;

/// MessagePack encoder.
///
/// Generic over the sink so it can write straight into an
/// [`IoSink`](msgpack_bind_buffers::IoSink); the default in-memory
/// [`Writer`] gets the convenience [`encode`](MsgPackEncoder::encode).
pub struct MsgPackEncoder<S: ByteSink = Writer> {
    pub sink: S,
}

impl Default for MsgPackEncoder<Writer> {
    fn default() -> Self {
        Self::new()
    }
}

impl MsgPackEncoder<Writer> {
    pub fn new() -> Self {
        Self {
            sink: Writer::new(),
        }
    }

    /// Encodes a value and returns the bytes.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        self.sink.reset();
        self.write_any(value)?;
        Ok(self.sink.flush())
    }

    /// Converts a native value with [`ToValue`] and encodes it.
    pub fn encode_native<T: ToValue + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<Vec<u8>, EncodeError> {
        self.encode(&value.to_value())
    }
}

impl<S: ByteSink> MsgPackEncoder<S> {
    pub fn with_sink(sink: S) -> Self {
        Self { sink }
    }

    pub fn into_inner(self) -> S {
        self.sink
    }

    pub fn write_any(&mut self, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::Nil => self.write_nil(),
            Value::Bool(b) => self.write_boolean(*b),
            Value::Int(i) => self.write_integer(*i),
            Value::UInt(u) => self.write_u_integer(*u),
            Value::Float32(f) => self.write_f32(*f),
            Value::Float64(f) => self.write_f64(*f),
            Value::Str(s) => self.write_str(s),
            Value::Bin(b) => self.write_bin(b),
            Value::Arr(items) => self.write_arr(items),
            Value::Map(entries) => self.write_map(entries),
        }
    }

    pub fn write_nil(&mut self) -> Result<(), EncodeError> {
        Ok(self.sink.write_u8(NIL)?)
    }

    pub fn write_boolean(&mut self, b: bool) -> Result<(), EncodeError> {
        Ok(self.sink.write_u8(if b { TRUE } else { FALSE })?)
    }

    /// Writes a signed integer: fixint for `[-32, 127]`, else the narrowest
    /// of `int8` … `int64`.
    pub fn write_integer(&mut self, int: i64) -> Result<(), EncodeError> {
        if (NEGFIXINT_MIN..=POSFIXINT_MAX as i64).contains(&int) {
            return Ok(self.sink.write_u8(int as u8)?);
        }
        let written = if let Ok(n) = i8::try_from(int) {
            self.sink.write_u8u8(INT8, n as u8)
        } else if let Ok(n) = i16::try_from(int) {
            self.sink.write_u8u16(INT16, n as u16)
        } else if let Ok(n) = i32::try_from(int) {
            self.sink.write_u8u32(INT32, n as u32)
        } else {
            self.sink.write_u8u64(INT64, int as u64)
        };
        Ok(written?)
    }

    /// Writes an unsigned integer in the narrowest of `uint8` … `uint64`.
    /// Zero is `uint8` too; unsigned values never use fixints.
    pub fn write_u_integer(&mut self, uint: u64) -> Result<(), EncodeError> {
        let written = if let Ok(n) = u8::try_from(uint) {
            self.sink.write_u8u8(UINT8, n)
        } else if let Ok(n) = u16::try_from(uint) {
            self.sink.write_u8u16(UINT16, n)
        } else if let Ok(n) = u32::try_from(uint) {
            self.sink.write_u8u32(UINT32, n)
        } else {
            self.sink.write_u8u64(UINT64, uint)
        };
        Ok(written?)
    }

    pub fn write_f32(&mut self, float: f32) -> Result<(), EncodeError> {
        Ok(self.sink.write_u8u32(FLOAT32, float.to_bits())?)
    }

    pub fn write_f64(&mut self, float: f64) -> Result<(), EncodeError> {
        Ok(self.sink.write_u8u64(FLOAT64, float.to_bits())?)
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), EncodeError> {
        self.write_str_hdr(s.len())?;
        Ok(self.sink.write_bytes(s.as_bytes())?)
    }

    pub fn write_str_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        if length <= FIXSTR_MAX_LEN {
            Ok(self.sink.write_u8(FIXSTR | length as u8)?)
        } else {
            self.write_len(length, LengthKind::Str, Some(STR8), STR16, STR32)
        }
    }

    /// Writes a byte buffer. Always a `bin` form, never a string form.
    pub fn write_bin(&mut self, buf: &[u8]) -> Result<(), EncodeError> {
        self.write_bin_hdr(buf.len())?;
        Ok(self.sink.write_bytes(buf)?)
    }

    pub fn write_bin_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        self.write_len(length, LengthKind::Bin, Some(BIN8), BIN16, BIN32)
    }

    pub fn write_arr(&mut self, items: &[Value]) -> Result<(), EncodeError> {
        self.write_arr_hdr(items.len())?;
        for item in items {
            self.write_any(item)?;
        }
        Ok(())
    }

    pub fn write_arr_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        if length <= FIXARRAY_MAX_LEN {
            Ok(self.sink.write_u8(FIXARRAY | length as u8)?)
        } else {
            self.write_len(length, LengthKind::Array, None, ARRAY16, ARRAY32)
        }
    }

    /// Writes a map, each pair key first.
    ///
    /// Keys are checked before the header goes out so a rejected map leaves
    /// nothing of itself in the sink.
    pub fn write_map(&mut self, entries: &[(Value, Value)]) -> Result<(), EncodeError> {
        if entries.iter().any(|(key, _)| matches!(key, Value::Map(_))) {
            return Err(EncodeError::InvalidMapKey);
        }
        self.write_map_hdr(entries.len())?;
        for (key, value) in entries {
            self.write_any(key)?;
            self.write_any(value)?;
        }
        Ok(())
    }

    pub fn write_map_hdr(&mut self, length: usize) -> Result<(), EncodeError> {
        if length <= FIXMAP_MAX_LEN {
            Ok(self.sink.write_u8(FIXMAP | length as u8)?)
        } else {
            self.write_len(length, LengthKind::Map, None, MAP16, MAP32)
        }
    }

    fn write_len(
        &mut self,
        length: usize,
        kind: LengthKind,
        head8: Option<u8>,
        head16: u8,
        head32: u8,
    ) -> Result<(), EncodeError> {
        let written = if let (Some(head), Ok(n)) = (head8, u8::try_from(length)) {
            self.sink.write_u8u8(head, n)
        } else if let Ok(n) = u16::try_from(length) {
            self.sink.write_u8u16(head16, n)
        } else if let Ok(n) = u32::try_from(length) {
            self.sink.write_u8u32(head32, n)
        } else {
            return Err(EncodeError::LengthOverflow { kind, length });
        };
        Ok(written?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enc(value: Value) -> Vec<u8> {
        MsgPackEncoder::new().encode(&value).unwrap()
    }

    #[test]
    fn primitives() {
        assert_eq!(enc(Value::Nil), vec![0xc0]);
        assert_eq!(enc(Value::Bool(true)), vec![0xc3]);
        assert_eq!(enc(Value::Bool(false)), vec![0xc2]);
        assert_eq!(enc(Value::Int(0)), vec![0x00]);
        assert_eq!(enc(Value::Int(-1)), vec![0xff]);
        assert_eq!(enc(Value::UInt(0)), vec![0xcc, 0x00]);
    }

    #[test]
    fn signed_boundaries() {
        assert_eq!(enc(Value::Int(-32)), vec![0xe0]);
        assert_eq!(enc(Value::Int(-33)), vec![0xd0, 0xdf]);
        assert_eq!(enc(Value::Int(127)), vec![0x7f]);
        assert_eq!(enc(Value::Int(128)), vec![0xd1, 0x00, 0x80]);
        assert_eq!(enc(Value::Int(32767)), vec![0xd1, 0x7f, 0xff]);
        assert_eq!(enc(Value::Int(32768)), vec![0xd2, 0x00, 0x00, 0x80, 0x00]);
        assert_eq!(enc(Value::Int(2147483647))[0], 0xd2);
        assert_eq!(
            enc(Value::Int(2147483648)),
            vec![0xd3, 0, 0, 0, 0, 0x80, 0, 0, 0]
        );
    }

    #[test]
    fn unsigned_boundaries() {
        assert_eq!(enc(Value::UInt(255)), vec![0xcc, 0xff]);
        assert_eq!(enc(Value::UInt(256)), vec![0xcd, 0x01, 0x00]);
        assert_eq!(enc(Value::UInt(65536))[0], 0xce);
        assert_eq!(enc(Value::UInt(u64::MAX))[0], 0xcf);
    }

    #[test]
    fn floats_keep_their_width() {
        assert_eq!(enc(Value::Float32(1.0)), vec![0xca, 0x3f, 0x80, 0x00, 0x00]);
        let out = enc(Value::Float64(1.0));
        assert_eq!(out, vec![0xcb, 0x3f, 0xf0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn binary_never_uses_string_forms() {
        assert_eq!(enc(Value::Bin(vec![])), vec![0xc4, 0x00]);
        let out = enc(Value::Bin(vec![7; 300]));
        assert_eq!(&out[..3], &[0xc5, 0x01, 0x2c]);
        let out = enc(Value::Bin(vec![7; 70_000]));
        assert_eq!(&out[..5], &[0xc6, 0x00, 0x01, 0x11, 0x70]);
        assert_eq!(out.len(), 70_005);
    }

    #[test]
    fn string_prefixes() {
        assert_eq!(enc(Value::from("")), vec![0xa0]);
        assert_eq!(enc(Value::from("a".repeat(31)))[0], 0xbf);
        assert_eq!(&enc(Value::from("a".repeat(32)))[..2], &[0xd9, 32]);
        assert_eq!(&enc(Value::from("a".repeat(256)))[..3], &[0xda, 0x01, 0x00]);
    }

    #[test]
    fn map_with_map_key_is_rejected() {
        let key = Value::Map(vec![]);
        let map = Value::Map(vec![(key, Value::Nil)]);
        let mut encoder = MsgPackEncoder::new();
        assert_eq!(encoder.encode(&map), Err(EncodeError::InvalidMapKey));
    }

    #[test]
    fn writes_into_any_sink() {
        let mut encoder = MsgPackEncoder::with_sink(Vec::new());
        encoder
            .write_any(&Value::Arr(vec![Value::Int(1), Value::from("x")]))
            .unwrap();
        assert_eq!(encoder.into_inner(), vec![0x92, 0x01, 0xa1, b'x']);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn lengths_past_u32_overflow_without_writing() {
        type Hdr = fn(&mut MsgPackEncoder, usize) -> Result<(), EncodeError>;
        let headers: [(Hdr, LengthKind); 4] = [
            (MsgPackEncoder::write_str_hdr, LengthKind::Str),
            (MsgPackEncoder::write_bin_hdr, LengthKind::Bin),
            (MsgPackEncoder::write_arr_hdr, LengthKind::Array),
            (MsgPackEncoder::write_map_hdr, LengthKind::Map),
        ];
        let length = u32::MAX as usize + 1;
        for (write_hdr, kind) in headers {
            let mut encoder = MsgPackEncoder::new();
            assert_eq!(
                write_hdr(&mut encoder, length),
                Err(EncodeError::LengthOverflow { kind, length })
            );
            assert!(encoder.sink.flush().is_empty());
            // The largest 32-bit length still fits.
            assert!(write_hdr(&mut encoder, u32::MAX as usize).is_ok());
            assert_eq!(encoder.sink.flush().len(), 5);
        }
    }
}
