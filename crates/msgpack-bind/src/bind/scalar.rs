//! Scalar destinations.

use super::Bind;
use crate::error::BindError;
use crate::value::{Bytes, Value, ValueKind};

// Integer destinations take either integer variant and convert with `as`:
// out-of-range values wrap instead of being rejected.
macro_rules! impl_integer {
    ($($t:ty),*) => {
        $(
            impl Bind for $t {
                fn accepts(kind: ValueKind) -> bool {
                    kind == ValueKind::Integer
                }

                fn bind_value(&mut self, value: &Value) -> Result<(), BindError> {
                    *self = match *value {
                        Value::Int(i) => i as $t,
                        Value::UInt(u) => u as $t,
                        _ => return Err(BindError::mismatch("integer", value.kind())),
                    };
                    Ok(())
                }
            }
        )*
    };
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl Bind for bool {
    fn accepts(kind: ValueKind) -> bool {
        kind == ValueKind::Bool
    }

    fn bind_value(&mut self, value: &Value) -> Result<(), BindError> {
        match *value {
            Value::Bool(b) => {
                *self = b;
                Ok(())
            }
            _ => Err(BindError::mismatch("bool", value.kind())),
        }
    }
}

impl Bind for f32 {
    fn accepts(kind: ValueKind) -> bool {
        kind == ValueKind::Float32
    }

    fn bind_value(&mut self, value: &Value) -> Result<(), BindError> {
        match *value {
            Value::Float32(f) => {
                *self = f;
                Ok(())
            }
            _ => Err(BindError::mismatch("float32", value.kind())),
        }
    }
}

/// `f64` also takes `Float32`; widening is exact.
impl Bind for f64 {
    fn accepts(kind: ValueKind) -> bool {
        matches!(kind, ValueKind::Float32 | ValueKind::Float64)
    }

    fn bind_value(&mut self, value: &Value) -> Result<(), BindError> {
        *self = match *value {
            Value::Float32(f) => f as f64,
            Value::Float64(f) => f,
            _ => return Err(BindError::mismatch("float", value.kind())),
        };
        Ok(())
    }
}

impl Bind for String {
    fn accepts(kind: ValueKind) -> bool {
        kind == ValueKind::Str
    }

    fn bind_value(&mut self, value: &Value) -> Result<(), BindError> {
        match value {
            Value::Str(s) => {
                self.clone_from(s);
                Ok(())
            }
            _ => Err(BindError::mismatch("string", value.kind())),
        }
    }
}

impl Bind for Bytes {
    fn accepts(kind: ValueKind) -> bool {
        kind == ValueKind::Bin
    }

    fn bind_value(&mut self, value: &Value) -> Result<(), BindError> {
        match value {
            Value::Bin(b) => {
                self.0.clone_from(b);
                Ok(())
            }
            _ => Err(BindError::mismatch("binary", value.kind())),
        }
    }
}

/// A [`Value`] destination takes anything as is.
impl Bind for Value {
    fn accepts(_kind: ValueKind) -> bool {
        true
    }

    fn bind_value(&mut self, value: &Value) -> Result<(), BindError> {
        self.clone_from(value);
        Ok(())
    }
}

/// `Nil` binds as `None`; anything else binds as `Some` if `T` takes it.
impl<T: Bind + Default> Bind for Option<T> {
    fn accepts(kind: ValueKind) -> bool {
        kind == ValueKind::Nil || T::accepts(kind)
    }

    fn bind_value(&mut self, value: &Value) -> Result<(), BindError> {
        if value.is_nil() {
            *self = None;
            return Ok(());
        }
        let mut scratch = T::default();
        scratch.bind_value(value)?;
        *self = Some(scratch);
        Ok(())
    }
}

impl<T: Bind> Bind for Box<T> {
    fn accepts(kind: ValueKind) -> bool {
        T::accepts(kind)
    }

    fn bind_value(&mut self, value: &Value) -> Result<(), BindError> {
        (**self).bind_value(value)
    }
}
