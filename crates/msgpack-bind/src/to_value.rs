//! Conversion from native Rust values to [`Value`].

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::value::{Bytes, Value};

/// Converts a native value into the [`Value`] the encoder writes.
///
/// Signed integers become `Int`, unsigned integers `UInt`, `None` becomes
/// `Nil`, and smart pointers and references encode their referent. Slices,
/// vectors and arrays of `u8` become `Bin`; every other sequence becomes
/// `Arr`.
pub trait ToValue {
    fn to_value(&self) -> Value;

    /// Converts a slice of `Self`. Overridden by `u8` so byte sequences take
    /// the binary path.
    #[doc(hidden)]
    fn slice_to_value(items: &[Self]) -> Value
    where
        Self: Sized,
    {
        Value::Arr(items.iter().map(ToValue::to_value).collect())
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

macro_rules! impl_signed {
    ($($t:ty),*) => {
        $(
            impl ToValue for $t {
                fn to_value(&self) -> Value {
                    Value::Int(*self as i64)
                }
            }
        )*
    };
}

macro_rules! impl_unsigned {
    ($($t:ty),*) => {
        $(
            impl ToValue for $t {
                fn to_value(&self) -> Value {
                    Value::UInt(*self as u64)
                }
            }
        )*
    };
}

impl_signed!(i8, i16, i32, i64, isize);
impl_unsigned!(u16, u32, u64, usize);

impl ToValue for u8 {
    fn to_value(&self) -> Value {
        Value::UInt(*self as u64)
    }

    fn slice_to_value(items: &[u8]) -> Value {
        Value::Bin(items.to_vec())
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Float32(*self)
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Float64(*self)
    }
}

impl ToValue for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_owned())
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl ToValue for Bytes {
    fn to_value(&self) -> Value {
        Value::Bin(self.0.clone())
    }
}

impl<T: ToValue> ToValue for [T] {
    fn to_value(&self) -> Value {
        T::slice_to_value(self)
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        T::slice_to_value(self)
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> Value {
        T::slice_to_value(self)
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Nil,
        }
    }
}

impl<T: ToValue + ?Sized> ToValue for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Rc<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: ToValue + ?Sized> ToValue for Arc<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

fn map_to_value<'a, K, V, I>(entries: I) -> Value
where
    K: ToValue + 'a,
    V: ToValue + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    Value::Map(entries.map(|(k, v)| (k.to_value(), v.to_value())).collect())
}

impl<K: ToValue, V: ToValue, H: BuildHasher> ToValue for HashMap<K, V, H> {
    fn to_value(&self) -> Value {
        map_to_value(self.iter())
    }
}

impl<K: ToValue, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        map_to_value(self.iter())
    }
}

impl<K: ToValue, V: ToValue, H: BuildHasher> ToValue for IndexMap<K, V, H> {
    fn to_value(&self) -> Value {
        map_to_value(self.iter())
    }
}
