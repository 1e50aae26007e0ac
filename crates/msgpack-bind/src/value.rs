//! The dynamic [`Value`] every encode and decode goes through.

use std::fmt;
use std::ops::{Deref, DerefMut};

/// A decoded (or about to be encoded) MessagePack value.
///
/// `Arr` keeps element order and `Map` keeps insertion order, so a value
/// survives an encode/decode round trip unchanged. Map keys may be any
/// variant except `Map`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float32(f32),
    Float64(f64),
    Str(String),
    Bin(Vec<u8>),
    Arr(Vec<Value>),
    Map(Vec<(Value, Value)>),
}

/// Payload-free discriminant of a [`Value`].
///
/// `Int` and `UInt` share [`ValueKind::Integer`]: on the wire the split is
/// only a matter of which prefix was the narrowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Nil,
    Bool,
    Integer,
    Float32,
    Float64,
    Str,
    Bin,
    Arr,
    Map,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Nil => "nil",
            ValueKind::Bool => "bool",
            ValueKind::Integer => "integer",
            ValueKind::Float32 => "float32",
            ValueKind::Float64 => "float64",
            ValueKind::Str => "string",
            ValueKind::Bin => "binary",
            ValueKind::Arr => "array",
            ValueKind::Map => "map",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of homogeneity narrowing over the children of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    /// The container has no children.
    Empty,
    /// Every child has this kind.
    Uniform(ValueKind),
    /// Children of more than one kind.
    Mixed,
}

impl ElementType {
    /// Narrows a sequence of kinds.
    pub fn of<I: IntoIterator<Item = ValueKind>>(kinds: I) -> Self {
        let mut acc = ElementType::Empty;
        for kind in kinds {
            acc = match acc {
                ElementType::Empty => ElementType::Uniform(kind),
                ElementType::Uniform(k) if k == kind => acc,
                _ => return ElementType::Mixed,
            };
        }
        acc
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Nil => ValueKind::Nil,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) | Value::UInt(_) => ValueKind::Integer,
            Value::Float32(_) => ValueKind::Float32,
            Value::Float64(_) => ValueKind::Float64,
            Value::Str(_) => ValueKind::Str,
            Value::Bin(_) => ValueKind::Bin,
            Value::Arr(_) => ValueKind::Arr,
            Value::Map(_) => ValueKind::Map,
        }
    }

    /// Narrowed element type of an array; `None` for anything else.
    pub fn element_type(&self) -> Option<ElementType> {
        match self {
            Value::Arr(items) => Some(ElementType::of(items.iter().map(Value::kind))),
            _ => None,
        }
    }

    /// Narrowed key type of a map; `None` for anything else.
    pub fn key_type(&self) -> Option<ElementType> {
        match self {
            Value::Map(entries) => Some(ElementType::of(entries.iter().map(|(k, _)| k.kind()))),
            _ => None,
        }
    }

    /// Narrowed value type of a map; `None` for anything else.
    pub fn value_type(&self) -> Option<ElementType> {
        match self {
            Value::Map(entries) => Some(ElementType::of(entries.iter().map(|(_, v)| v.kind()))),
            _ => None,
        }
    }

    /// Looks up a map entry by string key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(entries) => entries.iter().find_map(|(k, v)| match k {
                Value::Str(s) if s == key => Some(v),
                _ => None,
            }),
            _ => None,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int(i) => Some(i),
            Value::UInt(u) => i64::try_from(u).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::Int(i) => u64::try_from(i).ok(),
            Value::UInt(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Arr(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::UInt(u)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float32(f)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float64(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Arr(items)
    }
}

/// Owned byte buffer that encodes as MessagePack `bin` and binds from it.
///
/// `Vec<u8>` already encodes as `bin`; this wrapper exists for the binder,
/// where `Vec<u8>` means "array of small integers".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn new(data: Vec<u8>) -> Self {
        Self(data)
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Bytes {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.0
    }
}

impl DerefMut for Bytes {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(data: Vec<u8>) -> Self {
        Self(data)
    }
}

impl From<Bytes> for Value {
    fn from(bytes: Bytes) -> Self {
        Value::Bin(bytes.0)
    }
}
