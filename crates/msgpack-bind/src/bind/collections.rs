//! Sequence and mapping destinations.

use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use indexmap::IndexMap;

use super::{elements_accepted, Bind};
use crate::error::BindError;
use crate::value::{ElementType, Value, ValueKind};

/// An array binds when its narrowed element type matches `T`; an empty
/// array always binds and empties the vector. A `bin` payload binds when `T`
/// takes integers, one byte per element, so `Vec<u8>` reads back what it
/// encodes to.
impl<T: Bind + Default> Bind for Vec<T> {
    fn accepts(kind: ValueKind) -> bool {
        kind == ValueKind::Arr || (kind == ValueKind::Bin && T::accepts(ValueKind::Integer))
    }

    fn bind_value(&mut self, value: &Value) -> Result<(), BindError> {
        let scratch = match value {
            Value::Arr(items) => {
                let narrowed = ElementType::of(items.iter().map(Value::kind));
                if !elements_accepted::<T, _>(narrowed, items) {
                    return Err(BindError::ElementMismatch(narrowed));
                }
                bind_each(items)?
            }
            Value::Bin(bytes) if T::accepts(ValueKind::Integer) => {
                let items: Vec<Value> = bytes
                    .iter()
                    .map(|&b| Value::UInt(b as u64))
                    .collect();
                bind_each(&items)?
            }
            _ => return Err(BindError::mismatch("array", value.kind())),
        };
        *self = scratch;
        Ok(())
    }
}

fn bind_each<T: Bind + Default>(items: &[Value]) -> Result<Vec<T>, BindError> {
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let mut slot = T::default();
        slot.bind_value(item)?;
        out.push(slot);
    }
    Ok(out)
}

/// Binds every entry of a map value into fresh `K`/`V` slots, checking the
/// narrowed key and value types first.
fn bind_entries<K, V>(value: &Value) -> Result<Vec<(K, V)>, BindError>
where
    K: Bind + Default,
    V: Bind + Default,
{
    let Value::Map(entries) = value else {
        return Err(BindError::mismatch("map", value.kind()));
    };
    let keys = ElementType::of(entries.iter().map(|(k, _)| k.kind()));
    if !elements_accepted::<K, _>(keys, entries.iter().map(|(k, _)| k)) {
        return Err(BindError::ElementMismatch(keys));
    }
    let values = ElementType::of(entries.iter().map(|(_, v)| v.kind()));
    if !elements_accepted::<V, _>(values, entries.iter().map(|(_, v)| v)) {
        return Err(BindError::ElementMismatch(values));
    }
    let mut out = Vec::with_capacity(entries.len());
    for (k, v) in entries {
        let mut key = K::default();
        key.bind_value(k)?;
        let mut val = V::default();
        val.bind_value(v)?;
        out.push((key, val));
    }
    Ok(out)
}

impl<K, V, H> Bind for HashMap<K, V, H>
where
    K: Bind + Default + Eq + Hash,
    V: Bind + Default,
    H: BuildHasher + Default,
{
    fn accepts(kind: ValueKind) -> bool {
        kind == ValueKind::Map
    }

    fn bind_value(&mut self, value: &Value) -> Result<(), BindError> {
        *self = bind_entries(value)?.into_iter().collect();
        Ok(())
    }
}

impl<K, V> Bind for BTreeMap<K, V>
where
    K: Bind + Default + Ord,
    V: Bind + Default,
{
    fn accepts(kind: ValueKind) -> bool {
        kind == ValueKind::Map
    }

    fn bind_value(&mut self, value: &Value) -> Result<(), BindError> {
        *self = bind_entries(value)?.into_iter().collect();
        Ok(())
    }
}

impl<K, V, H> Bind for IndexMap<K, V, H>
where
    K: Bind + Default + Eq + Hash,
    V: Bind + Default,
    H: BuildHasher + Default,
{
    fn accepts(kind: ValueKind) -> bool {
        kind == ValueKind::Map
    }

    fn bind_value(&mut self, value: &Value) -> Result<(), BindError> {
        *self = bind_entries(value)?.into_iter().collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(items: &[i64]) -> Value {
        Value::Arr(items.iter().copied().map(Value::Int).collect())
    }

    #[test]
    fn uniform_array_into_vec() {
        let mut out: Vec<i32> = Vec::new();
        out.bind_value(&ints(&[1, 2, 3])).unwrap();
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn element_type_must_match() {
        let mut out = vec![String::from("keep")];
        let err = out.bind_value(&ints(&[1, 2])).unwrap_err();
        assert_eq!(
            err,
            BindError::ElementMismatch(ElementType::Uniform(ValueKind::Integer))
        );
        assert_eq!(out, vec!["keep".to_owned()]);
    }

    #[test]
    fn empty_array_resets_any_vec() {
        let mut out = vec![String::from("old")];
        out.bind_value(&Value::Arr(vec![])).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn mixed_array_needs_generic_elements() {
        let mixed = Value::Arr(vec![Value::Int(1), Value::from("a")]);
        let mut typed: Vec<i64> = Vec::new();
        assert_eq!(
            typed.bind_value(&mixed),
            Err(BindError::ElementMismatch(ElementType::Mixed))
        );
        let mut generic: Vec<Value> = Vec::new();
        generic.bind_value(&mixed).unwrap();
        assert_eq!(generic, vec![Value::Int(1), Value::from("a")]);
    }

    #[test]
    fn optional_elements_take_nil() {
        let value = Value::Arr(vec![Value::Int(1), Value::Nil]);
        let mut out: Vec<Option<u8>> = Vec::new();
        out.bind_value(&value).unwrap();
        assert_eq!(out, vec![Some(1), None]);
    }

    #[test]
    fn nested_vectors() {
        let value = Value::Arr(vec![ints(&[1]), ints(&[2, 3])]);
        let mut out: Vec<Vec<u16>> = Vec::new();
        out.bind_value(&value).unwrap();
        assert_eq!(out, vec![vec![1], vec![2, 3]]);
    }

    #[test]
    fn maps_check_key_and_value_types() {
        let value = Value::Map(vec![
            (Value::from("a"), Value::Int(1)),
            (Value::from("b"), Value::UInt(2)),
        ]);
        let mut out: BTreeMap<String, u32> = BTreeMap::new();
        out.bind_value(&value).unwrap();
        assert_eq!(out.get("b"), Some(&2));

        let mut wrong: HashMap<String, String> = HashMap::new();
        assert!(wrong.bind_value(&value).is_err());
        assert!(wrong.is_empty());
    }

    #[test]
    fn binary_into_integer_vec() {
        let value = Value::Bin(vec![0, 7, 255]);
        let mut bytes: Vec<u8> = vec![9];
        bytes.bind_value(&value).unwrap();
        assert_eq!(bytes, vec![0, 7, 255]);

        let mut wide: Vec<u32> = Vec::new();
        wide.bind_value(&value).unwrap();
        assert_eq!(wide, vec![0, 7, 255]);

        let mut strings = vec![String::from("keep")];
        assert_eq!(
            strings.bind_value(&value),
            Err(BindError::mismatch("array", ValueKind::Bin))
        );
        assert_eq!(strings, vec!["keep".to_owned()]);
        assert!(<Vec<u8>>::accepts(ValueKind::Bin));
        assert!(!<Vec<String>>::accepts(ValueKind::Bin));
    }

    #[test]
    fn index_map_keeps_wire_order() {
        let value = Value::Map(vec![
            (Value::from("z"), Value::Bool(true)),
            (Value::from("a"), Value::Bool(false)),
        ]);
        let mut out: IndexMap<String, bool> = IndexMap::new();
        out.bind_value(&value).unwrap();
        assert_eq!(out.keys().collect::<Vec<_>>(), vec!["z", "a"]);
    }
}
