//! Bridge between [`serde_json::Value`] and [`Value`].
//!
//! JSON documents can be encoded directly, and decoded values can be
//! rendered as JSON for inspection. The JSON side is lossy: binary becomes
//! an array of byte values, non-string map keys are rendered as their JSON
//! text, and non-finite floats become `null`.

use serde_json::{Map, Number, Value as Json};

use crate::to_value::ToValue;
use crate::value::Value;

/// Integers that fit `i64` become `Int`, larger ones `UInt`, everything
/// else `Float64`.
impl ToValue for Json {
    fn to_value(&self) -> Value {
        match self {
            Json::Null => Value::Nil,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::UInt(u)
                } else {
                    Value::Float64(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Json::String(s) => Value::Str(s.clone()),
            Json::Array(items) => Value::Arr(items.iter().map(ToValue::to_value).collect()),
            Json::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (Value::Str(k.clone()), v.to_value()))
                    .collect(),
            ),
        }
    }
}

impl From<&Json> for Value {
    fn from(json: &Json) -> Self {
        json.to_value()
    }
}

impl From<Json> for Value {
    fn from(json: Json) -> Self {
        json.to_value()
    }
}

impl Value {
    /// Renders the value as JSON.
    pub fn to_json(&self) -> Json {
        match self {
            Value::Nil => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Int(i) => Json::from(*i),
            Value::UInt(u) => Json::from(*u),
            Value::Float32(f) => float_to_json(*f as f64),
            Value::Float64(f) => float_to_json(*f),
            Value::Str(s) => Json::String(s.clone()),
            Value::Bin(b) => Json::Array(b.iter().map(|&byte| Json::from(byte)).collect()),
            Value::Arr(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (k, v) in entries {
                    let key = match k {
                        Value::Str(s) => s.clone(),
                        other => other.to_json().to_string(),
                    };
                    map.insert(key, v.to_json());
                }
                Json::Object(map)
            }
        }
    }
}

fn float_to_json(f: f64) -> Json {
    Number::from_f64(f).map_or(Json::Null, Json::Number)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn json_numbers_pick_integer_variants() {
        assert_eq!(json!(-3).to_value(), Value::Int(-3));
        assert_eq!(json!(u64::MAX).to_value(), Value::UInt(u64::MAX));
        assert_eq!(json!(1.5).to_value(), Value::Float64(1.5));
    }

    #[test]
    fn objects_keep_key_order() {
        let value = Value::from(json!({"z": 1, "a": [true, null]}));
        assert_eq!(
            value,
            Value::Map(vec![
                (Value::from("z"), Value::Int(1)),
                (
                    Value::from("a"),
                    Value::Arr(vec![Value::Bool(true), Value::Nil])
                ),
            ])
        );
        assert_eq!(value.to_json(), json!({"z": 1, "a": [true, null]}));
    }

    #[test]
    fn lossy_rendering() {
        let value = Value::Map(vec![
            (Value::Int(1), Value::Bin(vec![0, 255])),
            (Value::from("nan"), Value::Float64(f64::NAN)),
        ]);
        assert_eq!(value.to_json(), json!({"1": [0, 255], "nan": null}));
    }
}
