//! Structured records: structs encoded as maps keyed by field name.
//!
//! A record carries a compile-time table of its fields in declaration
//! order. Each field has its Rust identifier and an external name, which is
//! the identifier unless overridden. Encoding writes one map entry per
//! field in table order; binding requires the map to have exactly one entry
//! per field, looked up by external name.
//!
//! [`msgpack_record!`](crate::msgpack_record) derives everything for a
//! plain struct:
//!
//! ```
//! use msgpack_bind::{msgpack_record, MsgPackCodec, Record};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     full_name: String,
//!     age: u8,
//! }
//!
//! msgpack_record! {
//!     Person {
//!         #[msgpack(name = "name")]
//!         full_name,
//!         age,
//!     }
//! }
//!
//! assert_eq!(Person::FIELDS[0].name, "name");
//!
//! let mut codec = MsgPackCodec::new();
//! let bytes = codec
//!     .encode_native(&Person { full_name: "Al".into(), age: 9 })
//!     .unwrap();
//!
//! let mut person = Person::default();
//! let (_, index) = codec.decode_into(&bytes, &mut [&mut person]).unwrap();
//! assert_eq!(index, 0);
//! assert_eq!(person, Person { full_name: "Al".into(), age: 9 });
//! ```

use crate::error::{BindError, FieldMismatch};
use crate::value::Value;

/// One entry of a record's field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// The Rust field identifier.
    pub ident: &'static str,
    /// The map key used on the wire.
    pub name: &'static str,
}

/// A struct with a static field table.
pub trait Record: Default {
    /// Fields in declaration order.
    const FIELDS: &'static [Field];

    /// Field values in [`FIELDS`](Record::FIELDS) order.
    fn field_values(&self) -> Vec<Value>;

    /// Binds `value` into the field whose identifier is `ident`.
    fn bind_field(&mut self, ident: &str, value: &Value) -> Result<(), BindError>;
}

/// Builds the map value for a record: one entry per field, in declaration
/// order, keyed by external name.
pub fn record_to_value<R: Record>(record: &R) -> Value {
    let entries = R::FIELDS
        .iter()
        .zip(record.field_values())
        .map(|(field, value)| (Value::Str(field.name.to_owned()), value))
        .collect();
    Value::Map(entries)
}

/// Binds a map value into a record.
///
/// The record is built from `R::default()` and only assigned to `dest` once
/// every field has bound. A map whose entries do not line up with the fields
/// resets `dest` to `R::default()`; a value that is not a map leaves it as
/// it was.
pub fn bind_record<R: Record>(dest: &mut R, value: &Value) -> Result<(), BindError> {
    let Value::Map(entries) = value else {
        return Err(BindError::mismatch("map", value.kind()));
    };
    match build_record::<R>(value, entries.len()) {
        Ok(record) => {
            *dest = record;
            Ok(())
        }
        Err(err) => {
            *dest = R::default();
            Err(BindError::FieldMismatch(err))
        }
    }
}

fn build_record<R: Record>(value: &Value, entries: usize) -> Result<R, FieldMismatch> {
    if entries != R::FIELDS.len() {
        return Err(FieldMismatch::Count {
            fields: R::FIELDS.len(),
            entries,
        });
    }
    let mut scratch = R::default();
    for field in R::FIELDS {
        let entry = value
            .get(field.name)
            .ok_or(FieldMismatch::Missing(field.name))?;
        scratch
            .bind_field(field.ident, entry)
            .map_err(|err| FieldMismatch::Field {
                name: field.name,
                source: Box::new(err),
            })?;
    }
    Ok(scratch)
}

/// Implements [`Record`], [`ToValue`](crate::ToValue) and [`Bind`] for a
/// struct whose fields all implement `ToValue` and `Bind`.
///
/// Every listed field is part of the record, in the order listed; an
/// optional `#[msgpack(name = "...")]` sets the external name.
#[macro_export]
macro_rules! msgpack_record {
    (@name $field:ident $name:literal) => {
        $name
    };
    (@name $field:ident) => {
        stringify!($field)
    };
    (
        $ty:ident {
            $( $(#[msgpack(name = $name:literal)])? $field:ident ),* $(,)?
        }
    ) => {
        impl $crate::Record for $ty {
            const FIELDS: &'static [$crate::Field] = &[
                $(
                    $crate::Field {
                        ident: stringify!($field),
                        name: $crate::msgpack_record!(@name $field $($name)?),
                    },
                )*
            ];

            fn field_values(&self) -> ::std::vec::Vec<$crate::Value> {
                ::std::vec![ $( $crate::ToValue::to_value(&self.$field) ),* ]
            }

            fn bind_field(
                &mut self,
                ident: &str,
                value: &$crate::Value,
            ) -> ::std::result::Result<(), $crate::BindError> {
                $(
                    if ident == stringify!($field) {
                        return $crate::Bind::bind_value(&mut self.$field, value);
                    }
                )*
                ::std::result::Result::Err($crate::BindError::NoCompatibleDestination)
            }
        }

        impl $crate::ToValue for $ty {
            fn to_value(&self) -> $crate::Value {
                $crate::record::record_to_value(self)
            }
        }

        impl $crate::Bind for $ty {
            fn accepts(kind: $crate::ValueKind) -> bool {
                kind == $crate::ValueKind::Map
            }

            fn bind_value(
                &mut self,
                value: &$crate::Value,
            ) -> ::std::result::Result<(), $crate::BindError> {
                $crate::record::bind_record(self, value)
            }
        }
    };
}
