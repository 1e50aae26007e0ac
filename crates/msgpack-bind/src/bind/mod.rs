//! Projects a decoded [`Value`] onto typed destinations.
//!
//! A destination is anything implementing [`Bind`]. [`bind`] takes an
//! ordered list of candidate destinations and populates the first one the
//! value is structurally compatible with. An implementation builds its
//! result in a scratch value and only assigns it to `self` once the whole
//! value has bound, so a rejected candidate is never partially written.
//! Records are the one exception: a map whose entries fail to line up with
//! the record's fields resets the record to its default.
//!
//! ```
//! use msgpack_bind::{bind, Bind, Value};
//!
//! let value = Value::from("hello");
//! let mut count = 0u32;
//! let mut text = String::new();
//! let index = bind(&value, &mut [&mut count, &mut text]).unwrap();
//! assert_eq!(index, 1);
//! assert_eq!(count, 0);
//! assert_eq!(text, "hello");
//! ```

mod collections;
mod scalar;

use tracing::{debug, trace};

use crate::error::BindError;
use crate::value::{ElementType, Value, ValueKind};

/// A typed slot a [`Value`] can be bound into.
pub trait Bind {
    /// Whether a value of `kind` can bind into this type at all.
    ///
    /// Containers consult this against the narrowed element type of an
    /// array (or the key/value types of a map) before binding any element.
    fn accepts(kind: ValueKind) -> bool
    where
        Self: Sized;

    /// Populates `self` from `value`.
    ///
    /// On error `self` is left exactly as it was, except that a record
    /// given a map it cannot bind is reset to its default.
    fn bind_value(&mut self, value: &Value) -> Result<(), BindError>;
}

/// Binds `value` into the first compatible destination and returns its
/// index.
///
/// Candidates are tried in order; a rejected candidate never stops the
/// scan. When nothing matches the result is
/// [`BindError::NoCompatibleDestination`].
pub fn bind(value: &Value, destinations: &mut [&mut dyn Bind]) -> Result<usize, BindError> {
    for (index, destination) in destinations.iter_mut().enumerate() {
        match destination.bind_value(value) {
            Ok(()) => {
                trace!(index, kind = %value.kind(), "bound value");
                return Ok(index);
            }
            Err(err) => trace!(index, "destination rejected: {err}"),
        }
    }
    debug!(
        kind = %value.kind(),
        candidates = destinations.len(),
        "no compatible destination"
    );
    Err(BindError::NoCompatibleDestination)
}

/// [`bind`] reporting failure as `-1` instead of an error.
pub fn bind_index(value: &Value, destinations: &mut [&mut dyn Bind]) -> isize {
    match bind(value, destinations) {
        Ok(index) => index as isize,
        Err(_) => -1,
    }
}

/// Whether the children summarized by `narrowed` can all bind into `T`.
///
/// An empty container is compatible with every element type. A mixed one
/// is compatible only if `T` accepts each child's kind, which in practice
/// means a generic destination such as [`Value`] or `Option<_>`.
pub(crate) fn elements_accepted<'a, T, I>(narrowed: ElementType, kinds: I) -> bool
where
    T: Bind,
    I: IntoIterator<Item = &'a Value>,
{
    match narrowed {
        ElementType::Empty => true,
        ElementType::Uniform(kind) => T::accepts(kind),
        ElementType::Mixed => kinds.into_iter().all(|v| T::accepts(v.kind())),
    }
}
