//! Opaque record, slice, and state mappings.
//!
//! The declarative layer treats all three as plain field→value mappings;
//! their structure belongs to the streams that produce them.

use serde_json::{Map, Value};

/// A single record produced by a stream.
pub type Record = Map<String, Value>;

/// An opaque descriptor defining one partition of work for a stream to read
/// (e.g. a date range or parent-id scope).
pub type StreamSlice = Map<String, Value>;

/// Stream state as exchanged with the platform.
pub type StreamState = Map<String, Value>;

/// Reserved key under which a derived child slice carries its parent's
/// slice token.
pub const PARENT_SLICE_FIELD: &str = "parent_slice";

/// Whether a value counts as empty for cursor and request-option purposes.
///
/// Null, `""`, `[]`, and `{}` are empty. Numbers and booleans are always
/// kept, including `0` and `false`.
#[must_use]
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
