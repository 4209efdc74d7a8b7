//! Explicit slice cursor threaded through slicer calls.

use serde_json::{Map, Value};

use syncforge_types::protocol::StreamState;

/// Snapshot of the most recently observed slice values, keyed by each
/// parent config's `stream_slice_field`.
///
/// Owned by the caller and rebuilt wholesale on every
/// [`update_cursor`](crate::slicer::StreamSlicer::update_cursor) call;
/// the slicer itself holds no cursor state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SliceCursor(Map<String, Value>);

impl SliceCursor {
    /// An empty cursor, as at the start of a sync.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the value recorded for a slice field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The cursor as emittable stream state.
    ///
    /// Returns `None` when the cursor is empty, distinguishing "nothing
    /// observed" from a populated snapshot.
    #[must_use]
    pub fn stream_state(&self) -> Option<StreamState> {
        if self.0.is_empty() {
            None
        } else {
            Some(self.0.clone())
        }
    }

    pub(crate) fn insert(&mut self, field: String, value: Value) {
        self.0.insert(field, value);
    }
}

impl From<Map<String, Value>> for SliceCursor {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
