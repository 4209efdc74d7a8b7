//! Parent stream collaborator seam.
//!
//! The slicing layer never owns I/O: it consumes slices and records from a
//! [`ParentStream`] and leaves resource lifetimes, buffering, and retries
//! to the implementation.

use anyhow::Result;

use syncforge_types::protocol::{Record, StreamSlice, StreamState, SyncMode};

/// Boxed lazy sequence of parent slices.
pub type SliceIter<'a> = Box<dyn Iterator<Item = Result<StreamSlice>> + 'a>;

/// Boxed lazy sequence of parent records.
pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<Record>> + 'a>;

/// A stream whose slices and records drive child slice derivation.
///
/// Errors yielded by either iterator propagate unmodified to the slicing
/// caller.
pub trait ParentStream {
    /// Stream name, used for logging.
    fn name(&self) -> &str;

    /// Enumerate this stream's slices under the given sync mode and state.
    fn stream_slices(
        &self,
        sync_mode: SyncMode,
        cursor_field: Option<&str>,
        stream_state: Option<&StreamState>,
    ) -> SliceIter<'_>;

    /// Read the records of one slice.
    fn read_records(
        &self,
        sync_mode: SyncMode,
        cursor_field: Option<&str>,
        stream_slice: &StreamSlice,
        stream_state: Option<&StreamState>,
    ) -> RecordIter<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Verify the trait is object-safe (can be used as `dyn ParentStream`).
    #[test]
    fn trait_is_object_safe() {
        fn _assert_object_safe(_: &dyn ParentStream) {}
    }
}
