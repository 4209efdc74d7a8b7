//! Stream slicers: derive the slices a child stream reads.

mod cursor;
mod substream;

pub use cursor::SliceCursor;
pub use substream::{
    DuplicateFieldPolicy, ParentStreamConfig, SubstreamSlicer, SubstreamSlices,
};

use serde_json::{Map, Value};

use syncforge_types::errors::SlicerError;
use syncforge_types::protocol::{Record, RequestOptionType, StreamSlice, StreamState, SyncMode};

/// Boxed lazy sequence of derived child slices.
pub type ChildSliceIter<'a> = Box<dyn Iterator<Item = Result<StreamSlice, SlicerError>> + 'a>;

/// Derives the slices a child stream reads and the request values that go
/// with them.
///
/// State is explicit: callers thread a [`SliceCursor`] through
/// [`update_cursor`](StreamSlicer::update_cursor) and
/// [`request_options`](StreamSlicer::request_options) rather than relying
/// on a hidden mutable field, so one slicer instance can serve any number
/// of callers.
pub trait StreamSlicer {
    /// Lazily derive child slices for the given sync mode and state.
    ///
    /// The sequence is finite and not resumable mid-stream; restart by
    /// calling again with updated state.
    fn stream_slices<'a>(
        &'a self,
        sync_mode: SyncMode,
        stream_state: Option<&'a StreamState>,
    ) -> ChildSliceIter<'a>;

    /// Rebuild a cursor from scratch out of the given child slice.
    ///
    /// `last_record` is accepted but unused by the derivation itself;
    /// implementations may consult it.
    fn update_cursor(
        &self,
        stream_slice: &StreamSlice,
        last_record: Option<&Record>,
    ) -> SliceCursor;

    /// Values to inject into the given request target for the current
    /// cursor. Empty (never null) when nothing matches, so callers can
    /// merge unconditionally.
    fn request_options(
        &self,
        inject_into: RequestOptionType,
        cursor: &SliceCursor,
    ) -> Map<String, Value>;
}
