//! Error model for the slicing SDK.

/// Errors produced by slicer construction and iteration.
///
/// Construction is the only validated precondition; everything else a
/// slicer encounters (missing keys, empty parent slices, absent request
/// options) degrades to null/empty values instead of erroring. Errors
/// raised by a parent stream pass through unmodified as [`Parent`].
///
/// [`Parent`]: SlicerError::Parent
#[derive(Debug, thiserror::Error)]
pub enum SlicerError {
    /// The slicer was constructed with an empty parent config list.
    #[error("substream slicer requires at least one parent stream config")]
    NoParentStreams,

    /// Two parent configs declare the same `stream_slice_field` and the
    /// duplicate policy rejects collisions.
    #[error("duplicate stream_slice_field `{0}` across parent stream configs")]
    DuplicateSliceField(String),

    /// Failure surfaced by a parent stream while listing slices or
    /// reading records.
    #[error(transparent)]
    Parent(#[from] anyhow::Error),
}
