//! Convenience re-exports for connector authors.
//!
//! ```ignore
//! use syncforge_sdk::prelude::*;
//! ```

// Slicing
pub use crate::slicer::{
    ChildSliceIter, DuplicateFieldPolicy, ParentStreamConfig, SliceCursor, StreamSlicer,
    SubstreamSlicer,
};

// Parent stream seam
pub use crate::stream::{ParentStream, RecordIter, SliceIter};

// Errors
pub use syncforge_types::errors::SlicerError;

// Protocol types
pub use syncforge_types::protocol::{
    Record, RequestOption, RequestOptionType, StreamSlice, StreamState, SyncMode,
    PARENT_SLICE_FIELD,
};
