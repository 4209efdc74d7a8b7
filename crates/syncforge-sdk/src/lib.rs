//! Declarative stream-slicing SDK for parent/child stream pairs.
//!
//! Provides the [`ParentStream`](stream::ParentStream) collaborator seam,
//! the [`StreamSlicer`](slicer::StreamSlicer) trait, and the
//! [`SubstreamSlicer`](slicer::SubstreamSlicer) implementation that derives
//! one child slice per parent record.

pub mod prelude;
pub mod slicer;
pub mod stream;
