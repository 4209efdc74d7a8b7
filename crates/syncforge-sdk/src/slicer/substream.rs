//! Substream slicer: one child slice per parent record.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use syncforge_types::errors::SlicerError;
use syncforge_types::protocol::{
    is_empty_value, Record, RequestOption, RequestOptionType, StreamSlice, StreamState, SyncMode,
    PARENT_SLICE_FIELD,
};

use crate::slicer::{ChildSliceIter, SliceCursor, StreamSlicer};
use crate::stream::{ParentStream, RecordIter, SliceIter};

/// Describes how to derive child slices from one parent stream.
pub struct ParentStreamConfig {
    /// The stream to read parent slices and records from.
    pub stream: Box<dyn ParentStream>,
    /// Field read from each parent record.
    pub parent_key: String,
    /// Field written into each derived child slice.
    pub stream_slice_field: String,
    /// Where to inject the derived value on outgoing requests.
    pub request_option: Option<RequestOption>,
}

impl ParentStreamConfig {
    #[must_use]
    pub fn new(
        stream: Box<dyn ParentStream>,
        parent_key: impl Into<String>,
        stream_slice_field: impl Into<String>,
    ) -> Self {
        Self {
            stream,
            parent_key: parent_key.into(),
            stream_slice_field: stream_slice_field.into(),
            request_option: None,
        }
    }

    /// Attach a request injection target for the derived value.
    #[must_use]
    pub fn with_request_option(mut self, request_option: RequestOption) -> Self {
        self.request_option = Some(request_option);
        self
    }
}

/// How to treat two parent configs sharing a `stream_slice_field`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicateFieldPolicy {
    /// The later config's value wins in the cursor.
    #[default]
    Overwrite,
    /// Fail construction with [`SlicerError::DuplicateSliceField`].
    Reject,
}

/// Iterates configured parent streams and derives one child slice per
/// parent record, plus one fallback slice per parent slice that yields no
/// records.
pub struct SubstreamSlicer {
    parent_stream_configs: Vec<ParentStreamConfig>,
}

impl SubstreamSlicer {
    /// Build a slicer over the given parent configs, in order.
    ///
    /// # Errors
    ///
    /// Returns [`SlicerError::NoParentStreams`] if `configs` is empty.
    pub fn new(configs: Vec<ParentStreamConfig>) -> Result<Self, SlicerError> {
        Self::with_duplicate_policy(configs, DuplicateFieldPolicy::Overwrite)
    }

    /// Build a slicer with an explicit duplicate-field policy.
    ///
    /// # Errors
    ///
    /// Returns [`SlicerError::NoParentStreams`] if `configs` is empty, or
    /// [`SlicerError::DuplicateSliceField`] under
    /// [`DuplicateFieldPolicy::Reject`] when two configs share a
    /// `stream_slice_field`.
    pub fn with_duplicate_policy(
        configs: Vec<ParentStreamConfig>,
        policy: DuplicateFieldPolicy,
    ) -> Result<Self, SlicerError> {
        if configs.is_empty() {
            return Err(SlicerError::NoParentStreams);
        }
        if policy == DuplicateFieldPolicy::Reject {
            let mut seen = HashSet::new();
            for config in &configs {
                if !seen.insert(config.stream_slice_field.as_str()) {
                    return Err(SlicerError::DuplicateSliceField(
                        config.stream_slice_field.clone(),
                    ));
                }
            }
        }
        Ok(Self {
            parent_stream_configs: configs,
        })
    }

    /// Values targeting query parameters for the current cursor.
    #[must_use]
    pub fn request_params(&self, cursor: &SliceCursor) -> Map<String, Value> {
        self.request_options(RequestOptionType::RequestParameter, cursor)
    }

    /// Values targeting request headers for the current cursor.
    #[must_use]
    pub fn request_headers(&self, cursor: &SliceCursor) -> Map<String, Value> {
        self.request_options(RequestOptionType::Header, cursor)
    }

    /// Values targeting the form-encoded request body for the current cursor.
    #[must_use]
    pub fn request_body_data(&self, cursor: &SliceCursor) -> Map<String, Value> {
        self.request_options(RequestOptionType::BodyData, cursor)
    }

    /// Values targeting the JSON request body for the current cursor.
    #[must_use]
    pub fn request_body_json(&self, cursor: &SliceCursor) -> Map<String, Value> {
        self.request_options(RequestOptionType::BodyJson, cursor)
    }
}

impl StreamSlicer for SubstreamSlicer {
    fn stream_slices<'a>(
        &'a self,
        sync_mode: SyncMode,
        stream_state: Option<&'a StreamState>,
    ) -> ChildSliceIter<'a> {
        Box::new(SubstreamSlices {
            configs: &self.parent_stream_configs,
            sync_mode,
            stream_state,
            config_idx: 0,
            parent_slices: None,
            current: None,
        })
    }

    fn update_cursor(
        &self,
        stream_slice: &StreamSlice,
        _last_record: Option<&Record>,
    ) -> SliceCursor {
        // Rebuilt wholesale: fields absent or empty in `stream_slice` are
        // dropped, not carried over from any previous cursor.
        let mut cursor = SliceCursor::new();
        for config in &self.parent_stream_configs {
            if let Some(value) = stream_slice.get(&config.stream_slice_field) {
                if !is_empty_value(value) {
                    cursor.insert(config.stream_slice_field.clone(), value.clone());
                }
            }
        }
        cursor
    }

    fn request_options(
        &self,
        inject_into: RequestOptionType,
        cursor: &SliceCursor,
    ) -> Map<String, Value> {
        let mut options = Map::new();
        for config in &self.parent_stream_configs {
            let Some(request_option) = &config.request_option else {
                continue;
            };
            if request_option.inject_into != inject_into {
                continue;
            }
            if let Some(value) = cursor.get(&config.stream_slice_field) {
                if !is_empty_value(value) {
                    options.insert(config.stream_slice_field.clone(), value.clone());
                }
            }
        }
        options
    }
}

/// Lazy child-slice sequence: depth-first per config, per parent slice,
/// per record. A parent error ends the sequence after it is yielded.
pub struct SubstreamSlices<'a> {
    configs: &'a [ParentStreamConfig],
    sync_mode: SyncMode,
    stream_state: Option<&'a StreamState>,
    config_idx: usize,
    parent_slices: Option<SliceIter<'a>>,
    current: Option<SliceInProgress<'a>>,
}

struct SliceInProgress<'a> {
    records: RecordIter<'a>,
    parent_slice: StreamSlice,
    saw_record: bool,
}

impl SubstreamSlices<'_> {
    fn fail(&mut self, err: anyhow::Error) -> Option<Result<StreamSlice, SlicerError>> {
        self.current = None;
        self.parent_slices = None;
        self.config_idx = self.configs.len();
        Some(Err(SlicerError::Parent(err)))
    }
}

impl Iterator for SubstreamSlices<'_> {
    type Item = Result<StreamSlice, SlicerError>;

    fn next(&mut self) -> Option<Self::Item> {
        // Copy the slice reference out so iterators borrowed from a config
        // live for 'a rather than for the &mut self borrow.
        let configs = self.configs;
        loop {
            if let Some(mut in_progress) = self.current.take() {
                let config = &configs[self.config_idx];
                match in_progress.records.next() {
                    Some(Ok(record)) => {
                        in_progress.saw_record = true;
                        let value = record
                            .get(&config.parent_key)
                            .cloned()
                            .unwrap_or(Value::Null);
                        let slice = child_slice(config, value, &in_progress.parent_slice);
                        self.current = Some(in_progress);
                        return Some(Ok(slice));
                    }
                    Some(Err(err)) => return self.fail(err),
                    None => {
                        if !in_progress.saw_record {
                            debug!(
                                stream = config.stream.name(),
                                "parent slice yielded no records, emitting fallback slice"
                            );
                            let value = in_progress
                                .parent_slice
                                .get(&config.parent_key)
                                .cloned()
                                .unwrap_or(Value::Null);
                            return Some(Ok(child_slice(
                                config,
                                value,
                                &in_progress.parent_slice,
                            )));
                        }
                    }
                }
                continue;
            }

            if self.parent_slices.is_some() {
                let config = &configs[self.config_idx];
                match self.parent_slices.as_mut().and_then(|slices| slices.next()) {
                    Some(Ok(parent_slice)) => {
                        // Parent records are always re-read from scratch:
                        // full refresh, no cursor field, no incoming state.
                        let records = config.stream.read_records(
                            SyncMode::FullRefresh,
                            None,
                            &parent_slice,
                            None,
                        );
                        self.current = Some(SliceInProgress {
                            records,
                            parent_slice,
                            saw_record: false,
                        });
                    }
                    Some(Err(err)) => return self.fail(err),
                    None => {
                        self.parent_slices = None;
                        self.config_idx += 1;
                    }
                }
                continue;
            }

            let config = configs.get(self.config_idx)?;
            trace!(stream = config.stream.name(), "iterating parent stream");
            self.parent_slices =
                Some(config.stream.stream_slices(self.sync_mode, None, self.stream_state));
        }
    }
}

fn child_slice(
    config: &ParentStreamConfig,
    value: Value,
    parent_slice: &StreamSlice,
) -> StreamSlice {
    let mut slice = Map::with_capacity(2);
    slice.insert(config.stream_slice_field.clone(), value);
    slice.insert(
        PARENT_SLICE_FIELD.to_string(),
        Value::Object(parent_slice.clone()),
    );
    slice
}
