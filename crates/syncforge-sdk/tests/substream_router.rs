//! Integration tests for substream slicing over multiple parents.

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::{json, Map, Value};
use syncforge_sdk::prelude::*;

type CallLog = Rc<RefCell<Vec<(SyncMode, bool)>>>;

/// Parent stream backed by fixed slices and per-slice records, recording
/// the sync mode and state of every call.
struct RecordingParent {
    name: String,
    slices: Vec<StreamSlice>,
    records: Vec<Vec<Record>>,
    slice_calls: CallLog,
    record_calls: CallLog,
}

impl RecordingParent {
    fn new(name: &str, slices: Vec<Value>, records: Vec<Vec<Value>>) -> Self {
        Self {
            name: name.to_string(),
            slices: slices.into_iter().map(obj).collect(),
            records: records
                .into_iter()
                .map(|rs| rs.into_iter().map(obj).collect())
                .collect(),
            slice_calls: CallLog::default(),
            record_calls: CallLog::default(),
        }
    }
}

impl ParentStream for RecordingParent {
    fn name(&self) -> &str {
        &self.name
    }

    fn stream_slices(
        &self,
        sync_mode: SyncMode,
        _cursor_field: Option<&str>,
        stream_state: Option<&StreamState>,
    ) -> SliceIter<'_> {
        self.slice_calls
            .borrow_mut()
            .push((sync_mode, stream_state.is_some()));
        Box::new(self.slices.iter().cloned().map(Ok))
    }

    fn read_records(
        &self,
        sync_mode: SyncMode,
        _cursor_field: Option<&str>,
        stream_slice: &StreamSlice,
        stream_state: Option<&StreamState>,
    ) -> RecordIter<'_> {
        self.record_calls
            .borrow_mut()
            .push((sync_mode, stream_state.is_some()));
        match self.slices.iter().position(|s| s == stream_slice) {
            Some(idx) => Box::new(self.records[idx].iter().cloned().map(Ok)),
            None => Box::new(std::iter::empty()),
        }
    }
}

/// Parent stream whose record iterator fails after one record.
struct FailingParent;

impl ParentStream for FailingParent {
    fn name(&self) -> &str {
        "failing"
    }

    fn stream_slices(
        &self,
        _sync_mode: SyncMode,
        _cursor_field: Option<&str>,
        _stream_state: Option<&StreamState>,
    ) -> SliceIter<'_> {
        Box::new(std::iter::once(Ok(Map::new())))
    }

    fn read_records(
        &self,
        _sync_mode: SyncMode,
        _cursor_field: Option<&str>,
        _stream_slice: &StreamSlice,
        _stream_state: Option<&StreamState>,
    ) -> RecordIter<'_> {
        Box::new(
            vec![
                Ok(obj(json!({"id": 1}))),
                Err(anyhow::anyhow!("connection reset")),
            ]
            .into_iter(),
        )
    }
}

fn obj(value: Value) -> Map<String, Value> {
    value.as_object().cloned().expect("object literal")
}

#[test]
fn slices_are_emitted_depth_first_across_parents() {
    let accounts = RecordingParent::new(
        "accounts",
        vec![json!({"region": "eu"}), json!({"region": "us"})],
        vec![
            vec![json!({"id": "a-1"}), json!({"id": "a-2"})],
            vec![],
        ],
    );
    let projects = RecordingParent::new(
        "projects",
        vec![json!({})],
        vec![vec![json!({"uuid": "p-1"})]],
    );

    let slicer = SubstreamSlicer::new(vec![
        ParentStreamConfig::new(Box::new(accounts), "id", "account_id"),
        ParentStreamConfig::new(Box::new(projects), "uuid", "project_id"),
    ])
    .expect("non-empty config");

    let slices: Vec<StreamSlice> = slicer
        .stream_slices(SyncMode::Incremental, None)
        .collect::<Result<_, _>>()
        .expect("no parent errors");

    // Config order, then slice order, then record order; one fallback for
    // the empty second slice of `accounts`.
    assert_eq!(
        slices,
        vec![
            obj(json!({"account_id": "a-1", "parent_slice": {"region": "eu"}})),
            obj(json!({"account_id": "a-2", "parent_slice": {"region": "eu"}})),
            obj(json!({"account_id": null, "parent_slice": {"region": "us"}})),
            obj(json!({"project_id": "p-1", "parent_slice": {}})),
        ]
    );
}

#[test]
fn slice_listing_sees_caller_mode_and_state() {
    let parent = RecordingParent::new("accounts", vec![json!({})], vec![vec![json!({"id": 1})]]);
    let slice_calls = parent.slice_calls.clone();
    let record_calls = parent.record_calls.clone();
    let state = obj(json!({"account_id": 42}));

    let slicer = SubstreamSlicer::new(vec![ParentStreamConfig::new(
        Box::new(parent),
        "id",
        "account_id",
    )])
    .expect("non-empty config");

    let _ = slicer
        .stream_slices(SyncMode::Incremental, Some(&state))
        .count();

    // `stream_slices` receives the caller's mode and state unmodified.
    assert_eq!(*slice_calls.borrow(), vec![(SyncMode::Incremental, true)]);
    // `read_records` is forced to full refresh with no incoming state.
    assert_eq!(*record_calls.borrow(), vec![(SyncMode::FullRefresh, false)]);
}

#[test]
fn parent_error_surfaces_and_ends_the_sequence() {
    let slicer = SubstreamSlicer::new(vec![ParentStreamConfig::new(
        Box::new(FailingParent),
        "id",
        "id",
    )])
    .expect("non-empty config");

    let mut slices = slicer.stream_slices(SyncMode::FullRefresh, None);

    let first = slices.next().expect("first record").expect("ok");
    assert_eq!(first, obj(json!({"id": 1, "parent_slice": {}})));

    let err = slices.next().expect("error item").expect_err("must fail");
    assert!(matches!(err, SlicerError::Parent(_)));
    assert_eq!(err.to_string(), "connection reset");

    assert!(slices.next().is_none(), "sequence ends after an error");
}

#[test]
fn slicer_is_usable_as_trait_object() {
    let parent = RecordingParent::new("accounts", vec![json!({})], vec![vec![json!({"id": 9})]]);
    let slicer = SubstreamSlicer::new(vec![ParentStreamConfig::new(
        Box::new(parent),
        "id",
        "account_id",
    )
    .with_request_option(RequestOption::new(RequestOptionType::RequestParameter))])
    .expect("non-empty config");

    let slicer: &dyn StreamSlicer = &slicer;
    let slices: Vec<StreamSlice> = slicer
        .stream_slices(SyncMode::FullRefresh, None)
        .collect::<Result<_, _>>()
        .expect("no parent errors");
    assert_eq!(slices.len(), 1);

    let cursor = slicer.update_cursor(&slices[0], None);
    let params = slicer.request_options(RequestOptionType::RequestParameter, &cursor);
    assert_eq!(params, obj(json!({"account_id": 9})));
}
