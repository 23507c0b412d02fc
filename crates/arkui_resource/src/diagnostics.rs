//! Resource-load diagnostics
//!
//! Every failed resolution appends a [`ResourceErrorRecord`] to a shared
//! [`ResourceErrorRecorder`]. The UI pipeline marks which node is being built with
//! [`with_current_node`] so records can be attributed to it.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

/// Cap on retained records; the oldest are dropped first
const MAX_RECORDS: usize = 1024;

/// One failed resource lookup
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceErrorRecord {
    /// UI node that requested the resource (-1 when unknown)
    pub node_id: i32,
    /// Requested id or name
    pub requested: String,
    /// Resource kind (`color`, `string`, `theme`, ...)
    pub kind: &'static str,
    /// Tag of the requesting UI node
    pub node_tag: String,
    /// Milliseconds since the Unix epoch
    pub timestamp_ms: u64,
    /// Platform status code
    pub error_code: u32,
}

#[derive(Clone, Debug, Default)]
struct CurrentNode {
    id: i32,
    tag: String,
}

thread_local! {
    static CURRENT_NODE: RefCell<Option<CurrentNode>> = const { RefCell::new(None) };
}

/// Run `f` with `(node_id, node_tag)` as the node that owns resource lookups on this thread
pub fn with_current_node<R>(node_id: i32, node_tag: &str, f: impl FnOnce() -> R) -> R {
    let previous = CURRENT_NODE.with(|cell| {
        cell.replace(Some(CurrentNode {
            id: node_id,
            tag: node_tag.to_string(),
        }))
    });
    let result = f();
    CURRENT_NODE.with(|cell| *cell.borrow_mut() = previous);
    result
}

fn current_node() -> CurrentNode {
    CURRENT_NODE
        .with(|cell| cell.borrow().clone())
        .unwrap_or(CurrentNode {
            id: -1,
            tag: String::new(),
        })
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Append-only sink for resource-load errors, shared by all adapters of a manager
#[derive(Debug, Default)]
pub struct ResourceErrorRecorder {
    records: Mutex<VecDeque<ResourceErrorRecord>>,
}

impl ResourceErrorRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure for the node currently in scope on this thread
    pub fn record(&self, requested: &str, kind: &'static str, error_code: u32) {
        let node = current_node();
        let record = ResourceErrorRecord {
            node_id: node.id,
            requested: requested.to_string(),
            kind,
            node_tag: node.tag,
            timestamp_ms: now_ms(),
            error_code,
        };
        let mut records = self.records.lock();
        if records.len() >= MAX_RECORDS {
            records.pop_front();
        }
        records.push_back(record);
    }

    /// Snapshot of the retained records
    pub fn records(&self) -> Vec<ResourceErrorRecord> {
        self.records.lock().iter().cloned().collect()
    }

    /// Take all retained records, leaving the sink empty
    pub fn drain(&self) -> Vec<ResourceErrorRecord> {
        Vec::from(std::mem::take(&mut *self.records.lock()))
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn records_are_attributed_to_the_current_node() {
        let recorder = ResourceErrorRecorder::new();
        recorder.record("orphan", "color", 9001002);
        with_current_node(42, "Text", || {
            recorder.record("app.string.title", "string", 9001004);
            with_current_node(7, "Image", || recorder.record("icon", "media", 9001002));
            recorder.record("subtitle", "string", 9001004);
        });

        let records = recorder.records();
        let owners: Vec<_> = records
            .iter()
            .map(|r| (r.node_id, r.node_tag.as_str(), r.requested.as_str()))
            .collect();
        assert_eq!(
            owners,
            vec![
                (-1, "", "orphan"),
                (42, "Text", "app.string.title"),
                (7, "Image", "icon"),
                (42, "Text", "subtitle"),
            ]
        );
        assert_eq!(records[1].error_code, 9001004);
    }

    #[test]
    fn drain_empties_the_sink() {
        let recorder = ResourceErrorRecorder::new();
        recorder.record("a", "color", 1);
        recorder.record("b", "color", 2);
        assert_eq!(recorder.len(), 2);
        assert_eq!(recorder.drain().len(), 2);
        assert!(recorder.is_empty());
    }

    #[test]
    fn oldest_records_are_dropped_at_capacity() {
        let recorder = ResourceErrorRecorder::new();
        for i in 0..MAX_RECORDS + 5 {
            recorder.record(&i.to_string(), "string", 0);
        }
        let records = recorder.records();
        assert_eq!(records.len(), MAX_RECORDS);
        assert_eq!(records[0].requested, "5");
        assert_eq!(records[MAX_RECORDS - 1].requested, (MAX_RECORDS + 4).to_string());

        recorder.record("newest", "string", 0);
        let drained = recorder.drain();
        assert_eq!(drained.len(), MAX_RECORDS);
        assert_eq!(drained[0].requested, "6");
        assert_eq!(drained[MAX_RECORDS - 1].requested, "newest");
    }
}
