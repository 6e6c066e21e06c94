//! # Edit Session
//!
//! The single authority that applies operations to a document.
//!
//! A batch goes through two phases:
//!
//! 1. **Stage** - clone the live document, then for each operation in order:
//!    stamp the timestamp, apply its prerequisites, execute it.
//! 2. **Commit** - swap the staged document in, append every applied spec to
//!    the log, deliver buffered signals, then `operations/executed`.
//!
//! Any error during staging drops the clone. The live document, the log and
//! subscribers never observe a partial batch.
//!
//! Operations are applied in arrival order. Concurrent batches are not
//! transformed against each other; a remote batch that no longer fits the
//! document (e.g. a style name taken in the meantime) is rejected whole.

use crate::errors::{EditorError, OpError};
use crate::events::{EventNotifier, SubscriptionId};
use crate::operation::Operation;
use crate::spec::OperationSpec;
use odt_document::{Document, DocumentSignal};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Identity of the local member, handed to command builders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub member_id: String,
}

impl SessionContext {
    pub fn new(member_id: impl Into<String>) -> Self {
        Self {
            member_id: member_id.into(),
        }
    }
}

/// Outcome of a committed batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnqueueReport {
    /// Log index of the first applied operation
    pub first_sequence: u64,
    /// Specs in application order, prerequisites included
    pub applied: Vec<OperationSpec>,
}

type Clock = Box<dyn Fn() -> u64 + Send>;

pub struct Session {
    document: Document,
    log: Vec<OperationSpec>,
    notifier: EventNotifier,
    clock: Clock,
}

impl Session {
    pub fn new(document: Document) -> Self {
        Self::with_clock(document, now_millis)
    }

    /// Start a session on a document stored as JSON
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EditorError> {
        Ok(Self::new(Document::load(path)?))
    }

    /// Use a custom timestamp source
    pub fn with_clock(document: Document, clock: impl Fn() -> u64 + Send + 'static) -> Self {
        Self {
            document,
            log: Vec::new(),
            notifier: EventNotifier::new(),
            clock: Box::new(clock),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    /// Every applied operation, in application order
    pub fn operation_log(&self) -> &[OperationSpec] {
        &self.log
    }

    /// Subscribe to one signal name, or to all signals with `None`
    pub fn subscribe(
        &mut self,
        signal: Option<&str>,
        handler: impl FnMut(&DocumentSignal) + Send + 'static,
    ) -> SubscriptionId {
        self.notifier.subscribe(signal, Box::new(handler))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    /// Apply a batch all-or-nothing
    #[instrument(skip_all, fields(batch = ops.len()))]
    pub fn enqueue(&mut self, ops: Vec<Box<dyn Operation>>) -> Result<EnqueueReport, EditorError> {
        let timestamp = (self.clock)();
        let mut staging = self.document.clone();
        let mut applied = Vec::new();

        for (index, mut op) in ops.into_iter().enumerate() {
            let optype = op.optype();
            let failed = |source: OpError| {
                warn!(index, optype, error = %source, "Batch rejected");
                EditorError::Batch {
                    index,
                    optype,
                    source,
                }
            };

            op.stamp(timestamp);
            for mut prerequisite in op.prerequisites(&staging).map_err(failed)? {
                prerequisite.stamp(timestamp);
                debug!(optype, prerequisite = prerequisite.optype(), "Applying prerequisite");
                prerequisite.execute(&mut staging).map_err(failed)?;
                applied.push(prerequisite.spec());
            }

            op.execute(&mut staging).map_err(failed)?;
            applied.push(op.spec());
        }

        Ok(self.commit(staging, applied))
    }

    /// Build operations from wire specs and apply them as one batch
    pub fn replay(&mut self, specs: Vec<OperationSpec>) -> Result<EnqueueReport, EditorError> {
        let ops = specs
            .into_iter()
            .enumerate()
            .map(|(index, spec)| {
                let optype = spec.optype();
                spec.into_operation().map_err(|source| EditorError::Batch {
                    index,
                    optype,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.enqueue(ops)
    }

    fn commit(&mut self, mut staging: Document, applied: Vec<OperationSpec>) -> EnqueueReport {
        let signals = staging.take_signals();
        self.document = staging;

        let first_sequence = self.log.len() as u64;
        self.log.extend(applied.iter().cloned());

        for signal in &signals {
            self.notifier.emit(signal);
        }
        self.notifier.emit(&DocumentSignal::OperationsExecuted {
            first_sequence,
            count: applied.len(),
        });

        info!(first_sequence, count = applied.len(), "Batch committed");
        EnqueueReport {
            first_sequence,
            applied,
        }
    }

    /// Write the operation log as a JSON array of specs
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save_log(&self, path: impl AsRef<Path>) -> Result<(), EditorError> {
        std::fs::write(path.as_ref(), serde_json::to_string_pretty(&self.log)?)?;
        Ok(())
    }
}

/// Read an operation log written by [`Session::save_log`]
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_log(path: impl AsRef<Path>) -> Result<Vec<OperationSpec>, EditorError> {
    let source = std::fs::read_to_string(path.as_ref())?;
    let specs: Vec<OperationSpec> = serde_json::from_str(&source)?;
    debug!(count = specs.len(), "Operation log loaded");
    Ok(specs)
}

fn now_millis() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::{AddCursor, AddCursorSpec, MoveCursor, MoveCursorSpec};
    use std::sync::{Arc, Mutex};

    fn add_cursor(member: &str) -> Box<dyn Operation> {
        Box::new(
            AddCursor::init(AddCursorSpec {
                memberid: member.to_string(),
                timestamp: None,
            })
            .unwrap(),
        )
    }

    fn move_cursor(member: &str, position: usize) -> Box<dyn Operation> {
        Box::new(
            MoveCursor::init(MoveCursorSpec {
                memberid: member.to_string(),
                timestamp: None,
                position,
                length: 0,
            })
            .unwrap(),
        )
    }

    #[test]
    fn test_enqueue_stamps_missing_timestamps() {
        let mut session = Session::with_clock(Document::new(), || 1234);

        let report = session.enqueue(vec![add_cursor("alice")]).unwrap();

        assert_eq!(report.first_sequence, 0);
        assert_eq!(
            report.applied,
            vec![OperationSpec::AddCursor(AddCursorSpec {
                memberid: "alice".to_string(),
                timestamp: Some(1234),
            })]
        );
        assert_eq!(session.operation_log(), report.applied.as_slice());
    }

    #[test]
    fn test_failed_batch_changes_nothing() {
        let mut session = Session::with_clock(Document::from_paragraphs(&["abc"]), || 1);
        let signals = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&signals);
        session.subscribe(None, move |_| *counter.lock().unwrap() += 1);

        let result = session.enqueue(vec![add_cursor("alice"), move_cursor("alice", 99)]);

        match result {
            Err(EditorError::Batch { index, optype, .. }) => {
                assert_eq!(index, 1);
                assert_eq!(optype, "MoveCursor");
            }
            other => panic!("expected batch error, got {:?}", other),
        }
        assert!(session.document().cursor("alice").is_none());
        assert!(session.operation_log().is_empty());
        assert_eq!(*signals.lock().unwrap(), 0);
    }

    #[test]
    fn test_signals_follow_commit() {
        let mut session = Session::with_clock(Document::new(), || 1);
        let names = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&names);
        session.subscribe(None, move |signal| log.lock().unwrap().push(signal.name()));

        session.enqueue(vec![add_cursor("alice")]).unwrap();

        assert_eq!(
            *names.lock().unwrap(),
            vec!["cursor/moved", "operations/executed"]
        );
    }

    #[test]
    fn test_replay_reports_bad_spec_index() {
        let mut session = Session::new(Document::new());
        let specs = vec![
            OperationSpec::AddCursor(AddCursorSpec {
                memberid: "alice".to_string(),
                timestamp: Some(1),
            }),
            OperationSpec::AddCursor(AddCursorSpec {
                memberid: String::new(),
                timestamp: Some(1),
            }),
        ];

        let err = session.replay(specs).unwrap_err();

        assert!(matches!(err, EditorError::Batch { index: 1, .. }));
        assert!(session.operation_log().is_empty());
    }
}
