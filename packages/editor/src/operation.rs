use crate::errors::{OpError, StateError};
use crate::spec::OperationSpec;
use odt_document::Document;
use std::fmt;

/// Trait for document operations
///
/// Each operation type implements this trait to provide:
/// - Execution against the document (apply-or-abort)
/// - Prerequisite operations the session must apply first
/// - The wire spec used for transmission, logging and replay
pub trait Operation: fmt::Debug + Send {
    /// Wire name of the operation, e.g. `CreateList`
    fn optype(&self) -> &'static str;

    fn header(&self) -> &OpHeader;

    fn header_mut(&mut self) -> &mut OpHeader;

    /// Operations that must land right before this one.
    ///
    /// Computed against the document state the operation will see.
    fn prerequisites(&self, _doc: &Document) -> Result<Vec<Box<dyn Operation>>, OpError> {
        Ok(Vec::new())
    }

    /// Apply this operation to the document.
    ///
    /// Every precondition is checked before the first structural edit, so an
    /// error leaves the document as it was.
    fn execute(&mut self, doc: &mut Document) -> Result<(), OpError>;

    /// Serializable representation of this operation
    fn spec(&self) -> OperationSpec;

    fn member_id(&self) -> &str {
        &self.header().memberid
    }

    fn timestamp(&self) -> Option<u64> {
        self.header().timestamp
    }

    /// Fill in the timestamp if none was given at init time
    fn stamp(&mut self, timestamp: u64) {
        let header = self.header_mut();
        if header.timestamp.is_none() {
            header.timestamp = Some(timestamp);
        }
    }

    fn is_applied(&self) -> bool {
        self.header().applied
    }
}

/// Fields shared by every operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpHeader {
    pub(crate) memberid: String,
    pub(crate) timestamp: Option<u64>,
    applied: bool,
}

impl OpHeader {
    pub fn new(memberid: String, timestamp: Option<u64>) -> Result<Self, OpError> {
        if memberid.trim().is_empty() {
            return Err(OpError::Validation("memberid must not be empty".to_string()));
        }

        Ok(Self {
            memberid,
            timestamp,
            applied: false,
        })
    }

    /// Reject a second execution of the same instance, or one that was
    /// never stamped
    pub(crate) fn ensure_pending(&self, optype: &'static str) -> Result<(), OpError> {
        if self.applied {
            return Err(StateError::AlreadyApplied(optype).into());
        }
        if self.timestamp.is_none() {
            return Err(StateError::NotStamped(optype).into());
        }
        Ok(())
    }

    pub(crate) fn mark_applied(&mut self) {
        self.applied = true;
    }
}

pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<(), OpError> {
    if value.trim().is_empty() {
        return Err(OpError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}
