use crate::errors::EditorError;
use crate::ops::{CreateList, CreateListSpec};
use crate::session::{EnqueueReport, Session, SessionContext};
use crate::style_registry::ListType;
use odt_document::Cursor;
use tracing::info;

/// Builds list operations for one member
#[derive(Debug, Clone)]
pub struct ListController {
    context: SessionContext,
}

impl ListController {
    pub fn new(context: SessionContext) -> Self {
        Self { context }
    }

    /// Create a list at the member's selection (position 0 without a cursor)
    pub fn add_list(
        &self,
        session: &mut Session,
        list_type: ListType,
    ) -> Result<EnqueueReport, EditorError> {
        let selection = session
            .document()
            .cursor(&self.context.member_id)
            .unwrap_or_default();
        self.add_list_at(session, selection, list_type)
    }

    /// Create a list at an explicit selection
    pub fn add_list_at(
        &self,
        session: &mut Session,
        selection: Cursor,
        list_type: ListType,
    ) -> Result<EnqueueReport, EditorError> {
        let op = CreateList::init(CreateListSpec {
            memberid: self.context.member_id.clone(),
            timestamp: None,
            position: selection.position,
            length: selection.length,
            list_type: list_type.to_string(),
        })?;

        let report = session.enqueue(vec![Box::new(op)])?;
        info!(
            member = %self.context.member_id,
            position = selection.position,
            %list_type,
            "List added"
        );
        Ok(report)
    }
}
