//! Member cursor registration and movement.

use crate::errors::OpError;
use crate::operation::{OpHeader, Operation};
use crate::spec::OperationSpec;
use odt_document::{Cursor, Document, DocumentSignal};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCursorSpec {
    pub memberid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
}

/// Register the member's cursor at position 0
#[derive(Debug)]
pub struct AddCursor {
    header: OpHeader,
}

impl AddCursor {
    pub fn init(spec: AddCursorSpec) -> Result<Self, OpError> {
        Ok(Self {
            header: OpHeader::new(spec.memberid, spec.timestamp)?,
        })
    }
}

impl Operation for AddCursor {
    fn optype(&self) -> &'static str {
        "AddCursor"
    }

    fn header(&self) -> &OpHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut OpHeader {
        &mut self.header
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), OpError> {
        self.header.ensure_pending(self.optype())?;

        let member = &self.header.memberid;
        if doc.cursor(member).is_some() {
            return Err(OpError::Conflict(format!(
                "member '{}' already has a cursor",
                member
            )));
        }

        doc.set_cursor(member.clone(), Cursor::default());
        doc.emit(DocumentSignal::CursorMoved {
            member_id: member.clone(),
        });

        self.header.mark_applied();
        Ok(())
    }

    fn spec(&self) -> OperationSpec {
        OperationSpec::AddCursor(AddCursorSpec {
            memberid: self.header.memberid.clone(),
            timestamp: self.header.timestamp,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCursorSpec {
    pub memberid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    pub position: usize,
    #[serde(default)]
    pub length: usize,
}

/// Move the member's selection
#[derive(Debug)]
pub struct MoveCursor {
    header: OpHeader,
    cursor: Cursor,
}

impl MoveCursor {
    pub fn init(spec: MoveCursorSpec) -> Result<Self, OpError> {
        Ok(Self {
            header: OpHeader::new(spec.memberid, spec.timestamp)?,
            cursor: Cursor {
                position: spec.position,
                length: spec.length,
            },
        })
    }
}

impl Operation for MoveCursor {
    fn optype(&self) -> &'static str {
        "MoveCursor"
    }

    fn header(&self) -> &OpHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut OpHeader {
        &mut self.header
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), OpError> {
        self.header.ensure_pending(self.optype())?;

        let member = &self.header.memberid;
        if doc.cursor(member).is_none() {
            return Err(OpError::Conflict(format!(
                "member '{}' has no cursor",
                member
            )));
        }
        doc.check_range(self.cursor.position, self.cursor.length)?;

        doc.set_cursor(member.clone(), self.cursor);
        doc.emit(DocumentSignal::CursorMoved {
            member_id: member.clone(),
        });

        self.header.mark_applied();
        Ok(())
    }

    fn spec(&self) -> OperationSpec {
        OperationSpec::MoveCursor(MoveCursorSpec {
            memberid: self.header.memberid.clone(),
            timestamp: self.header.timestamp,
            position: self.cursor.position,
            length: self.cursor.length,
        })
    }
}
