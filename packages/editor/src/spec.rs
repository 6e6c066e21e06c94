//! # Operation Specs
//!
//! Wire form of every operation. A spec is what travels between members,
//! what the session logs and what replay reads back.
//!
//! ```json
//! {"optype":"CreateList","memberid":"alice","timestamp":1700000000000,
//!  "position":0,"length":0,"listType":"bullet"}
//! ```

use crate::errors::OpError;
use crate::operation::Operation;
use crate::ops::{
    AddCursor, AddCursorSpec, AddStyle, AddStyleSpec, CreateList, CreateListSpec, InsertImage,
    InsertImageSpec, MoveCursor, MoveCursorSpec, SetBlob, SetBlobSpec,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "optype")]
pub enum OperationSpec {
    AddCursor(AddCursorSpec),
    MoveCursor(MoveCursorSpec),
    AddStyle(AddStyleSpec),
    CreateList(CreateListSpec),
    SetBlob(SetBlobSpec),
    InsertImage(InsertImageSpec),
}

impl OperationSpec {
    pub fn optype(&self) -> &'static str {
        match self {
            OperationSpec::AddCursor(_) => "AddCursor",
            OperationSpec::MoveCursor(_) => "MoveCursor",
            OperationSpec::AddStyle(_) => "AddStyle",
            OperationSpec::CreateList(_) => "CreateList",
            OperationSpec::SetBlob(_) => "SetBlob",
            OperationSpec::InsertImage(_) => "InsertImage",
        }
    }

    pub fn member_id(&self) -> &str {
        match self {
            OperationSpec::AddCursor(spec) => &spec.memberid,
            OperationSpec::MoveCursor(spec) => &spec.memberid,
            OperationSpec::AddStyle(spec) => &spec.memberid,
            OperationSpec::CreateList(spec) => &spec.memberid,
            OperationSpec::SetBlob(spec) => &spec.memberid,
            OperationSpec::InsertImage(spec) => &spec.memberid,
        }
    }

    /// Validate the payload and build the operation it describes
    pub fn into_operation(self) -> Result<Box<dyn Operation>, OpError> {
        let op: Box<dyn Operation> = match self {
            OperationSpec::AddCursor(spec) => Box::new(AddCursor::init(spec)?),
            OperationSpec::MoveCursor(spec) => Box::new(MoveCursor::init(spec)?),
            OperationSpec::AddStyle(spec) => Box::new(AddStyle::init(spec)?),
            OperationSpec::CreateList(spec) => Box::new(CreateList::init(spec)?),
            OperationSpec::SetBlob(spec) => Box::new(SetBlob::init(spec)?),
            OperationSpec::InsertImage(spec) => Box::new(InsertImage::init(spec)?),
        };
        Ok(op)
    }
}
