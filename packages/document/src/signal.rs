use crate::{NodeId, StyleFamily};
use serde::Serialize;

/// Change notifications raised while operations execute.
///
/// The document only buffers them; whoever owns the document decides when
/// (and whether) they reach subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "signal", rename_all = "camelCase")]
pub enum DocumentSignal {
    /// A paragraph's content or ancestry changed
    ParagraphChanged {
        paragraph: NodeId,
        member_id: String,
        timestamp: Option<u64>,
    },

    /// A style definition was added
    StyleAdded {
        name: String,
        family: StyleFamily,
        automatic: bool,
    },

    /// A member cursor was added or moved
    CursorMoved { member_id: String },

    /// A batch of operations landed
    OperationsExecuted { first_sequence: u64, count: usize },
}

impl DocumentSignal {
    /// Signal name used for subscriptions
    pub fn name(&self) -> &'static str {
        match self {
            DocumentSignal::ParagraphChanged { .. } => "paragraph/changed",
            DocumentSignal::StyleAdded { .. } => "style/added",
            DocumentSignal::CursorMoved { .. } => "cursor/moved",
            DocumentSignal::OperationsExecuted { .. } => "operations/executed",
        }
    }
}
