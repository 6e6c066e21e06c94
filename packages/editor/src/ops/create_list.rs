//! # CreateList
//!
//! Turns the paragraph at a position into the single item of a new list.
//!
//! ```text
//! office:text                 office:text
//!  └─ text:p "Hello"    =>     └─ text:list (L1, X1-level1-1)
//!                                  └─ text:list-item
//!                                      └─ text:p "Hello"
//! ```
//!
//! The list style comes from the style registry. When the document has no
//! style of the requested kind, [`Operation::prerequisites`] hands the
//! session an `AddStyle` to apply first; `execute` never writes styles itself.
//!
//! Each list gets its own counter id and three presentation rules bound to
//! it. Wrapping does not move any position.

use crate::errors::{OpError, StateError};
use crate::operation::{OpHeader, Operation};
use crate::spec::OperationSpec;
use crate::style_registry::{
    allocate_counter_id, ensure_style, resolve_styles, ListType, StyleAllocation, BULLET_CHAR,
};
use odt_document::{Document, DocumentSignal, NodeKind, StyleSheet};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListSpec {
    pub memberid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    pub position: usize,
    #[serde(default)]
    pub length: usize,
    pub list_type: String,
}

#[derive(Debug)]
pub struct CreateList {
    header: OpHeader,
    position: usize,
    length: usize,
    list_type: ListType,
}

impl CreateList {
    pub fn init(spec: CreateListSpec) -> Result<Self, OpError> {
        let list_type = spec.list_type.parse::<ListType>()?;

        Ok(Self {
            header: OpHeader::new(spec.memberid, spec.timestamp)?,
            position: spec.position,
            length: spec.length,
            list_type,
        })
    }

    pub fn list_type(&self) -> ListType {
        self.list_type
    }

    pub fn position(&self) -> usize {
        self.position
    }
}

impl Operation for CreateList {
    fn optype(&self) -> &'static str {
        "CreateList"
    }

    fn header(&self) -> &OpHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut OpHeader {
        &mut self.header
    }

    fn prerequisites(&self, doc: &Document) -> Result<Vec<Box<dyn Operation>>, OpError> {
        match ensure_style(doc, self.list_type, &self.header.memberid, self.header.timestamp)? {
            StyleAllocation::Existing(_) => Ok(Vec::new()),
            StyleAllocation::Allocated(add_style) => {
                let op: Box<dyn Operation> = Box::new(add_style);
                Ok(vec![op])
            }
        }
    }

    #[instrument(skip_all, fields(position = self.position, list_type = %self.list_type))]
    fn execute(&mut self, doc: &mut Document) -> Result<(), OpError> {
        self.header.ensure_pending(self.optype())?;
        doc.check_range(self.position, self.length)?;

        let style_name = resolve_styles(doc)
            .get(self.list_type)
            .map(|style| style.name.clone())
            .ok_or_else(|| StateError::MissingPrerequisite {
                optype: self.optype(),
                what: format!("a {} list style", self.list_type),
            })?;

        let counter_id = allocate_counter_id(doc);
        if doc.counter_ids().contains(&counter_id) {
            return Err(OpError::Conflict(format!(
                "counter {} is already bound to a list",
                counter_id
            )));
        }

        let at = doc.resolve_position(self.position)?;
        let target = match at.paragraph {
            Some(paragraph) => {
                let parent = doc.parent(paragraph).ok_or_else(|| {
                    OpError::Document(format!("paragraph {} is detached", paragraph))
                })?;
                Some((parent, paragraph))
            }
            None => None,
        };

        // Preconditions hold; from here on the tree changes
        let list = doc.create_node(NodeKind::List {
            style_name: style_name.clone(),
            counter_id: Some(counter_id.clone()),
        });
        let item = doc.create_node(NodeKind::ListItem);
        doc.splice_node(list, None, item)?;

        let paragraph = match target {
            Some((parent, paragraph)) => {
                doc.splice_node(parent, Some(paragraph), list)?;
                doc.splice_node(item, None, paragraph)?;
                paragraph
            }
            None => {
                let root = doc.root();
                let first = doc.children(root).first().copied();
                doc.splice_node(root, first, list)?;
                let paragraph = doc.create_node(NodeKind::paragraph());
                doc.splice_node(item, None, paragraph)?;
                paragraph
            }
        };

        append_counter_rules(doc.stylesheet_mut(), &counter_id, self.list_type);
        doc.fix_cursor_positions();
        doc.emit(DocumentSignal::ParagraphChanged {
            paragraph,
            member_id: self.header.memberid.clone(),
            timestamp: self.header.timestamp,
        });

        debug!(%list, %paragraph, style = %style_name, counter = %counter_id, "List created");
        self.header.mark_applied();
        Ok(())
    }

    fn spec(&self) -> OperationSpec {
        OperationSpec::CreateList(CreateListSpec {
            memberid: self.header.memberid.clone(),
            timestamp: self.header.timestamp,
            position: self.position,
            length: self.length,
            list_type: self.list_type.to_string(),
        })
    }
}

fn list_selector(counter_id: &str) -> String {
    format!("text|list[webodfhelper|counter-id=\"{}\"]", counter_id)
}

/// Append the counter rules for one list: reset on the first item, no
/// increment on the first item's first child, then the label itself
fn append_counter_rules(sheet: &mut StyleSheet, counter_id: &str, list_type: ListType) {
    let list = list_selector(counter_id);
    let decl = |property: &str, value: String| (property.to_string(), value);

    sheet.append_rule(
        format!("{} > text|list-item:first-child", list),
        vec![decl("counter-reset", format!("{} 1", counter_id))],
    );
    sheet.append_rule(
        format!(
            "{} > text|list-item:first-child > *:first-child:not(text|list)::before",
            list
        ),
        vec![decl("counter-increment", format!("{} 0", counter_id))],
    );

    let content = match list_type {
        ListType::Number => format!("counter({}, decimal) \".\"", counter_id),
        ListType::Bullet => format!("\"{}\"", BULLET_CHAR),
    };
    sheet.append_rule(
        format!("{} > text|list-item > :not(text|list):first-child::before", list),
        vec![
            decl("content", content),
            decl("counter-increment", counter_id.to_string()),
            decl("text-align", "left".to_string()),
            decl("display", "inline-block".to_string()),
            decl("margin-left", "0.635cm".to_string()),
            decl("padding-right", "0.2cm".to_string()),
        ],
    );
}
