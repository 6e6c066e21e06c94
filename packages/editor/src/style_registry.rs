//! # Style Registry
//!
//! Derives which list styles and counters a document already uses and picks
//! fresh names for new ones.
//!
//! Nothing here writes to the document. A missing style comes back as an
//! [`AddStyle`] operation, so style creation travels through the session like
//! any other edit and reaches every peer in the same order.
//!
//! Every lookup rescans the document, O(document size) per call.
//!
//! ## Numbering
//!
//! New list styles are named `L<n + 1>` where `n` is the highest number over
//! all list styles, regardless of kind. Peers rely on reaching the same name.

use crate::errors::OpError;
use crate::ops::{AddStyle, AddStyleSpec};
use odt_document::{
    Document, StyleFamily, StyleProperties, StyleProperty, LIST_LEVEL_STYLE_PREFIX,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub const BULLET_CHAR: &str = "•";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Bullet,
    Number,
}

impl ListType {
    pub fn as_str(self) -> &'static str {
        match self {
            ListType::Bullet => "bullet",
            ListType::Number => "number",
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListType {
    type Err = OpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bullet" => Ok(ListType::Bullet),
            "number" => Ok(ListType::Number),
            other => Err(OpError::Validation(format!(
                "unsupported list type '{}', expected 'bullet' or 'number'",
                other
            ))),
        }
    }
}

/// Highest-numbered style of one kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedStyle {
    pub name: String,
    pub highest_number: u32,
}

/// List styles in use, grouped by kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListStyles {
    kinds: BTreeMap<String, ResolvedStyle>,
    current_number: u32,
}

impl ListStyles {
    pub fn get(&self, kind: ListType) -> Option<&ResolvedStyle> {
        self.kinds.get(kind.as_str())
    }

    /// Highest style number over every kind
    pub fn current_number(&self) -> u32 {
        self.current_number
    }

    pub fn kinds(&self) -> impl Iterator<Item = (&str, &ResolvedStyle)> {
        self.kinds.iter().map(|(kind, style)| (kind.as_str(), style))
    }
}

/// Scan both style containers for list styles
pub fn resolve_styles(doc: &Document) -> ListStyles {
    let mut styles = ListStyles::default();

    for style in doc.query_style_definitions(StyleFamily::List) {
        let Some(kind) = style.list_level_kind() else {
            continue;
        };
        let number = style.name_number().unwrap_or(0);
        styles.current_number = styles.current_number.max(number);

        let resolved = ResolvedStyle {
            name: style.name.clone(),
            highest_number: number,
        };
        styles
            .kinds
            .entry(kind.to_string())
            .and_modify(|existing| {
                if number > existing.highest_number {
                    *existing = resolved.clone();
                }
            })
            .or_insert(resolved);
    }

    styles
}

/// Outcome of [`ensure_style`]
#[derive(Debug)]
pub enum StyleAllocation {
    /// The document already has a style of the requested kind
    Existing(String),
    /// A new style must be added by applying the carried operation
    Allocated(AddStyle),
}

impl StyleAllocation {
    pub fn name(&self) -> &str {
        match self {
            StyleAllocation::Existing(name) => name,
            StyleAllocation::Allocated(op) => op.style_name(),
        }
    }
}

/// Return the style for `kind`, or the operation that creates it
pub fn ensure_style(
    doc: &Document,
    kind: ListType,
    member_id: &str,
    timestamp: Option<u64>,
) -> Result<StyleAllocation, OpError> {
    let styles = resolve_styles(doc);
    if let Some(existing) = styles.get(kind) {
        return Ok(StyleAllocation::Existing(existing.name.clone()));
    }

    let number = styles.current_number().checked_add(1).ok_or_else(|| {
        OpError::Conflict(format!(
            "list style numbering exhausted at L{}",
            styles.current_number()
        ))
    })?;
    let name = format!("L{}", number);
    let op = AddStyle::init(AddStyleSpec {
        memberid: member_id.to_string(),
        timestamp,
        style_name: name,
        style_family: StyleFamily::List.to_string(),
        is_automatic_style: true,
        set_properties: list_style_properties(kind),
    })?;

    Ok(StyleAllocation::Allocated(op))
}

/// Level-1 list style definition with fixed label alignment
pub fn list_style_properties(kind: ListType) -> StyleProperties {
    let level = match kind {
        ListType::Bullet => group(&[
            ("text:bullet-char", BULLET_CHAR),
            ("text:level", "1"),
            ("text:style-name", "Bullet_20_Symbols"),
        ]),
        ListType::Number => group(&[
            ("style:num-format", "1"),
            ("style:num-suffix", "."),
            ("text:level", "1"),
            ("text:style-name", "Numbering_20_Symbols"),
        ]),
    };

    let mut properties = StyleProperties::new();
    properties.insert(format!("{}{}", LIST_LEVEL_STYLE_PREFIX, kind), level);
    properties.insert(
        "style:list-level-properties".to_string(),
        group(&[("text:list-level-position-and-space-mode", "label-alignment")]),
    );
    properties.insert(
        "style:list-level-label-alignment".to_string(),
        group(&[
            ("fo:margin-left", "1.27cm"),
            ("fo:text-indent", "-0.635cm"),
            ("text:label-followed-by", "listtab"),
            ("text:list-tab-stop-position", "1.27cm"),
        ]),
    );
    properties
}

fn group(entries: &[(&str, &str)]) -> StyleProperty {
    StyleProperty::Group(
        entries
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
    )
}

pub fn counter_id(number: u32) -> String {
    format!("X{}-level1-1", number)
}

/// First unused counter identifier, counting from 1
pub fn allocate_counter_id(doc: &Document) -> String {
    let used = doc.counter_ids();
    let mut number = 1;
    loop {
        let candidate = counter_id(number);
        if !used.contains(&candidate) {
            return candidate;
        }
        number += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odt_document::{NodeKind, StyleDef};

    fn add_list_style(doc: &mut Document, name: &str, kind: ListType, automatic: bool) {
        doc.add_style(
            StyleDef::new(name, StyleFamily::List).with_properties(list_style_properties(kind)),
            automatic,
        );
    }

    #[test]
    fn test_list_type_parsing() {
        assert_eq!("bullet".parse::<ListType>().unwrap(), ListType::Bullet);
        assert_eq!("number".parse::<ListType>().unwrap(), ListType::Number);
        assert!(matches!(
            "roman".parse::<ListType>(),
            Err(OpError::Validation(_))
        ));
    }

    #[test]
    fn test_resolve_groups_by_kind_and_tracks_global_max() {
        let mut doc = Document::new();
        add_list_style(&mut doc, "L1", ListType::Bullet, false);
        add_list_style(&mut doc, "L4", ListType::Bullet, true);
        add_list_style(&mut doc, "L2", ListType::Number, true);

        let styles = resolve_styles(&doc);

        assert_eq!(styles.get(ListType::Bullet).unwrap().name, "L4");
        assert_eq!(styles.get(ListType::Number).unwrap().name, "L2");
        assert_eq!(styles.current_number(), 4);
    }

    #[test]
    fn test_ensure_style_allocates_above_every_kind() {
        let mut doc = Document::new();
        add_list_style(&mut doc, "L3", ListType::Bullet, true);

        let allocation = ensure_style(&doc, ListType::Number, "alice", None).unwrap();
        assert!(matches!(allocation, StyleAllocation::Allocated(_)));
        assert_eq!(allocation.name(), "L4");

        let allocation = ensure_style(&doc, ListType::Bullet, "alice", None).unwrap();
        assert!(matches!(allocation, StyleAllocation::Existing(_)));
        assert_eq!(allocation.name(), "L3");
    }

    #[test]
    fn test_ensure_style_rejects_exhausted_numbering() {
        let mut doc = Document::new();
        add_list_style(&mut doc, &format!("L{}", u32::MAX), ListType::Bullet, true);

        let result = ensure_style(&doc, ListType::Number, "alice", None);

        assert!(matches!(result, Err(OpError::Conflict(_))));
        assert!(matches!(
            ensure_style(&doc, ListType::Bullet, "alice", None),
            Ok(StyleAllocation::Existing(_))
        ));
    }

    #[test]
    fn test_ensure_style_does_not_touch_document() {
        let doc = Document::new();
        let _ = ensure_style(&doc, ListType::Bullet, "alice", None).unwrap();

        assert!(doc.query_style_definitions(StyleFamily::List).is_empty());
    }

    #[test]
    fn test_counter_allocation_fills_first_gap() {
        let mut doc = Document::from_paragraphs(&[]);
        for number in [1, 3] {
            let list = doc.create_node(NodeKind::List {
                style_name: "L1".to_string(),
                counter_id: Some(counter_id(number)),
            });
            doc.splice_node(doc.root(), None, list).unwrap();
        }

        assert_eq!(allocate_counter_id(&doc), "X2-level1-1");
    }

    #[test]
    fn test_counter_allocation_starts_at_one() {
        assert_eq!(allocate_counter_id(&Document::new()), "X1-level1-1");
    }
}
