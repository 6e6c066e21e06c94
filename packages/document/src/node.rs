//! # Content Nodes
//!
//! The document body is an arena of nodes addressed by [`NodeId`].
//! Parent and child links are stored on each node so that the tree can be
//! walked in both directions without borrowing headaches.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle to a node in a [`crate::Document`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// An inline image frame (`draw:frame` holding a `draw:image`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub name: String,
    pub style_name: String,
    pub width: String,
    pub height: String,
    /// Blob path of the image, e.g. `Pictures/img1.png`
    pub href: String,
}

/// What a node represents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum NodeKind {
    /// `office:text`
    Body,

    /// `text:p`
    Paragraph {
        #[serde(default, rename = "styleName", skip_serializing_if = "Option::is_none")]
        style_name: Option<String>,
    },

    /// Character data inside a paragraph
    Text { content: String },

    /// `text:list`
    List {
        #[serde(rename = "styleName")]
        style_name: String,
        #[serde(default, rename = "counterId", skip_serializing_if = "Option::is_none")]
        counter_id: Option<String>,
    },

    /// `text:list-item`
    ListItem,

    /// `draw:frame`
    Frame(Frame),
}

impl NodeKind {
    pub fn paragraph() -> Self {
        NodeKind::Paragraph { style_name: None }
    }

    pub fn text(content: impl Into<String>) -> Self {
        NodeKind::Text {
            content: content.into(),
        }
    }

    /// Qualified ODF element name, used in logs and diagnostics
    pub fn element_name(&self) -> &'static str {
        match self {
            NodeKind::Body => "office:text",
            NodeKind::Paragraph { .. } => "text:p",
            NodeKind::Text { .. } => "#text",
            NodeKind::List { .. } => "text:list",
            NodeKind::ListItem => "text:list-item",
            NodeKind::Frame(_) => "draw:frame",
        }
    }

    /// Number of cursor steps this node occupies on its own
    pub fn step_len(&self) -> usize {
        match self {
            NodeKind::Text { content } => content.chars().count(),
            NodeKind::Frame(_) => 1,
            _ => 0,
        }
    }

    /// Whether the node may only appear inside a paragraph
    pub fn is_inline(&self) -> bool {
        matches!(self, NodeKind::Text { .. } | NodeKind::Frame(_))
    }

    pub fn is_paragraph(&self) -> bool {
        matches!(self, NodeKind::Paragraph { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn detached(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_len_counts_chars_not_bytes() {
        assert_eq!(NodeKind::text("héllo").step_len(), 5);
        assert_eq!(NodeKind::paragraph().step_len(), 0);
    }

    #[test]
    fn test_node_kind_serialization() {
        let kind = NodeKind::List {
            style_name: "L1".to_string(),
            counter_id: Some("X1-level1-1".to_string()),
        };

        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"list","styleName":"L1","counterId":"X1-level1-1"}"#
        );

        let back: NodeKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, kind);
    }
}
