//! # Document Handle
//!
//! Core document abstraction for ODT editing.
//!
//! A Document owns the content tree, both style containers, the blob store,
//! member cursors and the derived presentation stylesheet. Everything an
//! operation can change lives here, so cloning a document is a complete
//! snapshot of editable state.
//!
//! ## Positions
//!
//! Content is addressed by cursor steps. Each character and each frame is one
//! step. Paragraph `i` of length `len_i` covers `[start_i, start_i + len_i]`,
//! and the next paragraph starts right after that (`start_i + len_i + 1`).
//! A body without any paragraph still has one position, `0`.
//!
//! Lookups are linear in the document size.

use crate::visitor::{
    walk_document, FrameCollector, ListCollector, ParagraphCollector, TextCollector, Visitor,
};
use crate::{
    DocumentError, DocumentResult, DocumentSignal, Node, NodeId, NodeKind, StyleContainer,
    StyleDef, StyleFamily, StyleSheet,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, instrument};

/// Binary attachment stored in the package (e.g. `Pictures/img1.png`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    pub mimetype: String,
    /// Base64 encoded content
    pub content: String,
}

/// A member's selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub position: usize,
    pub length: usize,
}

/// A position resolved against the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionRef {
    /// Paragraph holding the position; `None` only for a body without paragraphs
    pub paragraph: Option<NodeId>,
    /// Steps from the start of the paragraph
    pub offset: usize,
}

/// Editable ODT document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    nodes: Vec<Node>,

    root: NodeId,

    /// `office:styles`
    #[serde(default)]
    styles: StyleContainer,

    /// `office:automatic-styles`
    #[serde(default)]
    automatic_styles: StyleContainer,

    #[serde(default)]
    blobs: BTreeMap<String, Blob>,

    #[serde(default)]
    cursors: BTreeMap<String, Cursor>,

    /// Derived presentation rules
    #[serde(default)]
    stylesheet: StyleSheet,

    /// Signals raised since the last drain
    #[serde(skip)]
    pending_signals: Vec<DocumentSignal>,
}

impl Document {
    /// Create a document the way an editor opens a blank file: a body holding
    /// one empty paragraph
    pub fn new() -> Self {
        Self::from_paragraphs(&[""])
    }

    /// Create a document with one paragraph per entry. An empty slice yields a
    /// body without any paragraph.
    pub fn from_paragraphs(paragraphs: &[&str]) -> Self {
        let mut doc = Self {
            nodes: vec![Node::detached(NodeKind::Body)],
            root: NodeId(0),
            styles: StyleContainer::new(),
            automatic_styles: StyleContainer::new(),
            blobs: BTreeMap::new(),
            cursors: BTreeMap::new(),
            stylesheet: StyleSheet::new(),
            pending_signals: Vec::new(),
        };

        for text in paragraphs {
            let paragraph = doc.create_node(NodeKind::paragraph());
            if !text.is_empty() {
                let run = doc.create_node(NodeKind::text(*text));
                doc.attach(paragraph, run);
            }
            doc.attach(doc.root, paragraph);
        }

        doc
    }

    /// Load document from a JSON file
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> DocumentResult<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        let doc = Self::from_json(&source)?;
        debug!(nodes = doc.nodes.len(), "Document loaded");
        Ok(doc)
    }

    /// Save document as pretty JSON
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn save(&self, path: impl AsRef<Path>) -> DocumentResult<()> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        Ok(())
    }

    pub fn from_json(source: &str) -> DocumentResult<Self> {
        let doc: Document = serde_json::from_str(source)?;
        doc.check_integrity()?;
        Ok(doc)
    }

    pub fn to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject arenas whose links point nowhere or disagree with each other
    fn check_integrity(&self) -> DocumentResult<()> {
        self.node(self.root)
            .ok_or(DocumentError::NodeNotFound(self.root))?;

        for (index, node) in self.nodes.iter().enumerate() {
            for child in &node.children {
                let child_node = self
                    .node(*child)
                    .ok_or(DocumentError::NodeNotFound(*child))?;
                if child_node.parent != Some(NodeId(index)) {
                    return Err(DocumentError::InvalidStructure(format!(
                        "{} lists {} as child but its parent is {:?}",
                        NodeId(index),
                        child,
                        child_node.parent
                    )));
                }
            }
        }

        Ok(())
    }

    // ---------------------------------------------------------------
    // Tree access
    // ---------------------------------------------------------------

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|node| &node.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Walk up from `id` (inclusive) to the root
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(id), move |current| self.parent(*current))
    }

    pub fn is_ancestor(&self, ancestor: NodeId, of: NodeId) -> bool {
        self.ancestors(of).any(|id| id == ancestor)
    }

    /// Closest enclosing paragraph of `id`, inclusive
    pub fn paragraph_of(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .find(|candidate| self.kind(*candidate).is_some_and(NodeKind::is_paragraph))
    }

    /// All paragraphs in document order
    pub fn paragraphs(&self) -> Vec<NodeId> {
        let mut collector = ParagraphCollector::default();
        walk_document(&mut collector, self);
        collector.paragraphs
    }

    /// All list nodes in document order
    pub fn lists(&self) -> Vec<NodeId> {
        let mut collector = ListCollector::default();
        walk_document(&mut collector, self);
        collector.lists
    }

    /// Counter identifiers of every list currently in the tree
    pub fn counter_ids(&self) -> BTreeSet<String> {
        let mut collector = ListCollector::default();
        walk_document(&mut collector, self);
        collector.counter_ids.into_iter().collect()
    }

    /// Names of every frame currently in the tree
    pub fn frame_names(&self) -> BTreeSet<String> {
        let mut collector = FrameCollector::default();
        walk_document(&mut collector, self);
        collector.frames.into_iter().map(|(_, name)| name).collect()
    }

    /// Text content of a paragraph (frames excluded)
    pub fn paragraph_text(&self, paragraph: NodeId) -> String {
        let mut collector = TextCollector::default();
        collector.visit_node(self, paragraph);
        collector.text
    }

    /// Number of cursor steps inside a paragraph
    pub fn paragraph_len(&self, paragraph: NodeId) -> usize {
        self.children(paragraph)
            .iter()
            .filter_map(|child| self.kind(*child))
            .map(NodeKind::step_len)
            .sum()
    }

    // ---------------------------------------------------------------
    // Positions
    // ---------------------------------------------------------------

    /// Highest valid cursor position
    pub fn length(&self) -> usize {
        let paragraphs = self.paragraphs();
        if paragraphs.is_empty() {
            return 0;
        }
        paragraphs
            .iter()
            .map(|paragraph| self.paragraph_len(*paragraph) + 1)
            .sum::<usize>()
            - 1
    }

    /// First position of a paragraph
    pub fn paragraph_start(&self, paragraph: NodeId) -> Option<usize> {
        let mut start = 0;
        for candidate in self.paragraphs() {
            if candidate == paragraph {
                return Some(start);
            }
            start += self.paragraph_len(candidate) + 1;
        }
        None
    }

    pub fn resolve_position(&self, position: usize) -> DocumentResult<PositionRef> {
        let paragraphs = self.paragraphs();
        if paragraphs.is_empty() {
            return if position == 0 {
                Ok(PositionRef {
                    paragraph: None,
                    offset: 0,
                })
            } else {
                Err(DocumentError::PositionOutOfRange {
                    position,
                    length: 0,
                })
            };
        }

        let mut start = 0;
        for paragraph in paragraphs {
            let len = self.paragraph_len(paragraph);
            if position <= start + len {
                return Ok(PositionRef {
                    paragraph: Some(paragraph),
                    offset: position - start,
                });
            }
            start += len + 1;
        }

        Err(DocumentError::PositionOutOfRange {
            position,
            length: self.length(),
        })
    }

    /// Check that `[position, position + length]` lies inside the document
    pub fn check_range(&self, position: usize, length: usize) -> DocumentResult<()> {
        let doc_length = self.length();
        match position.checked_add(length) {
            Some(end) if end <= doc_length => Ok(()),
            _ => Err(DocumentError::PositionOutOfRange {
                position: position.saturating_add(length),
                length: doc_length,
            }),
        }
    }

    // ---------------------------------------------------------------
    // Structural edits
    // ---------------------------------------------------------------

    /// Allocate a detached node
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::detached(kind));
        id
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|child| *child != id);
        }
    }

    /// Insert `node` into `parent` before `before` (or at the end when `None`),
    /// moving it out of its previous parent first
    pub fn splice_node(
        &mut self,
        parent: NodeId,
        before: Option<NodeId>,
        node: NodeId,
    ) -> DocumentResult<()> {
        self.node(parent)
            .ok_or(DocumentError::NodeNotFound(parent))?;
        self.node(node).ok_or(DocumentError::NodeNotFound(node))?;

        if node == self.root || self.is_ancestor(node, parent) {
            return Err(DocumentError::InvalidStructure(format!(
                "cannot move {} below itself",
                node
            )));
        }
        if let Some(before) = before {
            if self.parent(before) != Some(parent) {
                return Err(DocumentError::InvalidStructure(format!(
                    "{} is not a child of {}",
                    before, parent
                )));
            }
            if before == node {
                return Ok(());
            }
        }

        self.detach(node);

        let children = &mut self.nodes[parent.0].children;
        let index = before
            .and_then(|before| children.iter().position(|child| *child == before))
            .unwrap_or(children.len());
        children.insert(index, node);
        self.nodes[node.0].parent = Some(parent);

        debug!(%parent, %node, index, "Spliced node");
        Ok(())
    }

    /// Sibling following `id` in its parent, if any
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|child| *child == id)?;
        siblings.get(index + 1).copied()
    }

    /// Insert an inline node (frame) at a cursor position, splitting the text
    /// run under the position when needed
    pub fn insert_inline(&mut self, position: usize, kind: NodeKind) -> DocumentResult<NodeId> {
        if !kind.is_inline() {
            return Err(DocumentError::InvalidStructure(format!(
                "{} cannot be inserted inline",
                kind.element_name()
            )));
        }

        let at = self.resolve_position(position)?;
        let paragraph = at.paragraph.ok_or_else(|| {
            DocumentError::InvalidStructure(format!("no paragraph at position {}", position))
        })?;

        let mut offset = at.offset;
        let mut before = None;
        for child in self.children(paragraph).to_vec() {
            let len = self.kind(child).map(NodeKind::step_len).unwrap_or(0);
            if offset == 0 {
                before = Some(child);
                break;
            }
            if offset < len {
                before = Some(self.split_text(child, offset)?);
                break;
            }
            offset -= len;
        }

        let node = self.create_node(kind);
        self.splice_node(paragraph, before, node)?;
        Ok(node)
    }

    /// Split a text node at a character offset; the tail becomes a new sibling
    fn split_text(&mut self, id: NodeId, offset: usize) -> DocumentResult<NodeId> {
        let tail = match &mut self.nodes[id.0].kind {
            NodeKind::Text { content } => {
                let byte = content
                    .char_indices()
                    .nth(offset)
                    .map(|(index, _)| index)
                    .unwrap_or(content.len());
                content.split_off(byte)
            }
            other => {
                return Err(DocumentError::InvalidStructure(format!(
                    "cannot split {}",
                    other.element_name()
                )))
            }
        };

        let parent = self.parent(id).ok_or(DocumentError::NodeNotFound(id))?;
        let next = self.next_sibling(id);
        let tail_node = self.create_node(NodeKind::text(tail));
        self.splice_node(parent, next, tail_node)?;
        Ok(tail_node)
    }

    // ---------------------------------------------------------------
    // Styles
    // ---------------------------------------------------------------

    pub fn common_styles(&self) -> &StyleContainer {
        &self.styles
    }

    pub fn automatic_styles(&self) -> &StyleContainer {
        &self.automatic_styles
    }

    /// Style definitions of a family from both containers, common first
    pub fn query_style_definitions(&self, family: StyleFamily) -> Vec<&StyleDef> {
        self.styles
            .iter()
            .chain(self.automatic_styles.iter())
            .filter(|style| style.family == family)
            .collect()
    }

    /// Look a style up in both containers
    pub fn style(&self, name: &str, family: StyleFamily) -> Option<&StyleDef> {
        self.styles
            .get(name, family)
            .or_else(|| self.automatic_styles.get(name, family))
    }

    pub fn add_style(&mut self, style: StyleDef, automatic: bool) {
        debug!(name = %style.name, family = %style.family, automatic, "Adding style");
        if automatic {
            self.automatic_styles.push(style);
        } else {
            self.styles.push(style);
        }
    }

    // ---------------------------------------------------------------
    // Blobs
    // ---------------------------------------------------------------

    pub fn blob(&self, filename: &str) -> Option<&Blob> {
        self.blobs.get(filename)
    }

    pub fn blob_names(&self) -> impl Iterator<Item = &str> {
        self.blobs.keys().map(String::as_str)
    }

    pub fn set_blob(&mut self, filename: impl Into<String>, blob: Blob) {
        self.blobs.insert(filename.into(), blob);
    }

    // ---------------------------------------------------------------
    // Cursors
    // ---------------------------------------------------------------

    pub fn cursor(&self, member_id: &str) -> Option<Cursor> {
        self.cursors.get(member_id).copied()
    }

    pub fn cursors(&self) -> impl Iterator<Item = (&str, Cursor)> {
        self.cursors
            .iter()
            .map(|(member, cursor)| (member.as_str(), *cursor))
    }

    pub fn set_cursor(&mut self, member_id: impl Into<String>, cursor: Cursor) {
        self.cursors.insert(member_id.into(), cursor);
    }

    /// Shift every cursor at or after `from` by `delta` steps. Selections
    /// spanning `from` grow to keep their end in place.
    pub fn shift_cursors(&mut self, from: usize, delta: usize) {
        for cursor in self.cursors.values_mut() {
            if cursor.position >= from {
                cursor.position += delta;
            } else if cursor.position.saturating_add(cursor.length) > from {
                cursor.length += delta;
            }
        }
    }

    /// Clamp every cursor back into the document after a structural change
    pub fn fix_cursor_positions(&mut self) {
        let length = self.length();
        for cursor in self.cursors.values_mut() {
            cursor.position = cursor.position.min(length);
            cursor.length = cursor.length.min(length - cursor.position);
        }
    }

    // ---------------------------------------------------------------
    // Presentation and signals
    // ---------------------------------------------------------------

    pub fn stylesheet(&self) -> &StyleSheet {
        &self.stylesheet
    }

    pub fn stylesheet_mut(&mut self) -> &mut StyleSheet {
        &mut self.stylesheet
    }

    /// Buffer a signal until the owner drains it
    pub fn emit(&mut self, signal: DocumentSignal) {
        self.pending_signals.push(signal);
    }

    pub fn take_signals(&mut self) -> Vec<DocumentSignal> {
        std::mem::take(&mut self.pending_signals)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
