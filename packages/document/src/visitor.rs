use crate::{Document, Frame, NodeId, NodeKind};

/// Visitor pattern for traversing the node tree immutably
///
/// This trait provides default implementations that walk the entire tree in
/// document order. Override specific visit_* methods to perform custom actions
/// on nodes.
pub trait Visitor: Sized {
    fn visit_node(&mut self, doc: &Document, id: NodeId) {
        walk_node(self, doc, id);
    }

    fn visit_paragraph(&mut self, doc: &Document, id: NodeId) {
        walk_children(self, doc, id);
    }

    fn visit_list(
        &mut self,
        doc: &Document,
        id: NodeId,
        _style_name: &str,
        _counter_id: Option<&str>,
    ) {
        walk_children(self, doc, id);
    }

    fn visit_text(&mut self, _doc: &Document, _id: NodeId, _content: &str) {
        // Leaf node, no children to walk
    }

    fn visit_frame(&mut self, _doc: &Document, _id: NodeId, _frame: &Frame) {
        // Leaf node, no children to walk
    }
}

pub fn walk_document<V: Visitor>(visitor: &mut V, doc: &Document) {
    visitor.visit_node(doc, doc.root());
}

pub fn walk_node<V: Visitor>(visitor: &mut V, doc: &Document, id: NodeId) {
    let Some(node) = doc.node(id) else {
        return;
    };

    match &node.kind {
        NodeKind::Body | NodeKind::ListItem => walk_children(visitor, doc, id),
        NodeKind::Paragraph { .. } => visitor.visit_paragraph(doc, id),
        NodeKind::List {
            style_name,
            counter_id,
        } => visitor.visit_list(doc, id, style_name, counter_id.as_deref()),
        NodeKind::Text { content } => visitor.visit_text(doc, id, content),
        NodeKind::Frame(frame) => visitor.visit_frame(doc, id, frame),
    }
}

pub fn walk_children<V: Visitor>(visitor: &mut V, doc: &Document, id: NodeId) {
    if let Some(node) = doc.node(id) {
        for child in &node.children {
            visitor.visit_node(doc, *child);
        }
    }
}

/// Collects paragraphs in document order
#[derive(Debug, Default)]
pub(crate) struct ParagraphCollector {
    pub paragraphs: Vec<NodeId>,
}

impl Visitor for ParagraphCollector {
    fn visit_paragraph(&mut self, _doc: &Document, id: NodeId) {
        // Paragraphs never nest, so there is nothing below worth walking
        self.paragraphs.push(id);
    }
}

/// Collects list nodes and their counter identifiers
#[derive(Debug, Default)]
pub(crate) struct ListCollector {
    pub lists: Vec<NodeId>,
    pub counter_ids: Vec<String>,
}

impl Visitor for ListCollector {
    fn visit_list(
        &mut self,
        doc: &Document,
        id: NodeId,
        _style_name: &str,
        counter_id: Option<&str>,
    ) {
        self.lists.push(id);
        if let Some(counter_id) = counter_id {
            self.counter_ids.push(counter_id.to_string());
        }
        walk_children(self, doc, id);
    }
}

/// Collects frame names and image references
#[derive(Debug, Default)]
pub(crate) struct FrameCollector {
    pub frames: Vec<(NodeId, String)>,
}

impl Visitor for FrameCollector {
    fn visit_frame(&mut self, _doc: &Document, id: NodeId, frame: &Frame) {
        self.frames.push((id, frame.name.clone()));
    }
}

/// Concatenates text below a node, frames excluded
#[derive(Debug, Default)]
pub(crate) struct TextCollector {
    pub text: String,
}

impl Visitor for TextCollector {
    fn visit_text(&mut self, _doc: &Document, _id: NodeId, content: &str) {
        self.text.push_str(content);
    }
}
