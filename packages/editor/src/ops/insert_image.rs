//! # InsertImage
//!
//! Places a `draw:frame` referencing a stored blob at a cursor position.
//! The frame is one cursor step wide, so every member cursor at or after the
//! insertion point moves forward by one.
//!
//! The blob and the frame style must already be in the document. Image
//! commands send `SetBlob` and `AddStyle` ahead of this operation in the same
//! batch.

use crate::errors::{OpError, StateError};
use crate::operation::{require_non_empty, OpHeader, Operation};
use crate::spec::OperationSpec;
use odt_document::{Document, DocumentSignal, Frame, NodeKind, StyleFamily};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertImageSpec {
    pub memberid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    pub position: usize,
    pub filename: String,
    pub frame_width: String,
    pub frame_height: String,
    pub frame_style_name: String,
    pub frame_name: String,
}

#[derive(Debug)]
pub struct InsertImage {
    header: OpHeader,
    position: usize,
    frame: Frame,
}

impl InsertImage {
    pub fn init(spec: InsertImageSpec) -> Result<Self, OpError> {
        require_non_empty("filename", &spec.filename)?;
        require_non_empty("frameName", &spec.frame_name)?;
        require_non_empty("frameStyleName", &spec.frame_style_name)?;
        require_non_empty("frameWidth", &spec.frame_width)?;
        require_non_empty("frameHeight", &spec.frame_height)?;

        Ok(Self {
            header: OpHeader::new(spec.memberid, spec.timestamp)?,
            position: spec.position,
            frame: Frame {
                name: spec.frame_name,
                style_name: spec.frame_style_name,
                width: spec.frame_width,
                height: spec.frame_height,
                href: spec.filename,
            },
        })
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}

impl Operation for InsertImage {
    fn optype(&self) -> &'static str {
        "InsertImage"
    }

    fn header(&self) -> &OpHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut OpHeader {
        &mut self.header
    }

    #[instrument(skip_all, fields(position = self.position, frame = %self.frame.name))]
    fn execute(&mut self, doc: &mut Document) -> Result<(), OpError> {
        self.header.ensure_pending(self.optype())?;
        doc.check_range(self.position, 0)?;

        if doc.blob(&self.frame.href).is_none() {
            return Err(StateError::MissingPrerequisite {
                optype: self.optype(),
                what: format!("blob '{}'", self.frame.href),
            }
            .into());
        }
        if doc.style(&self.frame.style_name, StyleFamily::Graphic).is_none() {
            return Err(StateError::MissingPrerequisite {
                optype: self.optype(),
                what: format!("graphic style '{}'", self.frame.style_name),
            }
            .into());
        }
        if doc.frame_names().contains(&self.frame.name) {
            return Err(OpError::Conflict(format!(
                "frame name '{}' is already in use",
                self.frame.name
            )));
        }

        // An empty body gets a paragraph to hold the frame
        if doc.resolve_position(self.position)?.paragraph.is_none() {
            let root = doc.root();
            let paragraph = doc.create_node(NodeKind::paragraph());
            doc.splice_node(root, None, paragraph)?;
        }

        let node = doc.insert_inline(self.position, NodeKind::Frame(self.frame.clone()))?;
        let paragraph = doc
            .paragraph_of(node)
            .ok_or_else(|| OpError::Document(format!("frame {} is outside a paragraph", node)))?;
        doc.shift_cursors(self.position, 1);
        doc.emit(DocumentSignal::ParagraphChanged {
            paragraph,
            member_id: self.header.memberid.clone(),
            timestamp: self.header.timestamp,
        });

        debug!(%node, %paragraph, href = %self.frame.href, "Image inserted");
        self.header.mark_applied();
        Ok(())
    }

    fn spec(&self) -> OperationSpec {
        OperationSpec::InsertImage(InsertImageSpec {
            memberid: self.header.memberid.clone(),
            timestamp: self.header.timestamp,
            position: self.position,
            filename: self.frame.href.clone(),
            frame_width: self.frame.width.clone(),
            frame_height: self.frame.height.clone(),
            frame_style_name: self.frame.style_name.clone(),
            frame_name: self.frame.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use odt_document::{Blob, Cursor, StyleDef};

    fn prepared(paragraphs: &[&str]) -> Document {
        let mut doc = Document::from_paragraphs(paragraphs);
        doc.set_blob(
            "Pictures/img.png",
            Blob {
                mimetype: "image/png".to_string(),
                content: "AA==".to_string(),
            },
        );
        doc.add_style(StyleDef::new("fr1", StyleFamily::Graphic), true);
        doc
    }

    fn insert(position: usize, frame_name: &str) -> InsertImage {
        InsertImage::init(InsertImageSpec {
            memberid: "alice".to_string(),
            timestamp: Some(10),
            position,
            filename: "Pictures/img.png".to_string(),
            frame_width: "2cm".to_string(),
            frame_height: "1cm".to_string(),
            frame_style_name: "fr1".to_string(),
            frame_name: frame_name.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_inserts_frame_and_shifts_cursors() {
        let mut doc = prepared(&["Hello", "World"]);
        doc.set_cursor("before", Cursor { position: 1, length: 0 });
        doc.set_cursor("after", Cursor { position: 8, length: 2 });

        insert(3, "Image1").execute(&mut doc).unwrap();

        assert_eq!(doc.length(), 12);
        assert!(doc.frame_names().contains("Image1"));
        assert_eq!(doc.paragraph_text(doc.paragraphs()[0]), "Hello");
        assert_eq!(doc.cursor("before").map(|c| c.position), Some(1));
        assert_eq!(doc.cursor("after").map(|c| c.position), Some(9));
    }

    #[test]
    fn test_selection_spanning_frame_keeps_its_end() {
        let mut doc = prepared(&["Hello"]);
        doc.set_cursor("alice", Cursor { position: 1, length: 3 });

        insert(2, "Image1").execute(&mut doc).unwrap();

        assert_eq!(doc.cursor("alice"), Some(Cursor { position: 1, length: 4 }));
    }

    #[test]
    fn test_requires_blob_and_style() {
        let mut doc = Document::from_paragraphs(&["Hello"]);

        let result = insert(0, "Image1").execute(&mut doc);

        assert!(matches!(
            result,
            Err(OpError::State(StateError::MissingPrerequisite { .. }))
        ));
        assert!(doc.frame_names().is_empty());
    }

    #[test]
    fn test_duplicate_frame_name_conflicts() {
        let mut doc = prepared(&["Hello"]);
        insert(0, "Image1").execute(&mut doc).unwrap();

        assert!(matches!(
            insert(2, "Image1").execute(&mut doc),
            Err(OpError::Conflict(_))
        ));
    }

    #[test]
    fn test_empty_body_gets_paragraph() {
        let mut doc = prepared(&[]);

        insert(0, "Image1").execute(&mut doc).unwrap();

        assert_eq!(doc.paragraphs().len(), 1);
        assert_eq!(doc.length(), 1);
    }
}
