use crate::errors::OpError;
use crate::operation::{require_non_empty, OpHeader, Operation};
use crate::spec::OperationSpec;
use odt_document::{Blob, Document};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetBlobSpec {
    pub memberid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    pub filename: String,
    pub mimetype: String,
    /// Base64 encoded content
    pub content: String,
}

/// Store a binary attachment in the document package
#[derive(Debug)]
pub struct SetBlob {
    header: OpHeader,
    filename: String,
    blob: Blob,
}

impl SetBlob {
    pub fn init(spec: SetBlobSpec) -> Result<Self, OpError> {
        require_non_empty("filename", &spec.filename)?;
        require_non_empty("mimetype", &spec.mimetype)?;
        require_non_empty("content", &spec.content)?;

        Ok(Self {
            header: OpHeader::new(spec.memberid, spec.timestamp)?,
            filename: spec.filename,
            blob: Blob {
                mimetype: spec.mimetype,
                content: spec.content,
            },
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }
}

impl Operation for SetBlob {
    fn optype(&self) -> &'static str {
        "SetBlob"
    }

    fn header(&self) -> &OpHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut OpHeader {
        &mut self.header
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), OpError> {
        self.header.ensure_pending(self.optype())?;

        doc.set_blob(self.filename.clone(), self.blob.clone());
        debug!(filename = %self.filename, mimetype = %self.blob.mimetype, "Blob stored");

        self.header.mark_applied();
        Ok(())
    }

    fn spec(&self) -> OperationSpec {
        OperationSpec::SetBlob(SetBlobSpec {
            memberid: self.header.memberid.clone(),
            timestamp: self.header.timestamp,
            filename: self.filename.clone(),
            mimetype: self.blob.mimetype.clone(),
            content: self.blob.content.clone(),
        })
    }
}
