use crate::errors::OpError;
use crate::operation::{require_non_empty, OpHeader, Operation};
use crate::spec::OperationSpec;
use odt_document::{Document, DocumentSignal, StyleDef, StyleFamily, StyleProperties};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddStyleSpec {
    pub memberid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,
    pub style_name: String,
    pub style_family: String,
    #[serde(default)]
    pub is_automatic_style: bool,
    #[serde(default)]
    pub set_properties: StyleProperties,
}

/// Add a style definition to the common or automatic container
#[derive(Debug)]
pub struct AddStyle {
    header: OpHeader,
    style_name: String,
    style_family: StyleFamily,
    is_automatic_style: bool,
    set_properties: StyleProperties,
}

impl AddStyle {
    pub fn init(spec: AddStyleSpec) -> Result<Self, OpError> {
        require_non_empty("styleName", &spec.style_name)?;
        let style_family = spec
            .style_family
            .parse::<StyleFamily>()
            .map_err(OpError::Validation)?;

        Ok(Self {
            header: OpHeader::new(spec.memberid, spec.timestamp)?,
            style_name: spec.style_name,
            style_family,
            is_automatic_style: spec.is_automatic_style,
            set_properties: spec.set_properties,
        })
    }

    pub fn style_name(&self) -> &str {
        &self.style_name
    }

    pub fn style_family(&self) -> StyleFamily {
        self.style_family
    }
}

impl Operation for AddStyle {
    fn optype(&self) -> &'static str {
        "AddStyle"
    }

    fn header(&self) -> &OpHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut OpHeader {
        &mut self.header
    }

    fn execute(&mut self, doc: &mut Document) -> Result<(), OpError> {
        self.header.ensure_pending(self.optype())?;

        if doc.style(&self.style_name, self.style_family).is_some() {
            return Err(OpError::Conflict(format!(
                "{} style '{}' already exists",
                self.style_family, self.style_name
            )));
        }

        let style = StyleDef::new(self.style_name.clone(), self.style_family)
            .with_properties(self.set_properties.clone());
        doc.add_style(style, self.is_automatic_style);
        doc.emit(DocumentSignal::StyleAdded {
            name: self.style_name.clone(),
            family: self.style_family,
            automatic: self.is_automatic_style,
        });

        debug!(style = %self.style_name, member = %self.header.memberid, "Style added");
        self.header.mark_applied();
        Ok(())
    }

    fn spec(&self) -> OperationSpec {
        OperationSpec::AddStyle(AddStyleSpec {
            memberid: self.header.memberid.clone(),
            timestamp: self.header.timestamp,
            style_name: self.style_name.clone(),
            style_family: self.style_family.to_string(),
            is_automatic_style: self.is_automatic_style,
            set_properties: self.set_properties.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(name: &str, family: &str) -> AddStyleSpec {
        AddStyleSpec {
            memberid: "alice".to_string(),
            timestamp: Some(1),
            style_name: name.to_string(),
            style_family: family.to_string(),
            is_automatic_style: true,
            set_properties: StyleProperties::new(),
        }
    }

    #[test]
    fn test_adds_to_automatic_container() {
        let mut doc = Document::new();
        let mut op = AddStyle::init(spec("fr1", "graphic")).unwrap();

        op.execute(&mut doc).unwrap();

        assert!(doc.automatic_styles().contains("fr1", StyleFamily::Graphic));
        assert!(doc.common_styles().is_empty());
        assert_eq!(
            doc.take_signals(),
            vec![DocumentSignal::StyleAdded {
                name: "fr1".to_string(),
                family: StyleFamily::Graphic,
                automatic: true,
            }]
        );
    }

    #[test]
    fn test_same_name_in_same_family_conflicts() {
        let mut doc = Document::new();
        AddStyle::init(spec("L1", "list"))
            .unwrap()
            .execute(&mut doc)
            .unwrap();

        let result = AddStyle::init(spec("L1", "list")).unwrap().execute(&mut doc);
        assert!(matches!(result, Err(OpError::Conflict(_))));

        // Other families have their own namespace
        AddStyle::init(spec("L1", "paragraph"))
            .unwrap()
            .execute(&mut doc)
            .unwrap();
    }

    #[test]
    fn test_init_rejects_unknown_family() {
        assert!(matches!(
            AddStyle::init(spec("x", "table")),
            Err(OpError::Validation(_))
        ));
    }
}
