//! # Style Definitions
//!
//! Minimal model of `office:styles` and `office:automatic-styles`. Only what the
//! operation layer reads is modeled: a name, a family and a property map.
//!
//! List styles carry a single level group keyed `text:list-level-style-<kind>`,
//! where `<kind>` is `bullet` or `number`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Prefix of the property group that describes a list level
pub const LIST_LEVEL_STYLE_PREFIX: &str = "text:list-level-style-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleFamily {
    Paragraph,
    Graphic,
    List,
}

impl StyleFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            StyleFamily::Paragraph => "paragraph",
            StyleFamily::Graphic => "graphic",
            StyleFamily::List => "list",
        }
    }
}

impl fmt::Display for StyleFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paragraph" => Ok(StyleFamily::Paragraph),
            "graphic" => Ok(StyleFamily::Graphic),
            "list" => Ok(StyleFamily::List),
            other => Err(format!("unknown style family '{}'", other)),
        }
    }
}

/// A property value: either a plain attribute or a named group of attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleProperty {
    Value(String),
    Group(BTreeMap<String, String>),
}

pub type StyleProperties = BTreeMap<String, StyleProperty>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleDef {
    pub name: String,
    pub family: StyleFamily,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: StyleProperties,
}

impl StyleDef {
    pub fn new(name: impl Into<String>, family: StyleFamily) -> Self {
        Self {
            name: name.into(),
            family,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_properties(mut self, properties: StyleProperties) -> Self {
        self.properties = properties;
        self
    }

    /// Kind of a list style (`bullet`, `number`, ...), read from the suffix of
    /// its level group key
    pub fn list_level_kind(&self) -> Option<&str> {
        if self.family != StyleFamily::List {
            return None;
        }
        self.properties
            .keys()
            .find(|key| key.starts_with(LIST_LEVEL_STYLE_PREFIX))
            .and_then(|key| key.rsplit('-').next())
    }

    /// Numeric suffix of names like `L7`
    pub fn name_number(&self) -> Option<u32> {
        self.name.get(1..).and_then(|digits| digits.parse().ok())
    }
}

/// An ordered style container
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleContainer {
    styles: Vec<StyleDef>,
}

impl StyleContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StyleDef> {
        self.styles.iter()
    }

    pub fn get(&self, name: &str, family: StyleFamily) -> Option<&StyleDef> {
        self.styles
            .iter()
            .find(|style| style.family == family && style.name == name)
    }

    pub fn contains(&self, name: &str, family: StyleFamily) -> bool {
        self.get(name, family).is_some()
    }

    pub fn push(&mut self, style: StyleDef) {
        self.styles.push(style);
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
