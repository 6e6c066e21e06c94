//! Presentation rules derived by operations (list counters and glyphs).
//!
//! The sheet is append-only and keeps both rule order and declaration order,
//! since counter-reset must precede the increment rules that read it.

use serde::{Deserialize, Serialize};

/// A rule with selector and ordered declarations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssRule {
    pub selector: String,
    pub declarations: Vec<(String, String)>,
}

impl CssRule {
    pub fn declaration(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleSheet {
    rules: Vec<CssRule>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule at the end of the sheet, returning its index
    pub fn append_rule(
        &mut self,
        selector: impl Into<String>,
        declarations: Vec<(String, String)>,
    ) -> usize {
        self.rules.push(CssRule {
            selector: selector.into(),
            declarations,
        });
        self.rules.len() - 1
    }

    pub fn rules(&self) -> &[CssRule] {
        &self.rules
    }

    /// Rules whose selector mentions `needle`
    pub fn rules_matching<'a>(&'a self, needle: &'a str) -> impl Iterator<Item = &'a CssRule> {
        self.rules
            .iter()
            .filter(move |rule| rule.selector.contains(needle))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Convert to CSS text
    pub fn to_css(&self) -> String {
        let mut css = String::new();

        for rule in &self.rules {
            css.push_str(&rule.selector);
            css.push_str(" {\n");

            for (key, value) in &rule.declarations {
                css.push_str("  ");
                css.push_str(key);
                css.push_str(": ");
                css.push_str(value);
                css.push_str(";\n");
            }

            css.push_str("}\n\n");
        }

        css
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        let mut sheet = StyleSheet::new();
        sheet.append_rule("a", vec![("counter-reset".into(), "X1 1".into())]);
        let idx = sheet.append_rule(
            "b",
            vec![
                ("content".into(), "\"•\"".into()),
                ("counter-increment".into(), "X1".into()),
            ],
        );

        assert_eq!(idx, 1);
        assert_eq!(sheet.rules()[0].selector, "a");
        assert_eq!(sheet.rules()[1].declarations[1].0, "counter-increment");
    }

    #[test]
    fn test_to_css() {
        let mut sheet = StyleSheet::new();
        sheet.append_rule("p", vec![("margin-left".into(), "0.635cm".into())]);

        assert_eq!(sheet.to_css(), "p {\n  margin-left: 0.635cm;\n}\n\n");
    }
}
