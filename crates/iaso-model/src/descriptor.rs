//! Survey form descriptor types.
//!
//! A descriptor is the JSON tree produced for a form version: a `survey`
//! root holding groups, repeats and questions. Only the fields the mapping
//! tool reads are modelled; anything else in the JSON is ignored.

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ModelError, Result};

/// Type tag of the survey root.
pub const SURVEY_TYPE: &str = "survey";
/// Type tag of a plain group.
pub const GROUP_TYPE: &str = "group";
/// Type tag of a repeat section.
pub const REPEAT_TYPE: &str = "repeat";
/// Type tag of a multiple-answer choice question.
pub const SELECT_ALL_TYPE: &str = "select all that apply";
/// Type tag of a single-answer choice question.
pub const SELECT_ONE_TYPE: &str = "select one";

/// Structural role of a descriptor node, derived from its `type` tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Survey,
    Group,
    Repeat,
    SelectAllThatApply,
    SelectOne,
    /// Any other question type (`text`, `integer`, `calculate`, ...).
    Question(String),
}

impl NodeKind {
    pub fn from_type(node_type: &str) -> Self {
        match node_type {
            SURVEY_TYPE => Self::Survey,
            GROUP_TYPE => Self::Group,
            REPEAT_TYPE => Self::Repeat,
            SELECT_ALL_TYPE => Self::SelectAllThatApply,
            SELECT_ONE_TYPE => Self::SelectOne,
            other => Self::Question(other.to_string()),
        }
    }

    /// True for the types that may hold independently mappable children.
    ///
    /// `select one` is deliberately absent: its options are answers, not
    /// questions.
    pub fn can_contain(&self) -> bool {
        matches!(
            self,
            Self::Survey | Self::Group | Self::Repeat | Self::SelectAllThatApply
        )
    }
}

/// Display label: either plain text or one text per language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Text(String),
    Translations(BTreeMap<String, String>),
}

impl Label {
    /// Plain text, or the first translation in language order.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Translations(map) => map.values().next().map(String::as_str),
        }
    }

    /// Translation for `lang`, falling back to [`Label::text`].
    pub fn text_for(&self, lang: &str) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Translations(map) => map.get(lang).map(String::as_str).or_else(|| self.text()),
        }
    }
}

/// Resolves an optional label for `lang`, using `fallback` when there is no
/// usable text.
pub fn display_text<'a>(
    label: Option<&'a Label>,
    lang: Option<&str>,
    fallback: &'a str,
) -> &'a str {
    let text = match (label, lang) {
        (Some(label), Some(lang)) => label.text_for(lang),
        (Some(label), None) => label.text(),
        (None, _) => None,
    };
    text.filter(|t| !t.is_empty()).unwrap_or(fallback)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bind {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculate: Option<String>,
}

/// One node of the descriptor tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorNode {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<DescriptorNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<Bind>,
}

impl DescriptorNode {
    pub fn new(name: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_type: node_type.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: Label) -> Self {
        self.label = Some(label);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<DescriptorNode>) -> Self {
        self.children = children;
        self
    }

    pub fn kind(&self) -> NodeKind {
        NodeKind::from_type(&self.node_type)
    }

    /// A node is a container when its type can hold children and it actually
    /// has some.
    pub fn is_container(&self) -> bool {
        self.kind().can_contain() && !self.children.is_empty()
    }

    pub fn calculate(&self) -> Option<&str> {
        self.bind.as_ref().and_then(|b| b.calculate.as_deref())
    }

    /// Label text for `lang` (or the default label), falling back to the name.
    pub fn display_label(&self, lang: Option<&str>) -> &str {
        display_text(self.label.as_ref(), lang, &self.name)
    }

    /// Parses a descriptor from JSON text.
    ///
    /// Accepts either a bare descriptor or a form-version envelope carrying a
    /// `descriptor` field. A JSON `null` (or an envelope without descriptor)
    /// yields `Ok(None)`.
    pub fn from_json_str(input: &str) -> Result<Option<Self>> {
        let value: serde_json::Value = serde_json::from_str(input)?;
        Self::from_json_value(value)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Option<Self>> {
        let value: serde_json::Value = serde_json::from_reader(reader)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Option<Self>> {
        let is_envelope = value
            .as_object()
            .is_some_and(|map| map.contains_key("descriptor") && !map.contains_key("children"));
        match value {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::Object(_) if is_envelope => {
                let version: FormVersion = serde_json::from_value(value)?;
                Ok(version.descriptor)
            }
            serde_json::Value::Object(_) => Ok(Some(serde_json::from_value(value)?)),
            other => Err(ModelError::InvalidDescriptor(format!(
                "expected a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }
}

/// Form version record as served by the `formversions` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormVersion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<serde_json::Value>,
    #[serde(default)]
    pub descriptor: Option<DescriptorNode>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_one_is_never_a_container() {
        let node = DescriptorNode::new("color", SELECT_ONE_TYPE)
            .with_children(vec![DescriptorNode::new("red", "")]);
        assert!(!node.is_container());
    }

    #[test]
    fn empty_group_is_not_a_container() {
        assert!(!DescriptorNode::new("g", GROUP_TYPE).is_container());
    }

    #[test]
    fn display_label_falls_back_to_name() {
        let node = DescriptorNode::new("q1", "text");
        assert_eq!(node.display_label(Some("fr")), "q1");

        let mut translations = BTreeMap::new();
        translations.insert("English".to_string(), "Age".to_string());
        translations.insert("French".to_string(), "Âge".to_string());
        let node = node.with_label(Label::Translations(translations));
        assert_eq!(node.display_label(Some("French")), "Âge");
        assert_eq!(node.display_label(Some("Dutch")), "Age");
        assert_eq!(node.display_label(None), "Age");
    }

    #[test]
    fn null_children_are_treated_as_empty() {
        let node = DescriptorNode::from_json_str(r#"{"name":"g","type":"group","children":null}"#)
            .unwrap()
            .unwrap();
        assert!(node.children.is_empty());
    }
}
