//! Question mapping values and sets.
//!
//! A mapping version stores, per question key, how the question is exported:
//! a single target (`{"id": ..}`), several targets (a non-empty array), an
//! explicit "never mapped" decision, or nothing yet. Values of any other shape
//! are kept verbatim so a set can be written back unchanged.

use std::collections::BTreeMap;
use std::io::Read;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{ModelError, Result};
use crate::truthy::is_truthy;

/// `type` tag marking a question the user decided never to map.
pub const NEVER_MAPPED_TYPE: &str = "neverMapped";

/// Mapping state of one question.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MappingValue {
    /// No value stored.
    #[default]
    Unset,
    /// A value of no recognised shape, kept as read.
    Other(Value),
    /// Mapped to a single target element.
    MappedSingle { id: Value, attrs: Map<String, Value> },
    /// Mapped to several target elements.
    MappedMulti(Vec<Value>),
    /// Explicitly excluded from mapping.
    NeverMapped { attrs: Map<String, Value> },
}

impl MappingValue {
    /// Classifies a raw JSON mapping value.
    ///
    /// A truthy `id` wins over a `neverMapped` type tag. `null` is `Unset`;
    /// empty arrays, scalars and objects carrying neither shape are `Other`.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Null => Self::Unset,
            Value::Array(items) if !items.is_empty() => Self::MappedMulti(items),
            Value::Object(mut map) => {
                if map.get("id").is_some_and(is_truthy) {
                    let id = map.remove("id").unwrap_or(Value::Null);
                    Self::MappedSingle { id, attrs: map }
                } else if map.get("type").and_then(Value::as_str) == Some(NEVER_MAPPED_TYPE) {
                    map.remove("type");
                    Self::NeverMapped { attrs: map }
                } else {
                    Self::Other(Value::Object(map))
                }
            }
            other => Self::Other(other),
        }
    }

    pub fn single(id: impl Into<Value>) -> Self {
        let id = id.into();
        if is_truthy(&id) {
            Self::MappedSingle {
                id,
                attrs: Map::new(),
            }
        } else {
            Self::Unset
        }
    }

    pub fn never_mapped() -> Self {
        Self::NeverMapped { attrs: Map::new() }
    }

    /// Raw JSON shape of the value.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Unset => Value::Null,
            Self::Other(value) => value.clone(),
            Self::MappedSingle { id, attrs } => {
                let mut map = attrs.clone();
                map.insert("id".to_string(), id.clone());
                Value::Object(map)
            }
            Self::MappedMulti(items) => Value::Array(items.clone()),
            Self::NeverMapped { attrs } => {
                let mut map = attrs.clone();
                map.insert(
                    "type".to_string(),
                    Value::String(NEVER_MAPPED_TYPE.to_string()),
                );
                Value::Object(map)
            }
        }
    }

    /// JSON truthiness of the stored value.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Unset => false,
            Self::Other(value) => is_truthy(value),
            Self::MappedSingle { .. } | Self::MappedMulti(_) | Self::NeverMapped { .. } => true,
        }
    }
}

impl From<Value> for MappingValue {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

impl Serialize for MappingValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MappingValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(Self::from_value(Value::deserialize(deserializer)?))
    }
}

/// Question mappings of one mapping version, keyed by question key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingSet {
    entries: BTreeMap<String, MappingValue>,
}

impl MappingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&MappingValue> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: MappingValue) -> Option<MappingValue> {
        self.entries.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<MappingValue> {
        self.entries.remove(key)
    }

    /// True when the key stores a truthy value, whatever its shape.
    pub fn is_present(&self, key: &str) -> bool {
        self.entries.get(key).is_some_and(MappingValue::is_truthy)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MappingValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Parses a mapping set from JSON text.
    ///
    /// Accepts a plain `{key: value}` object or a mapping-version record with
    /// a `question_mappings` field. `null` yields an empty set.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_json_value(value)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::Object(mut map) => match map.remove("question_mappings") {
                Some(inner) => Self::from_json_value(inner),
                None => Ok(map.into_iter().collect()),
            },
            _ => Err(ModelError::InvalidMappings(
                "expected a JSON object".to_string(),
            )),
        }
    }
}

impl FromIterator<(String, Value)> for MappingSet {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k, MappingValue::from_value(v)))
                .collect(),
        }
    }
}

impl FromIterator<(String, MappingValue)> for MappingSet {
    fn from_iter<I: IntoIterator<Item = (String, MappingValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
