//! Classification of question mapping values.

use serde::Serialize;

use iaso_model::{MappingSet, MappingValue, is_truthy};

use crate::index::IndexedNode;

/// True when the value maps the question to at least one target.
pub fn is_mapped(value: &MappingValue) -> bool {
    match value {
        MappingValue::MappedSingle { id, .. } => is_truthy(id),
        MappingValue::MappedMulti(items) => !items.is_empty(),
        MappingValue::Unset | MappingValue::Other(_) | MappingValue::NeverMapped { .. } => false,
    }
}

/// True when the user decided the question is never to be mapped.
pub fn is_never_mapped(value: &MappingValue) -> bool {
    matches!(value, MappingValue::NeverMapped { .. })
}

/// Key under which a question's mapping is stored: the option key for
/// multiple-choice options, the question name otherwise.
pub fn mapping_key(node: &IndexedNode) -> &str {
    node.uuid.as_deref().unwrap_or(node.name.as_str())
}

/// Mapping decision for one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingState {
    Mapped,
    NeverMapped,
    Unset,
}

impl MappingState {
    pub fn of(value: &MappingValue) -> Self {
        if is_mapped(value) {
            Self::Mapped
        } else if is_never_mapped(value) {
            Self::NeverMapped
        } else {
            Self::Unset
        }
    }

    /// Missing entries count as unset.
    pub fn of_entry(value: Option<&MappingValue>) -> Self {
        value.map_or(Self::Unset, Self::of)
    }

    /// State of an indexed question in a mapping set.
    pub fn lookup(mappings: &MappingSet, node: &IndexedNode) -> Self {
        Self::of_entry(mappings.get(mapping_key(node)))
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Mapped => "mapped",
            Self::NeverMapped => "never mapped",
            Self::Unset => "unset",
        }
    }
}
