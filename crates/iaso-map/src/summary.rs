//! Mapping summary for a whole form version.
//!
//! This module provides totals over every indexed question, as shown in the
//! header of the mapping screen, and the per-question state listing behind it.

use std::collections::BTreeSet;

use serde::Serialize;

use iaso_model::MappingSet;

use crate::index::{FlatIndex, IndexedNode};
use crate::predicates::{MappingState, mapping_key};

/// Summary of mapping counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MappingSummary {
    /// Number of indexed questions (containers excluded).
    pub total_questions: usize,
    /// Questions mapped to at least one target.
    pub mapped: usize,
    /// Questions explicitly excluded from mapping.
    pub never_mapped: usize,
    /// Questions without a decision.
    pub unset: usize,
    /// Questions whose stored value counts toward coverage (any truthy
    /// value, decided or not).
    pub recorded: usize,
    /// Mapping keys that match no indexed question.
    pub orphan_keys: Vec<String>,
}

impl MappingSummary {
    pub fn compute(index: &FlatIndex, mappings: &MappingSet) -> Self {
        let mut summary = Self::default();
        let mut known: BTreeSet<&str> = BTreeSet::new();
        for question in index.questions() {
            known.insert(mapping_key(question));
            summary.total_questions += 1;
            match MappingState::lookup(mappings, question) {
                MappingState::Mapped => summary.mapped += 1,
                MappingState::NeverMapped => summary.never_mapped += 1,
                MappingState::Unset => summary.unset += 1,
            }
            if mappings.is_present(mapping_key(question)) {
                summary.recorded += 1;
            }
        }
        summary.orphan_keys = mappings
            .keys()
            .filter(|key| !known.contains(key))
            .map(str::to_string)
            .collect();
        summary
    }

    /// Questions with a decision, mapped or never mapped.
    pub fn decided(&self) -> usize {
        self.mapped + self.never_mapped
    }

    pub fn is_complete(&self) -> bool {
        self.unset == 0
    }
}

/// Mapping state of every indexed question, in document order.
pub fn question_states<'a>(
    index: &'a FlatIndex,
    mappings: &MappingSet,
) -> Vec<(&'a IndexedNode, MappingState)> {
    index
        .questions()
        .map(|question| (question, MappingState::lookup(mappings, question)))
        .collect()
}
