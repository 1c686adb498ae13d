//! Mapping coverage of descriptor groups.

use std::collections::BTreeSet;

use serde::Serialize;

use iaso_model::{DescriptorNode, MappingSet};

use crate::index::{FlatIndex, IndexedNode};
use crate::predicates::mapping_key;

/// Mapped and total descendant question counts of a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Coverage {
    pub mapped: usize,
    pub total: usize,
}

impl Coverage {
    /// Fraction mapped, or `None` for a group without questions.
    pub fn ratio(&self) -> Option<f64> {
        (self.total > 0).then(|| self.mapped as f64 / self.total as f64)
    }

    pub fn status(&self) -> CoverageStatus {
        if self.total == 0 {
            CoverageStatus::Empty
        } else if self.mapped == 0 {
            CoverageStatus::Unmapped
        } else if self.mapped < self.total {
            CoverageStatus::Partial
        } else {
            CoverageStatus::Complete
        }
    }
}

/// Colour class of a group in the navigation tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageStatus {
    /// No questions below the group.
    Empty,
    Unmapped,
    Partial,
    Complete,
}

/// Coverage of a descriptor node.
///
/// `is_top_node` marks the survey root: it also counts questions with no
/// recorded ancestry. A question counts as mapped when its stored value is
/// truthy, so placeholders such as `{}` count too. Non-containers have
/// `(0, 0)` coverage.
pub fn get_coverage(
    index: &FlatIndex,
    mappings: &MappingSet,
    node: &DescriptorNode,
    is_top_node: bool,
) -> Coverage {
    if !node.is_container() {
        return Coverage::default();
    }
    let children: BTreeSet<&str> = node.children.iter().map(|c| c.name.as_str()).collect();
    compute(index, mappings, &node.name, &children, is_top_node)
}

/// Coverage of an already indexed container, as a nested group.
pub fn entry_coverage(index: &FlatIndex, mappings: &MappingSet, entry: &IndexedNode) -> Coverage {
    if !entry.is_container {
        return Coverage::default();
    }
    let children: BTreeSet<&str> = entry.children.iter().map(String::as_str).collect();
    compute(index, mappings, &entry.name, &children, false)
}

fn compute(
    index: &FlatIndex,
    mappings: &MappingSet,
    group_name: &str,
    children: &BTreeSet<&str>,
    is_top_node: bool,
) -> Coverage {
    let belongs = |q: &IndexedNode| {
        !q.is_container
            && q
                .path
                .as_ref()
                .is_some_and(|path| path.iter().any(|name| children.contains(name.as_str())))
    };

    let mut coverage = Coverage::default();
    for q in index.questions() {
        let selected = if is_top_node {
            belongs(q) || q.is_orphan()
        } else {
            belongs(q) && q.path_contains(group_name)
        };
        if !selected {
            continue;
        }
        coverage.total += 1;
        if mappings.is_present(mapping_key(q)) {
            coverage.mapped += 1;
        }
    }
    coverage
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_thresholds() {
        let c = |mapped, total| Coverage { mapped, total }.status();
        assert_eq!(c(0, 0), CoverageStatus::Empty);
        assert_eq!(c(0, 3), CoverageStatus::Unmapped);
        assert_eq!(c(1, 3), CoverageStatus::Partial);
        assert_eq!(c(3, 3), CoverageStatus::Complete);
    }

    #[test]
    fn ratio_of_empty_group_is_none() {
        assert_eq!(Coverage::default().ratio(), None);
        assert_eq!(Coverage { mapped: 1, total: 4 }.ratio(), Some(0.25));
    }
}
