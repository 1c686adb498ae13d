//! Navigation tree annotated with mapping coverage.

use std::collections::HashMap;

use serde::Serialize;

use iaso_model::{DescriptorNode, MappingSet};

use crate::coverage::{Coverage, CoverageStatus, entry_coverage, get_coverage};
use crate::index::{FlatIndex, IndexedNode};
use crate::predicates::{MappingState, mapping_key};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageTreeNode {
    pub key: String,
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(flatten)]
    pub detail: TreeDetail,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CoverageTreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeDetail {
    Group {
        coverage: Coverage,
        status: CoverageStatus,
    },
    Question {
        mapping_key: String,
        state: MappingState,
    },
}

impl CoverageTreeNode {
    pub fn coverage(&self) -> Option<Coverage> {
        match self.detail {
            TreeDetail::Group { coverage, .. } => Some(coverage),
            TreeDetail::Question { .. } => None,
        }
    }

    /// Depth-first search by index key.
    pub fn find(&self, key: &str) -> Option<&CoverageTreeNode> {
        if self.key == key {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(key))
    }
}

/// Builds the navigation tree for a descriptor.
///
/// The root carries the top-level coverage; every indexed container below it
/// carries its nested coverage and every question its mapping state. Returns
/// `None` for a missing descriptor.
pub fn coverage_tree(
    descriptor: Option<&DescriptorNode>,
    index: &FlatIndex,
    mappings: &MappingSet,
    lang: Option<&str>,
) -> Option<CoverageTreeNode> {
    let root = descriptor?;
    let mut by_parent: HashMap<Option<&str>, Vec<&IndexedNode>> = HashMap::new();
    for entry in index {
        by_parent
            .entry(entry.parent_key.as_deref())
            .or_default()
            .push(entry);
    }

    let coverage = get_coverage(index, mappings, root, true);
    let builder = TreeBuilder {
        index,
        mappings,
        lang,
        by_parent: &by_parent,
    };
    Some(CoverageTreeNode {
        key: root.name.clone(),
        name: root.name.clone(),
        label: root.display_label(lang).to_string(),
        node_type: root.node_type.clone(),
        detail: TreeDetail::Group {
            coverage,
            status: coverage.status(),
        },
        children: builder.children(None),
    })
}

struct TreeBuilder<'a> {
    index: &'a FlatIndex,
    mappings: &'a MappingSet,
    lang: Option<&'a str>,
    by_parent: &'a HashMap<Option<&'a str>, Vec<&'a IndexedNode>>,
}

impl<'a> TreeBuilder<'a> {
    fn children(&self, parent_key: Option<&'a str>) -> Vec<CoverageTreeNode> {
        self.by_parent
            .get(&parent_key)
            .map(|entries| entries.iter().map(|&entry| self.node(entry)).collect())
            .unwrap_or_default()
    }

    fn node(&self, entry: &'a IndexedNode) -> CoverageTreeNode {
        let detail = if entry.is_container {
            let coverage = entry_coverage(self.index, self.mappings, entry);
            TreeDetail::Group {
                coverage,
                status: coverage.status(),
            }
        } else {
            TreeDetail::Question {
                mapping_key: mapping_key(entry).to_string(),
                state: MappingState::lookup(self.mappings, entry),
            }
        };
        let children = if entry.is_container {
            self.children(Some(&entry.key))
        } else {
            Vec::new()
        };
        CoverageTreeNode {
            key: entry.key.clone(),
            name: entry.name.clone(),
            label: entry.display_label(self.lang).to_string(),
            node_type: entry.node_type.clone(),
            detail,
            children,
        }
    }
}
