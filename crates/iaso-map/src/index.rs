//! Flat index over a survey descriptor.
//!
//! The indexer walks the descriptor depth-first in document order and records
//! every node below the root under a derived key, together with its ancestry.
//! The descriptor itself is only borrowed; all annotations live on the
//! [`IndexedNode`] copies.

use std::collections::HashMap;

use serde::Serialize;
use serde::ser::Serializer;
use tracing::{debug, trace};

use iaso_model::descriptor::{GROUP_TYPE, SURVEY_TYPE};
use iaso_model::{DescriptorNode, Label, NodeKind, display_text};

/// Name of anonymous groups whose label stands in for the key.
const BEGIN_GROUP_NAME: &str = "begin";

/// Separator between a multiple-choice question and one of its options.
pub const OPTION_KEY_SEPARATOR: &str = "__";

/// A descriptor node annotated with its position in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedNode {
    /// Slot of this node in the index.
    pub key: String,
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    /// Names from the root down to this node. Absent for direct children of
    /// the root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<String>>,
    /// Derived key of the structural parent (before collision suffixing).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_name: Option<String>,
    /// Index slot of the structural parent. Absent for direct children of the
    /// root.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_key: Option<String>,
    /// Synthetic key of a multiple-choice option.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub is_container: bool,
    /// Names of the immediate children, in document order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculate: Option<String>,
}

impl IndexedNode {
    pub fn kind(&self) -> NodeKind {
        NodeKind::from_type(&self.node_type)
    }

    /// True when `name` appears anywhere in the recorded ancestry.
    pub fn path_contains(&self, name: &str) -> bool {
        self.path
            .as_ref()
            .is_some_and(|path| path.iter().any(|segment| segment == name))
    }

    /// True when the node has no recorded ancestry (absent or empty path).
    pub fn is_orphan(&self) -> bool {
        self.path.as_ref().is_none_or(Vec::is_empty)
    }

    pub fn display_label(&self, lang: Option<&str>) -> &str {
        display_text(self.label.as_ref(), lang, &self.name)
    }
}

/// Lookup table of indexed nodes, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatIndex {
    entries: Vec<IndexedNode>,
    slots: HashMap<String, usize>,
}

impl FlatIndex {
    pub fn get(&self, key: &str) -> Option<&IndexedNode> {
        self.slots.get(key).map(|&idx| &self.entries[idx])
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IndexedNode> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|node| node.key.as_str())
    }

    /// Non-container entries: the nodes that can carry a mapping.
    pub fn questions(&self) -> impl Iterator<Item = &IndexedNode> {
        self.entries.iter().filter(|node| !node.is_container)
    }

    pub fn find_by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a IndexedNode> {
        self.entries.iter().filter(move |node| node.name == name)
    }

    /// Entries whose structural parent is stored at `parent_key`
    /// (`None` selects the direct children of the root).
    pub fn children_of<'a>(
        &'a self,
        parent_key: Option<&'a str>,
    ) -> impl Iterator<Item = &'a IndexedNode> {
        self.entries
            .iter()
            .filter(move |node| node.parent_key.as_deref() == parent_key)
    }

    /// Stores `node` under the first free slot among `key`, `key1`, `key2`...
    fn insert(&mut self, mut node: IndexedNode) -> &IndexedNode {
        let mut slot = node.key.clone();
        let mut suffix = 1usize;
        while self.slots.contains_key(&slot) {
            slot = format!("{}{suffix}", node.key);
            suffix += 1;
        }
        if slot != node.key {
            debug!(key = %node.key, slot = %slot, "derived key collision");
            node.key = slot.clone();
        }
        let idx = self.entries.len();
        self.slots.insert(slot, idx);
        self.entries.push(node);
        &self.entries[idx]
    }
}

impl Serialize for FlatIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|node| (&node.key, node)))
    }
}

impl<'a> IntoIterator for &'a FlatIndex {
    type Item = &'a IndexedNode;
    type IntoIter = std::slice::Iter<'a, IndexedNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Work item: a node waiting to be indexed.
struct Pending<'a> {
    node: &'a DescriptorNode,
    parent: &'a DescriptorNode,
    /// Derived key of the parent; `None` under the root.
    parent_name: Option<String>,
    /// Index slot of the parent; `None` under the root.
    parent_key: Option<String>,
    /// Names from the root down to this node.
    ancestry: Vec<String>,
    /// Whether `ancestry` is recorded as the node's path.
    record_path: bool,
}

/// Builds the flat index of every node below the descriptor root.
///
/// A missing descriptor yields an empty index.
pub fn index_questions(descriptor: Option<&DescriptorNode>) -> FlatIndex {
    let mut index = FlatIndex::default();
    let Some(root) = descriptor else {
        return index;
    };
    let root_name = if root.name.is_empty() {
        SURVEY_TYPE.to_string()
    } else {
        root.name.clone()
    };

    let mut stack: Vec<Pending<'_>> = root
        .children
        .iter()
        .rev()
        .map(|child| Pending {
            node: child,
            parent: root,
            parent_name: None,
            parent_key: None,
            ancestry: vec![root_name.clone(), child.name.clone()],
            record_path: false,
        })
        .collect();

    while let Some(item) = stack.pop() {
        let node = item.node;
        let (key, uuid) = derive_key(node, item.parent, item.parent_name.as_deref());
        let is_container = node.is_container();
        let stored = index.insert(IndexedNode {
            key: key.clone(),
            name: node.name.clone(),
            node_type: node.node_type.clone(),
            label: node.label.clone(),
            path: item.record_path.then(|| item.ancestry.clone()),
            parent_name: item.parent_name,
            parent_key: item.parent_key,
            uuid,
            is_container,
            children: node.children.iter().map(|c| c.name.clone()).collect(),
            calculate: node.calculate().map(str::to_string),
        });
        trace!(key = %stored.key, node_type = %stored.node_type, "indexed node");
        let slot = stored.key.clone();

        if !is_container {
            continue;
        }
        for child in node.children.iter().rev() {
            let mut ancestry = item.ancestry.clone();
            ancestry.push(child.name.clone());
            stack.push(Pending {
                node: child,
                parent: node,
                parent_name: Some(key.clone()),
                parent_key: Some(slot.clone()),
                ancestry,
                record_path: true,
            });
        }
    }

    debug!(descriptor = %root_name, nodes = index.len(), "indexed descriptor");
    index
}

/// Key under which a node is indexed, plus the synthetic option key when the
/// node is a multiple-choice option.
fn derive_key(
    node: &DescriptorNode,
    parent: &DescriptorNode,
    parent_name: Option<&str>,
) -> (String, Option<String>) {
    if parent.kind() == NodeKind::SelectAllThatApply {
        let prefix = parent_name.unwrap_or(parent.name.as_str());
        let uuid = format!("{prefix}{OPTION_KEY_SEPARATOR}{}", node.name);
        return (uuid.clone(), Some(uuid));
    }
    if node.node_type == GROUP_TYPE && node.name == BEGIN_GROUP_NAME {
        return (node.display_label(None).to_string(), None);
    }
    (node.name.clone(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(name: &str) -> DescriptorNode {
        DescriptorNode::new(name, "text")
    }

    #[test]
    fn missing_descriptor_yields_empty_index() {
        assert!(index_questions(None).is_empty());
    }

    #[test]
    fn root_is_not_indexed() {
        let survey = DescriptorNode::new("survey", "survey").with_children(vec![question("q1")]);
        let index = index_questions(Some(&survey));
        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["q1"]);
        assert!(index.get("q1").unwrap().path.is_none());
    }

    #[test]
    fn begin_group_uses_label_as_key() {
        let survey = DescriptorNode::new("survey", "survey").with_children(vec![
            DescriptorNode::new("begin", "group")
                .with_label(Label::Text("Vaccination".to_string()))
                .with_children(vec![question("dose")]),
        ]);
        let index = index_questions(Some(&survey));
        let group = index.get("Vaccination").unwrap();
        assert_eq!(group.name, "begin");
        assert_eq!(
            index.get("dose").unwrap().parent_name.as_deref(),
            Some("Vaccination")
        );
        // Ancestry still records structural names.
        assert_eq!(
            index.get("dose").unwrap().path.as_deref(),
            Some(&["survey".to_string(), "begin".to_string(), "dose".to_string()][..])
        );
    }

    #[test]
    fn third_collision_gets_its_own_slot() {
        let survey = DescriptorNode::new("survey", "survey").with_children(vec![
            question("age"),
            question("age"),
            question("age"),
        ]);
        let index = index_questions(Some(&survey));
        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["age", "age1", "age2"]);
    }

    #[test]
    fn collision_slot_skips_existing_suffixed_name() {
        let survey = DescriptorNode::new("survey", "survey").with_children(vec![
            question("q"),
            question("q1"),
            question("q"),
        ]);
        let index = index_questions(Some(&survey));
        assert_eq!(index.keys().collect::<Vec<_>>(), vec!["q", "q1", "q2"]);
    }

    #[test]
    fn serializes_as_ordered_map() {
        let survey = DescriptorNode::new("survey", "survey")
            .with_children(vec![question("b"), question("a")]);
        let index = index_questions(Some(&survey));
        let json = serde_json::to_string(&index).unwrap();
        assert!(json.find("\"b\"").unwrap() < json.find("\"a\"").unwrap());
    }
}
