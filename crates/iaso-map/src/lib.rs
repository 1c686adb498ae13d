//! Descriptor indexing and question mapping coverage.
//!
//! [`index_questions`] flattens a survey descriptor into a [`FlatIndex`].
//! Given the question mappings of a mapping version, [`get_coverage`] counts
//! mapped questions below a group, [`coverage_tree`] annotates the whole
//! navigation tree and [`MappingSummary`] totals the form.

#![deny(unsafe_code)]

pub mod coverage;
pub mod index;
pub mod predicates;
pub mod summary;
pub mod tree;

pub use coverage::{Coverage, CoverageStatus, entry_coverage, get_coverage};
pub use index::{FlatIndex, IndexedNode, index_questions};
pub use predicates::{MappingState, is_mapped, is_never_mapped, mapping_key};
pub use summary::{MappingSummary, question_states};
pub use tree::{CoverageTreeNode, TreeDetail, coverage_tree};
