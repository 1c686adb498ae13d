use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, info_span, warn};

use iaso_map::{
    CoverageTreeNode, FlatIndex, MappingState, MappingSummary, coverage_tree, index_questions,
    mapping_key, question_states,
};
use iaso_model::{DescriptorNode, MappingSet};

/// A descriptor loaded from disk together with its index.
#[derive(Debug)]
pub struct LoadedForm {
    pub descriptor: Option<DescriptorNode>,
    pub index: FlatIndex,
}

impl LoadedForm {
    pub fn name(&self) -> &str {
        self.descriptor.as_ref().map_or("", |d| d.name.as_str())
    }
}

/// One row of the per-question listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionRow {
    pub key: String,
    pub mapping_key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub state: MappingState,
}

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub form: String,
    pub summary: MappingSummary,
    pub questions: Vec<QuestionRow>,
}

pub fn load_form(path: &Path) -> Result<LoadedForm> {
    let file = File::open(path).with_context(|| format!("open descriptor {}", path.display()))?;
    let descriptor = DescriptorNode::from_reader(BufReader::new(file))
        .with_context(|| format!("parse descriptor {}", path.display()))?;
    if descriptor.is_none() {
        warn!(path = %path.display(), "descriptor is empty");
    }
    let index = index_questions(descriptor.as_ref());
    info!(path = %path.display(), nodes = index.len(), "loaded descriptor");
    Ok(LoadedForm { descriptor, index })
}

/// Loads question mappings; a missing path yields an empty set.
pub fn load_mappings(path: Option<&Path>) -> Result<MappingSet> {
    let Some(path) = path else {
        return Ok(MappingSet::new());
    };
    let file = File::open(path).with_context(|| format!("open mappings {}", path.display()))?;
    let mappings = MappingSet::from_reader(BufReader::new(file))
        .with_context(|| format!("parse mappings {}", path.display()))?;
    info!(path = %path.display(), entries = mappings.len(), "loaded question mappings");
    Ok(mappings)
}

pub fn run_index(descriptor: &Path) -> Result<LoadedForm> {
    let span = info_span!("index", descriptor = %descriptor.display());
    let _guard = span.enter();
    load_form(descriptor)
}

pub fn run_coverage(
    descriptor: &Path,
    mappings: Option<&Path>,
    lang: Option<&str>,
) -> Result<Option<CoverageTreeNode>> {
    let span = info_span!("coverage", descriptor = %descriptor.display());
    let _guard = span.enter();
    let form = load_form(descriptor)?;
    let mappings = load_mappings(mappings)?;
    Ok(coverage_tree(
        form.descriptor.as_ref(),
        &form.index,
        &mappings,
        lang,
    ))
}

pub fn run_summary(
    descriptor: &Path,
    mappings: Option<&Path>,
    lang: Option<&str>,
) -> Result<SummaryReport> {
    let span = info_span!("summary", descriptor = %descriptor.display());
    let _guard = span.enter();
    let form = load_form(descriptor)?;
    let mappings = load_mappings(mappings)?;

    let summary = MappingSummary::compute(&form.index, &mappings);
    if !summary.orphan_keys.is_empty() {
        warn!(
            count = summary.orphan_keys.len(),
            keys = ?summary.orphan_keys,
            "mappings reference questions missing from the descriptor"
        );
    }
    info!(
        questions = summary.total_questions,
        mapped = summary.mapped,
        never_mapped = summary.never_mapped,
        unset = summary.unset,
        "computed mapping summary"
    );

    let questions = question_states(&form.index, &mappings)
        .into_iter()
        .map(|(node, state)| QuestionRow {
            key: node.key.clone(),
            mapping_key: mapping_key(node).to_string(),
            label: node.display_label(lang).to_string(),
            node_type: node.node_type.clone(),
            state,
        })
        .collect();

    Ok(SummaryReport {
        form: form.name().to_string(),
        summary,
        questions,
    })
}
