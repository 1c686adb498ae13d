use std::fmt::Write;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use iaso_map::{CoverageStatus, CoverageTreeNode, FlatIndex, MappingState, TreeDetail};

use crate::commands::{QuestionRow, SummaryReport};

pub fn index_table(index: &FlatIndex) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Name"),
        header_cell("Type"),
        header_cell("Path"),
        header_cell("Group"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Center);
    for node in index {
        let path = node
            .path
            .as_ref()
            .map_or_else(|| "-".to_string(), |path| path.join(" / "));
        table.add_row(vec![
            key_cell(&node.key, node.is_container),
            Cell::new(&node.name),
            Cell::new(&node.node_type),
            if node.path.is_some() {
                Cell::new(path)
            } else {
                dim_cell(path)
            },
            if node.is_container {
                Cell::new("✓").fg(Color::Green)
            } else {
                dim_cell("-")
            },
        ]);
    }
    table
}

pub fn summary_table(report: &SummaryReport) -> Table {
    let summary = &report.summary;
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Form"),
        header_cell("Questions"),
        header_cell("Mapped"),
        header_cell("Never mapped"),
        header_cell("Unset"),
        header_cell("Recorded"),
        header_cell("Orphan keys"),
    ]);
    apply_summary_table_style(&mut table);
    for column in 1..7 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(&report.form)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold),
        Cell::new(summary.total_questions),
        count_cell(summary.mapped, Color::Green),
        count_cell(summary.never_mapped, Color::DarkYellow),
        count_cell(summary.unset, Color::Red),
        count_cell(summary.recorded, Color::Cyan),
        count_cell(summary.orphan_keys.len(), Color::Yellow),
    ]);
    table
}

pub fn question_table(rows: &[QuestionRow]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Label"),
        header_cell("Type"),
        header_cell("State"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.mapping_key),
            Cell::new(&row.label),
            Cell::new(&row.node_type),
            state_cell(row.state),
        ]);
    }
    table
}

/// Plain-text rendering of the coverage tree, one node per line.
pub fn coverage_text(tree: &CoverageTreeNode) -> String {
    let mut out = String::new();
    write_node(&mut out, tree, 0);
    out
}

fn write_node(out: &mut String, node: &CoverageTreeNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let name = if node.label == node.key {
        node.key.clone()
    } else {
        format!("{} ({})", node.label, node.key)
    };
    // Writing to a String cannot fail.
    let _ = match &node.detail {
        TreeDetail::Group { coverage, status } => writeln!(
            out,
            "{indent}{name} {}/{} {}",
            coverage.mapped,
            coverage.total,
            status_label(*status)
        ),
        TreeDetail::Question { state, .. } => {
            writeln!(out, "{indent}- {name} {}", state.label())
        }
    };
    for child in &node.children {
        write_node(out, child, depth + 1);
    }
}

pub fn status_label(status: CoverageStatus) -> &'static str {
    match status {
        CoverageStatus::Empty => "empty",
        CoverageStatus::Unmapped => "unmapped",
        CoverageStatus::Partial => "partial",
        CoverageStatus::Complete => "complete",
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn key_cell(key: &str, is_container: bool) -> Cell {
    if is_container {
        Cell::new(key)
            .fg(Color::Blue)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new(key)
    }
}

fn state_cell(state: MappingState) -> Cell {
    match state {
        MappingState::Mapped => Cell::new(state.label()).fg(Color::Green),
        MappingState::NeverMapped => Cell::new(state.label()).fg(Color::DarkYellow),
        MappingState::Unset => dim_cell(state.label()),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
