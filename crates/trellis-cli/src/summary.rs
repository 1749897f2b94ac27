use std::collections::BTreeSet;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use trellis_cli::logging::{REDACTED_VALUE, log_data_enabled};
use trellis_cli::types::{ColumnSummary, InspectReport, WriteResult};
use trellis_model::ColumnKind;

/// Most unknown labels listed per column before truncating.
const MAX_LABEL_EXAMPLES: usize = 5;

pub fn print_summary(result: &WriteResult) {
    match &result.outputs {
        Some(paths) => {
            println!("JSON: {}", paths.json.display());
            println!("JS: {}", paths.js.display());
        }
        None => println!("Dry run: no artifacts written"),
    }
    println!("Rows: {}", result.rows);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Kind"),
        header_cell("Levels"),
        header_cell("Missing"),
        header_cell("Anomalies"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for column in &result.columns {
        table.add_row(vec![
            Cell::new(&column.name),
            kind_cell(column.kind),
            levels_cell(column),
            count_cell(column.missing, Color::DarkGrey),
            count_cell(column.anomalies, Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
        dim_cell("-"),
        count_cell(result.report.len(), Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    print_unknown_labels(result);
}

fn print_unknown_labels(result: &WriteResult) {
    let mut rows = Vec::new();
    for column in &result.columns {
        let labels = result.report.unknown_labels(&column.name);
        if labels.is_empty() {
            continue;
        }
        rows.push((
            column.name.as_str(),
            labels.len(),
            label_examples(&labels, log_data_enabled()),
        ));
    }
    if rows.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Distinct"),
        header_cell("Unknown labels"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (column, distinct, examples) in rows {
        table.add_row(vec![
            Cell::new(column),
            Cell::new(distinct).fg(Color::Yellow),
            Cell::new(examples),
        ]);
    }
    println!();
    println!("Factor values without a matching level (written as text):");
    println!("{table}");
    if !log_data_enabled() {
        println!("Labels are hidden; pass --log-data to show them.");
    }
}

/// Up to [`MAX_LABEL_EXAMPLES`] labels, or a redaction marker when cell values are hidden.
fn label_examples(labels: &BTreeSet<&str>, reveal: bool) -> String {
    if !reveal {
        return REDACTED_VALUE.to_string();
    }
    let mut shown: Vec<&str> = labels.iter().copied().take(MAX_LABEL_EXAMPLES).collect();
    if labels.len() > MAX_LABEL_EXAMPLES {
        shown.push("...");
    }
    shown.join(", ")
}

pub fn print_inspection(report: &InspectReport) {
    println!("Rows: {}", report.rows);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Kind"),
        header_cell("Levels"),
        header_cell("Nulls"),
        header_cell("Out of range"),
        header_cell("Unmapped"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for column in &report.columns {
        table.add_row(vec![
            Cell::new(&column.name),
            Cell::new(&column.kind),
            if column.kind == ColumnKind::Factor.as_str() {
                Cell::new(column.levels)
            } else {
                dim_cell("-")
            },
            count_cell(column.nulls, Color::DarkGrey),
            count_cell(column.violations, Color::Red),
            count_cell(column.unmapped, Color::Yellow),
        ]);
    }
    println!("{table}");
    if report.is_conformant() {
        println!("All factor codes are within their level ranges.");
    } else {
        eprintln!("Factor codes outside 1..=levels were found.");
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

fn kind_cell(kind: ColumnKind) -> Cell {
    if kind == ColumnKind::Factor {
        Cell::new(kind).fg(Color::Blue).add_attribute(Attribute::Bold)
    } else {
        Cell::new(kind)
    }
}

fn levels_cell(column: &ColumnSummary) -> Cell {
    if column.kind == ColumnKind::Factor {
        Cell::new(column.levels)
    } else {
        dim_cell("-")
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_examples_are_redacted_unless_revealed() {
        let labels: BTreeSet<&str> = ["Atlantis", "Lemuria"].into_iter().collect();
        assert_eq!(label_examples(&labels, false), REDACTED_VALUE);
        assert_eq!(label_examples(&labels, true), "Atlantis, Lemuria");
    }

    #[test]
    fn label_examples_are_truncated() {
        let labels: BTreeSet<&str> = ["a", "b", "c", "d", "e", "f", "g"].into_iter().collect();
        assert_eq!(label_examples(&labels, true), "a, b, c, d, e, ...");
    }
}
