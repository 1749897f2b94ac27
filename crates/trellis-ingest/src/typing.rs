//! Resolve textual cells against the declared column kinds.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use trellis_model::{CellValue, ColumnKind, RawTable, Schema};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Options for typing text tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestOptions {
    /// Read whole-number cells in factor columns as 0-based codes instead of labels.
    pub factor_codes: bool,
}

pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| parse_date(trimmed).and_then(|date| date.and_hms_opt(0, 0, 0)))
}

fn parse_code(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}

/// Convert one text cell according to `kind`. Unparseable text is kept as-is.
fn type_cell(text: &str, kind: ColumnKind, options: IngestOptions) -> CellValue {
    let typed = match kind {
        ColumnKind::Numeric | ColumnKind::Integer => parse_f64(text).map(CellValue::Number),
        ColumnKind::Date => parse_date(text).map(CellValue::Date),
        ColumnKind::Datetime => parse_datetime(text).map(CellValue::Datetime),
        ColumnKind::Factor if options.factor_codes => parse_code(text).map(CellValue::Code),
        ColumnKind::Factor | ColumnKind::String | ColumnKind::Href | ColumnKind::Key => None,
    };
    typed.unwrap_or_else(|| CellValue::Text(text.to_string()))
}

/// Type every text cell of `table` using the kind of its column in `schema`.
///
/// Columns unknown to the schema, and cells that are not text, are left untouched.
pub fn type_table(table: RawTable, schema: &Schema, options: IngestOptions) -> RawTable {
    let kinds: Vec<Option<ColumnKind>> = table
        .headers
        .iter()
        .map(|header| schema.column(header).map(|column| column.kind))
        .collect();
    let mut kept_as_text = 0usize;
    let rows = table
        .rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(kinds.iter().copied().chain(std::iter::repeat(None)))
                .map(|(cell, kind)| match (cell, kind) {
                    (CellValue::Text(text), Some(kind)) => {
                        let typed = type_cell(&text, kind, options);
                        if matches!(typed, CellValue::Text(_)) && !kind.is_textual() {
                            kept_as_text += 1;
                        }
                        typed
                    }
                    (cell, _) => cell,
                })
                .collect()
        })
        .collect();
    if kept_as_text > 0 {
        debug!(cells = kept_as_text, "cells did not parse as their column kind");
    }
    RawTable {
        headers: table.headers,
        rows,
    }
}
