use std::path::Path;

use anyhow::{Context, Result, bail};
use csv::ReaderBuilder;
use tracing::debug;

use trellis_model::{CellValue, RawTable};

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

/// Empty cells become `Missing`; everything else is kept as text until
/// [`crate::type_table`] resolves it against the column kinds.
fn normalize_cell(raw: &str) -> CellValue {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    if trimmed.is_empty() {
        CellValue::Missing
    } else {
        CellValue::Text(trimmed.to_string())
    }
}

/// Read a CSV file whose first non-blank record is the header row.
///
/// Short records are padded with `Missing`. Extra trailing fields must be
/// empty; a non-empty cell without a header is an error.
pub fn read_csv_table(path: &Path) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read csv: {}", path.display()))?;
    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read record: {}", path.display()))?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        if headers.is_none() {
            headers = Some(record.iter().map(normalize_header).collect());
            continue;
        }
        let width = headers.as_ref().map_or(0, Vec::len);
        if record.iter().skip(width).any(|value| !value.trim().is_empty()) {
            let line = record.position().map_or(0, csv::Position::line);
            bail!(
                "{}: record on line {line} has {} fields but the header has {width}",
                path.display(),
                record.len()
            );
        }
        let mut row = Vec::with_capacity(width);
        for idx in 0..width {
            row.push(record.get(idx).map_or(CellValue::Missing, normalize_cell));
        }
        rows.push(row);
    }
    let headers = headers.unwrap_or_default();
    debug!(
        path = %path.display(),
        columns = headers.len(),
        rows = rows.len(),
        "read csv table"
    );
    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_whitespace_is_collapsed() {
        assert_eq!(normalize_header("\u{feff}  gdp   per  capita "), "gdp per capita");
    }

    #[test]
    fn blank_cells_are_missing() {
        assert_eq!(normalize_cell("   "), CellValue::Missing);
        assert_eq!(normalize_cell(" 0 "), CellValue::Text("0".to_string()));
    }
}
