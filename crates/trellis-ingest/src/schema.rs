//! Column metadata loading and inference.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use trellis_model::{CellValue, ColumnKind, ColumnMeta, RawTable, Schema};

use crate::typing::{parse_date, parse_f64};

/// Load column metadata from a JSON file (`{"columns": [...]}` or a bare array).
pub fn load_schema(path: &Path) -> Result<Schema> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read column metadata: {}", path.display()))?;
    let schema: Schema = serde_json::from_str(&text)
        .with_context(|| format!("parse column metadata: {}", path.display()))?;
    debug!(path = %path.display(), columns = schema.len(), "loaded column metadata");
    Ok(schema)
}

/// Text used when a cell becomes a factor label.
fn label_text(cell: &CellValue) -> Option<String> {
    match cell {
        CellValue::Missing => None,
        CellValue::Number(v) if v.is_nan() => None,
        CellValue::Number(v) => Some(v.to_string()),
        CellValue::Text(text) => Some(text.clone()),
        CellValue::Date(date) => Some(date.to_string()),
        CellValue::Datetime(datetime) => Some(datetime.to_string()),
        CellValue::Code(code) => Some(code.to_string()),
    }
}

fn infer_kind<'a>(values: impl Iterator<Item = &'a CellValue>) -> ColumnKind {
    let mut seen = 0usize;
    let mut numeric = true;
    let mut integral = true;
    let mut dates = true;
    let mut datetimes = true;
    for value in values {
        match value {
            CellValue::Missing => continue,
            CellValue::Number(v) if v.is_nan() => continue,
            CellValue::Number(v) => {
                integral &= v.fract() == 0.0;
                dates = false;
                datetimes = false;
            }
            CellValue::Code(_) => {
                dates = false;
                datetimes = false;
            }
            CellValue::Date(_) => {
                numeric = false;
                datetimes = false;
            }
            CellValue::Datetime(_) => {
                numeric = false;
                dates = false;
            }
            CellValue::Text(text) => {
                match parse_f64(text) {
                    Some(v) => integral &= v.fract() == 0.0,
                    None => numeric = false,
                }
                if parse_date(text).is_none() {
                    dates = false;
                }
                datetimes = false;
            }
        }
        seen += 1;
    }
    if seen == 0 {
        ColumnKind::String
    } else if numeric && integral {
        ColumnKind::Integer
    } else if numeric {
        ColumnKind::Numeric
    } else if dates {
        ColumnKind::Date
    } else if datetimes {
        ColumnKind::Datetime
    } else {
        ColumnKind::String
    }
}

/// Derive column metadata from the table itself.
///
/// Columns named in `factor_columns` become factors whose levels are the
/// sorted distinct observed labels; other columns are typed from their values.
pub fn infer_schema(table: &RawTable, factor_columns: &[String]) -> Result<Schema> {
    for name in factor_columns {
        if table.column_index(name).is_none() {
            return Err(anyhow!("factor column {name} is not in the table"));
        }
    }
    let mut columns = Vec::with_capacity(table.width());
    for (idx, header) in table.headers.iter().enumerate() {
        if factor_columns.contains(header) {
            let levels: BTreeSet<String> =
                table.column_values(idx).filter_map(label_text).collect();
            let column = ColumnMeta::factor(header.clone(), levels)
                .with_context(|| format!("infer levels for {header}"))?;
            columns.push(column);
        } else {
            let kind = infer_kind(table.column_values(idx));
            columns.push(ColumnMeta::new(header.clone(), kind));
        }
    }
    Schema::new(columns).context("infer column metadata")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_kinds_from_text() {
        let table = RawTable::from_rows(
            ["n", "x", "d", "s"],
            vec![
                vec![Some("1"), Some("1.5"), Some("2024-01-02"), Some("a")],
                vec![Some("2"), None, Some("2024-02-03"), Some("3")],
            ],
        );
        let schema = infer_schema(&table, &[]).unwrap();
        let kinds: Vec<ColumnKind> = schema.columns().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Integer,
                ColumnKind::Numeric,
                ColumnKind::Date,
                ColumnKind::String
            ]
        );
    }

    #[test]
    fn factor_levels_are_sorted_distinct_labels() {
        let table = RawTable::from_rows(
            ["country"],
            vec![vec![Some("Italy")], vec![None], vec![Some("Algeria")], vec![Some("Italy")]],
        );
        let schema = infer_schema(&table, &["country".to_string()]).unwrap();
        assert_eq!(schema.columns()[0].levels, vec!["Algeria", "Italy"]);
    }

    #[test]
    fn all_missing_factor_is_an_error() {
        let table = RawTable::from_rows(["f"], vec![vec![None::<&str>]]);
        assert!(infer_schema(&table, &["f".to_string()]).is_err());
    }

    #[test]
    fn unknown_factor_column_is_an_error() {
        let table = RawTable::from_rows(["a"], vec![vec!["x"]]);
        assert!(infer_schema(&table, &["b".to_string()]).is_err());
    }
}
