//! Row record building and the serialized cognostics document.

use std::collections::{BTreeMap, BTreeSet};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

use trellis_model::{CellValue, CogValue, ColumnMeta, RawTable, Result, Schema, TrellisError};

use crate::coerce::{AnomalyKind, coerce_value};

/// One coerced row: column name to serialized value, in declared column order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowRecord {
    entries: Vec<(String, CogValue)>,
}

impl RowRecord {
    pub fn get(&self, column: &str) -> Option<&CogValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CogValue)> + '_ {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for RowRecord {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// The `{columns, data}` document both writers render.
///
/// Only [`build_document`] constructs one, so every artifact is rendered
/// from rows that have already been through the coercer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CogDocument {
    columns: Vec<ColumnMeta>,
    data: Vec<RowRecord>,
}

impl CogDocument {
    pub fn columns(&self) -> &[ColumnMeta] {
        &self.columns
    }

    pub fn rows(&self) -> &[RowRecord] {
        &self.data
    }

    pub fn row_count(&self) -> usize {
        self.data.len()
    }
}

/// A factor cell that was serialized without a clean level mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorAnomaly {
    /// 0-based row index in the input table.
    pub row: usize,
    pub column: String,
    pub kind: AnomalyKind,
}

/// Factor anomalies collected while building a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoercionReport {
    pub anomalies: Vec<FactorAnomaly>,
}

impl CoercionReport {
    pub fn is_empty(&self) -> bool {
        self.anomalies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.anomalies.len()
    }

    /// Anomaly counts per column, sorted by column name.
    pub fn counts_by_column(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for anomaly in &self.anomalies {
            *counts.entry(anomaly.column.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Distinct unknown labels seen in `column`.
    pub fn unknown_labels(&self, column: &str) -> BTreeSet<&str> {
        self.anomalies
            .iter()
            .filter(|anomaly| anomaly.column == column)
            .filter_map(|anomaly| match &anomaly.kind {
                AnomalyKind::UnknownLabel(label) => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// Options controlling document building.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildOptions {
    /// Fail on the first factor anomaly instead of preserving the value.
    pub strict_factors: bool,
}

impl BuildOptions {
    #[must_use]
    pub fn strict() -> Self {
        Self {
            strict_factors: true,
        }
    }
}

/// A built document plus the anomalies absorbed while building it.
#[derive(Debug, Clone)]
pub struct BuiltDocument {
    pub document: CogDocument,
    pub report: CoercionReport,
}

/// For each schema column, where its value lives in a table row.
struct ColumnLayout<'a> {
    schema: &'a Schema,
    sources: Vec<Option<usize>>,
    width: usize,
}

impl<'a> ColumnLayout<'a> {
    fn new(headers: &[String], schema: &'a Schema) -> Result<Self> {
        let mut seen = BTreeSet::new();
        for header in headers {
            if !seen.insert(header.as_str()) {
                return Err(TrellisError::DuplicateColumn {
                    name: header.clone(),
                });
            }
            if !schema.contains(header) {
                return Err(TrellisError::MissingMetadata {
                    column: header.clone(),
                });
            }
        }
        let sources = schema
            .columns()
            .iter()
            .map(|column| {
                let source = headers.iter().position(|header| *header == column.name);
                if source.is_none() {
                    debug!(column = %column.name, "declared column absent from table");
                }
                source
            })
            .collect();
        Ok(Self {
            schema,
            sources,
            width: headers.len(),
        })
    }

    fn build(
        &self,
        row_index: usize,
        row: &[CellValue],
        options: BuildOptions,
        report: &mut CoercionReport,
    ) -> Result<RowRecord> {
        if row.len() != self.width {
            return Err(TrellisError::RowLengthMismatch {
                row: row_index,
                expected: self.width,
                actual: row.len(),
            });
        }
        let mut entries = Vec::with_capacity(self.schema.len());
        for (column, source) in self.schema.columns().iter().zip(&self.sources) {
            let coerced = match source {
                Some(index) => coerce_value(&row[*index], column),
                None => coerce_value(&CellValue::Missing, column),
            };
            if let Some(kind) = coerced.anomaly {
                if options.strict_factors {
                    return Err(TrellisError::FactorAnomaly {
                        row: row_index,
                        column: column.name.clone(),
                        detail: kind.to_string(),
                    });
                }
                warn!(
                    row = row_index,
                    column = %column.name,
                    "factor value has no matching level; preserved as-is"
                );
                report.anomalies.push(FactorAnomaly {
                    row: row_index,
                    column: column.name.clone(),
                    kind,
                });
            }
            entries.push((column.name.clone(), coerced.value));
        }
        Ok(RowRecord { entries })
    }
}

/// Build one row record by coercing each value against its column metadata.
///
/// Columns are emitted in schema order. Returns the record together with any
/// factor anomalies found in the row (always empty in strict mode).
pub fn build_row_record(
    headers: &[String],
    row: &[CellValue],
    schema: &Schema,
    options: BuildOptions,
) -> Result<(RowRecord, Vec<FactorAnomaly>)> {
    let layout = ColumnLayout::new(headers, schema)?;
    let mut report = CoercionReport::default();
    let record = layout.build(0, row, options, &mut report)?;
    Ok((record, report.anomalies))
}

/// Coerce every row of `table` against `schema` into a [`CogDocument`].
///
/// # Errors
///
/// Fails when a table column has no metadata entry, when headers repeat,
/// when a row has the wrong width, or (in strict mode) on a factor anomaly.
pub fn build_document(
    table: &RawTable,
    schema: &Schema,
    options: BuildOptions,
) -> Result<BuiltDocument> {
    let layout = ColumnLayout::new(&table.headers, schema)?;
    let mut report = CoercionReport::default();
    let mut data = Vec::with_capacity(table.rows.len());
    for (row_index, row) in table.rows.iter().enumerate() {
        data.push(layout.build(row_index, row, options, &mut report)?);
    }
    debug!(
        rows = data.len(),
        columns = schema.len(),
        factors = schema.factor_count(),
        anomalies = report.len(),
        "built cognostics document"
    );
    Ok(BuiltDocument {
        document: CogDocument {
            columns: schema.columns().to_vec(),
            data,
        },
        report,
    })
}
