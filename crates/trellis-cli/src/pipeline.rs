//! Cognostics pipeline with explicit stages.
//!
//! 1. **Ingest**: read the CSV table and load or infer column metadata
//! 2. **Build**: coerce every row into a `CogDocument`
//! 3. **Output**: write the JSON and JS artifacts
//!
//! `inspect_artifact` reads an artifact back and checks the factor contract.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::{debug, info, info_span, trace};

use trellis_ingest::{infer_schema, load_schema, read_csv_table, type_table};
use trellis_model::{RawTable, Schema};
use trellis_report::{AnomalyKind, BuiltDocument, build_document, parse_js_payload, write_outputs};

use crate::logging::redact_value;
use crate::types::{ColumnInspection, ColumnSummary, InspectReport, WriteRequest, WriteResult};

/// Read the table and resolve its column metadata.
pub fn ingest(request: &WriteRequest) -> Result<(RawTable, Schema)> {
    let raw = read_csv_table(&request.data)?;
    let schema = match &request.meta {
        Some(path) => load_schema(path)?,
        None => {
            let schema = infer_schema(&raw, &request.factors)?;
            debug!(
                columns = schema.len(),
                factors = schema.factor_count(),
                "inferred column metadata"
            );
            schema
        }
    };
    Ok((type_table(raw, &schema, request.ingest), schema))
}

/// Build the document and write both artifacts unless this is a dry run.
pub fn write_cognostics(request: &WriteRequest) -> Result<WriteResult> {
    let span = info_span!("write", data = %request.data.display());
    let _guard = span.enter();
    let start = Instant::now();

    let (table, schema) = ingest(request)?;
    let BuiltDocument { document, report } = build_document(&table, &schema, request.build)
        .with_context(|| format!("build cognostics for {}", request.data.display()))?;
    for anomaly in &report.anomalies {
        if let AnomalyKind::UnknownLabel(label) = &anomaly.kind {
            trace!(
                row = anomaly.row,
                column = %anomaly.column,
                label = redact_value(label),
                "unmapped factor label"
            );
        }
    }

    let outputs = if request.dry_run {
        info!("dry run: artifacts not written");
        None
    } else {
        Some(
            write_outputs(&document, &request.output_dir, &request.output)
                .with_context(|| format!("write artifacts to {}", request.output_dir.display()))?,
        )
    };

    let counts = report.counts_by_column();
    let columns = document
        .columns()
        .iter()
        .map(|column| ColumnSummary {
            name: column.name.clone(),
            kind: column.kind,
            levels: column.levels.len(),
            missing: document
                .rows()
                .iter()
                .filter(|row| row.get(&column.name).is_none_or(|value| value.is_null()))
                .count(),
            anomalies: counts.get(column.name.as_str()).copied().unwrap_or(0),
        })
        .collect();

    info!(
        rows = document.row_count(),
        anomalies = report.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "cognostics complete"
    );
    Ok(WriteResult {
        rows: document.row_count(),
        columns,
        report,
        outputs,
    })
}

/// Read a written artifact and check each factor column against the viewer contract.
pub fn inspect_artifact(path: &Path) -> Result<InspectReport> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read artifact: {}", path.display()))?;
    let is_js = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("js"));
    let document: Value = if is_js {
        parse_js_payload(&text)?
    } else {
        serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?
    };
    inspect_document(&document)
}

/// Check a parsed `{columns, data}` document.
pub fn inspect_document(document: &Value) -> Result<InspectReport> {
    let columns = document["columns"]
        .as_array()
        .ok_or_else(|| anyhow!("document has no columns array"))?;
    let data = document["data"]
        .as_array()
        .ok_or_else(|| anyhow!("document has no data array"))?;

    let mut report = InspectReport {
        rows: data.len(),
        columns: Vec::with_capacity(columns.len()),
    };
    for column in columns {
        let name = column["name"]
            .as_str()
            .ok_or_else(|| anyhow!("column without a name"))?;
        let kind = column["kind"].as_str().unwrap_or("unknown");
        let levels = column["levels"].as_array().map_or(0, Vec::len);
        let mut inspection = ColumnInspection {
            name: name.to_string(),
            kind: kind.to_string(),
            levels,
            ..ColumnInspection::default()
        };
        for row in data {
            match &row[name] {
                Value::Null => inspection.nulls += 1,
                Value::Number(number) if kind == "factor" => {
                    let in_range = number
                        .as_u64()
                        .is_some_and(|code| code >= 1 && code <= levels as u64);
                    if !in_range {
                        inspection.violations += 1;
                    }
                }
                Value::String(_) if kind == "factor" => inspection.unmapped += 1,
                _ => {}
            }
        }
        report.columns.push(inspection);
    }
    Ok(report)
}
