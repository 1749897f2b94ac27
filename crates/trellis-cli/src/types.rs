use std::path::PathBuf;

use trellis_ingest::IngestOptions;
use trellis_model::ColumnKind;
use trellis_report::{BuildOptions, CoercionReport, OutputOptions, OutputPaths};

/// Everything needed to turn one CSV table into the two artifacts.
#[derive(Debug, Clone)]
pub struct WriteRequest {
    pub data: PathBuf,
    pub meta: Option<PathBuf>,
    pub factors: Vec<String>,
    pub output_dir: PathBuf,
    pub ingest: IngestOptions,
    pub build: BuildOptions,
    pub output: OutputOptions,
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct WriteResult {
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
    pub report: CoercionReport,
    /// `None` on a dry run.
    pub outputs: Option<OutputPaths>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: String,
    pub kind: ColumnKind,
    pub levels: usize,
    pub missing: usize,
    pub anomalies: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InspectReport {
    pub rows: usize,
    pub columns: Vec<ColumnInspection>,
}

impl InspectReport {
    /// True when every numeric factor value satisfies `1 <= f <= levels`.
    pub fn is_conformant(&self) -> bool {
        self.columns.iter().all(|column| column.violations == 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnInspection {
    pub name: String,
    pub kind: String,
    pub levels: usize,
    pub nulls: usize,
    /// Numeric factor values outside `1..=levels`.
    pub violations: usize,
    /// Factor values serialized as text because they matched no level.
    pub unmapped: usize,
}
