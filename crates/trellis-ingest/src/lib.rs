//! Loading raw tables and column metadata.
//!
//! Tables come from CSV files or polars frames; column metadata comes from a
//! JSON file or is inferred from the table.

pub mod csv_table;
pub mod frame;
pub mod schema;
pub mod typing;

use std::path::Path;

use anyhow::Result;

use trellis_model::{RawTable, Schema};

pub use csv_table::read_csv_table;
pub use frame::{any_to_cell, table_from_frame};
pub use schema::{infer_schema, load_schema};
pub use typing::{IngestOptions, parse_date, parse_datetime, parse_f64, type_table};

/// Read a CSV table and resolve its cells against `schema`.
pub fn read_typed_csv(path: &Path, schema: &Schema, options: IngestOptions) -> Result<RawTable> {
    let table = read_csv_table(path)?;
    Ok(type_table(table, schema, options))
}
