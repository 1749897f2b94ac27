//! Polars `DataFrame` to [`RawTable`] conversion.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::{AnyValue, DataFrame, TimeUnit};

use trellis_model::{CellValue, RawTable};

/// Converts a Polars AnyValue to a raw cell.
/// Nulls become `Missing`; numeric types become `Number`; dates keep their calendar value.
pub fn any_to_cell(value: AnyValue<'_>) -> CellValue {
    match value {
        AnyValue::Null => CellValue::Missing,
        AnyValue::Int8(v) => CellValue::Number(f64::from(v)),
        AnyValue::Int16(v) => CellValue::Number(f64::from(v)),
        AnyValue::Int32(v) => CellValue::Number(f64::from(v)),
        AnyValue::Int64(v) => CellValue::Number(v as f64),
        AnyValue::UInt8(v) => CellValue::Number(f64::from(v)),
        AnyValue::UInt16(v) => CellValue::Number(f64::from(v)),
        AnyValue::UInt32(v) => CellValue::Number(f64::from(v)),
        AnyValue::UInt64(v) => CellValue::Number(v as f64),
        AnyValue::Float32(v) => CellValue::Number(f64::from(v)),
        AnyValue::Float64(v) => CellValue::Number(v),
        AnyValue::String(s) => CellValue::Text(s.to_string()),
        AnyValue::StringOwned(s) => CellValue::Text(s.to_string()),
        AnyValue::Boolean(b) => CellValue::Text(b.to_string()),
        AnyValue::Date(days) => days_to_date(days).map_or(CellValue::Missing, CellValue::Date),
        AnyValue::Datetime(v, unit, _) => {
            timestamp_to_datetime(v, unit).map_or(CellValue::Missing, CellValue::Datetime)
        }
        other => CellValue::Text(other.to_string()),
    }
}

fn days_to_date(days: i32) -> Option<NaiveDate> {
    DateTime::from_timestamp(i64::from(days) * 86_400, 0).map(|dt| dt.date_naive())
}

fn timestamp_to_datetime(value: i64, unit: TimeUnit) -> Option<NaiveDateTime> {
    let utc = match unit {
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value)),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(value),
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(value),
    };
    utc.map(|dt| dt.naive_utc())
}

/// Convert every column of `df` into a [`RawTable`], preserving column order.
pub fn table_from_frame(df: &DataFrame) -> Result<RawTable> {
    let columns = df.get_columns();
    let headers: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();
    let mut rows = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let mut row = Vec::with_capacity(columns.len());
        for column in columns {
            let value = column
                .get(row_idx)
                .with_context(|| format!("read {} row {row_idx}", column.name()))?;
            row.push(any_to_cell(value));
        }
        rows.push(row);
    }
    Ok(RawTable { headers, rows })
}
