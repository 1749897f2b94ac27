//! Raw and serialized cell values.
//!
//! [`CellValue`] is what upstream code hands in; [`CogValue`] is what the
//! viewer receives after coercion. Keeping them as separate types means a
//! raw factor code can never reach a writer without passing through the
//! coercer.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};

/// Display format for dates in serialized output.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Display format for datetimes in serialized output.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A raw cell value as supplied by the upstream table.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Absent value.
    Missing,
    /// Any numeric value. `NaN` is treated as missing.
    Number(f64),
    /// Text, including factor labels.
    Text(String),
    Date(NaiveDate),
    Datetime(NaiveDateTime),
    /// Precomputed 0-based position into a factor's levels.
    Code(u32),
}

impl CellValue {
    /// Returns true for [`CellValue::Missing`] and `NaN` numbers.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Missing => true,
            CellValue::Number(v) => v.is_nan(),
            _ => false,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            CellValue::Missing => "missing",
            CellValue::Number(_) => "number",
            CellValue::Text(_) => "text",
            CellValue::Date(_) => "date",
            CellValue::Datetime(_) => "datetime",
            CellValue::Code(_) => "code",
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Missing, Into::into)
    }
}

/// A cell value after coercion, ready for serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum CogValue {
    /// Serialized as `null`.
    Null,
    /// Non-finite values serialize as `null`.
    Number(f64),
    /// 1-based factor code; the viewer resolves it as `levels[code - 1]`.
    Level(i64),
    Text(String),
    Date(NaiveDate),
    Datetime(NaiveDateTime),
}

impl CogValue {
    pub fn is_null(&self) -> bool {
        match self {
            CogValue::Null => true,
            CogValue::Number(v) => !v.is_finite(),
            _ => false,
        }
    }

    pub fn as_level(&self) -> Option<i64> {
        match self {
            CogValue::Level(code) => Some(*code),
            _ => None,
        }
    }
}

/// `Some` for finite whole numbers that fit an `i64`, so integer cognostics
/// serialize as `7` rather than `7.0`.
fn whole_number(value: f64) -> Option<i64> {
    const LIMIT: f64 = i64::MAX as f64;
    (value.fract() == 0.0 && value >= -LIMIT && value < LIMIT).then_some(value as i64)
}

impl Serialize for CogValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            CogValue::Null => serializer.serialize_none(),
            CogValue::Number(v) if !v.is_finite() => serializer.serialize_none(),
            CogValue::Number(v) => match whole_number(*v) {
                Some(whole) => serializer.serialize_i64(whole),
                None => serializer.serialize_f64(*v),
            },
            CogValue::Level(code) => serializer.serialize_i64(*code),
            CogValue::Text(text) => serializer.serialize_str(text),
            CogValue::Date(date) => serializer.collect_str(&date.format(DATE_FORMAT)),
            CogValue::Datetime(datetime) => {
                serializer.collect_str(&datetime.format(DATETIME_FORMAT))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_is_missing() {
        assert!(CellValue::Number(f64::NAN).is_missing());
        assert!(!CellValue::Number(0.0).is_missing());
        assert!(!CellValue::Code(0).is_missing());
    }

    #[test]
    fn cog_values_serialize_to_plain_json() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let values = vec![
            CogValue::Null,
            CogValue::Number(f64::INFINITY),
            CogValue::Number(2.5),
            CogValue::Level(1),
            CogValue::Text("Ålesund".to_string()),
            CogValue::Date(date),
            CogValue::Datetime(date.and_hms_opt(14, 5, 0).unwrap()),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(
            json,
            r#"[null,null,2.5,1,"Ålesund","2024-03-09","2024-03-09 14:05:00"]"#
        );
    }

    #[test]
    fn whole_numbers_serialize_as_integers() {
        let values = vec![
            CogValue::Number(7.0),
            CogValue::Number(-0.0),
            CogValue::Number(7.5),
        ];
        let json = serde_json::to_string(&values).unwrap();
        assert_eq!(json, "[7,0,7.5]");
        let large = serde_json::to_value(CogValue::Number(1e20)).unwrap();
        assert!(large.is_f64());
    }

    #[test]
    fn option_into_cell() {
        assert_eq!(CellValue::from(None::<f64>), CellValue::Missing);
        assert_eq!(CellValue::from(Some("x")), CellValue::Text("x".to_string()));
    }
}
