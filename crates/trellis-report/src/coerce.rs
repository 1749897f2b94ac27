//! Value coercion: the single place where raw cells become viewer values.
//!
//! Factor columns are stored upstream as 0-based positions into `levels`
//! (or as the label itself) while the viewer resolves a code `f` as
//! `levels[f - 1]`. Every writer consumes the output of [`coerce_value`],
//! so the 0-based to 1-based shift happens exactly once.

use std::fmt;

use trellis_model::{CellValue, CogValue, ColumnMeta};

/// A factor cell that could not be mapped cleanly onto its levels.
#[derive(Debug, Clone, PartialEq)]
pub enum AnomalyKind {
    /// A label that is not one of the column's levels. The label is kept as text.
    UnknownLabel(String),
    /// A numeric code outside `0..levels.len()`. The code is still shifted
    /// unless it is non-finite or too large for a level code.
    CodeOutOfRange(f64),
    /// A date or datetime in a factor column. The value is kept as-is.
    UnexpectedKind(&'static str),
}

impl fmt::Display for AnomalyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnomalyKind::UnknownLabel(label) => write!(f, "label '{label}' is not a level"),
            AnomalyKind::CodeOutOfRange(code) => write!(f, "code {code} is outside the levels"),
            AnomalyKind::UnexpectedKind(kind) => write!(f, "{kind} value in factor column"),
        }
    }
}

/// Result of coercing one cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Coercion {
    pub value: CogValue,
    pub anomaly: Option<AnomalyKind>,
}

impl Coercion {
    fn clean(value: CogValue) -> Self {
        Self {
            value,
            anomaly: None,
        }
    }

    fn flagged(value: CogValue, anomaly: AnomalyKind) -> Self {
        Self {
            value,
            anomaly: Some(anomaly),
        }
    }
}

/// Map a raw cell to the value the viewer must receive for `column`.
///
/// Non-factor columns pass through unchanged (missing becomes `Null`).
/// For factor columns, missing stays missing, numbers are 0-based codes
/// shifted by one, and labels are looked up in `levels`. Unknown labels are
/// preserved as text and flagged rather than dropped.
pub fn coerce_value(value: &CellValue, column: &ColumnMeta) -> Coercion {
    if !column.is_factor() {
        return Coercion::clean(pass_through(value));
    }
    match value {
        CellValue::Missing => Coercion::clean(CogValue::Null),
        CellValue::Number(v) if v.is_nan() => Coercion::clean(CogValue::Null),
        CellValue::Number(v) => shift_code(*v, column),
        CellValue::Code(code) => shift_code(f64::from(*code), column),
        CellValue::Text(label) => match column.level_position(label) {
            Some(position) => Coercion::clean(CogValue::Level(position as i64 + 1)),
            None => Coercion::flagged(
                CogValue::Text(label.clone()),
                AnomalyKind::UnknownLabel(label.clone()),
            ),
        },
        CellValue::Date(_) | CellValue::Datetime(_) => Coercion::flagged(
            pass_through(value),
            AnomalyKind::UnexpectedKind(value.kind_name()),
        ),
    }
}

/// Largest position that still fits a shifted `i64` code.
const MAX_SHIFTABLE: f64 = i64::MAX as f64;

fn shift_code(code: f64, column: &ColumnMeta) -> Coercion {
    let position = code.floor();
    if !position.is_finite() || position >= MAX_SHIFTABLE {
        // No level code exists for this value; keep it as a plain number.
        return Coercion::flagged(CogValue::Number(code), AnomalyKind::CodeOutOfRange(code));
    }
    let shifted = CogValue::Level((position as i64).saturating_add(1));
    if position < 0.0 || position >= column.levels.len() as f64 {
        Coercion::flagged(shifted, AnomalyKind::CodeOutOfRange(code))
    } else {
        Coercion::clean(shifted)
    }
}

fn pass_through(value: &CellValue) -> CogValue {
    match value {
        CellValue::Missing => CogValue::Null,
        CellValue::Number(v) if v.is_nan() => CogValue::Null,
        CellValue::Number(v) => CogValue::Number(*v),
        CellValue::Text(text) => CogValue::Text(text.clone()),
        CellValue::Date(date) => CogValue::Date(*date),
        CellValue::Datetime(datetime) => CogValue::Datetime(*datetime),
        CellValue::Code(code) => CogValue::Number(f64::from(*code)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_model::ColumnKind;

    fn country() -> ColumnMeta {
        ColumnMeta::factor(
            "country",
            ["Algeria", "Denmark", "Germany", "Italy", "Netherlands"],
        )
        .unwrap()
    }

    #[test]
    fn zero_code_becomes_one() {
        let column = country();
        let coerced = coerce_value(&CellValue::Number(0.0), &column);
        assert_eq!(coerced.value, CogValue::Level(1));
        assert!(coerced.anomaly.is_none());
        assert_eq!(column.level_label(1), Some("Algeria"));
    }

    #[test]
    fn precomputed_code_is_shifted() {
        let coerced = coerce_value(&CellValue::Code(4), &country());
        assert_eq!(coerced.value, CogValue::Level(5));
    }

    #[test]
    fn fractional_code_is_floored() {
        let coerced = coerce_value(&CellValue::Number(2.9), &country());
        assert_eq!(coerced.value, CogValue::Level(3));
    }

    #[test]
    fn label_maps_to_first_match() {
        let column = ColumnMeta::factor("dup", ["a", "b", "a"]).unwrap();
        let coerced = coerce_value(&CellValue::Text("a".to_string()), &column);
        assert_eq!(coerced.value, CogValue::Level(1));
    }

    #[test]
    fn unknown_label_is_preserved_and_flagged() {
        let coerced = coerce_value(&CellValue::Text("Atlantis".to_string()), &country());
        assert_eq!(coerced.value, CogValue::Text("Atlantis".to_string()));
        assert_eq!(
            coerced.anomaly,
            Some(AnomalyKind::UnknownLabel("Atlantis".to_string()))
        );
    }

    #[test]
    fn label_match_is_case_sensitive() {
        let coerced = coerce_value(&CellValue::Text("algeria".to_string()), &country());
        assert!(matches!(coerced.value, CogValue::Text(_)));
    }

    #[test]
    fn missing_factor_stays_missing() {
        for raw in [CellValue::Missing, CellValue::Number(f64::NAN)] {
            let coerced = coerce_value(&raw, &country());
            assert_eq!(coerced.value, CogValue::Null);
            assert!(coerced.anomaly.is_none());
        }
    }

    #[test]
    fn out_of_range_code_is_shifted_and_flagged() {
        let coerced = coerce_value(&CellValue::Number(5.0), &country());
        assert_eq!(coerced.value, CogValue::Level(6));
        assert_eq!(coerced.anomaly, Some(AnomalyKind::CodeOutOfRange(5.0)));

        let coerced = coerce_value(&CellValue::Number(-1.0), &country());
        assert!(matches!(coerced.anomaly, Some(AnomalyKind::CodeOutOfRange(_))));
    }

    #[test]
    fn unshiftable_codes_are_flagged_without_overflow() {
        for raw in [f64::INFINITY, f64::NEG_INFINITY, 1e19, f64::MAX] {
            let coerced = coerce_value(&CellValue::Number(raw), &country());
            assert_eq!(coerced.value, CogValue::Number(raw));
            assert_eq!(coerced.anomaly, Some(AnomalyKind::CodeOutOfRange(raw)));
        }
        let coerced = coerce_value(&CellValue::Number(-1e19), &country());
        assert_eq!(coerced.value, CogValue::Level(i64::MIN + 1));
        assert!(matches!(coerced.anomaly, Some(AnomalyKind::CodeOutOfRange(_))));
    }

    #[test]
    fn non_factor_passes_through() {
        let column = ColumnMeta::new("gdp", ColumnKind::Numeric);
        assert_eq!(
            coerce_value(&CellValue::Number(0.0), &column).value,
            CogValue::Number(0.0)
        );
        assert_eq!(
            coerce_value(&CellValue::Missing, &column).value,
            CogValue::Null
        );
        let text = ColumnMeta::new("name", ColumnKind::String);
        assert_eq!(
            coerce_value(&CellValue::Text("0".to_string()), &text).value,
            CogValue::Text("0".to_string())
        );
    }
}
