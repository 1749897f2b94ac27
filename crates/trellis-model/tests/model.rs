use trellis_model::{CellValue, ColumnKind, ColumnMeta, RawTable, Schema, TrellisError};

#[test]
fn schema_deserializes_wrapped_and_bare() {
    let wrapped = r#"{"columns": [
        {"name": "country", "kind": "factor", "levels": ["Algeria", "Denmark"]},
        {"name": "gdp", "kind": "numeric", "description": "GDP per capita"}
    ]}"#;
    let bare = r#"[
        {"name": "country", "kind": "factor", "levels": ["Algeria", "Denmark"]},
        {"name": "gdp", "kind": "numeric", "description": "GDP per capita"}
    ]"#;
    let a: Schema = serde_json::from_str(wrapped).expect("wrapped schema");
    let b: Schema = serde_json::from_str(bare).expect("bare schema");
    assert_eq!(a, b);
    assert_eq!(a.len(), 2);
    assert_eq!(a.factor_count(), 1);
    let gdp = a.column("gdp").expect("gdp column");
    assert_eq!(gdp.description.as_deref(), Some("GDP per capita"));
    assert!(gdp.filterable);
    assert!(gdp.sortable);
}

#[test]
fn schema_deserialization_validates_levels() {
    let json = r#"[{"name": "status", "kind": "factor"}]"#;
    let err = serde_json::from_str::<Schema>(json).unwrap_err();
    assert!(err.to_string().contains("has no levels"));
}

#[test]
fn column_serializes_compactly() {
    let column = ColumnMeta::factor("status", ["active", "inactive"])
        .unwrap()
        .with_group("condition")
        .with_sortable(false);
    let value = serde_json::to_value(&column).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "name": "status",
            "kind": "factor",
            "levels": ["active", "inactive"],
            "group": "condition",
            "sortable": false
        })
    );

    let numeric = serde_json::to_value(ColumnMeta::new("age", ColumnKind::Integer)).unwrap();
    assert_eq!(numeric, serde_json::json!({"name": "age", "kind": "integer"}));
}

#[test]
fn schema_serializes_as_column_array() {
    let schema = Schema::new(vec![ColumnMeta::new("id", ColumnKind::Key)]).unwrap();
    let value = serde_json::to_value(&schema).unwrap();
    assert_eq!(value, serde_json::json!([{"name": "id", "kind": "key"}]));
}

#[test]
fn non_ascii_levels_are_kept_verbatim() {
    let column = ColumnMeta::factor("city", ["Zürich", "東京", "São Paulo"]).unwrap();
    assert_eq!(column.level_position("東京"), Some(1));
    assert_eq!(column.level_label(3), Some("São Paulo"));
    assert_eq!(column.level_position("Zurich"), None);
}

#[test]
fn empty_name_is_rejected() {
    let err = Schema::new(vec![ColumnMeta::new("  ", ColumnKind::String)]).unwrap_err();
    assert!(matches!(err, TrellisError::EmptyColumnName));
    assert!(err.is_schema_error());
}

#[test]
fn raw_table_column_values_pad_short_rows() {
    let mut table = RawTable::from_rows(["a", "b"], vec![vec![1.0, 2.0]]);
    table.push_row(vec![CellValue::Number(3.0)]);
    let b: Vec<&CellValue> = table.column_values(1).collect();
    assert_eq!(b, vec![&CellValue::Number(2.0), &CellValue::Missing]);
    assert_eq!(table.height(), 2);
    assert_eq!(table.width(), 2);
    assert_eq!(table.column_index("b"), Some(1));
}
