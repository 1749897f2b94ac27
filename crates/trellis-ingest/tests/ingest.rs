use std::fs;

use chrono::NaiveDate;
use polars::prelude::{Column, DataFrame, IntoColumn, NamedFrom, Series};

use trellis_ingest::{
    IngestOptions, infer_schema, load_schema, read_csv_table, read_typed_csv, table_from_frame,
    type_table,
};
use trellis_model::{CellValue, ColumnKind, ColumnMeta, Schema};

#[test]
fn reads_csv_with_blank_lines_and_short_rows() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("cogs.csv");
    fs::write(&path, "\nid,country,gdp\np1,Italy,1.5\n\np2,,\np3\n").expect("write csv");

    let table = read_csv_table(&path).expect("read csv");
    assert_eq!(table.headers, vec!["id", "country", "gdp"]);
    assert_eq!(table.rows.len(), 3);
    assert_eq!(
        table.rows[0],
        vec![
            CellValue::from("p1"),
            CellValue::from("Italy"),
            CellValue::from("1.5")
        ]
    );
    assert_eq!(
        table.rows[1],
        vec![CellValue::from("p2"), CellValue::Missing, CellValue::Missing]
    );
    assert_eq!(table.rows[2][2], CellValue::Missing);
}

#[test]
fn rejects_cells_without_a_header() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("cogs.csv");
    fs::write(&path, "a,b\n1,2,3\n").expect("write csv");
    let err = read_csv_table(&path).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("line 2"), "{message}");
    assert!(message.contains("3 fields"), "{message}");

    fs::write(&path, "a,b\n1,2,,\n").expect("write csv");
    let table = read_csv_table(&path).expect("trailing empty fields are allowed");
    assert_eq!(table.rows, vec![vec![CellValue::from("1"), CellValue::from("2")]]);
}

#[test]
fn empty_csv_yields_empty_table() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("empty.csv");
    fs::write(&path, "").expect("write csv");
    let table = read_csv_table(&path).expect("read csv");
    assert!(table.headers.is_empty());
    assert!(table.rows.is_empty());
}

#[test]
fn typed_csv_follows_schema_kinds() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("cogs.csv");
    fs::write(&path, "id,status,score,seen\n007,1,2.5,2024-05-06\n").expect("write csv");
    let schema = Schema::new(vec![
        ColumnMeta::new("id", ColumnKind::Key),
        ColumnMeta::factor("status", ["0", "1"]).unwrap(),
        ColumnMeta::new("score", ColumnKind::Numeric),
        ColumnMeta::new("seen", ColumnKind::Date),
    ])
    .unwrap();

    let table = read_typed_csv(&path, &schema, IngestOptions::default()).expect("typed csv");
    assert_eq!(
        table.rows[0],
        vec![
            CellValue::from("007"),
            CellValue::from("1"),
            CellValue::Number(2.5),
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()),
        ]
    );

    let raw = read_csv_table(&path).expect("read csv");
    let coded = type_table(raw, &schema, IngestOptions { factor_codes: true });
    assert_eq!(coded.rows[0][1], CellValue::Code(1));
}

#[test]
fn loads_schema_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("meta.json");
    fs::write(
        &path,
        r#"{"columns": [{"name": "country", "kind": "factor", "levels": ["Algeria", "Denmark"]}]}"#,
    )
    .expect("write meta");
    let schema = load_schema(&path).expect("load schema");
    assert_eq!(schema.columns()[0].levels, vec!["Algeria", "Denmark"]);

    fs::write(&path, r#"[{"name": "country", "kind": "factor"}]"#).expect("write meta");
    let err = load_schema(&path).unwrap_err();
    assert!(format!("{err:#}").contains("has no levels"));
}

#[test]
fn converts_polars_frame() {
    let columns: Vec<Column> = vec![
        Series::new("panel".into(), &["a", "b"]).into_column(),
        Series::new("code".into(), &[Some(0_i32), None]).into_column(),
        Series::new("value".into(), &[1.5_f64, 2.0]).into_column(),
    ];
    let df = DataFrame::new(columns).expect("frame");
    let table = table_from_frame(&df).expect("convert");
    assert_eq!(table.headers, vec!["panel", "code", "value"]);
    assert_eq!(
        table.rows,
        vec![
            vec![
                CellValue::from("a"),
                CellValue::Number(0.0),
                CellValue::Number(1.5)
            ],
            vec![
                CellValue::from("b"),
                CellValue::Missing,
                CellValue::Number(2.0)
            ],
        ]
    );

    let schema = infer_schema(&table, &["panel".to_string()]).expect("infer");
    assert_eq!(schema.columns()[0].levels, vec!["a", "b"]);
    assert_eq!(schema.columns()[1].kind, ColumnKind::Integer);
    assert_eq!(schema.columns()[2].kind, ColumnKind::Numeric);
}
