use anyhow::Result;
use comfy_table::Table;

use trellis_cli::pipeline::{inspect_artifact, write_cognostics};
use trellis_cli::types::{InspectReport, WriteRequest, WriteResult};
use trellis_ingest::IngestOptions;
use trellis_model::ColumnKind;
use trellis_report::{BuildOptions, JsBinding, JsonOptions, OutputOptions};

use crate::cli::{InspectArgs, WriteArgs};
use crate::summary::apply_table_style;

pub fn run_kinds() {
    let mut table = Table::new();
    table.set_header(vec!["Kind", "Serialized as"]);
    apply_table_style(&mut table);
    for kind in ColumnKind::ALL {
        table.add_row(vec![kind.as_str(), serialized_as(kind)]);
    }
    println!("{table}");
}

fn serialized_as(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::Factor => "1-based level code",
        ColumnKind::Numeric | ColumnKind::Integer => "number",
        ColumnKind::Date => "YYYY-MM-DD string",
        ColumnKind::Datetime => "YYYY-MM-DD HH:MM:SS string",
        ColumnKind::String | ColumnKind::Href | ColumnKind::Key => "string",
    }
}

pub fn run_write(args: &WriteArgs) -> Result<WriteResult> {
    let request = write_request(args);
    write_cognostics(&request)
}

pub fn run_inspect(args: &InspectArgs) -> Result<InspectReport> {
    inspect_artifact(&args.artifact)
}

fn write_request(args: &WriteArgs) -> WriteRequest {
    let output_dir = args.output_dir.clone().unwrap_or_else(|| {
        args.data
            .parent()
            .map(std::path::Path::to_path_buf)
            .unwrap_or_default()
    });
    let binding = if args.callback {
        JsBinding::Callback(args.binding.clone())
    } else {
        JsBinding::Global(args.binding.clone())
    };
    let json = if args.compact {
        JsonOptions::compact()
    } else {
        JsonOptions::default()
    };
    WriteRequest {
        data: args.data.clone(),
        meta: args.meta.clone(),
        factors: args.factors.clone(),
        output_dir,
        ingest: IngestOptions {
            factor_codes: args.factor_codes,
        },
        build: BuildOptions {
            strict_factors: args.strict,
        },
        output: OutputOptions::default()
            .with_names(&args.json_name, &args.js_name)
            .with_binding(binding)
            .with_json(json),
        dry_run: args.dry_run,
    }
}
