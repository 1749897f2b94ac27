//! Cognostics document building and artifact generation.
//!
//! Data flows one way:
//!
//! - [`coerce_value`]: one raw cell to its viewer value (factor codes become 1-based)
//! - [`build_document`]: every row of a table into a [`CogDocument`]
//! - [`write_json`] / [`write_js`]: two renders of the same document
//!
//! Writers only accept a [`CogDocument`], so neither can re-derive coercion.

mod coerce;
mod js;
mod json;
mod output;
mod record;

pub use coerce::{AnomalyKind, Coercion, coerce_value};
pub use js::{DEFAULT_GLOBAL, JsBinding, parse_js_payload, render_js, write_js};
pub use json::{JsonOptions, render_json, write_json};
pub use output::{
    DEFAULT_JS_NAME, DEFAULT_JSON_NAME, OutputOptions, OutputPaths, write_atomic, write_outputs,
};
pub use record::{
    BuildOptions, BuiltDocument, CogDocument, CoercionReport, FactorAnomaly, RowRecord,
    build_document, build_row_record,
};
