//! Data model for cognostics serialization.
//!
//! - [`ColumnMeta`] / [`ColumnKind`]: per-column metadata, including factor levels
//! - [`Schema`]: the validated, ordered column list
//! - [`CellValue`] / [`RawTable`]: raw input values
//! - [`CogValue`]: coerced values ready for the writers

pub mod column;
pub mod error;
pub mod schema;
pub mod table;
pub mod value;

pub use column::{ColumnKind, ColumnMeta};
pub use error::{Result, TrellisError};
pub use schema::Schema;
pub use table::RawTable;
pub use value::{CellValue, CogValue, DATE_FORMAT, DATETIME_FORMAT};
