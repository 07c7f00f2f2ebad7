//! Inventory export
//!
//! - `filters` - one view filter to one SQL predicate
//! - `query` - a view's filters and exclusions to one executable statement
//! - `csv` - result rows to a CSV document via a scoped temp file

pub mod csv;
pub mod filters;
pub mod query;

pub use csv::{CsvExport, ExportError, export_csv, write_csv};
pub use filters::{FieldClass, FilterError, Operator, PlainColumn, SqlParams, SqlValue};
pub use query::{CompiledQuery, build_export_query, unfiltered_query};
