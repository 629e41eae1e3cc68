//! SQL emitter (verb module)
//!
//! Transforms an AggregationSpec into parameterized SQLite SQL.

mod error;
mod sql;

pub use error::EmitError;
pub use sql::{emit_sql, SqlStatement};
