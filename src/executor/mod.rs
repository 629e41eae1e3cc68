//! Query execution (verb module)
//!
//! The contract the analyzer runs compiled specs through, plus a SQLite
//! implementation of it.

mod error;
mod sqlite;

pub use error::ExecutionError;
pub use sqlite::SqliteExecutor;

use crate::spec::AggregationSpec;

/// One result row: output column name to value, in select order
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Runs an AggregationSpec against a data store
pub trait QueryExecutor {
    /// Execute the spec and return its rows in order
    fn execute(&self, spec: &AggregationSpec) -> Result<Vec<Row>, ExecutionError>;

    /// Human-readable rendering of the query the spec runs as, if any
    fn describe(&self, _spec: &AggregationSpec) -> Option<String> {
        None
    }
}

impl<T: QueryExecutor + ?Sized> QueryExecutor for &T {
    fn execute(&self, spec: &AggregationSpec) -> Result<Vec<Row>, ExecutionError> {
        (**self).execute(spec)
    }

    fn describe(&self, spec: &AggregationSpec) -> Option<String> {
        (**self).describe(spec)
    }
}
