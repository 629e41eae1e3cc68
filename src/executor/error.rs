//! Executor errors

use thiserror::Error;
use crate::emitter::EmitError;

#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The spec could not be rendered for the store
    #[error(transparent)]
    Emit(#[from] EmitError),
    /// The store rejected or failed the query
    #[error("Query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// The query ran but produced no rows
    #[error("No data found for this analysis")]
    EmptyResult,
    /// Failure reported by a non-SQLite executor
    #[error("Query failed: {0}")]
    Backend(String),
}
