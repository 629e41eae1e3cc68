//! Emitter errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EmitError {
    /// The spec cannot be rendered as a single statement
    #[error("Invalid aggregation spec: {0}")]
    InvalidSpec(String),
}
