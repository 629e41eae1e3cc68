//! Compiler errors

use thiserror::Error;
use crate::request::EntityType;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// A request field cannot be computed for the request's entity type
    #[error("Unsupported combination: {field} '{value}' is not available for {entity_type} ({reason})")]
    UnsupportedCombination {
        /// Offending request field (`metric`, `dimension` or a filter key)
        field: String,
        value: String,
        entity_type: EntityType,
        reason: String,
    },
}

impl CompileError {
    pub(crate) fn unsupported(
        field: impl Into<String>,
        value: impl ToString,
        entity_type: EntityType,
        reason: impl Into<String>,
    ) -> Self {
        CompileError::UnsupportedCombination {
            field: field.into(),
            value: value.to_string(),
            entity_type,
            reason: reason.into(),
        }
    }

    /// Name of the request field the error is about
    pub fn field(&self) -> &str {
        match self {
            CompileError::UnsupportedCombination { field, .. } => field,
        }
    }
}
