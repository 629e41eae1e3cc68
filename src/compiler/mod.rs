//! Query compiler (verb module)
//!
//! Transforms an AnalysisRequest into an AggregationSpec over the fixed
//! clients / programs / enrollments / opportunities store.

mod compile;
mod dates;
mod error;
mod joins;
mod metrics;

pub use compile::{compile, compile_at};
pub use dates::resolve_relative;
pub use error::CompileError;
