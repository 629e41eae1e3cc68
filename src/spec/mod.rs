//! Aggregation spec types (noun module)
//!
//! The compiled, engine-agnostic description of a grouped aggregation over
//! the analytics store. Values are carried as literals and bound at render
//! time, never spliced into query text.

mod expr;
mod node;

pub use expr::{Aggregation, ArithmeticOp, Column, Comparison, Expr, Literal};
pub use node::{AggregationSpec, Grouping, Join, ProjectExpr, Relation, SortDirection, SortKey};
