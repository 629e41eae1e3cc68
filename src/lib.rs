//! promptql - Compile natural-language analytics prompts into aggregation queries
//!
//! This library provides:
//! - Request types (AnalysisRequest, QueryType, EntityType, Metric, Dimension)
//! - Keyword lexicon and predefined templates, built-in or loaded from YAML
//! - Template matching and keyword-based parameter resolution
//! - Compilation to an engine-agnostic AggregationSpec
//! - Parameterized SQLite SQL emission and execution
//!
//! # Architecture
//!
//! **Noun modules** (data structures):
//! - `request/` - the resolved intent of a prompt (AnalysisRequest, Filters)
//! - `lexicon/` - keyword tables and templates
//! - `spec/` - compiled aggregation types (AggregationSpec, Expr, Column)
//!
//! **Verb modules** (transformations):
//! - `tokenizer/` - prompt text → words, limits, explicit filters
//! - `matcher/` - prompt → template request
//! - `resolver/` - prompt → AnalysisRequest (keyword passes)
//! - `compiler/` - AnalysisRequest → AggregationSpec
//! - `title` - AnalysisRequest → display title
//! - `emitter/` - AggregationSpec → SQL + parameters
//! - `executor/` - AggregationSpec → rows
//!
//! `analyzer` ties the stages together behind [`PromptAnalyzer`].
//!
//! # Example
//!
//! ```ignore
//! use promptql::{PromptAnalyzer, SqliteExecutor};
//!
//! let analyzer = PromptAnalyzer::new(SqliteExecutor::open("analytics.db")?);
//! let outcome = analyzer.process("Show me the top 5 clients by revenue")?;
//! println!("{}", outcome.title);
//! for row in &outcome.rows {
//!     println!("{:?}", row);
//! }
//! ```

pub mod request;
pub mod lexicon;
pub mod spec;
pub mod tokenizer;
pub mod matcher;
pub mod resolver;
pub mod compiler;
pub mod title;
pub mod emitter;
pub mod executor;
pub mod analyzer;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use request::{AnalysisRequest, Dimension, EntityType, FilterKey, FilterValue, Filters, Metric, QueryType, RelativeDate, RequestOrigin};
pub use lexicon::{Lexicon, Template};
pub use spec::{AggregationSpec, Expr, Column, Literal};
pub use tokenizer::{extract_filter, extract_limit, tokenize};
pub use matcher::{match_template, TemplateMatcher};
pub use resolver::{resolve, Resolver};
pub use compiler::{compile, compile_at, CompileError};
pub use title::generate_title;
pub use emitter::{emit_sql, EmitError, SqlStatement};
pub use executor::{ExecutionError, QueryExecutor, Row, SqliteExecutor};
pub use analyzer::{AnalysisError, AnalysisOutcome, PromptAnalyzer, SUGGESTED_PROMPTS};
pub use config::AnalyzerConfig;
pub use error::ParseError;
