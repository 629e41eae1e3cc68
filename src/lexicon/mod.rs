//! Lexicon (noun module)
//!
//! Static keyword tables and analysis templates. Both are immutable once
//! built; the built-in instances are shared process-wide by reference.

mod keywords;
mod tables;
mod templates;

pub use keywords::{DimensionKeyword, EntityKeyword, MetricKeyword, TimePeriod};
pub use tables::{first_match, Category, Lexicon};
pub use templates::{builtin_templates, Template};
