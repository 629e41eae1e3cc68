//! Parameter resolver (verb module)
//!
//! Keyword-driven fallback used when no template matches: prompt text to a
//! complete [`AnalysisRequest`](crate::request::AnalysisRequest).

mod resolve;

pub use resolve::{resolve, Resolver};
