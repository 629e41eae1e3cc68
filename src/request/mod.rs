//! Analysis request types (noun module)
//!
//! The structured intent extracted from a prompt.

mod analysis;
mod filters;
mod types;

pub use analysis::{AnalysisRequest, RequestOrigin};
pub use filters::{FilterValue, Filters, RelativeDate};
pub use types::{Dimension, EntityType, FilterKey, Metric, ParseEnumError, QueryType};
