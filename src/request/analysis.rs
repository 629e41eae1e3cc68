use serde::{Deserialize, Serialize};
use super::filters::Filters;
use super::types::{Dimension, EntityType, Metric, QueryType};

/// Where a request came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RequestOrigin {
    /// Copied from a predefined template
    Template { name: String },
    /// Built by the keyword resolver
    Resolved,
}

/// The resolved intent of a prompt
///
/// Built fresh for every prompt, either from a template or by the resolver,
/// and consumed once by the compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub query_type: QueryType,
    pub entity_type: EntityType,
    pub metric: Metric,
    pub dimension: Dimension,
    /// Maximum number of result rows, always at least 1
    pub limit: u32,
    #[serde(default)]
    pub filters: Filters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub origin: RequestOrigin,
}

impl AnalysisRequest {
    /// Limit used by the resolver when the prompt names no number
    pub const DEFAULT_LIMIT: u32 = 5;

    pub fn new(query_type: QueryType, entity_type: EntityType, metric: Metric, dimension: Dimension) -> Self {
        Self {
            query_type,
            entity_type,
            metric,
            dimension,
            limit: Self::DEFAULT_LIMIT,
            filters: Filters::new(),
            title: None,
            description: None,
            origin: RequestOrigin::Resolved,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn template_name(&self) -> Option<&str> {
        match &self.origin {
            RequestOrigin::Template { name } => Some(name),
            RequestOrigin::Resolved => None,
        }
    }
}

impl Default for AnalysisRequest {
    fn default() -> Self {
        Self::new(QueryType::Top, EntityType::Programs, Metric::Revenue, Dimension::ProgramName)
    }
}
