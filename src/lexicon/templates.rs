//! Predefined analysis templates
//!
//! A template pairs a canonical request with the phrasing that selects it.

use std::sync::LazyLock;
use serde::{Deserialize, Serialize};
use crate::request::{AnalysisRequest, Dimension, EntityType, Filters, Metric, QueryType, RequestOrigin};

/// A precoded request and its selection rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub title: String,
    pub description: String,
    pub query_type: QueryType,
    pub entity_type: EntityType,
    pub metric: Metric,
    pub dimension: Dimension,
    /// Conjunction of phrase groups; a group holds if any of its phrases occurs
    pub when: Vec<Vec<String>>,
}

impl Template {
    fn new(
        name: &str,
        title: &str,
        description: &str,
        shape: (QueryType, EntityType, Metric, Dimension),
        when: &[&[&str]],
    ) -> Self {
        let (query_type, entity_type, metric, dimension) = shape;
        Self {
            name: name.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            query_type,
            entity_type,
            metric,
            dimension,
            when: when
                .iter()
                .map(|group| group.iter().map(|p| p.to_string()).collect())
                .collect(),
        }
    }

    /// Whether every phrase group has a phrase in the lowered prompt
    pub fn matches(&self, lowered: &str) -> bool {
        !self.when.is_empty()
            && self
                .when
                .iter()
                .all(|group| group.iter().any(|phrase| lowered.contains(phrase.as_str())))
    }

    /// Build an owned request from this template
    pub fn instantiate(&self, limit: u32) -> AnalysisRequest {
        AnalysisRequest {
            query_type: self.query_type,
            entity_type: self.entity_type,
            metric: self.metric,
            dimension: self.dimension,
            limit: limit.max(1),
            filters: Filters::new(),
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            origin: RequestOrigin::Template {
                name: self.name.clone(),
            },
        }
    }

    /// Lowercase the rule phrases
    pub fn normalized(mut self) -> Self {
        for group in &mut self.when {
            for phrase in group {
                *phrase = phrase.to_lowercase();
            }
        }
        self
    }
}

static BUILTIN: LazyLock<Vec<Template>> = LazyLock::new(default_templates);

/// The shared built-in templates in priority order
pub fn builtin_templates() -> &'static [Template] {
    &BUILTIN
}

fn default_templates() -> Vec<Template> {
    use Dimension as D;
    use EntityType as E;
    use Metric as M;
    use QueryType as Q;

    vec![
        Template::new(
            "top_clients_by_revenue",
            "Top Clients by Revenue",
            "Shows the clients that have generated the most revenue",
            (Q::Top, E::Clients, M::Revenue, D::ClientName),
            &[&["top client"], &["revenue"]],
        ),
        Template::new(
            "top_programs_by_revenue",
            "Top Programs by Revenue",
            "Shows the programs that have generated the most revenue",
            (Q::Top, E::Programs, M::Revenue, D::ProgramName),
            &[&["top program"], &["revenue"]],
        ),
        Template::new(
            "top_programs_by_profit_margin",
            "Top Programs by Profit Margin",
            "Shows the programs with the highest profit margins",
            (Q::Top, E::Programs, M::ProfitMargin, D::ProgramName),
            &[&["top program", "best program"], &["profit margin", "profitability"]],
        ),
        Template::new(
            "revenue_by_industry",
            "Revenue Distribution by Industry",
            "Shows how revenue is distributed across different client industries",
            (Q::Distribution, E::Clients, M::Revenue, D::Industry),
            &[&["revenue"], &["industry"]],
        ),
        Template::new(
            "revenue_trend_over_time",
            "Revenue Trend Over Time",
            "Shows how revenue has changed over time",
            (Q::Trend, E::Enrollments, M::Revenue, D::Month),
            &[&["revenue", "sales"], &["trend", "over time"]],
        ),
        Template::new(
            "pipeline_by_stage",
            "Pipeline Value by Stage",
            "Shows the distribution of pipeline value across different stages",
            (Q::Distribution, E::Opportunities, M::PipelineValue, D::Stage),
            &[&["pipeline", "opportunity"], &["stage"]],
        ),
        Template::new(
            "cost_breakdown",
            "Cost Breakdown",
            "Shows the breakdown of costs by category",
            (Q::Distribution, E::Enrollments, M::Cost, D::CostType),
            &[&["cost"], &["breakdown", "distribution"]],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(name: &str) -> &'static Template {
        builtin_templates().iter().find(|t| t.name == name).unwrap()
    }

    #[test]
    fn test_rule_needs_every_group() {
        let t = template("top_clients_by_revenue");
        assert!(t.matches("show me the top client by revenue"));
        assert!(!t.matches("show me the top client by profit"));
    }

    #[test]
    fn test_rule_group_alternatives() {
        let t = template("top_programs_by_profit_margin");
        assert!(t.matches("best programs by profitability"));
        assert!(t.matches("top program by profit margin"));
        assert!(!t.matches("top program by margin"));
    }

    #[test]
    fn test_instantiate_is_owned_copy() {
        let t = template("cost_breakdown");
        let mut request = t.instantiate(10);
        request.limit = 3;
        request.title = Some("changed".into());
        assert_eq!(t.title, "Cost Breakdown");
        assert_eq!(request.template_name(), Some("cost_breakdown"));
    }

    #[test]
    fn test_empty_rule_never_matches() {
        let mut t = template("cost_breakdown").clone();
        t.when.clear();
        assert!(!t.matches("cost breakdown"));
    }
}
