//! Title generator
//!
//! Display titles built from a request's labels:
//! `[query type] [limit for top/bottom] [entity for name dimensions] [metric] [dimension]`.

use crate::request::{AnalysisRequest, Dimension, EntityType, Metric, QueryType};

/// Generate a human-readable title for a request
pub fn generate_title(request: &AnalysisRequest) -> String {
    let mut parts: Vec<String> = vec![query_type_label(request.query_type).to_string()];

    if request.query_type.is_ranked() {
        parts.push(request.limit.to_string());
    }
    if request.dimension.is_name() {
        parts.push(entity_label(request.entity_type).to_string());
    }
    parts.push(metric_label(request.metric).to_string());

    let dimension = dimension_label(request.dimension);
    if !dimension.is_empty() {
        parts.push(dimension.to_string());
    }

    parts.join(" ")
}

pub fn query_type_label(query_type: QueryType) -> &'static str {
    match query_type {
        QueryType::Top => "Top",
        QueryType::Bottom => "Bottom",
        QueryType::Average => "Average",
        QueryType::Comparison => "Comparison of",
        QueryType::Distribution => "Distribution of",
        QueryType::Trend => "Trend of",
    }
}

pub fn entity_label(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::Clients => "Clients",
        EntityType::Programs => "Programs",
        EntityType::Enrollments => "Enrollments",
        EntityType::Opportunities => "Opportunities",
    }
}

pub fn metric_label(metric: Metric) -> &'static str {
    match metric {
        Metric::Revenue => "Revenue",
        Metric::Profit => "Profit",
        Metric::ProfitMargin => "Profit Margin",
        Metric::Cost => "Cost",
        Metric::ClientCount => "Client Count",
        Metric::ProgramCount => "Program Count",
        Metric::EnrollmentCount => "Enrollment Count",
        Metric::OpportunityCount => "Opportunity Count",
        Metric::WinRate => "Win Rate",
        Metric::PipelineValue => "Pipeline Value",
    }
}

/// Dimension suffix; empty for name dimensions
pub fn dimension_label(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::ClientName | Dimension::ProgramName => "",
        Dimension::Industry => "by Industry",
        Dimension::Region => "by Region",
        Dimension::Size => "by Size",
        Dimension::Category => "by Category",
        Dimension::DeliveryMode => "by Delivery Mode",
        Dimension::Month => "Over Time",
        Dimension::Stage => "by Stage",
        Dimension::CostType => "Breakdown",
    }
}
