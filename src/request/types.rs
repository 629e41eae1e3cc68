//! Closed vocabularies of an analysis request

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error when parsing one of the request enums from a string
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Invalid {kind} '{input}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub input: String,
}

fn parse_from<T: Copy>(all: &[T], name: impl Fn(&T) -> &'static str, kind: &'static str, s: &str) -> Result<T, ParseEnumError> {
    all.iter()
        .copied()
        .find(|v| name(v) == s)
        .ok_or_else(|| ParseEnumError {
            kind,
            input: s.to_string(),
        })
}

/// How results should be shaped and ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryType {
    Top,
    Bottom,
    Average,
    Comparison,
    Distribution,
    Trend,
}

impl QueryType {
    pub const ALL: [QueryType; 6] = [
        QueryType::Top,
        QueryType::Bottom,
        QueryType::Average,
        QueryType::Comparison,
        QueryType::Distribution,
        QueryType::Trend,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Top => "top",
            QueryType::Bottom => "bottom",
            QueryType::Average => "average",
            QueryType::Comparison => "comparison",
            QueryType::Distribution => "distribution",
            QueryType::Trend => "trend",
        }
    }

    /// Top-N style queries carry their limit in the title
    pub fn is_ranked(&self) -> bool {
        matches!(self, QueryType::Top | QueryType::Bottom)
    }
}

/// The base record kind being aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Clients,
    Programs,
    Enrollments,
    Opportunities,
}

impl EntityType {
    pub const ALL: [EntityType; 4] = [
        EntityType::Clients,
        EntityType::Programs,
        EntityType::Enrollments,
        EntityType::Opportunities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Clients => "clients",
            EntityType::Programs => "programs",
            EntityType::Enrollments => "enrollments",
            EntityType::Opportunities => "opportunities",
        }
    }

    /// The entity-specific count metric
    pub fn count_metric(&self) -> Metric {
        match self {
            EntityType::Clients => Metric::ClientCount,
            EntityType::Programs => Metric::ProgramCount,
            EntityType::Enrollments => Metric::EnrollmentCount,
            EntityType::Opportunities => Metric::OpportunityCount,
        }
    }
}

/// The aggregated numeric measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Revenue,
    Profit,
    ProfitMargin,
    Cost,
    ClientCount,
    ProgramCount,
    EnrollmentCount,
    OpportunityCount,
    WinRate,
    PipelineValue,
}

impl Metric {
    pub const ALL: [Metric; 10] = [
        Metric::Revenue,
        Metric::Profit,
        Metric::ProfitMargin,
        Metric::Cost,
        Metric::ClientCount,
        Metric::ProgramCount,
        Metric::EnrollmentCount,
        Metric::OpportunityCount,
        Metric::WinRate,
        Metric::PipelineValue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Revenue => "revenue",
            Metric::Profit => "profit",
            Metric::ProfitMargin => "profit_margin",
            Metric::Cost => "cost",
            Metric::ClientCount => "client_count",
            Metric::ProgramCount => "program_count",
            Metric::EnrollmentCount => "enrollment_count",
            Metric::OpportunityCount => "opportunity_count",
            Metric::WinRate => "win_rate",
            Metric::PipelineValue => "pipeline_value",
        }
    }
}

/// The attribute used to group aggregated results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    ClientName,
    ProgramName,
    Industry,
    Region,
    Size,
    Category,
    DeliveryMode,
    Month,
    Stage,
    CostType,
}

impl Dimension {
    pub const ALL: [Dimension; 10] = [
        Dimension::ClientName,
        Dimension::ProgramName,
        Dimension::Industry,
        Dimension::Region,
        Dimension::Size,
        Dimension::Category,
        Dimension::DeliveryMode,
        Dimension::Month,
        Dimension::Stage,
        Dimension::CostType,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::ClientName => "client_name",
            Dimension::ProgramName => "program_name",
            Dimension::Industry => "industry",
            Dimension::Region => "region",
            Dimension::Size => "size",
            Dimension::Category => "category",
            Dimension::DeliveryMode => "delivery_mode",
            Dimension::Month => "month",
            Dimension::Stage => "stage",
            Dimension::CostType => "cost_type",
        }
    }

    /// Name dimensions group by an entity's own records
    pub fn is_name(&self) -> bool {
        matches!(self, Dimension::ClientName | Dimension::ProgramName)
    }
}

/// Keys accepted in a request's filter map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKey {
    Industry,
    Size,
    Region,
    Category,
    DeliveryMode,
    Stage,
    DateFrom,
    DateTo,
}

impl FilterKey {
    pub const ALL: [FilterKey; 8] = [
        FilterKey::Industry,
        FilterKey::Size,
        FilterKey::Region,
        FilterKey::Category,
        FilterKey::DeliveryMode,
        FilterKey::Stage,
        FilterKey::DateFrom,
        FilterKey::DateTo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::Industry => "industry",
            FilterKey::Size => "size",
            FilterKey::Region => "region",
            FilterKey::Category => "category",
            FilterKey::DeliveryMode => "delivery_mode",
            FilterKey::Stage => "stage",
            FilterKey::DateFrom => "date_from",
            FilterKey::DateTo => "date_to",
        }
    }

    pub fn is_date(&self) -> bool {
        matches!(self, FilterKey::DateFrom | FilterKey::DateTo)
    }
}

macro_rules! impl_display_from_str {
    ($($ty:ident => $kind:literal),* $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl FromStr for $ty {
                type Err = ParseEnumError;

                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    parse_from(&$ty::ALL, $ty::as_str, $kind, s)
                }
            }
        )*
    };
}

impl_display_from_str! {
    QueryType => "query type",
    EntityType => "entity type",
    Metric => "metric",
    Dimension => "dimension",
    FilterKey => "filter key",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_names() {
        for metric in Metric::ALL {
            assert_eq!(metric.as_str().parse::<Metric>().unwrap(), metric);
        }
        for dimension in Dimension::ALL {
            assert_eq!(dimension.to_string().parse::<Dimension>().unwrap(), dimension);
        }
    }

    #[test]
    fn test_parse_unknown_name() {
        let err = "velocity".parse::<Metric>().unwrap_err();
        assert_eq!(err.kind, "metric");
        assert_eq!(err.to_string(), "Invalid metric 'velocity'");
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Metric::ProfitMargin).unwrap();
        assert_eq!(json, "\"profit_margin\"");
        let dim: Dimension = serde_json::from_str("\"delivery_mode\"").unwrap();
        assert_eq!(dim, Dimension::DeliveryMode);
    }

    #[test]
    fn test_count_metric_per_entity() {
        assert_eq!(EntityType::Clients.count_metric(), Metric::ClientCount);
        assert_eq!(EntityType::Opportunities.count_metric(), Metric::OpportunityCount);
    }
}
