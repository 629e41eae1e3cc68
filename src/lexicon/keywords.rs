//! Keyword categories
//!
//! Each lexicon table maps one of these categories to its trigger phrases.

use serde::{Deserialize, Serialize};
use crate::request::{Dimension, EntityType, RelativeDate};

/// Entity-type categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKeyword {
    Client,
    Program,
    Enrollment,
    Opportunity,
}

impl EntityKeyword {
    pub fn entity_type(&self) -> EntityType {
        match self {
            EntityKeyword::Client => EntityType::Clients,
            EntityKeyword::Program => EntityType::Programs,
            EntityKeyword::Enrollment => EntityType::Enrollments,
            EntityKeyword::Opportunity => EntityType::Opportunities,
        }
    }

    /// Dimension implied by naming the entity, if any
    pub fn default_dimension(&self) -> Option<Dimension> {
        match self {
            EntityKeyword::Client => Some(Dimension::ClientName),
            EntityKeyword::Program => Some(Dimension::ProgramName),
            EntityKeyword::Enrollment | EntityKeyword::Opportunity => None,
        }
    }
}

/// Metric categories
///
/// `Trend` is not a measure: it shapes the query as a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKeyword {
    Revenue,
    Profit,
    Cost,
    Count,
    Trend,
}

impl MetricKeyword {
    pub fn is_measure(&self) -> bool {
        !matches!(self, MetricKeyword::Trend)
    }
}

/// Dimension categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionKeyword {
    Industry,
    Region,
    Size,
    Category,
    DeliveryMode,
    Time,
}

impl DimensionKeyword {
    pub fn dimension(&self) -> Dimension {
        match self {
            DimensionKeyword::Industry => Dimension::Industry,
            DimensionKeyword::Region => Dimension::Region,
            DimensionKeyword::Size => Dimension::Size,
            DimensionKeyword::Category => Dimension::Category,
            DimensionKeyword::DeliveryMode => Dimension::DeliveryMode,
            DimensionKeyword::Time => Dimension::Month,
        }
    }
}

/// Relative time-period categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimePeriod {
    ThisMonth,
    LastMonth,
    ThisQuarter,
    LastQuarter,
    ThisYear,
    LastYear,
}

impl TimePeriod {
    /// `(date_from, date_to)` bounds of the period
    pub fn bounds(&self) -> (RelativeDate, RelativeDate) {
        match self {
            TimePeriod::ThisMonth => (RelativeDate::StartOfMonth, RelativeDate::Today),
            TimePeriod::LastMonth => (RelativeDate::StartOfPreviousMonth, RelativeDate::EndOfPreviousMonth),
            TimePeriod::ThisQuarter => (RelativeDate::StartOfQuarter, RelativeDate::Today),
            TimePeriod::LastQuarter => (RelativeDate::StartOfPreviousQuarter, RelativeDate::EndOfPreviousQuarter),
            TimePeriod::ThisYear => (RelativeDate::StartOfYear, RelativeDate::Today),
            TimePeriod::LastYear => (RelativeDate::StartOfPreviousYear, RelativeDate::EndOfPreviousYear),
        }
    }
}
