//! Ordered keyword tables

use std::path::Path;
use std::sync::LazyLock;
use serde::{Deserialize, Serialize};
use crate::error::ParseError;
use crate::request::QueryType;
use super::keywords::{DimensionKeyword, EntityKeyword, MetricKeyword, TimePeriod};

/// One lexicon category and its trigger phrases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category<K> {
    pub category: K,
    pub phrases: Vec<String>,
}

impl<K: Copy> Category<K> {
    pub fn new(category: K, phrases: &[&str]) -> Self {
        Self {
            category,
            phrases: phrases.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// First phrase occurring as a substring of `lowered`
    pub fn find_in<'a>(&'a self, lowered: &str) -> Option<&'a str> {
        self.phrases
            .iter()
            .map(String::as_str)
            .find(|phrase| lowered.contains(phrase))
    }
}

/// First category (in table order) with a phrase occurring in `lowered`
pub fn first_match<'a, K: Copy + 'a>(
    table: impl IntoIterator<Item = &'a Category<K>>,
    lowered: &str,
) -> Option<(K, &'a str)> {
    table
        .into_iter()
        .find_map(|c| c.find_in(lowered).map(|phrase| (c.category, phrase)))
}

/// Keyword tables used by the resolver
///
/// The position of a category in its table is its precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lexicon {
    pub entity_types: Vec<Category<EntityKeyword>>,
    pub metrics: Vec<Category<MetricKeyword>>,
    pub dimensions: Vec<Category<DimensionKeyword>>,
    pub query_types: Vec<Category<QueryType>>,
    pub time_periods: Vec<Category<TimePeriod>>,
}

static BUILTIN: LazyLock<Lexicon> = LazyLock::new(Lexicon::default);

impl Lexicon {
    /// The shared built-in lexicon
    pub fn builtin() -> &'static Lexicon {
        &BUILTIN
    }

    /// Load a lexicon from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let path_str = path.as_ref().display().to_string();
        let contents = std::fs::read_to_string(&path).map_err(|e| ParseError::Io {
            path: path_str,
            source: e,
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parse a lexicon from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ParseError> {
        let lexicon: Lexicon = serde_yaml::from_str(yaml)?;
        Ok(lexicon.normalized())
    }

    /// Lowercase every phrase so matching against a lowered prompt works
    pub fn normalized(mut self) -> Self {
        fn lower<K>(table: &mut [Category<K>]) {
            for category in table {
                for phrase in &mut category.phrases {
                    *phrase = phrase.to_lowercase();
                }
            }
        }
        lower(&mut self.entity_types);
        lower(&mut self.metrics);
        lower(&mut self.dimensions);
        lower(&mut self.query_types);
        lower(&mut self.time_periods);
        self
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            entity_types: vec![
                Category::new(EntityKeyword::Client, &["client", "clients", "customer", "customers", "organization", "organizations"]),
                Category::new(EntityKeyword::Program, &["program", "programs", "course", "courses", "training", "trainings"]),
                Category::new(EntityKeyword::Enrollment, &["enrollment", "enrollments", "registration", "registrations"]),
                Category::new(EntityKeyword::Opportunity, &["opportunity", "opportunities", "pipeline", "deal", "deals", "lead", "leads"]),
            ],
            metrics: vec![
                Category::new(MetricKeyword::Revenue, &["revenue", "sales", "income", "earnings", "money", "payment", "payments"]),
                Category::new(MetricKeyword::Profit, &["profit", "profits", "margin", "margins", "profitability", "earnings"]),
                Category::new(MetricKeyword::Cost, &["cost", "costs", "expense", "expenses", "spending", "expenditure"]),
                Category::new(MetricKeyword::Count, &["count", "number", "quantity", "total", "amount"]),
                Category::new(MetricKeyword::Trend, &["trend", "trends", "over time", "history", "historical", "pattern", "patterns"]),
            ],
            dimensions: vec![
                Category::new(DimensionKeyword::Industry, &["industry", "industries", "sector", "sectors"]),
                Category::new(DimensionKeyword::Region, &["region", "regions", "location", "locations", "area", "areas", "geography"]),
                Category::new(DimensionKeyword::Size, &["size", "sizes", "company size", "organization size"]),
                Category::new(DimensionKeyword::Category, &["category", "categories", "type", "types"]),
                Category::new(DimensionKeyword::DeliveryMode, &["delivery mode", "delivery", "mode", "online", "in-person", "virtual", "classroom"]),
                Category::new(DimensionKeyword::Time, &["time", "month", "months", "year", "years", "quarter", "quarters", "date", "dates", "period"]),
            ],
            query_types: vec![
                Category::new(QueryType::Top, &["top", "best", "highest", "most", "largest", "biggest", "greatest"]),
                Category::new(QueryType::Bottom, &["bottom", "worst", "lowest", "least", "smallest"]),
                Category::new(QueryType::Average, &["average", "avg", "mean", "median", "typical"]),
                Category::new(QueryType::Comparison, &["compare", "comparison", "versus", "vs", "against", "difference", "differences"]),
                Category::new(QueryType::Distribution, &["distribution", "breakdown", "composition", "makeup", "split", "segmentation"]),
            ],
            time_periods: vec![
                Category::new(TimePeriod::ThisMonth, &["this month", "current month"]),
                Category::new(TimePeriod::LastMonth, &["last month", "previous month"]),
                Category::new(TimePeriod::ThisQuarter, &["this quarter", "current quarter"]),
                Category::new(TimePeriod::LastQuarter, &["last quarter", "previous quarter"]),
                Category::new(TimePeriod::ThisYear, &["this year", "current year"]),
                Category::new(TimePeriod::LastYear, &["last year", "previous year"]),
            ],
        }
    }
}
