use tracing::debug;
use crate::lexicon::{first_match, Lexicon, MetricKeyword};
use crate::request::{AnalysisRequest, Dimension, FilterKey, Metric, QueryType};
use crate::tokenizer::{extract_field_filters, extract_limit};

/// Keyword resolver from free text to an [`AnalysisRequest`]
///
/// Resolution runs a fixed sequence of passes over the same lowercased
/// prompt. Each pass may overwrite fields set by an earlier one:
///
/// 1. entity: the first matching entity category sets `entity_type` and,
///    for clients and programs, the matching name dimension
/// 2. metric: the first matching measure category sets `metric`; the trend
///    category, whenever it matches, also sets `query_type = trend` and
///    `dimension = month`
/// 3. dimension: overwrites `dimension`; time phrases also force a trend
/// 4. query type: overwrites `query_type`
/// 5. time period: sets `date_from` / `date_to` to relative dates
/// 6. explicit `<field> is <value>` filters, overwriting earlier filters
/// 7. limit
///
/// Fields no pass touches keep their defaults, so resolution never fails.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    lexicon: &'a Lexicon,
    default_limit: u32,
}

impl<'a> Resolver<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self {
            lexicon,
            default_limit: AnalysisRequest::DEFAULT_LIMIT,
        }
    }

    pub fn with_default_limit(mut self, limit: u32) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    /// Resolve a prompt into a fully populated request
    pub fn resolve(&self, prompt: &str) -> AnalysisRequest {
        let lowered = prompt.to_lowercase();
        let mut request = AnalysisRequest::default().with_limit(self.default_limit);

        self.apply_entity(&lowered, &mut request);
        self.apply_metric(&lowered, &mut request);
        self.apply_dimension(&lowered, &mut request);
        self.apply_query_type(&lowered, &mut request);
        self.apply_time_period(&lowered, &mut request);
        apply_field_filters(prompt, &mut request);
        self.apply_limit(prompt, &mut request);

        request
    }

    fn apply_entity(&self, lowered: &str, request: &mut AnalysisRequest) {
        let Some((keyword, phrase)) = first_match(&self.lexicon.entity_types, lowered) else {
            return;
        };
        request.entity_type = keyword.entity_type();
        if let Some(dimension) = keyword.default_dimension() {
            request.dimension = dimension;
        }
        debug!(phrase, entity_type = %request.entity_type, "entity pass");
    }

    fn apply_metric(&self, lowered: &str, request: &mut AnalysisRequest) {
        let measures = self.lexicon.metrics.iter().filter(|c| c.category.is_measure());
        if let Some((keyword, phrase)) = first_match(measures, lowered) {
            request.metric = match keyword {
                MetricKeyword::Revenue => Metric::Revenue,
                MetricKeyword::Profit if lowered.contains("margin") => Metric::ProfitMargin,
                MetricKeyword::Profit => Metric::Profit,
                MetricKeyword::Cost => Metric::Cost,
                MetricKeyword::Count => request.entity_type.count_metric(),
                MetricKeyword::Trend => request.metric,
            };
            debug!(phrase, metric = %request.metric, "metric pass");
        }

        // A trend phrase implies a time series even alongside a measure phrase
        let trend = self
            .lexicon
            .metrics
            .iter()
            .filter(|c| c.category == MetricKeyword::Trend)
            .find_map(|c| c.find_in(lowered));
        if let Some(phrase) = trend {
            request.query_type = QueryType::Trend;
            request.dimension = Dimension::Month;
            debug!(phrase, "metric pass implies trend");
        }
    }

    fn apply_dimension(&self, lowered: &str, request: &mut AnalysisRequest) {
        let Some((keyword, phrase)) = first_match(&self.lexicon.dimensions, lowered) else {
            return;
        };
        request.dimension = keyword.dimension();
        if request.dimension == Dimension::Month {
            request.query_type = QueryType::Trend;
        }
        debug!(phrase, dimension = %request.dimension, "dimension pass");
    }

    fn apply_query_type(&self, lowered: &str, request: &mut AnalysisRequest) {
        if let Some((query_type, phrase)) = first_match(&self.lexicon.query_types, lowered) {
            request.query_type = query_type;
            debug!(phrase, query_type = %query_type, "query type pass");
        }
    }

    fn apply_time_period(&self, lowered: &str, request: &mut AnalysisRequest) {
        if let Some((period, phrase)) = first_match(&self.lexicon.time_periods, lowered) {
            let (from, to) = period.bounds();
            request.filters.insert(FilterKey::DateFrom, from);
            request.filters.insert(FilterKey::DateTo, to);
            debug!(phrase, ?period, "time period pass");
        }
    }

    fn apply_limit(&self, prompt: &str, request: &mut AnalysisRequest) {
        request.limit = match extract_limit(prompt) {
            Some(n) if n > 0 => n,
            _ => self.default_limit,
        };
    }
}

impl Default for Resolver<'static> {
    fn default() -> Self {
        Self::new(Lexicon::builtin())
    }
}

fn apply_field_filters(prompt: &str, request: &mut AnalysisRequest) {
    for (key, value) in extract_field_filters(prompt) {
        debug!(filter = %key, value = %value, "explicit filter");
        request.filters.insert(key, value);
    }
}

/// Resolve a prompt with the built-in lexicon
pub fn resolve(prompt: &str) -> AnalysisRequest {
    Resolver::default().resolve(prompt)
}
