//! Prompt analyzer
//!
//! The end-to-end pipeline: template match or keyword resolution, title,
//! compilation and execution. Each prompt is handled independently; a failed
//! prompt is reported as an error value and leaves the analyzer usable.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{info, warn};
use crate::compiler::{compile_at, CompileError};
use crate::config::AnalyzerConfig;
use crate::executor::{ExecutionError, QueryExecutor, Row};
use crate::matcher::TemplateMatcher;
use crate::request::AnalysisRequest;
use crate::resolver::Resolver;
use crate::title::generate_title;
use crate::tokenizer::extract_limit;

/// Example prompts for UI hints, in display order
pub const SUGGESTED_PROMPTS: [&str; 10] = [
    "Show me the top 5 clients by revenue",
    "What are the most profitable programs?",
    "Show revenue trend over time",
    "What is the distribution of revenue by industry?",
    "Show me the pipeline value by stage",
    "What is the cost breakdown for all programs?",
    "Which program categories have the highest profit margins?",
    "Show me client enrollment trends over the last year",
    "What is the win rate by program category?",
    "Compare revenue and profit for different delivery modes",
];

/// Errors surfaced for a single prompt
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Result of a successfully processed prompt
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    /// The structured request the prompt resolved to
    #[serde(rename = "resolved")]
    pub request: AnalysisRequest,
    pub title: String,
    pub rows: Vec<Row>,
    /// Rendered query, when the executor can describe one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql: Option<String>,
}

/// Turns prompts into result rows through a [`QueryExecutor`]
pub struct PromptAnalyzer<E> {
    executor: E,
    config: AnalyzerConfig,
}

impl<E: QueryExecutor> PromptAnalyzer<E> {
    pub fn new(executor: E) -> Self {
        Self::with_config(executor, AnalyzerConfig::default())
    }

    pub fn with_config(executor: E, config: AnalyzerConfig) -> Self {
        Self { executor, config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Match or resolve a prompt without compiling or executing it
    ///
    /// A template match wins over keyword resolution. On the template path
    /// an explicit number in the prompt overrides the template's limit.
    pub fn analyze(&self, prompt: &str) -> AnalysisRequest {
        let matcher = TemplateMatcher::new(self.config.templates())
            .with_default_limit(self.config.template_limit);

        match matcher.match_template(prompt) {
            Some(mut request) => {
                if let Some(limit) = extract_limit(prompt).filter(|n| *n > 0) {
                    request.limit = limit;
                }
                request
            }
            None => Resolver::new(self.config.lexicon())
                .with_default_limit(self.config.default_limit)
                .resolve(prompt),
        }
    }

    /// Process a prompt, resolving relative dates against today's local date
    pub fn process(&self, prompt: &str) -> Result<AnalysisOutcome, AnalysisError> {
        self.process_at(prompt, Local::now().date_naive())
    }

    /// Process a prompt, resolving relative dates against `today`
    pub fn process_at(&self, prompt: &str, today: NaiveDate) -> Result<AnalysisOutcome, AnalysisError> {
        let request = self.analyze(prompt);
        let title = request
            .title
            .clone()
            .unwrap_or_else(|| generate_title(&request));

        let result = compile_at(&request, today)
            .map_err(AnalysisError::from)
            .and_then(|spec| {
                let sql = self.executor.describe(&spec);
                let rows = self.executor.execute(&spec)?;
                Ok((sql, rows))
            });

        match result {
            Ok((sql, rows)) => {
                info!(
                    prompt,
                    template = request.template_name(),
                    title = %title,
                    rows = rows.len(),
                    "prompt processed"
                );
                Ok(AnalysisOutcome { request, title, rows, sql })
            }
            Err(err) => {
                warn!(prompt, error = %err, "prompt failed");
                Err(err)
            }
        }
    }

    /// Process a prompt into a JSON object, `{"error": message}` on failure
    pub fn process_json(&self, prompt: &str) -> Value {
        match self.process(prompt) {
            Ok(outcome) => serde_json::to_value(&outcome)
                .unwrap_or_else(|err| json!({ "error": err.to_string() })),
            Err(err) => json!({ "error": err.to_string() }),
        }
    }

    /// Example prompts for UI hints
    pub fn suggested_prompts(&self) -> &'static [&'static str] {
        &SUGGESTED_PROMPTS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use crate::request::{Dimension, EntityType, Metric, QueryType};
    use crate::spec::AggregationSpec;

    /// Records specs and answers with a fixed row set
    struct StubExecutor {
        rows: Vec<Row>,
        seen: RefCell<Vec<AggregationSpec>>,
    }

    impl StubExecutor {
        fn with_rows(rows: Vec<Value>) -> Self {
            let rows = rows
                .into_iter()
                .filter_map(|v| match v {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect();
            Self { rows, seen: RefCell::new(Vec::new()) }
        }
    }

    impl QueryExecutor for StubExecutor {
        fn execute(&self, spec: &AggregationSpec) -> Result<Vec<Row>, ExecutionError> {
            self.seen.borrow_mut().push(spec.clone());
            if self.rows.is_empty() {
                return Err(ExecutionError::Backend("store unavailable".into()));
            }
            Ok(self.rows.clone())
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_template_takes_precedence() {
        let analyzer = PromptAnalyzer::new(StubExecutor::with_rows(vec![json!({"client_name": "A"})]));
        let outcome = analyzer.process_at("Show me the top client by revenue", today()).unwrap();
        assert_eq!(outcome.request.template_name(), Some("top_clients_by_revenue"));
        assert_eq!(outcome.request.dimension, Dimension::ClientName);
        assert_eq!(outcome.request.limit, 10);
        assert_eq!(outcome.title, "Top Clients by Revenue");
        assert!(outcome.sql.is_none());
    }

    #[test]
    fn test_template_limit_override() {
        let analyzer = PromptAnalyzer::new(StubExecutor::with_rows(vec![json!({})]));
        let request = analyzer.analyze("top 3 programs by revenue");
        assert_eq!(request.template_name(), None);

        let request = analyzer.analyze("show the top program list, 3 of them, by revenue");
        assert_eq!(request.template_name(), Some("top_programs_by_revenue"));
        assert_eq!(request.limit, 3);
    }

    #[test]
    fn test_resolver_path_generates_title() {
        let stub = StubExecutor::with_rows(vec![json!({"client_name": "A", "total_revenue": 100})]);
        let analyzer = PromptAnalyzer::new(stub);
        let outcome = analyzer.process_at("Show me the top 5 clients by revenue", today()).unwrap();
        assert_eq!(outcome.request.query_type, QueryType::Top);
        assert_eq!(outcome.request.entity_type, EntityType::Clients);
        assert_eq!(outcome.request.metric, Metric::Revenue);
        assert_eq!(outcome.title, "Top 5 Clients Revenue");
        assert_eq!(analyzer.executor().seen.borrow().len(), 1);
    }

    #[test]
    fn test_compile_error_skips_execution() {
        let analyzer = PromptAnalyzer::new(StubExecutor::with_rows(vec![json!({})]));
        // resolves to opportunities by delivery mode, which needs enrollments
        let err = analyzer.process_at("deals by delivery mode", today()).unwrap_err();
        assert!(matches!(err, AnalysisError::Compile(_)));
        assert!(analyzer.executor().seen.borrow().is_empty());
    }

    #[test]
    fn test_process_json_error_shape() {
        let analyzer = PromptAnalyzer::new(StubExecutor::with_rows(vec![]));
        let value = analyzer.process_json("top programs");
        assert_eq!(value["error"], "Query failed: store unavailable");
    }

    #[test]
    fn test_process_json_success_shape() {
        let analyzer = PromptAnalyzer::new(StubExecutor::with_rows(vec![json!({"program_name": "X"})]));
        let value = analyzer.process_json("top programs");
        assert_eq!(value["title"], "Top 5 Programs Revenue");
        assert_eq!(value["resolved"]["entity_type"], "programs");
        assert_eq!(value["rows"][0]["program_name"], "X");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_suggested_prompts() {
        let analyzer = PromptAnalyzer::new(StubExecutor::with_rows(vec![]));
        let prompts = analyzer.suggested_prompts();
        assert_eq!(prompts.len(), 10);
        assert_eq!(prompts[0], "Show me the top 5 clients by revenue");
    }
}
