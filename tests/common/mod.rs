//! Shared test utilities for integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use rusqlite::Connection;
use serde_json::Value;
use promptql::{AnalysisError, AnalysisOutcome, AnalyzerConfig, PromptAnalyzer, Row, SqliteExecutor};

const FIXTURE_SQL: &str = include_str!("../test_data/fixture.sql");

/// In-memory database seeded with the fixture tables
pub fn fixture_connection() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory database");
    conn.execute_batch(FIXTURE_SQL)
        .unwrap_or_else(|e| panic!("Failed to seed fixture: {}", e));
    conn
}

pub fn fixture_analyzer() -> PromptAnalyzer<SqliteExecutor> {
    PromptAnalyzer::new(SqliteExecutor::new(fixture_connection()))
}

pub fn fixture_analyzer_with(config: AnalyzerConfig) -> PromptAnalyzer<SqliteExecutor> {
    PromptAnalyzer::with_config(SqliteExecutor::new(fixture_connection()), config)
}

/// Fixed "today" so relative date filters are reproducible
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

/// Run the full pipeline: prompt → rows, against the fixture
pub fn run_prompt(prompt: &str) -> Result<AnalysisOutcome, AnalysisError> {
    fixture_analyzer().process_at(prompt, today())
}

// =============================================================================
// Row Inspection Utilities
// =============================================================================

/// Values of one column across all rows
pub fn column<'a>(rows: &'a [Row], name: &str) -> Vec<&'a Value> {
    rows.iter()
        .map(|row| row.get(name).unwrap_or_else(|| panic!("missing column {}: {:?}", name, row)))
        .collect()
}

/// String values of one column across all rows
pub fn text_column(rows: &[Row], name: &str) -> Vec<String> {
    column(rows, name)
        .into_iter()
        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
        .collect()
}

/// Numeric values of one column across all rows
pub fn number_column(rows: &[Row], name: &str) -> Vec<f64> {
    column(rows, name)
        .into_iter()
        .map(|v| v.as_f64().unwrap_or_else(|| panic!("{} is not numeric: {}", name, v)))
        .collect()
}
