//! End-to-end tests: prompt → request → SQL → rows against the fixture database

mod common;

use chrono::NaiveDate;
use common::*;
use promptql::{
    compile_at, AnalysisError, AnalysisRequest, Dimension, EntityType, ExecutionError, Metric,
    QueryExecutor, QueryType, SqliteExecutor, SUGGESTED_PROMPTS,
};

#[test]
fn test_top_clients_by_revenue() {
    let outcome = run_prompt("Show me the top 5 clients by revenue").unwrap();

    assert_eq!(outcome.request.template_name(), None);
    assert_eq!(outcome.title, "Top 5 Clients Revenue");
    assert_eq!(text_column(&outcome.rows, "client_name"), vec!["A", "B"]);
    assert_eq!(number_column(&outcome.rows, "total_revenue"), vec![100.0, 50.0]);

    let keys: Vec<&str> = outcome.rows[0].keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["client_name", "total_revenue"]);
}

#[test]
fn test_explicit_limit_truncates_rows() {
    let outcome = run_prompt("Show me the top 1 clients by revenue").unwrap();
    assert_eq!(outcome.request.limit, 1);
    assert_eq!(text_column(&outcome.rows, "client_name"), vec!["A"]);
}

#[test]
fn test_template_path_uses_template_title() {
    let outcome = run_prompt("Show revenue trend over time").unwrap();

    assert_eq!(outcome.request.template_name(), Some("revenue_trend_over_time"));
    assert_eq!(outcome.title, "Revenue Trend Over Time");
    assert_eq!(
        text_column(&outcome.rows, "month"),
        vec!["2024-01", "2024-02", "2024-03"]
    );
    assert_eq!(number_column(&outcome.rows, "total_revenue"), vec![60.0, 90.0, 0.0]);
}

#[test]
fn test_profit_margin_guards_zero_revenue() {
    let outcome = run_prompt("Which programs have the lowest profit margins?").unwrap();

    assert_eq!(outcome.request.query_type, QueryType::Bottom);
    assert_eq!(outcome.request.metric, Metric::ProfitMargin);
    assert_eq!(
        text_column(&outcome.rows, "program_name"),
        vec!["Onboarding Basics", "Data Literacy", "Leadership Essentials"]
    );

    let margins = number_column(&outcome.rows, "profit_margin");
    assert_eq!(margins[0], 0.0);
    assert_eq!(margins[1], 50.0);
    assert!((margins[2] - 800.0 / 11.0).abs() < 1e-9);
}

#[test]
fn test_pipeline_by_stage_in_funnel_order() {
    let outcome = run_prompt("Show me the pipeline value by stage").unwrap();

    assert_eq!(outcome.request.template_name(), Some("pipeline_by_stage"));
    // closed stages are not pipeline
    assert_eq!(
        text_column(&outcome.rows, "stage"),
        vec!["Lead", "Proposal", "Negotiation"]
    );
    assert_eq!(
        number_column(&outcome.rows, "weighted_value"),
        vec![100.0, 1000.0, 300.0]
    );
}

#[test]
fn test_cost_breakdown_unpivots_cost_columns() {
    let outcome = run_prompt("What is the cost breakdown for all programs?").unwrap();

    assert_eq!(outcome.request.template_name(), Some("cost_breakdown"));
    assert_eq!(outcome.rows.len(), 5);

    let labels = text_column(&outcome.rows, "cost_type");
    let totals = number_column(&outcome.rows, "total_cost");
    assert_eq!(labels[0], "Trainer Cost");
    assert_eq!(totals[0], 35.0);
    assert_eq!(labels[4], "Utilities Cost");
    assert_eq!(totals[4], 0.0);
    assert!(totals.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_last_year_filter() {
    let prompt = "Show me client enrollment trends over the last year";

    let outcome = run_prompt(prompt).unwrap();
    assert_eq!(outcome.request.query_type, QueryType::Trend);
    assert_eq!(outcome.request.dimension, Dimension::Month);
    assert_eq!(
        text_column(&outcome.rows, "month"),
        vec!["2024-01", "2024-02", "2024-03"]
    );

    // a year later the fixture falls outside "last year"
    let later = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    let err = fixture_analyzer().process_at(prompt, later).unwrap_err();
    assert!(matches!(err, AnalysisError::Execution(ExecutionError::EmptyResult)));
    assert_eq!(err.to_string(), "No data found for this analysis");
}

#[test]
fn test_explicit_filter_is_bound() {
    let outcome = run_prompt("best programs by revenue where region is Europe").unwrap();

    assert_eq!(outcome.request.dimension, Dimension::Region);
    assert_eq!(text_column(&outcome.rows, "region"), vec!["Europe"]);
    assert_eq!(number_column(&outcome.rows, "total_revenue"), vec![50.0]);

    let sql = outcome.sql.unwrap();
    assert!(sql.contains("c.region = ?"));
    assert!(!sql.contains("Europe"));
}

#[test]
fn test_unsupported_combination_is_reported() {
    let err = run_prompt("deals by delivery mode").unwrap_err();
    assert!(matches!(err, AnalysisError::Compile(_)));
    assert!(err.to_string().starts_with("Unsupported combination"));
}

#[test]
fn test_win_rate_guards_no_closed_deals() {
    let request = AnalysisRequest::new(
        QueryType::Top,
        EntityType::Opportunities,
        Metric::WinRate,
        Dimension::ClientName,
    );
    let spec = compile_at(&request, today()).unwrap();
    let rows = SqliteExecutor::new(fixture_connection()).execute(&spec).unwrap();

    assert_eq!(text_column(&rows, "client_name"), vec!["B", "A"]);
    assert_eq!(number_column(&rows, "win_rate"), vec![50.0, 0.0]);
    assert_eq!(number_column(&rows, "closed_count"), vec![2.0, 0.0]);
}

#[test]
fn test_analyzer_survives_failed_prompt() {
    let analyzer = fixture_analyzer();
    assert!(analyzer.process_at("deals by delivery mode", today()).is_err());
    assert!(analyzer.process_at("Show me the top 5 clients by revenue", today()).is_ok());
}

#[test]
fn test_process_json() {
    let analyzer = fixture_analyzer();
    let value = analyzer.process_json("deals by delivery mode");
    assert!(value["error"].as_str().unwrap().starts_with("Unsupported combination"));
}

#[test]
fn test_suggested_prompts_all_run() {
    let analyzer = fixture_analyzer();
    for prompt in SUGGESTED_PROMPTS {
        let outcome = analyzer
            .process_at(prompt, today())
            .unwrap_or_else(|e| panic!("{:?} failed: {}", prompt, e));
        assert!(!outcome.rows.is_empty(), "{:?} returned no rows", prompt);
        assert!(!outcome.title.is_empty());
    }
}
