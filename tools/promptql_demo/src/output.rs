//! Terminal rendering of analysis outcomes

use promptql::{AnalysisOutcome, AnalysisRequest, Row};
use serde_json::Value;

const CELL_WIDTH: usize = 22;
const PREVIEW_ROWS: usize = 25;

pub fn print_request(request: &AnalysisRequest) {
    println!("📐 RESOLVED REQUEST");
    println!("===================");
    match request.template_name() {
        Some(name) => println!("  Source:     template '{}'", name),
        None => println!("  Source:     keyword resolution"),
    }
    println!("  Query type: {}", request.query_type);
    println!("  Entity:     {}", request.entity_type);
    println!("  Metric:     {}", request.metric);
    println!("  Dimension:  {}", request.dimension);
    println!("  Limit:      {}", request.limit);
    for (key, value) in request.filters.iter() {
        println!("  Filter:     {} = {:?}", key, value);
    }
}

pub fn print_outcome(outcome: &AnalysisOutcome) {
    println!("\n📊 {}", outcome.title);
    println!("{}", "=".repeat(outcome.title.chars().count() + 3));
    print_rows(&outcome.rows);
}

pub fn print_rows(rows: &[Row]) {
    let Some(first) = rows.first() else {
        println!("  (No results returned)");
        return;
    };
    println!("  Rows: {}", rows.len());

    let columns: Vec<&String> = first.keys().collect();

    print!("    ");
    for name in &columns {
        print!("| {:<width$} ", truncate(name), width = CELL_WIDTH);
    }
    println!("|");

    print!("    ");
    for _ in &columns {
        print!("+{}", "-".repeat(CELL_WIDTH + 2));
    }
    println!("+");

    for row in rows.iter().take(PREVIEW_ROWS) {
        print!("    ");
        for name in &columns {
            let cell = row.get(name.as_str()).map(format_value).unwrap_or_default();
            print!("| {:<width$} ", truncate(&cell), width = CELL_WIDTH);
        }
        println!("|");
    }
    if rows.len() > PREVIEW_ROWS {
        println!("    ... {} more rows", rows.len() - PREVIEW_ROWS);
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{:.2}", f),
            _ => n.to_string(),
        },
        other => other.to_string(),
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(CELL_WIDTH).collect()
}
