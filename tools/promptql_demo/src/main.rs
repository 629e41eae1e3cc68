use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use promptql::{compile_at, emit_sql, generate_title, AnalyzerConfig, PromptAnalyzer, SqliteExecutor};
use rusqlite::Connection;
use tracing_subscriber::EnvFilter;

mod output;

/// Seed for the in-memory database used when no --db is given
const DEMO_DATA: &str = include_str!("../demo_data.sql");

#[derive(Parser)]
#[command(name = "promptql-demo")]
#[command(about = "Ask analytics questions in plain English against a training-business database")]
#[command(version)]
struct Args {
    /// SQLite database with clients, programs, enrollments and opportunities tables
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// YAML file overriding limits, lexicon or templates
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Date that relative periods such as "last quarter" are resolved against (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer a prompt and print the result rows
    Ask {
        prompt: String,

        /// Print the outcome as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Also print the generated SQL
        #[arg(long)]
        sql: bool,
    },
    /// Show how a prompt is resolved and compiled, without executing it
    Explain { prompt: String },
    /// List the suggested prompts
    Suggest {
        /// Run every suggested prompt as well
        #[arg(long)]
        run: bool,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let analyzer = build_analyzer(args.db.as_ref(), args.config.as_ref())?;

    match args.command {
        Commands::Ask { prompt, json, sql } => handle_ask(&analyzer, &prompt, today, json, sql),
        Commands::Explain { prompt } => handle_explain(&analyzer, &prompt, today),
        Commands::Suggest { run } => handle_suggest(&analyzer, today, run),
    }
}

fn build_analyzer(
    db: Option<&PathBuf>,
    config: Option<&PathBuf>,
) -> anyhow::Result<PromptAnalyzer<SqliteExecutor>> {
    let executor = match db {
        Some(path) => SqliteExecutor::open(path)
            .with_context(|| format!("opening database {}", path.display()))?,
        None => {
            let conn = Connection::open_in_memory()?;
            conn.execute_batch(DEMO_DATA).context("seeding demo database")?;
            SqliteExecutor::new(conn)
        }
    };

    let config = match config {
        Some(path) => AnalyzerConfig::from_file(path)?,
        None => AnalyzerConfig::default(),
    };

    Ok(PromptAnalyzer::with_config(executor, config))
}

/// Handle the 'ask' subcommand
fn handle_ask(
    analyzer: &PromptAnalyzer<SqliteExecutor>,
    prompt: &str,
    today: NaiveDate,
    json: bool,
    sql: bool,
) -> anyhow::Result<()> {
    if json {
        let value = match analyzer.process_at(prompt, today) {
            Ok(outcome) => serde_json::to_value(&outcome)?,
            Err(err) => serde_json::json!({ "error": err.to_string() }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let outcome = analyzer.process_at(prompt, today)?;
    output::print_outcome(&outcome);
    if sql {
        if let Some(text) = &outcome.sql {
            println!("\n📄 SQL:\n{}", text);
        }
    }
    Ok(())
}

/// Handle the 'explain' subcommand
fn handle_explain(
    analyzer: &PromptAnalyzer<SqliteExecutor>,
    prompt: &str,
    today: NaiveDate,
) -> anyhow::Result<()> {
    println!("🔍 Prompt: {}", prompt);
    println!();

    let request = analyzer.analyze(prompt);
    output::print_request(&request);
    let title = request.title.clone().unwrap_or_else(|| generate_title(&request));
    println!("  Title:      {}", title);

    let spec = compile_at(&request, today)?;
    let statement = emit_sql(&spec)?;

    println!("\n📄 SQL");
    println!("======");
    println!("{}", statement.sql);
    if !statement.params.is_empty() {
        println!("\n  Parameters:");
        for (index, param) in statement.params.iter().enumerate() {
            println!("    ?{} = {:?}", index + 1, param);
        }
    }
    Ok(())
}

/// Handle the 'suggest' subcommand
fn handle_suggest(
    analyzer: &PromptAnalyzer<SqliteExecutor>,
    today: NaiveDate,
    run: bool,
) -> anyhow::Result<()> {
    println!("💡 Suggested prompts");
    println!("====================");
    for (index, prompt) in analyzer.suggested_prompts().iter().enumerate() {
        println!("  {:>2}. {}", index + 1, prompt);
    }
    if !run {
        return Ok(());
    }

    let mut failed = 0;
    for prompt in analyzer.suggested_prompts() {
        println!("\n🔍 {}", prompt);
        match analyzer.process_at(prompt, today) {
            Ok(outcome) => output::print_outcome(&outcome),
            Err(err) => {
                failed += 1;
                println!("  ❌ {}", err);
            }
        }
    }

    println!();
    if failed == 0 {
        println!("✅ All suggested prompts answered");
    } else {
        println!("⚠️  {} suggested prompt(s) failed", failed);
    }
    Ok(())
}
