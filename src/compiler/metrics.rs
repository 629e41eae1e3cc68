//! Metric definitions
//!
//! Which relation each metric is computed from, for which entity types it
//! is valid, and the aggregate expressions it compiles to.

use crate::request::{EntityType, Metric};
use crate::spec::{Aggregation, ArithmeticOp, Comparison, Expr, ProjectExpr, Relation};
use super::error::CompileError;

/// Cost columns of an enrollment and their display labels
pub(super) const COST_COMPONENTS: [(&str, &str); 5] = [
    ("trainer_cost", "Trainer Cost"),
    ("logistics_cost", "Logistics Cost"),
    ("venue_cost", "Venue Cost"),
    ("utilities_cost", "Utilities Cost"),
    ("materials_cost", "Materials Cost"),
];

/// Opportunity stages in funnel order
pub(super) const PIPELINE_STAGES: [&str; 6] = [
    "Lead",
    "Prospect",
    "Proposal",
    "Negotiation",
    "Closed Won",
    "Closed Lost",
];

const WON_STAGE: &str = "Closed Won";
const CLOSED_STAGES: [&str; 2] = ["Closed Won", "Closed Lost"];

/// Relation the metric is computed from when aggregating `entity_type`
pub(super) fn metric_source(metric: Metric, entity_type: EntityType) -> Result<Relation, CompileError> {
    use EntityType::*;

    let source = match (metric, entity_type) {
        (Metric::Revenue, Opportunities) => Some(Relation::Opportunities),
        (
            Metric::Revenue | Metric::Profit | Metric::ProfitMargin | Metric::Cost | Metric::EnrollmentCount,
            Clients | Programs | Enrollments,
        ) => Some(Relation::Enrollments),
        (Metric::WinRate | Metric::PipelineValue | Metric::OpportunityCount, Opportunities) => {
            Some(Relation::Opportunities)
        }
        (Metric::ClientCount, Clients | Enrollments | Opportunities) => Some(Relation::Clients),
        (Metric::ProgramCount, Programs | Enrollments | Opportunities) => Some(Relation::Programs),
        _ => None,
    };

    source.ok_or_else(|| {
        CompileError::unsupported(
            "metric",
            metric,
            entity_type,
            format!("{} cannot be computed for {}", metric, entity_type),
        )
    })
}

/// Output column that carries the metric's headline value
pub(super) fn primary_alias(metric: Metric) -> &'static str {
    match metric {
        Metric::Revenue => "total_revenue",
        Metric::Profit => "total_profit",
        Metric::ProfitMargin => "profit_margin",
        Metric::Cost => "total_cost",
        Metric::ClientCount => "client_count",
        Metric::ProgramCount => "program_count",
        Metric::EnrollmentCount => "enrollment_count",
        Metric::OpportunityCount => "opportunity_count",
        Metric::WinRate => "win_rate",
        Metric::PipelineValue => "weighted_value",
    }
}

/// Aggregated output columns for a metric, headline value first
///
/// `additive` is the aggregate applied to summable metrics (SUM, or AVG for
/// average queries). Ratios and counts ignore it.
pub(super) fn measures(metric: Metric, source: Relation, additive: Aggregation) -> Vec<ProjectExpr> {
    let alias = primary_alias(metric);
    match metric {
        Metric::Revenue => {
            let column = match source {
                Relation::Opportunities => "potential_revenue",
                _ => "revenue",
            };
            vec![ProjectExpr::new(Expr::aggregate(additive, source.expr(column)), alias)]
        }
        Metric::Profit => vec![ProjectExpr::new(Expr::aggregate(additive, profit()), alias)],
        Metric::ProfitMargin => {
            let revenue = sum(revenue());
            let profit = sum(profit());
            vec![
                ProjectExpr::new(guarded_ratio(profit.clone(), revenue.clone()), alias),
                ProjectExpr::new(revenue, "total_revenue"),
                ProjectExpr::new(profit, "total_profit"),
            ]
        }
        Metric::Cost => vec![ProjectExpr::new(Expr::aggregate(additive, total_cost()), alias)],
        Metric::ClientCount | Metric::ProgramCount => {
            let relation = if metric == Metric::ClientCount { Relation::Clients } else { Relation::Programs };
            vec![ProjectExpr::new(
                Expr::aggregate(Aggregation::CountDistinct, relation.expr(relation.key())),
                alias,
            )]
        }
        Metric::EnrollmentCount | Metric::OpportunityCount => vec![ProjectExpr::new(
            Expr::aggregate(Aggregation::Count, source.expr(source.key())),
            alias,
        )],
        Metric::WinRate => {
            let stage = Relation::Opportunities.expr("stage");
            let won = count_when(Expr::eq(stage.clone(), Expr::string(WON_STAGE)));
            let closed = count_when(Expr::is_in(stage, string_list(&CLOSED_STAGES)));
            vec![
                ProjectExpr::new(guarded_ratio(won.clone(), closed.clone()), alias),
                ProjectExpr::new(won, "won_count"),
                ProjectExpr::new(closed, "closed_count"),
            ]
        }
        Metric::PipelineValue => {
            let o = Relation::Opportunities;
            let weighted = Expr::arithmetic(
                ArithmeticOp::Multiply,
                o.expr("potential_revenue"),
                Expr::arithmetic(ArithmeticOp::Divide, o.expr("probability"), Expr::int(100)),
            );
            vec![
                ProjectExpr::new(Expr::aggregate(additive, weighted), alias),
                ProjectExpr::new(Expr::aggregate(additive, o.expr("potential_revenue")), "total_value"),
            ]
        }
    }
}

/// Row predicates a metric imposes on its source
pub(super) fn metric_predicates(metric: Metric) -> Vec<Expr> {
    match metric {
        Metric::PipelineValue => vec![Expr::not_in(
            Relation::Opportunities.expr("stage"),
            string_list(&CLOSED_STAGES),
        )],
        _ => Vec::new(),
    }
}

/// Labelled cost components for a cost breakdown
pub(super) fn cost_components() -> Vec<(String, Expr)> {
    COST_COMPONENTS
        .iter()
        .map(|(column, label)| (label.to_string(), zero_if_null(Relation::Enrollments.expr(column))))
        .collect()
}

/// Funnel position of an opportunity stage
pub(super) fn stage_rank() -> Expr {
    let stage = Relation::Opportunities.expr("stage");
    Expr::Case {
        branches: PIPELINE_STAGES
            .iter()
            .zip(1..)
            .map(|(name, rank)| (Expr::eq(stage.clone(), Expr::string(*name)), Expr::int(rank)))
            .collect(),
        otherwise: Some(Box::new(Expr::int(PIPELINE_STAGES.len() as i64 + 1))),
    }
}

fn revenue() -> Expr {
    zero_if_null(Relation::Enrollments.expr("revenue"))
}

fn total_cost() -> Expr {
    cost_components()
        .into_iter()
        .map(|(_, expr)| expr)
        .reduce(|acc, next| Expr::arithmetic(ArithmeticOp::Add, acc, next))
        .unwrap_or(Expr::int(0))
}

fn profit() -> Expr {
    Expr::arithmetic(ArithmeticOp::Subtract, revenue(), total_cost())
}

fn sum(expr: Expr) -> Expr {
    Expr::aggregate(Aggregation::Sum, expr)
}

fn count_when(condition: Expr) -> Expr {
    Expr::aggregate(
        Aggregation::Count,
        Expr::Case {
            branches: vec![(condition, Expr::int(1))],
            otherwise: None,
        },
    )
}

/// `numerator / denominator * 100`, or 0 when the denominator is not positive
fn guarded_ratio(numerator: Expr, denominator: Expr) -> Expr {
    let ratio = Expr::arithmetic(ArithmeticOp::Divide, numerator, denominator.clone());
    Expr::Case {
        branches: vec![(
            Expr::compare(denominator, Comparison::Gt, Expr::int(0)),
            Expr::arithmetic(ArithmeticOp::Multiply, ratio, Expr::int(100)),
        )],
        otherwise: Some(Box::new(Expr::int(0))),
    }
}

fn zero_if_null(expr: Expr) -> Expr {
    Expr::Coalesce(vec![expr, Expr::int(0)])
}

fn string_list(values: &[&str]) -> Vec<Expr> {
    values.iter().map(|v| Expr::string(*v)).collect()
}
