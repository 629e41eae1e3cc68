//! Request compilation

use chrono::{Local, NaiveDate};
use tracing::debug;
use crate::request::{AnalysisRequest, Dimension, EntityType, FilterKey, FilterValue, Metric, QueryType};
use crate::spec::{
    Aggregation, AggregationSpec, Comparison, Column, Expr, Grouping, Literal, ProjectExpr,
    Relation, SortKey,
};
use super::dates::resolve_relative;
use super::error::CompileError;
use super::joins::JoinPlan;
use super::metrics::{cost_components, measures, metric_predicates, metric_source, primary_alias, stage_rank};

/// Compile a request against today's local date
pub fn compile(request: &AnalysisRequest) -> Result<AggregationSpec, CompileError> {
    compile_at(request, Local::now().date_naive())
}

/// Compile a request, resolving relative dates against `today`
///
/// The result reads from the entity's relation plus whatever joins the
/// metric, dimension and filters need, in that order. Requirements that
/// would combine enrollments with opportunities are rejected with
/// [`CompileError::UnsupportedCombination`] naming the field that
/// introduced the conflict.
pub fn compile_at(request: &AnalysisRequest, today: NaiveDate) -> Result<AggregationSpec, CompileError> {
    let entity_type = request.entity_type;
    let mut plan = JoinPlan::new(entity_type);
    let mut predicates = Vec::new();

    // Metric
    let source = metric_source(request.metric, entity_type)?;
    plan.require(source, "metric", request.metric.as_str())?;
    let additive = if request.query_type == QueryType::Average {
        Aggregation::Avg
    } else {
        Aggregation::Sum
    };

    // Dimension
    let grouping = match request.dimension {
        Dimension::CostType => {
            if request.metric != Metric::Cost {
                return Err(CompileError::unsupported(
                    "dimension",
                    request.dimension,
                    entity_type,
                    format!("cost breakdown requires the cost metric, not {}", request.metric),
                ));
            }
            plan.require(Relation::Enrollments, "dimension", request.dimension.as_str())?;
            Grouping::Unpivot {
                label_alias: Dimension::CostType.as_str().to_string(),
                value_alias: primary_alias(request.metric).to_string(),
                aggregation: additive,
                components: cost_components(),
            }
        }
        dimension => {
            if dimension == Dimension::Stage {
                stage_scope("dimension", dimension.as_str(), entity_type)?;
            }
            let key = dimension_key(dimension, entity_type);
            plan.require(key.relation, "dimension", dimension.as_str())?;
            let column = key.relation.expr(key.column);
            predicates.push(Expr::not_null(column.clone()));

            let output = if dimension == Dimension::Month {
                Expr::YearMonth(Box::new(column))
            } else {
                column
            };
            let mut group_by = Vec::new();
            if dimension.is_name() {
                group_by.push(key.relation.expr(key.relation.key()));
            }
            group_by.push(output.clone());
            Grouping::Keys {
                outputs: vec![ProjectExpr::new(output, dimension.as_str())],
                group_by,
            }
        }
    };

    // Filters
    for (filter, value) in request.filters.iter() {
        if filter == FilterKey::Stage {
            stage_scope(filter.as_str(), &filter_value_text(value), entity_type)?;
        }
        let key = filter_key(filter, entity_type);
        plan.require(key.relation, filter.as_str(), &filter_value_text(value))?;
        let column = key.relation.expr(key.column);
        let op = match filter {
            FilterKey::DateFrom => Comparison::GtEq,
            FilterKey::DateTo => Comparison::LtEq,
            _ => Comparison::Eq,
        };
        predicates.push(Expr::compare(column, op, Expr::Literal(bind_value(value, today))));
    }
    predicates.extend(metric_predicates(request.metric));

    let (order_by, limit) = ordering(request, &grouping);
    let base = plan.base();
    let joins = plan.into_joins();
    let measures = match grouping {
        Grouping::Keys { .. } => measures(request.metric, source, additive),
        Grouping::Unpivot { .. } => Vec::new(),
    };

    debug!(
        base = base.table(),
        joins = joins.len(),
        predicates = predicates.len(),
        ?limit,
        "compiled request"
    );

    Ok(AggregationSpec {
        base,
        joins,
        grouping,
        measures,
        predicates,
        order_by,
        limit,
    })
}

/// Stage belongs to the opportunity funnel and is only meaningful when
/// opportunities themselves are analyzed
fn stage_scope(field: &str, value: &str, entity_type: EntityType) -> Result<(), CompileError> {
    if entity_type == EntityType::Opportunities {
        return Ok(());
    }
    Err(CompileError::unsupported(
        field,
        value,
        entity_type,
        "stage is only available for opportunities",
    ))
}

/// A column on a specific relation
struct KeyColumn {
    relation: Relation,
    column: &'static str,
}

fn key(relation: Relation, column: &'static str) -> KeyColumn {
    KeyColumn { relation, column }
}

/// Date column an entity is filtered and bucketed on
fn date_column(entity_type: EntityType) -> KeyColumn {
    match entity_type {
        EntityType::Opportunities => key(Relation::Opportunities, "created_date"),
        EntityType::Clients | EntityType::Programs | EntityType::Enrollments => {
            key(Relation::Enrollments, "start_date")
        }
    }
}

fn delivery_mode_column(entity_type: EntityType) -> KeyColumn {
    match entity_type {
        EntityType::Programs => key(Relation::Programs, "delivery_mode"),
        _ => key(Relation::Enrollments, "delivery_mode"),
    }
}

/// Grouping column of every dimension except the cost breakdown
fn dimension_key(dimension: Dimension, entity_type: EntityType) -> KeyColumn {
    match dimension {
        Dimension::ClientName => key(Relation::Clients, "name"),
        Dimension::ProgramName => key(Relation::Programs, "name"),
        Dimension::Industry => key(Relation::Clients, "industry"),
        Dimension::Region => key(Relation::Clients, "region"),
        Dimension::Size => key(Relation::Clients, "size"),
        Dimension::Category => key(Relation::Programs, "category"),
        Dimension::DeliveryMode => delivery_mode_column(entity_type),
        Dimension::Stage => key(Relation::Opportunities, "stage"),
        Dimension::Month | Dimension::CostType => date_column(entity_type),
    }
}

fn filter_key(filter: FilterKey, entity_type: EntityType) -> KeyColumn {
    match filter {
        FilterKey::Industry => key(Relation::Clients, "industry"),
        FilterKey::Size => key(Relation::Clients, "size"),
        FilterKey::Region => key(Relation::Clients, "region"),
        FilterKey::Category => key(Relation::Programs, "category"),
        FilterKey::DeliveryMode => delivery_mode_column(entity_type),
        FilterKey::Stage => key(Relation::Opportunities, "stage"),
        FilterKey::DateFrom | FilterKey::DateTo => date_column(entity_type),
    }
}

fn bind_value(value: &FilterValue, today: NaiveDate) -> Literal {
    match value {
        FilterValue::Literal(text) => Literal::String(text.clone()),
        FilterValue::Relative(date) => Literal::Date(resolve_relative(*date, today)),
    }
}

fn filter_value_text(value: &FilterValue) -> String {
    match value {
        FilterValue::Literal(text) => text.clone(),
        FilterValue::Relative(date) => format!("{:?}", date),
    }
}

/// Sort keys and row limit for the request's query type
fn ordering(request: &AnalysisRequest, grouping: &Grouping) -> (Vec<SortKey>, Option<u32>) {
    let metric = Expr::Column(Column::output(primary_alias(request.metric)));
    let chronological = request.dimension == Dimension::Month && request.query_type == QueryType::Trend;
    let funnel = request.dimension == Dimension::Stage
        && matches!(
            request.query_type,
            QueryType::Distribution | QueryType::Comparison | QueryType::Trend
        );

    let order_by = if chronological {
        vec![SortKey::ascending(Expr::Column(Column::output(Dimension::Month.as_str())))]
    } else if funnel {
        vec![SortKey::ascending(stage_rank())]
    } else if request.query_type == QueryType::Bottom {
        vec![SortKey::ascending(metric)]
    } else {
        vec![SortKey::descending(metric)]
    };

    let unlimited = chronological
        || request.dimension == Dimension::Stage
        || matches!(grouping, Grouping::Unpivot { .. });
    let limit = if unlimited { None } else { Some(request.limit.max(1)) };

    (order_by, limit)
}
