//! Aggregation spec types

use serde::Serialize;
use crate::request::EntityType;
use super::expr::{Column, Expr};

/// A relation of the analytics store
///
/// Clients and programs are reference relations; enrollments and
/// opportunities are fact relations that point at both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Clients,
    Programs,
    Enrollments,
    Opportunities,
}

impl Relation {
    pub fn for_entity(entity_type: EntityType) -> Self {
        match entity_type {
            EntityType::Clients => Relation::Clients,
            EntityType::Programs => Relation::Programs,
            EntityType::Enrollments => Relation::Enrollments,
            EntityType::Opportunities => Relation::Opportunities,
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            Relation::Clients => "clients",
            Relation::Programs => "programs",
            Relation::Enrollments => "enrollments",
            Relation::Opportunities => "opportunities",
        }
    }

    pub fn alias(&self) -> &'static str {
        match self {
            Relation::Clients => "c",
            Relation::Programs => "p",
            Relation::Enrollments => "e",
            Relation::Opportunities => "o",
        }
    }

    /// Primary key column
    pub fn key(&self) -> &'static str {
        match self {
            Relation::Clients => "client_id",
            Relation::Programs => "program_id",
            Relation::Enrollments => "enrollment_id",
            Relation::Opportunities => "opportunity_id",
        }
    }

    pub fn is_fact(&self) -> bool {
        matches!(self, Relation::Enrollments | Relation::Opportunities)
    }

    /// Column reference qualified by this relation's alias
    pub fn column(&self, name: &str) -> Column {
        Column::new(self.alias(), name)
    }

    pub fn expr(&self, name: &str) -> Expr {
        Expr::Column(self.column(name))
    }
}

/// Inner join of a relation onto the base relation of an AggregationSpec
///
/// Every row of a fact has both of its references, so joins never drop or
/// add fact rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Join {
    pub relation: Relation,
    /// Key column on the joined relation
    pub left_key: Column,
    /// Key column on an already present relation
    pub right_key: Column,
}

/// A projected expression with its output alias
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectExpr {
    /// The expression to compute
    pub expr: Expr,
    /// Output column name
    pub alias: String,
}

impl ProjectExpr {
    pub fn new(expr: Expr, alias: impl Into<String>) -> Self {
        Self {
            expr,
            alias: alias.into(),
        }
    }
}

/// How result rows are grouped
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Grouping {
    /// GROUP BY key expressions
    Keys {
        /// Key columns as they appear in the output
        outputs: Vec<ProjectExpr>,
        /// Expressions to group on (may include hidden identity columns)
        group_by: Vec<Expr>,
    },
    /// One output row per labelled component (UNION ALL of aggregates)
    ///
    /// Each row carries the component label under `label_alias` and the
    /// aggregated component under `value_alias`. `measures` is ignored.
    Unpivot {
        label_alias: String,
        value_alias: String,
        aggregation: super::expr::Aggregation,
        components: Vec<(String, Expr)>,
    },
}

/// A sort key with direction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortKey {
    /// Expression or output alias to sort by
    pub expr: Expr,
    /// Sort direction
    pub direction: SortDirection,
}

impl SortKey {
    pub fn ascending(expr: Expr) -> Self {
        Self { expr, direction: SortDirection::Ascending }
    }

    pub fn descending(expr: Expr) -> Self {
        Self { expr, direction: SortDirection::Descending }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// A compiled, engine-agnostic aggregation
///
/// Everything needed to produce result rows: the base relation and its
/// joins, grouping, aggregated measures, predicates (ANDed), ordering and
/// an optional row limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationSpec {
    pub base: Relation,
    pub joins: Vec<Join>,
    pub grouping: Grouping,
    pub measures: Vec<ProjectExpr>,
    pub predicates: Vec<Expr>,
    pub order_by: Vec<SortKey>,
    pub limit: Option<u32>,
}

impl AggregationSpec {
    /// Names of the output columns in order
    pub fn output_columns(&self) -> Vec<&str> {
        match &self.grouping {
            Grouping::Keys { outputs, .. } => outputs
                .iter()
                .chain(self.measures.iter())
                .map(|p| p.alias.as_str())
                .collect(),
            Grouping::Unpivot { label_alias, value_alias, .. } => {
                vec![label_alias.as_str(), value_alias.as_str()]
            }
        }
    }

    /// Whether the spec reads from the given relation
    pub fn uses(&self, relation: Relation) -> bool {
        self.base == relation || self.joins.iter().any(|j| j.relation == relation)
    }
}
