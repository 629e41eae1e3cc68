//! Expression trees carried by an AggregationSpec
//!
//! Only the shapes the compiler produces: column references, comparisons,
//! list membership, arithmetic, `CASE`, aggregates and month bucketing.

use std::fmt;
use chrono::NaiveDate;
use serde::Serialize;

/// A column, optionally qualified by a relation alias
///
/// Unqualified columns name an output alias of the statement itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub qualifier: Option<String>,
    pub name: String,
}

impl Column {
    pub fn new(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            qualifier: Some(qualifier.into()),
            name: name.into(),
        }
    }

    /// Reference to an output column of the statement
    pub fn output(name: impl Into<String>) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.qualifier {
            Some(alias) => write!(f, "{}.{}", alias, self.name),
            None => f.write_str(&self.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    Sum,
    Avg,
    Count,
    CountDistinct,
}

/// Row comparison used by predicates and `CASE` conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Eq,
    Gt,
    GtEq,
    LtEq,
}

impl Comparison {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Gt => ">",
            Comparison::GtEq => ">=",
            Comparison::LtEq => "<=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithmeticOp {
    Add,
    Subtract,
    Multiply,
    /// Always floating point, never integer division
    Divide,
}

impl ArithmeticOp {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Subtract => "-",
            ArithmeticOp::Multiply => "*",
            ArithmeticOp::Divide => "/",
        }
    }
}

/// Values embedded in an expression
///
/// Integers are part of the query shape. Text and dates come from the
/// prompt or from fixed labels and are bound as parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Int(i64),
    String(String),
    Date(NaiveDate),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expr {
    Column(Column),
    Literal(Literal),
    Compare {
        left: Box<Expr>,
        op: Comparison,
        right: Box<Expr>,
    },
    /// `expr [NOT] IN (list)`; the list must not be empty
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },
    Arithmetic {
        op: ArithmeticOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    NotNull(Box<Expr>),
    Coalesce(Vec<Expr>),
    /// `CASE WHEN .. THEN .. [ELSE ..] END`, first true branch wins
    Case {
        branches: Vec<(Expr, Expr)>,
        otherwise: Option<Box<Expr>>,
    },
    Aggregate {
        func: Aggregation,
        expr: Box<Expr>,
    },
    /// Calendar month of a date, as `YYYY-MM`
    YearMonth(Box<Expr>),
}

impl Expr {
    pub fn column(qualifier: &str, name: &str) -> Self {
        Expr::Column(Column::new(qualifier, name))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(value.into()))
    }

    pub fn int(value: i64) -> Self {
        Expr::Literal(Literal::Int(value))
    }

    pub fn compare(left: Expr, op: Comparison, right: Expr) -> Self {
        Expr::Compare {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn eq(left: Expr, right: Expr) -> Self {
        Self::compare(left, Comparison::Eq, right)
    }

    pub fn is_in(expr: Expr, list: Vec<Expr>) -> Self {
        Expr::InList {
            expr: Box::new(expr),
            list,
            negated: false,
        }
    }

    pub fn not_in(expr: Expr, list: Vec<Expr>) -> Self {
        Expr::InList {
            expr: Box::new(expr),
            list,
            negated: true,
        }
    }

    pub fn arithmetic(op: ArithmeticOp, left: Expr, right: Expr) -> Self {
        Expr::Arithmetic {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn aggregate(func: Aggregation, expr: Expr) -> Self {
        Expr::Aggregate {
            func,
            expr: Box::new(expr),
        }
    }

    pub fn not_null(expr: Expr) -> Self {
        Expr::NotNull(Box::new(expr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_display() {
        assert_eq!(Column::new("c", "industry").to_string(), "c.industry");
        assert_eq!(Column::output("total_revenue").to_string(), "total_revenue");
    }

    #[test]
    fn test_not_in_is_negated() {
        let expr = Expr::not_in(Expr::column("o", "stage"), vec![Expr::string("Closed Won")]);
        match expr {
            Expr::InList { negated, list, .. } => {
                assert!(negated);
                assert_eq!(list, vec![Expr::Literal(Literal::String("Closed Won".into()))]);
            }
            other => panic!("expected IN list, got {:?}", other),
        }
    }

    #[test]
    fn test_literal_serializes_bare() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert_eq!(serde_json::to_string(&Literal::Date(date)).unwrap(), "\"2024-04-01\"");
        assert_eq!(serde_json::to_string(&Literal::Int(7)).unwrap(), "7");
    }
}
