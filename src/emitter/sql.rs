//! SQL emitter
//!
//! Renders an AggregationSpec as a single SQLite statement. String and date
//! literals become `?` placeholders; their values are returned alongside the
//! text in placeholder order.

use tracing::debug;
use crate::spec::{
    Aggregation, AggregationSpec, ArithmeticOp, Column, Expr, Grouping, Join, Literal, ProjectExpr,
    SortDirection, SortKey,
};
use super::error::EmitError;

/// A rendered statement and its bound parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<Literal>,
}

/// Emit a parameterized SQL statement from an AggregationSpec
pub fn emit_sql(spec: &AggregationSpec) -> Result<SqlStatement, EmitError> {
    let mut writer = SqlWriter::default();
    let sql = match &spec.grouping {
        Grouping::Keys { outputs, group_by } => writer.grouped(spec, outputs, group_by)?,
        Grouping::Unpivot {
            label_alias,
            value_alias,
            aggregation,
            components,
        } => writer.unpivot(spec, label_alias, value_alias, *aggregation, components)?,
    };
    debug!(sql = %sql, params = writer.params.len(), "emitted sql");
    Ok(SqlStatement {
        sql,
        params: writer.params,
    })
}

fn pad(indent: usize) -> String {
    "  ".repeat(indent)
}

#[derive(Default)]
struct SqlWriter {
    params: Vec<Literal>,
}

impl SqlWriter {
    // -----------------------------------------------------------------------
    // Statements
    // -----------------------------------------------------------------------

    fn grouped(&mut self, spec: &AggregationSpec, outputs: &[ProjectExpr], group_by: &[Expr]) -> Result<String, EmitError> {
        if outputs.is_empty() && spec.measures.is_empty() {
            return Err(EmitError::InvalidSpec("nothing to select".to_string()));
        }

        let items = outputs
            .iter()
            .chain(spec.measures.iter())
            .map(|pe| self.project(pe))
            .collect::<Result<Vec<_>, _>>()?;

        let mut sql = format!("SELECT {}\n{}", items.join(", "), from_clause(spec));
        sql.push_str(&self.where_clause(&spec.predicates)?);

        if !group_by.is_empty() {
            let keys = group_by
                .iter()
                .map(|e| self.expr(e))
                .collect::<Result<Vec<_>, _>>()?;
            sql.push_str(&format!("\nGROUP BY {}", keys.join(", ")));
        }

        sql.push_str(&self.tail(&spec.order_by, spec.limit)?);
        Ok(sql)
    }

    fn unpivot(
        &mut self,
        spec: &AggregationSpec,
        label_alias: &str,
        value_alias: &str,
        aggregation: Aggregation,
        components: &[(String, Expr)],
    ) -> Result<String, EmitError> {
        if components.is_empty() {
            return Err(EmitError::InvalidSpec("unpivot without components".to_string()));
        }

        let mut branches = Vec::with_capacity(components.len());
        for (label, expr) in components {
            let label_sql = self.literal(&Literal::String(label.clone()));
            let value_sql = self.aggregate(aggregation, expr)?;
            let mut branch = format!(
                "SELECT {label_sql} AS \"{label_alias}\", {value_sql} AS \"{value_alias}\"\n{}",
                from_clause(spec)
            );
            branch.push_str(&self.where_clause(&spec.predicates)?);
            branches.push(branch);
        }

        let mut sql = branches.join("\nUNION ALL\n");
        sql.push_str(&self.tail(&spec.order_by, spec.limit)?);
        Ok(sql)
    }

    fn where_clause(&mut self, predicates: &[Expr]) -> Result<String, EmitError> {
        if predicates.is_empty() {
            return Ok(String::new());
        }
        let parts = predicates
            .iter()
            .map(|p| self.expr(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("\nWHERE {}", parts.join(&format!("\n{}AND ", pad(1)))))
    }

    fn tail(&mut self, order_by: &[SortKey], limit: Option<u32>) -> Result<String, EmitError> {
        let mut sql = String::new();
        if !order_by.is_empty() {
            let keys = order_by
                .iter()
                .map(|k| {
                    let dir = match k.direction {
                        SortDirection::Ascending => "ASC",
                        SortDirection::Descending => "DESC",
                    };
                    Ok(format!("{} {}", self.expr(&k.expr)?, dir))
                })
                .collect::<Result<Vec<_>, EmitError>>()?;
            sql.push_str(&format!("\nORDER BY {}", keys.join(", ")));
        }
        if let Some(limit) = limit {
            sql.push_str(&format!("\nLIMIT {}", limit));
        }
        Ok(sql)
    }

    fn project(&mut self, pe: &ProjectExpr) -> Result<String, EmitError> {
        Ok(format!("{} AS \"{}\"", self.expr(&pe.expr)?, pe.alias))
    }

    // -----------------------------------------------------------------------
    // Expressions
    // -----------------------------------------------------------------------

    fn expr(&mut self, expr: &Expr) -> Result<String, EmitError> {
        match expr {
            Expr::Column(col) => Ok(emit_column(col)),
            Expr::Literal(lit) => Ok(self.literal(lit)),
            Expr::Compare { left, op, right } => {
                let l = self.expr(left)?;
                let r = self.expr(right)?;
                Ok(format!("{} {} {}", l, op.as_sql(), r))
            }
            Expr::InList { expr, list, negated } => {
                if list.is_empty() {
                    return Err(EmitError::InvalidSpec("IN with an empty list".to_string()));
                }
                let needle = self.expr(expr)?;
                let items = self.expr_list(list)?;
                let keyword = if *negated { "NOT IN" } else { "IN" };
                Ok(format!("{} {} ({})", needle, keyword, items.join(", ")))
            }
            Expr::Arithmetic { op: ArithmeticOp::Divide, left, right } => {
                let l = self.expr(left)?;
                let r = self.expr(right)?;
                Ok(format!("(CAST({} AS REAL) / CAST({} AS REAL))", l, r))
            }
            Expr::Arithmetic { op, left, right } => {
                let l = self.expr(left)?;
                let r = self.expr(right)?;
                Ok(format!("({} {} {})", l, op.as_sql(), r))
            }
            Expr::NotNull(inner) => Ok(format!("{} IS NOT NULL", self.expr(inner)?)),
            Expr::Coalesce(args) => Ok(format!("COALESCE({})", self.expr_list(args)?.join(", "))),
            Expr::Case { branches, otherwise } => {
                let mut sql = String::from("CASE");
                for (cond, then) in branches {
                    let cond = self.expr(cond)?;
                    let then = self.expr(then)?;
                    sql.push_str(&format!(" WHEN {} THEN {}", cond, then));
                }
                if let Some(other) = otherwise {
                    sql.push_str(&format!(" ELSE {}", self.expr(other)?));
                }
                sql.push_str(" END");
                Ok(sql)
            }
            Expr::Aggregate { func, expr } => self.aggregate(*func, expr),
            Expr::YearMonth(inner) => Ok(format!("strftime('%Y-%m', {})", self.expr(inner)?)),
        }
    }

    fn expr_list(&mut self, exprs: &[Expr]) -> Result<Vec<String>, EmitError> {
        exprs.iter().map(|e| self.expr(e)).collect()
    }

    fn aggregate(&mut self, func: Aggregation, expr: &Expr) -> Result<String, EmitError> {
        let inner = self.expr(expr)?;
        Ok(match func {
            Aggregation::Sum => format!("SUM({})", inner),
            Aggregation::Avg => format!("AVG({})", inner),
            Aggregation::Count => format!("COUNT({})", inner),
            Aggregation::CountDistinct => format!("COUNT(DISTINCT {})", inner),
        })
    }

    /// Integers are written inline; text and dates are bound
    fn literal(&mut self, lit: &Literal) -> String {
        match lit {
            Literal::Int(i) => i.to_string(),
            Literal::String(_) | Literal::Date(_) => {
                self.params.push(lit.clone());
                "?".to_string()
            }
        }
    }
}

fn from_clause(spec: &AggregationSpec) -> String {
    let mut sql = format!("FROM {} AS {}", spec.base.table(), spec.base.alias());
    for join in &spec.joins {
        sql.push_str(&format!("\n{}{}", pad(1), emit_join(join)));
    }
    sql
}

fn emit_join(join: &Join) -> String {
    format!(
        "INNER JOIN {table} AS {alias} ON {lk} = {rk}",
        table = join.relation.table(),
        alias = join.relation.alias(),
        lk = emit_column(&join.left_key),
        rk = emit_column(&join.right_key),
    )
}

fn emit_column(col: &Column) -> String {
    col.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{Comparison, Relation};

    fn revenue_by_client() -> AggregationSpec {
        let c = Relation::Clients;
        let e = Relation::Enrollments;
        AggregationSpec {
            base: c,
            joins: vec![Join {
                relation: e,
                left_key: e.column("client_id"),
                right_key: c.column("client_id"),
            }],
            grouping: Grouping::Keys {
                outputs: vec![ProjectExpr::new(c.expr("name"), "client_name")],
                group_by: vec![c.expr("client_id"), c.expr("name")],
            },
            measures: vec![ProjectExpr::new(
                Expr::aggregate(Aggregation::Sum, e.expr("revenue")),
                "total_revenue",
            )],
            predicates: vec![
                Expr::not_null(c.expr("name")),
                Expr::eq(c.expr("industry"), Expr::string("Healthcare")),
            ],
            order_by: vec![SortKey::descending(Expr::Column(Column::output("total_revenue")))],
            limit: Some(5),
        }
    }

    // -- statements -----------------------------------------------------------

    #[test]
    fn test_sql_grouped_statement() {
        let stmt = emit_sql(&revenue_by_client()).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT c.name AS \"client_name\", SUM(e.revenue) AS \"total_revenue\"\n\
             FROM clients AS c\n  \
             INNER JOIN enrollments AS e ON e.client_id = c.client_id\n\
             WHERE c.name IS NOT NULL\n  \
             AND c.industry = ?\n\
             GROUP BY c.client_id, c.name\n\
             ORDER BY total_revenue DESC\n\
             LIMIT 5"
        );
        assert_eq!(stmt.params, vec![Literal::String("Healthcare".into())]);
    }

    #[test]
    fn test_sql_without_predicates_or_limit() {
        let mut spec = revenue_by_client();
        spec.predicates.clear();
        spec.limit = None;
        let stmt = emit_sql(&spec).unwrap();
        assert!(!stmt.sql.contains("WHERE"));
        assert!(!stmt.sql.contains("LIMIT"));
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_sql_unpivot() {
        let e = Relation::Enrollments;
        let spec = AggregationSpec {
            base: e,
            joins: vec![],
            grouping: Grouping::Unpivot {
                label_alias: "cost_type".into(),
                value_alias: "total_cost".into(),
                aggregation: Aggregation::Sum,
                components: vec![
                    ("Trainer Cost".into(), e.expr("trainer_cost")),
                    ("Venue Cost".into(), e.expr("venue_cost")),
                ],
            },
            measures: vec![],
            predicates: vec![Expr::eq(e.expr("delivery_mode"), Expr::string("Virtual"))],
            order_by: vec![SortKey::descending(Expr::Column(Column::output("total_cost")))],
            limit: None,
        };
        let stmt = emit_sql(&spec).unwrap();
        assert_eq!(stmt.sql.matches("UNION ALL").count(), 1);
        assert!(stmt.sql.starts_with("SELECT ? AS \"cost_type\", SUM(e.trainer_cost) AS \"total_cost\""));
        assert!(stmt.sql.ends_with("ORDER BY total_cost DESC"));
        // label and filter value per branch, in placeholder order
        assert_eq!(
            stmt.params,
            vec![
                Literal::String("Trainer Cost".into()),
                Literal::String("Virtual".into()),
                Literal::String("Venue Cost".into()),
                Literal::String("Virtual".into()),
            ]
        );
    }

    #[test]
    fn test_sql_unpivot_requires_components() {
        let mut spec = revenue_by_client();
        spec.grouping = Grouping::Unpivot {
            label_alias: "cost_type".into(),
            value_alias: "total_cost".into(),
            aggregation: Aggregation::Sum,
            components: vec![],
        };
        assert!(emit_sql(&spec).is_err());
    }

    // -- expressions ----------------------------------------------------------

    #[test]
    fn test_sql_case_expr() {
        let mut writer = SqlWriter::default();
        let expr = Expr::Case {
            branches: vec![(
                Expr::compare(Expr::column("t", "x"), Comparison::Gt, Expr::int(0)),
                Expr::string("positive"),
            )],
            otherwise: Some(Box::new(Expr::string("non-positive"))),
        };
        let sql = writer.expr(&expr).unwrap();
        assert_eq!(sql, "CASE WHEN t.x > 0 THEN ? ELSE ? END");
        assert_eq!(writer.params.len(), 2);
    }

    #[test]
    fn test_sql_not_in_expr() {
        let mut writer = SqlWriter::default();
        let expr = Expr::not_in(
            Expr::column("o", "stage"),
            vec![Expr::string("Closed Won"), Expr::string("Closed Lost")],
        );
        assert_eq!(writer.expr(&expr).unwrap(), "o.stage NOT IN (?, ?)");
    }

    #[test]
    fn test_sql_empty_in_is_rejected() {
        let mut writer = SqlWriter::default();
        let expr = Expr::is_in(Expr::column("o", "stage"), vec![]);
        assert!(writer.expr(&expr).is_err());
    }

    #[test]
    fn test_sql_divide_casts_to_real() {
        let mut writer = SqlWriter::default();
        let expr = Expr::arithmetic(ArithmeticOp::Divide, Expr::column("t", "a"), Expr::column("t", "b"));
        assert_eq!(writer.expr(&expr).unwrap(), "(CAST(t.a AS REAL) / CAST(t.b AS REAL))");

        let expr = Expr::arithmetic(ArithmeticOp::Subtract, Expr::column("t", "a"), Expr::int(1));
        assert_eq!(writer.expr(&expr).unwrap(), "(t.a - 1)");
    }

    #[test]
    fn test_sql_year_month_and_count_distinct() {
        let mut writer = SqlWriter::default();
        let month = Expr::YearMonth(Box::new(Expr::column("e", "start_date")));
        assert_eq!(writer.expr(&month).unwrap(), "strftime('%Y-%m', e.start_date)");

        let count = Expr::aggregate(Aggregation::CountDistinct, Expr::column("c", "client_id"));
        assert_eq!(writer.expr(&count).unwrap(), "COUNT(DISTINCT c.client_id)");
    }

    #[test]
    fn test_sql_integers_inline_dates_bound() {
        let mut writer = SqlWriter::default();
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let expr = Expr::compare(
            Expr::column("e", "start_date"),
            Comparison::GtEq,
            Expr::Literal(Literal::Date(date)),
        );
        assert_eq!(writer.expr(&expr).unwrap(), "e.start_date >= ?");
        assert_eq!(writer.literal(&Literal::Int(100)), "100");
        assert_eq!(writer.params, vec![Literal::Date(date)]);
    }
}
