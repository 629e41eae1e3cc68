//! SQLite executor

use std::path::Path;
use rusqlite::types::Value as SqlValue;
use rusqlite::{params_from_iter, Connection, OpenFlags};
use serde_json::Value;
use tracing::debug;
use crate::emitter::emit_sql;
use crate::spec::{AggregationSpec, Literal};
use super::error::ExecutionError;
use super::{QueryExecutor, Row};

/// Executes specs on a SQLite connection holding the analytics tables
pub struct SqliteExecutor {
    conn: Connection,
}

impl SqliteExecutor {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open an existing database file read-only
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ExecutionError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(Self::new(conn))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl QueryExecutor for SqliteExecutor {
    fn execute(&self, spec: &AggregationSpec) -> Result<Vec<Row>, ExecutionError> {
        let stmt = emit_sql(spec)?;
        let params: Vec<SqlValue> = stmt.params.iter().map(sql_value).collect();

        let mut prepared = self.conn.prepare(&stmt.sql)?;
        let columns: Vec<String> = prepared.column_names().iter().map(ToString::to_string).collect();

        let mut rows = prepared.query(params_from_iter(params.iter()))?;
        let mut out = Vec::new();
        while let Some(row) = rows.next()? {
            let mut record = Row::new();
            for (index, name) in columns.iter().enumerate() {
                let value = row.get::<usize, SqlValue>(index)?;
                record.insert(name.clone(), json_value(value));
            }
            out.push(record);
        }

        debug!(rows = out.len(), "query executed");
        if out.is_empty() {
            return Err(ExecutionError::EmptyResult);
        }
        Ok(out)
    }

    fn describe(&self, spec: &AggregationSpec) -> Option<String> {
        emit_sql(spec).ok().map(|stmt| stmt.sql)
    }
}

fn sql_value(lit: &Literal) -> SqlValue {
    match lit {
        Literal::Int(i) => SqlValue::Integer(*i),
        Literal::String(s) => SqlValue::Text(s.clone()),
        Literal::Date(d) => SqlValue::Text(d.format("%Y-%m-%d").to_string()),
    }
}

fn json_value(value: SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Integer(i) => Value::from(i),
        SqlValue::Real(f) => serde_json::Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        SqlValue::Text(s) => Value::String(s),
        SqlValue::Blob(bytes) => Value::String(format!("<{} bytes>", bytes.len())),
    }
}
