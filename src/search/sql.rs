//! SQL fragments with positional bound parameters.
//!
//! Every predicate the search layer produces is a `SqlFragment`: clause text
//! using anonymous `?` placeholders plus the values to bind, in order. User
//! input only ever travels through `params`.

use rusqlite::types::{ToSql, ToSqlOutput};

/// A SQL clause and the values bound to its placeholders.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Integer(i64),
    Real(f64),
}

impl SqlFragment {
    pub fn new(sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// AND a list of fragments together. Returns `None` for an empty list so
    /// callers can omit the WHERE clause entirely.
    pub fn and_all<'a, I>(fragments: I) -> Option<SqlFragment>
    where
        I: IntoIterator<Item = &'a SqlFragment>,
    {
        let mut clauses = Vec::new();
        let mut params = Vec::new();
        for fragment in fragments {
            clauses.push(format!("({})", fragment.sql));
            params.extend(fragment.params.iter().cloned());
        }
        if clauses.is_empty() {
            None
        } else {
            Some(SqlFragment::new(clauses.join(" AND "), params))
        }
    }
}

impl SqlParam {
    pub fn text(s: impl Into<String>) -> Self {
        SqlParam::Text(s.into())
    }
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            SqlParam::Text(s) => s.to_sql(),
            SqlParam::Integer(i) => i.to_sql(),
            SqlParam::Real(f) => f.to_sql(),
        }
    }
}
