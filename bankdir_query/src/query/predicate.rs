//! Structured predicates over the institution snapshot table.
//!
//! An [`Expr`] tree compiles to a SQL boolean expression with numbered
//! `?N` placeholders; values never appear in the SQL text.

use serde::Serialize;

use crate::types::AssetRange;

/// Filterable columns. Each maps to a fixed, qualified SQL column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    PubState,
    PubYear,
    PubSeason,
    TypeCode,
    County,
    /// Membership org code; requires [`super::Join::Membership`].
    MembershipCode,
    TotalAssets,
    Name,
    City,
}

impl Column {
    pub fn sql(&self) -> &'static str {
        match self {
            Column::PubState => "m.pub_state",
            Column::PubYear => "m.pub_year",
            Column::PubSeason => "m.pub_season",
            Column::TypeCode => "t.code",
            Column::County => "m.county",
            Column::MembershipCode => "mo_filter.code",
            Column::TotalAssets => "m.total_assets",
            Column::Name => "m.name",
            Column::City => "m.city",
        }
    }
}

/// A bound parameter value.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Integer(i64),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(i64::from(v))
    }
}

/// Boolean expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Always,
    Never,
    Eq(Column, Value),
    NotEq(Column, Value),
    /// Matches any of the values. An empty set matches nothing.
    InSet(Column, Vec<Value>),
    /// Half-open integer range `[min, max)`; `max = None` is unbounded.
    Range {
        column: Column,
        min: i64,
        max: Option<i64>,
    },
    /// Case-insensitive substring match. Compiles to the store's `fold()`
    /// SQL function, which lowercases full Unicode text.
    Contains(Column, String),
    IsNotNull(Column),
    And(Vec<Expr>),
    Or(Vec<Expr>),
}

impl Expr {
    pub fn eq(column: Column, value: impl Into<Value>) -> Self {
        Expr::Eq(column, value.into())
    }

    pub fn in_set<V: Into<Value>>(column: Column, values: impl IntoIterator<Item = V>) -> Self {
        Expr::InSet(column, values.into_iter().map(Into::into).collect())
    }

    pub fn asset_range(range: AssetRange) -> Self {
        let (min, max) = range.bounds();
        Expr::Range {
            column: Column::TotalAssets,
            min,
            max,
        }
    }

    /// Conjunction that flattens nested `And`s and drops `Always`.
    pub fn and(self, other: Expr) -> Expr {
        let mut parts = Vec::new();
        for e in [self, other] {
            match e {
                Expr::Always => {}
                Expr::And(inner) => parts.extend(inner),
                e => parts.push(e),
            }
        }
        match parts.len() {
            0 => Expr::Always,
            1 => parts.remove(0),
            _ => Expr::And(parts),
        }
    }

    /// Compile to SQL, appending bound values to `params`. Placeholder
    /// numbers continue from whatever `params` already holds.
    pub fn write_sql(&self, out: &mut String, params: &mut Vec<Value>) {
        match self {
            Expr::Always => out.push_str("1=1"),
            Expr::Never => out.push_str("1=0"),
            Expr::Eq(col, v) => {
                let ph = push_param(params, v.clone());
                out.push_str(&format!("{} = {}", col.sql(), ph));
            }
            Expr::NotEq(col, v) => {
                let ph = push_param(params, v.clone());
                out.push_str(&format!("{} != {}", col.sql(), ph));
            }
            Expr::InSet(_, values) if values.is_empty() => out.push_str("1=0"),
            Expr::InSet(col, values) => {
                let placeholders: Vec<String> = values
                    .iter()
                    .map(|v| push_param(params, v.clone()))
                    .collect();
                out.push_str(&format!("{} IN ({})", col.sql(), placeholders.join(",")));
            }
            Expr::Range { column, min, max } => {
                let lo = push_param(params, Value::Integer(*min));
                match max {
                    Some(max) => {
                        let hi = push_param(params, Value::Integer(*max));
                        out.push_str(&format!(
                            "({col} >= {lo} AND {col} < {hi})",
                            col = column.sql()
                        ));
                    }
                    None => out.push_str(&format!("{} >= {}", column.sql(), lo)),
                }
            }
            Expr::Contains(col, needle) => {
                let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
                let ph = push_param(params, Value::Text(pattern));
                out.push_str(&format!("fold({}) LIKE {} ESCAPE '\\'", col.sql(), ph));
            }
            Expr::IsNotNull(col) => out.push_str(&format!("{} IS NOT NULL", col.sql())),
            Expr::And(parts) => write_joined(parts, " AND ", "1=1", out, params),
            Expr::Or(parts) => write_joined(parts, " OR ", "1=0", out, params),
        }
    }
}

fn write_joined(
    parts: &[Expr],
    sep: &str,
    empty: &str,
    out: &mut String,
    params: &mut Vec<Value>,
) {
    match parts {
        [] => out.push_str(empty),
        [only] => only.write_sql(out, params),
        _ => {
            out.push('(');
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    out.push_str(sep);
                }
                part.write_sql(out, params);
            }
            out.push(')');
        }
    }
}

fn push_param(params: &mut Vec<Value>, value: Value) -> String {
    params.push(value);
    format!("?{}", params.len())
}

/// Escape LIKE wildcards so user text matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
