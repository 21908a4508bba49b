//! Small JQL builder.
//!
//! Values coming from the conversation (project keys, emails, status names)
//! are always emitted as quoted string literals with `"` and `\` escaped.

use std::fmt;

/// Quote a value as a JQL string literal
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Sort direction for an `ORDER BY` clause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

enum_display!(Order, { Asc => "ASC", Desc => "DESC" });

/// A conjunction of clauses with an optional ordering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Jql {
    clauses: Vec<String>,
    order_by: Option<(String, Order)>,
}

impl Jql {
    pub fn new() -> Self {
        Self::default()
    }

    /// `field = "value"`
    pub fn equals(mut self, field: &str, value: &str) -> Self {
        self.clauses.push(format!("{field} = {}", quote(value)));
        self
    }

    /// `field = 42` for numeric ids
    pub fn equals_id(mut self, field: &str, id: u64) -> Self {
        self.clauses.push(format!("{field} = {id}"));
        self
    }

    /// `field != value` with an unquoted keyword value (e.g. `Done`)
    pub fn not_equals_keyword(mut self, field: &str, keyword: &str) -> Self {
        self.clauses.push(format!("{field} != {keyword}"));
        self
    }

    /// `field is EMPTY`
    pub fn empty(mut self, field: &str) -> Self {
        self.clauses.push(format!("{field} is EMPTY"));
        self
    }

    pub fn order_by(mut self, field: &str, order: Order) -> Self {
        self.order_by = Some((field.to_string(), order));
        self
    }
}

impl fmt::Display for Jql {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clauses.join(" AND "))?;
        if let Some((field, order)) = &self.order_by {
            if !self.clauses.is_empty() {
                write!(f, " ")?;
            }
            write!(f, "ORDER BY {field} {order}")?;
        }
        Ok(())
    }
}
