//! Filter, date-range, and sort conditions.
//!
//! Conditions are ordered records; the UI appends and removes them and
//! the composer renders them in sequence. Rendering rules:
//!
//! - the first rendered condition carries no connector;
//! - `IS NULL` / `IS NOT NULL` take no value;
//! - `LIKE` values without an explicit `%` are wrapped `%value%`;
//! - `IN` values are emitted verbatim inside parentheses;
//! - every other value is a single-quoted, escaped literal.

use serde::{Deserialize, Serialize};

use crate::sql::{Token, TokenStream};

/// Connector joining a condition to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    fn token(&self) -> Token {
        match self {
            Connector::And => Token::And,
            Connector::Or => Token::Or,
        }
    }
}

/// Comparison operator of a filter condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    Like,
    /// The value is a caller-supplied list body and is emitted verbatim
    /// inside parentheses; numeric lists like `1, 2, 3` stay unquoted.
    In,
    IsNull,
    IsNotNull,
}

impl Comparison {
    /// True if the operator takes a right-hand value.
    pub fn needs_value(&self) -> bool {
        !matches!(self, Comparison::IsNull | Comparison::IsNotNull)
    }
}

/// One row of the filter table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// How this condition joins the previous one. Ignored for the first
    /// rendered condition.
    pub connector: Connector,
    /// Column reference, optionally alias-qualified (`t1.CITY`).
    pub column: String,
    pub operator: Comparison,
    /// Right-hand value as entered. Empty for null checks.
    pub value: String,
}

impl FilterCondition {
    pub fn new(
        connector: Connector,
        column: impl Into<String>,
        operator: Comparison,
        value: impl Into<String>,
    ) -> Self {
        Self {
            connector,
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// Render this condition, with `connector` overriding the stored one
    /// (`None` for the first rendered condition).
    pub(crate) fn to_tokens(&self, out: &mut TokenStream, connector: Option<Connector>) {
        if let Some(c) = connector {
            out.push(c.token());
            out.space();
        }
        out.column_ref(&self.column);
        match self.operator {
            Comparison::IsNull => {
                out.space().push(Token::IsNull);
            }
            Comparison::IsNotNull => {
                out.space().push(Token::IsNotNull);
            }
            Comparison::Like => {
                let value = if self.value.contains('%') {
                    self.value.clone()
                } else {
                    format!("%{}%", self.value)
                };
                out.space().push(Token::Like);
                out.space().push(Token::LitString(value));
            }
            Comparison::In => {
                out.space().push(Token::In);
                out.space().lparen();
                out.push(Token::Raw(self.value.clone()));
                out.rparen();
            }
            op => {
                let token = match op {
                    Comparison::Eq => Token::Eq,
                    Comparison::Ne => Token::Ne,
                    Comparison::Lt => Token::Lt,
                    Comparison::Gt => Token::Gt,
                    Comparison::Lte => Token::Lte,
                    Comparison::Gte => Token::Gte,
                    _ => unreachable!("value operators handled above"),
                };
                out.space().push(token);
                out.space().push(Token::LitString(self.value.clone()));
            }
        }
    }
}

/// Mandatory date window. Always rendered first in WHERE; the remaining
/// conditions are joined to it with AND.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Column reference, optionally alias-qualified.
    pub column: String,
    pub start: String,
    pub end: String,
}

impl DateRange {
    pub fn new(
        column: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            start: start.into(),
            end: end.into(),
        }
    }

    pub(crate) fn to_tokens(&self, out: &mut TokenStream) {
        out.column_ref(&self.column);
        out.space().push(Token::Between);
        out.space().push(Token::LitString(self.start.clone()));
        out.space().push(Token::And);
        out.space().push(Token::LitString(self.end.clone()));
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDir {
    Asc,
    Desc,
}

/// What a sort entry refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKind {
    /// A selected column, optionally alias-qualified.
    PlainColumn,
    /// The output alias of an aggregate entry.
    AggregateAlias,
}

/// One ORDER BY entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCondition {
    pub column: String,
    pub direction: SortDir,
    pub kind: SortKind,
}

impl SortCondition {
    pub fn asc(column: impl Into<String>, kind: SortKind) -> Self {
        Self {
            column: column.into(),
            direction: SortDir::Asc,
            kind,
        }
    }

    pub fn desc(column: impl Into<String>, kind: SortKind) -> Self {
        Self {
            column: column.into(),
            direction: SortDir::Desc,
            kind,
        }
    }
}
