//! Statement composer.
//!
//! [`SearchQuery`] collects the structured inputs (source, selection,
//! conditions, grouping, sorts) through a fluent builder and
//! [`SearchQuery::compose`] renders them into a [`GeneratedStatement`].
//! The statement is rebuilt from scratch on every call; nothing mutates
//! previously generated text.
//!
//! Clause order is fixed: SELECT, FROM, JOIN(s), WHERE, GROUP BY,
//! ORDER BY, one clause per line.

use std::fmt;

use crate::builder::condition::{
    Connector, DateRange, FilterCondition, SortCondition, SortDir, SortKind,
};
use crate::builder::grouping::{GroupingEntry, GroupingSpec};
use crate::builder::join::{JoinSpec, JoinType, Resolution};
use crate::catalog::QualifiedRelation;
use crate::error::Error;
use crate::sql::{Token, TokenStream};

/// Statement source: a single relation or a join chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Single(QualifiedRelation),
    Joined(JoinSpec),
}

/// One SELECT list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectItem {
    /// Column reference, optionally alias-qualified.
    Column(String),
    /// Column reference with an output alias (collision rename).
    Aliased { column: String, alias: String },
}

impl SelectItem {
    /// Header shown for this item in the result grid.
    pub fn label(&self) -> &str {
        match self {
            SelectItem::Column(column) => column,
            SelectItem::Aliased { alias, .. } => alias,
        }
    }
}

/// A composed statement together with its output headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedStatement {
    /// The SQL text.
    pub sql: String,
    /// Result grid headers, in SELECT order (`["*"]` for a bare star).
    pub columns: Vec<String>,
}

impl fmt::Display for GeneratedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)
    }
}

/// Fluent builder for search statements.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    source: Source,
    selection: Vec<SelectItem>,
    date_range: Option<DateRange>,
    filters: Vec<FilterCondition>,
    grouping: GroupingSpec,
    sorts: Vec<SortCondition>,
}

impl SearchQuery {
    /// Start a query over a single relation.
    pub fn from_table(relation: QualifiedRelation) -> Self {
        Self {
            source: Source::Single(relation),
            selection: Vec::new(),
            date_range: None,
            filters: Vec::new(),
            grouping: GroupingSpec::new(),
            sorts: Vec::new(),
        }
    }

    /// Start a query over a join chain.
    pub fn from_join(spec: JoinSpec) -> Self {
        Self {
            source: Source::Joined(spec),
            selection: Vec::new(),
            date_range: None,
            filters: Vec::new(),
            grouping: GroupingSpec::new(),
            sorts: Vec::new(),
        }
    }

    /// Select a single column.
    #[must_use]
    pub fn select(mut self, column: impl Into<String>) -> Self {
        self.selection.push(SelectItem::Column(column.into()));
        self
    }

    /// Select a column under an output alias.
    #[must_use]
    pub fn select_as(mut self, column: impl Into<String>, alias: impl Into<String>) -> Self {
        self.selection.push(SelectItem::Aliased {
            column: column.into(),
            alias: alias.into(),
        });
        self
    }

    /// Select the resolver's output columns, in resolver order.
    #[must_use]
    pub fn select_resolved(mut self, resolution: &Resolution) -> Self {
        for col in &resolution.columns {
            match &col.rename {
                Some(alias) => {
                    self.selection.push(SelectItem::Aliased {
                        column: col.column_ref(),
                        alias: alias.clone(),
                    });
                }
                None => self.selection.push(SelectItem::Column(col.column_ref())),
            }
        }
        self
    }

    /// Set the mandatory date window.
    #[must_use]
    pub fn date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Append a filter condition.
    #[must_use]
    pub fn filter(mut self, condition: FilterCondition) -> Self {
        self.filters.push(condition);
        self
    }

    /// Append a grouping entry.
    #[must_use]
    pub fn group(mut self, entry: GroupingEntry) -> Self {
        self.grouping.push(entry);
        self
    }

    /// Append a sort entry.
    #[must_use]
    pub fn sort(mut self, sort: SortCondition) -> Self {
        self.sorts.push(sort);
        self
    }

    /// Render the statement.
    pub fn compose(&self) -> Result<GeneratedStatement, Error> {
        if let Source::Joined(spec) = &self.source {
            spec.validate()?;
        }
        self.validate_sorts()?;

        let mut ts = TokenStream::new();
        self.select_tokens(&mut ts);
        self.from_tokens(&mut ts);
        self.where_tokens(&mut ts);
        self.group_by_tokens(&mut ts);
        self.order_by_tokens(&mut ts);

        Ok(GeneratedStatement {
            sql: ts.serialize(),
            columns: self.output_columns(),
        })
    }

    fn validate_sorts(&self) -> Result<(), Error> {
        let grouping_active = self.grouping.is_active();
        let aliases = self.grouping.aggregate_aliases();
        for sort in &self.sorts {
            match sort.kind {
                SortKind::PlainColumn if grouping_active => {
                    if !self.grouping.grouping_columns().any(|c| c == sort.column) {
                        return Err(Error::Composition(format!(
                            "cannot sort by {}: not a grouping column",
                            sort.column
                        )));
                    }
                }
                SortKind::AggregateAlias => {
                    if !aliases.iter().any(|a| a == &sort.column) {
                        return Err(Error::Composition(format!(
                            "cannot sort by {}: no such aggregate",
                            sort.column
                        )));
                    }
                }
                SortKind::PlainColumn => {}
            }
        }
        Ok(())
    }

    fn select_tokens(&self, ts: &mut TokenStream) {
        ts.push(Token::Select).space();

        if self.grouping.is_active() {
            // Grouping replaces the plain selection entirely.
            for (i, entry) in self.grouping.entries().iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                match entry {
                    GroupingEntry::Column { column } => {
                        ts.column_ref(column);
                    }
                    GroupingEntry::Aggregate { function, target } => {
                        ts.push(Token::FunctionName(function.keyword().to_string()));
                        ts.lparen();
                        if function.distinct() {
                            ts.push(Token::Distinct).space();
                        }
                        if target == "*" {
                            ts.push(Token::Star);
                        } else {
                            ts.column_ref(target);
                        }
                        ts.rparen();
                        ts.space().push(Token::As).space();
                        ts.push(Token::Ident(function.output_alias(target)));
                    }
                }
            }
            return;
        }

        if self.selection.is_empty() {
            ts.push(Token::Star);
            return;
        }
        for (i, item) in self.selection.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            match item {
                SelectItem::Column(column) => {
                    ts.column_ref(column);
                }
                SelectItem::Aliased { column, alias } => {
                    ts.column_ref(column);
                    ts.space().push(Token::As).space();
                    ts.push(Token::Ident(alias.clone()));
                }
            }
        }
    }

    fn relation_tokens(relation: &QualifiedRelation, ts: &mut TokenStream) {
        ts.push(Token::Ident(relation.database.clone()));
        ts.push(Token::Dot);
        ts.push(Token::Ident(relation.schema.clone()));
        ts.push(Token::Dot);
        ts.push(Token::Ident(relation.name.clone()));
    }

    fn join_type_tokens(join_type: JoinType, ts: &mut TokenStream) {
        match join_type {
            JoinType::Inner => {
                ts.push(Token::Inner);
            }
            JoinType::Left => {
                ts.push(Token::Left);
            }
            JoinType::Right => {
                ts.push(Token::Right);
            }
            JoinType::FullOuter => {
                ts.push(Token::Full).space().push(Token::Outer);
            }
        }
        ts.space().push(Token::Join);
    }

    fn from_tokens(&self, ts: &mut TokenStream) {
        ts.newline().push(Token::From).space();
        match &self.source {
            Source::Single(relation) => {
                Self::relation_tokens(relation, ts);
            }
            Source::Joined(spec) => {
                Self::relation_tokens(&spec.tables[0].relation, ts);
                ts.space().push(Token::Alias(JoinSpec::alias(0)));

                for (i, link) in spec.links.iter().enumerate() {
                    // Link i joins table i (left side) to table i+1.
                    let left = Token::Alias(JoinSpec::alias(i));
                    let right = Token::Alias(JoinSpec::alias(i + 1));

                    ts.newline();
                    Self::join_type_tokens(link.join_type, ts);
                    ts.space();
                    Self::relation_tokens(&spec.tables[i + 1].relation, ts);
                    ts.space().push(right.clone());
                    ts.space().push(Token::On).space();
                    ts.push(left);
                    ts.push(Token::Dot);
                    ts.push(Token::Ident(link.left_key.clone()));
                    ts.space().push(Token::Eq).space();
                    ts.push(right);
                    ts.push(Token::Dot);
                    ts.push(Token::Ident(link.right_key.clone()));
                }
            }
        }
    }

    fn where_tokens(&self, ts: &mut TokenStream) {
        if self.date_range.is_none() && self.filters.is_empty() {
            return;
        }
        ts.newline().push(Token::Where).space();

        let mut rendered_any = false;
        if let Some(range) = &self.date_range {
            range.to_tokens(ts);
            rendered_any = true;
        }
        for (i, condition) in self.filters.iter().enumerate() {
            // The first rendered condition carries no connector; the
            // first ordinary condition after the date window always
            // joins with AND, regardless of its stored connector.
            let connector = if !rendered_any {
                None
            } else if i == 0 {
                Some(Connector::And)
            } else {
                Some(condition.connector)
            };
            if rendered_any {
                ts.space();
            }
            condition.to_tokens(ts, connector);
            rendered_any = true;
        }
    }

    fn group_by_tokens(&self, ts: &mut TokenStream) {
        let columns: Vec<&str> = self.grouping.grouping_columns().collect();
        if columns.is_empty() {
            return;
        }
        ts.newline().push(Token::GroupBy).space();
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            ts.column_ref(column);
        }
    }

    fn order_by_tokens(&self, ts: &mut TokenStream) {
        if self.sorts.is_empty() {
            return;
        }
        ts.newline().push(Token::OrderBy).space();
        for (i, sort) in self.sorts.iter().enumerate() {
            if i > 0 {
                ts.comma().space();
            }
            match sort.kind {
                SortKind::PlainColumn => {
                    ts.column_ref(&sort.column);
                }
                SortKind::AggregateAlias => {
                    ts.push(Token::Ident(sort.column.clone()));
                }
            }
            ts.space();
            match sort.direction {
                SortDir::Asc => ts.push(Token::Asc),
                SortDir::Desc => ts.push(Token::Desc),
            };
        }
    }

    fn output_columns(&self) -> Vec<String> {
        if self.grouping.is_active() {
            return self
                .grouping
                .entries()
                .iter()
                .map(|entry| match entry {
                    GroupingEntry::Column { column } => column.clone(),
                    GroupingEntry::Aggregate { function, target } => function.output_alias(target),
                })
                .collect();
        }
        if self.selection.is_empty() {
            return vec!["*".to_string()];
        }
        self.selection
            .iter()
            .map(|item| item.label().to_string())
            .collect()
    }
}
