//! Grouping and aggregation entries.
//!
//! When grouping is active the composer replaces the plain selection
//! with the grouping columns followed by the aggregates, in entry order.
//! Each aggregate gets a deterministic lowercase output alias derived
//! from its function and target (`count_all`, `sum_t2_amount`,
//! `count_distinct_t1_customer_id`) so sorts can refer to it.

use serde::{Deserialize, Serialize};

/// Aggregate function of a grouping entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateFn {
    Count,
    Sum,
    Avg,
    Max,
    Min,
    /// Renders as `COUNT(DISTINCT target)`.
    CountDistinct,
}

impl AggregateFn {
    /// SQL function keyword.
    pub fn keyword(&self) -> &'static str {
        match self {
            AggregateFn::Count | AggregateFn::CountDistinct => "COUNT",
            AggregateFn::Sum => "SUM",
            AggregateFn::Avg => "AVG",
            AggregateFn::Max => "MAX",
            AggregateFn::Min => "MIN",
        }
    }

    /// True for the DISTINCT form.
    pub fn distinct(&self) -> bool {
        matches!(self, AggregateFn::CountDistinct)
    }

    fn alias_prefix(&self) -> &'static str {
        match self {
            AggregateFn::Count => "count",
            AggregateFn::Sum => "sum",
            AggregateFn::Avg => "avg",
            AggregateFn::Max => "max",
            AggregateFn::Min => "min",
            AggregateFn::CountDistinct => "count_distinct",
        }
    }

    /// Output alias for this function applied to `target`.
    ///
    /// Dots become underscores, `*` becomes `all`, and the result is
    /// lowercased: `COUNT(*)` -> `count_all`, `SUM(t2.AMOUNT)` ->
    /// `sum_t2_amount`.
    pub fn output_alias(&self, target: &str) -> String {
        let target = if target == "*" {
            "all".to_string()
        } else {
            target.replace('.', "_").to_lowercase()
        };
        format!("{}_{}", self.alias_prefix(), target)
    }
}

/// One entry of the grouping specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupingEntry {
    /// A grouped column, optionally alias-qualified.
    Column { column: String },
    /// An aggregate over a column reference, or `*` for COUNT.
    Aggregate {
        function: AggregateFn,
        target: String,
    },
}

impl GroupingEntry {
    pub fn column(column: impl Into<String>) -> Self {
        GroupingEntry::Column {
            column: column.into(),
        }
    }

    pub fn aggregate(function: AggregateFn, target: impl Into<String>) -> Self {
        GroupingEntry::Aggregate {
            function,
            target: target.into(),
        }
    }
}

/// Ordered grouping specification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingSpec {
    entries: Vec<GroupingEntry>,
}

impl GroupingSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once any entry is present; the composer then replaces the
    /// plain selection.
    pub fn is_active(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn push(&mut self, entry: GroupingEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[GroupingEntry] {
        &self.entries
    }

    /// The grouped column references, in entry order.
    pub fn grouping_columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|e| match e {
            GroupingEntry::Column { column } => Some(column.as_str()),
            GroupingEntry::Aggregate { .. } => None,
        })
    }

    /// The output aliases of the aggregate entries, in entry order.
    pub fn aggregate_aliases(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                GroupingEntry::Aggregate { function, target } => {
                    Some(function.output_alias(target))
                }
                GroupingEntry::Column { .. } => None,
            })
            .collect()
    }
}
