//! Statement building: conditions, grouping, join resolution, and the
//! composer that turns them into SQL.

pub mod compose;
pub mod condition;
pub mod grouping;
pub mod join;

pub use compose::{GeneratedStatement, SearchQuery, SelectItem, Source};
pub use condition::{
    Comparison, Connector, DateRange, FilterCondition, SortCondition, SortDir, SortKind,
};
pub use grouping::{AggregateFn, GroupingEntry, GroupingSpec};
pub use join::{resolve, JoinLink, JoinSpec, JoinTable, JoinType, ResolvedColumn, Resolution};
