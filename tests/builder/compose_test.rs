//! End-to-end statement composition.

use floe::prelude::*;

fn customers() -> JoinTable {
    JoinTable::new(
        QualifiedRelation::new("BANK_DB", "BANK_SCHEMA", "CUSTOMERS"),
        vec![
            ColumnDescriptor::new("ID", "NUMBER(38,0)"),
            ColumnDescriptor::new("NAME", "VARCHAR"),
            ColumnDescriptor::new("CITY", "VARCHAR"),
            ColumnDescriptor::new("STATUS", "VARCHAR"),
        ],
    )
}

fn orders() -> JoinTable {
    JoinTable::new(
        QualifiedRelation::new("BANK_DB", "BANK_SCHEMA", "ORDERS"),
        vec![
            ColumnDescriptor::new("CUSTOMER_ID", "NUMBER(38,0)"),
            ColumnDescriptor::new("AMOUNT", "NUMBER(18,2)"),
            ColumnDescriptor::new("STATUS", "VARCHAR"),
            ColumnDescriptor::new("TRADE_DATE", "DATE"),
        ],
    )
}

fn join_spec() -> JoinSpec {
    JoinSpec::new(
        vec![customers(), orders()],
        vec![JoinLink::new(JoinType::Inner, "ID", "CUSTOMER_ID")],
    )
}

#[test]
fn two_table_search_scenario() {
    let spec = join_spec();
    let resolution = resolve(&spec).unwrap();

    let stmt = SearchQuery::from_join(spec)
        .select_resolved(&resolution)
        .date_range(DateRange::new("t2.TRADE_DATE", "2024-01-01", "2024-06-30"))
        .filter(FilterCondition::new(
            Connector::And,
            "t1.CITY",
            Comparison::Eq,
            "Tokyo",
        ))
        .sort(SortCondition::desc("t2.AMOUNT", SortKind::PlainColumn))
        .compose()
        .unwrap();

    insta::assert_snapshot!(stmt.sql, @r#"
    SELECT t1."NAME", t1."CITY", t1."STATUS" AS "t1_status", t2."AMOUNT", t2."STATUS" AS "t2_status", t2."TRADE_DATE"
    FROM "BANK_DB"."BANK_SCHEMA"."CUSTOMERS" t1
    INNER JOIN "BANK_DB"."BANK_SCHEMA"."ORDERS" t2 ON t1."ID" = t2."CUSTOMER_ID"
    WHERE t2."TRADE_DATE" BETWEEN '2024-01-01' AND '2024-06-30' AND t1."CITY" = 'Tokyo'
    ORDER BY t2."AMOUNT" DESC
    "#);

    assert_eq!(
        stmt.columns,
        vec!["t1.NAME", "t1.CITY", "t1_status", "t2.AMOUNT", "t2_status", "t2.TRADE_DATE"]
    );
}

#[test]
fn left_and_full_outer_joins_render() {
    let mut spec = join_spec();
    spec.links[0].join_type = JoinType::Left;
    let stmt = SearchQuery::from_join(spec).compose().unwrap();
    assert!(stmt.sql.contains("LEFT JOIN \"BANK_DB\".\"BANK_SCHEMA\".\"ORDERS\" t2"));

    let mut spec = join_spec();
    spec.links[0].join_type = JoinType::FullOuter;
    let stmt = SearchQuery::from_join(spec).compose().unwrap();
    assert!(stmt.sql.contains("FULL OUTER JOIN"));
}

#[test]
fn n_conditions_render_n_minus_one_connectors() {
    let query = SearchQuery::from_table(QualifiedRelation::new("DB", "S", "T"))
        .filter(FilterCondition::new(Connector::And, "A", Comparison::Eq, "1"))
        .filter(FilterCondition::new(Connector::Or, "B", Comparison::Eq, "2"))
        .filter(FilterCondition::new(Connector::And, "C", Comparison::Eq, "3"))
        .filter(FilterCondition::new(Connector::Or, "D", Comparison::Eq, "4"));
    let stmt = query.compose().unwrap();

    let where_clause = stmt.sql.split("\nWHERE ").nth(1).unwrap();
    let connectors =
        where_clause.matches(" AND ").count() + where_clause.matches(" OR ").count();
    assert_eq!(connectors, 3);
    assert!(where_clause.starts_with("\"A\" = '1' OR \"B\" = '2'"));
}

#[test]
fn grouping_over_a_join() {
    let spec = join_spec();
    let resolution = resolve(&spec).unwrap();

    let stmt = SearchQuery::from_join(spec)
        .select_resolved(&resolution)
        .group(GroupingEntry::column("t1.CITY"))
        .group(GroupingEntry::aggregate(AggregateFn::Count, "*"))
        .group(GroupingEntry::aggregate(AggregateFn::Sum, "t2.AMOUNT"))
        .sort(SortCondition::desc("sum_t2_amount", SortKind::AggregateAlias))
        .compose()
        .unwrap();

    insta::assert_snapshot!(stmt.sql, @r#"
    SELECT t1."CITY", COUNT(*) AS "count_all", SUM(t2."AMOUNT") AS "sum_t2_amount"
    FROM "BANK_DB"."BANK_SCHEMA"."CUSTOMERS" t1
    INNER JOIN "BANK_DB"."BANK_SCHEMA"."ORDERS" t2 ON t1."ID" = t2."CUSTOMER_ID"
    GROUP BY t1."CITY"
    ORDER BY "sum_t2_amount" DESC
    "#);

    assert_eq!(stmt.columns, vec!["t1.CITY", "count_all", "sum_t2_amount"]);
}

#[test]
fn ungrouped_sort_column_is_a_composition_error() {
    let spec = join_spec();
    let result = SearchQuery::from_join(spec)
        .group(GroupingEntry::column("t1.CITY"))
        .group(GroupingEntry::aggregate(AggregateFn::Count, "*"))
        .sort(SortCondition::asc("t2.AMOUNT", SortKind::PlainColumn))
        .compose();

    match result {
        Err(Error::Composition(msg)) => assert!(msg.contains("t2.AMOUNT")),
        other => panic!("expected composition error, got {:?}", other),
    }
}

#[test]
fn values_are_escaped_not_inlined() {
    let stmt = SearchQuery::from_table(QualifiedRelation::new("DB", "S", "T"))
        .filter(FilterCondition::new(
            Connector::And,
            "NAME",
            Comparison::Eq,
            "O'Hara'; DROP TABLE T; --",
        ))
        .compose()
        .unwrap();
    assert!(stmt
        .sql
        .contains("\"NAME\" = 'O''Hara''; DROP TABLE T; --'"));
}

#[test]
fn three_table_chain_uses_middle_table_second_key() {
    let branches = JoinTable::new(
        QualifiedRelation::new("BANK_DB", "BANK_SCHEMA", "BRANCHES"),
        vec![
            ColumnDescriptor::new("BRANCH_ID", "NUMBER(38,0)"),
            ColumnDescriptor::new("REGION", "VARCHAR"),
        ],
    );
    let mut mid = orders();
    mid.columns
        .push(ColumnDescriptor::new("BRANCH_ID", "NUMBER(38,0)"));

    let spec = JoinSpec::new(
        vec![customers(), mid, branches],
        vec![
            JoinLink::new(JoinType::Inner, "ID", "CUSTOMER_ID"),
            JoinLink::new(JoinType::Left, "BRANCH_ID", "BRANCH_ID"),
        ],
    );
    let stmt = SearchQuery::from_join(spec).compose().unwrap();

    assert!(stmt
        .sql
        .contains("INNER JOIN \"BANK_DB\".\"BANK_SCHEMA\".\"ORDERS\" t2 ON t1.\"ID\" = t2.\"CUSTOMER_ID\""));
    assert!(stmt
        .sql
        .contains("LEFT JOIN \"BANK_DB\".\"BANK_SCHEMA\".\"BRANCHES\" t3 ON t2.\"BRANCH_ID\" = t3.\"BRANCH_ID\""));
}
