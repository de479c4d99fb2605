use crate::dialect::{Dialect, PageContext, unquote};
use crate::error::BuilderError;
use pretty_assertions::assert_eq;

#[test]
fn safe_name_per_dialect() {
    assert_eq!(Dialect::SqlServer.safe_name("a"), "[a]");
    assert_eq!(Dialect::MySql.safe_name("a"), "`a`");
    assert_eq!(Dialect::PgSql.safe_name("a"), "\"a\"");
    assert_eq!(Dialect::Oracle.safe_name("a"), "\"a\"");
    assert_eq!(Dialect::Sqlite.safe_name("a"), "\"a\"");
}

#[test]
fn safe_name_passthrough() {
    assert_eq!(Dialect::SqlServer.safe_name("*"), "*");
    assert_eq!(Dialect::SqlServer.safe_name("Count(*)"), "Count(*)");
    assert_eq!(Dialect::SqlServer.safe_name(""), "");
}

#[test]
fn safe_name_requotes() {
    // 已带引号的标识符先去引号再按当前方言加引号
    assert_eq!(Dialect::MySql.safe_name("[a]"), "`a`");
    assert_eq!(Dialect::SqlServer.safe_name("`a`"), "[a]");
    assert_eq!(Dialect::PgSql.safe_name("\"a\""), "\"a\"");
}

#[test]
fn quote_column_splits_on_dots() {
    assert_eq!(Dialect::SqlServer.quote_column("a.b"), "[a].[b]");
    assert_eq!(Dialect::MySql.quote_column("u.Name"), "`u`.`Name`");
    assert_eq!(Dialect::SqlServer.quote_column("Sum(Age)"), "Sum(Age)");
}

#[test]
fn unquote_strips_once() {
    assert_eq!(unquote("[a]"), "a");
    assert_eq!(unquote("`a`"), "a");
    assert_eq!(unquote("\"a\""), "a");
    assert_eq!(unquote("a"), "a");
}

#[test]
fn prefix_per_dialect() {
    assert_eq!(Dialect::SqlServer.prefix(), "@");
    assert_eq!(Dialect::MySql.prefix(), "@");
    assert_eq!(Dialect::PgSql.prefix(), "@");
    assert_eq!(Dialect::Oracle.prefix(), ":");
}

fn ctx<'a>(
    body: &'a str,
    order: Option<&'a str>,
    columns: Option<Vec<String>>,
) -> PageContext<'a> {
    PageContext {
        body,
        order,
        first: "@_p_0",
        second: "@_p_1",
        columns,
    }
}

#[test]
fn mysql_pagination_appends_limit() {
    let sql = Dialect::MySql
        .page_sql(&ctx("Select *\nFrom `user`", None, None))
        .unwrap();
    assert_eq!(sql, "Select *\nFrom `user`\nLimit @_p_0, @_p_1");
}

#[test]
fn mysql_pagination_with_order() {
    let sql = Dialect::MySql
        .page_sql(&ctx("Select *\nFrom `user`", Some("`Id`"), None))
        .unwrap();
    assert_eq!(
        sql,
        "Select *\nFrom `user`\nOrder By `Id`\nLimit @_p_0, @_p_1"
    );
}

#[test]
fn pgsql_pagination_limit_offset() {
    let sql = Dialect::PgSql
        .page_sql(&ctx("Select *\nFrom \"user\"", None, None))
        .unwrap();
    assert_eq!(sql, "Select *\nFrom \"user\"\nLimit @_p_1 Offset @_p_0");
}

#[test]
fn sqlserver_pagination_requires_order() {
    let err = Dialect::SqlServer
        .page_sql(&ctx("Select *\nFrom [user]", None, None))
        .unwrap_err();
    assert_eq!(err, BuilderError::MissingOrderBy("SqlServer".to_string()));
}

#[test]
fn sqlserver_pagination_offset_fetch() {
    let sql = Dialect::SqlServer
        .page_sql(&ctx("Select *\nFrom [user]", Some("[Id]"), None))
        .unwrap();
    assert_eq!(
        sql,
        "Select *\nFrom [user]\nOrder By [Id]\nOffset @_p_0 Rows Fetch Next @_p_1 Rows Only"
    );
}

#[test]
fn oracle_pagination_wraps_with_row_number() {
    let sql = Dialect::Oracle
        .page_sql(&ctx(
            "Select \"Id\",\"Name\"\nFrom \"user\"",
            Some("\"Id\""),
            Some(vec!["Id".to_string(), "Name".to_string()]),
        ))
        .unwrap();
    assert_eq!(
        sql,
        "Select \"Id\",\"Name\" From (Select \"t\".*,Row_Number() Over (Order By \"Id\") As \"RowNumber\" From (Select \"Id\",\"Name\"\nFrom \"user\") \"t\") \"w\" Where \"w\".\"RowNumber\">@_p_0 And \"w\".\"RowNumber\"<=@_p_1"
    );
}

#[test]
fn oracle_pagination_falls_back_to_star() {
    // 投影不可枚举时外层用 *，序号列保留
    let sql = Dialect::Oracle
        .page_sql(&ctx("Select *\nFrom \"user\"", Some("\"Id\""), None))
        .unwrap();
    assert!(sql.starts_with("Select * From (Select \"t\".*,Row_Number()"));
}

#[test]
fn oracle_pagination_requires_order() {
    let err = Dialect::Oracle
        .page_sql(&ctx("Select *\nFrom \"user\"", None, None))
        .unwrap_err();
    assert_eq!(err, BuilderError::MissingOrderBy("Oracle".to_string()));
}

#[test]
fn sqlite_pagination_not_implemented() {
    let err = Dialect::Sqlite
        .page_sql(&ctx("Select *\nFrom \"user\"", Some("\"Id\""), None))
        .unwrap_err();
    assert_eq!(err, BuilderError::UnsupportedDialect("Sqlite".to_string()));
}
