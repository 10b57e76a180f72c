#![allow(dead_code)]

use sqlfmt_core::ast::{Expr, SelectStmt, Stmt};
use sqlfmt_core::printer::{self, Config};
use sqlfmt_core::{parse_statement, FileSet, ParseError};

pub fn parse(sql: &str) -> Stmt {
    parse_statement(&FileSet::new(), "test.sql", Some(sql.into()))
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse_err(sql: &str) -> ParseError {
    parse_statement(&FileSet::new(), "test.sql", Some(sql.into()))
        .expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn parse_select(sql: &str) -> SelectStmt {
    match parse(sql) {
        Stmt::Select(s) => s,
    }
}

/// Returns the expression of the first selected column.
pub fn first_column(sql: &str) -> Expr {
    parse_select(sql).select.cols.remove(0).expr
}

/// Returns the WHERE condition, which must be present.
pub fn where_cond(sql: &str) -> Expr {
    parse_select(sql)
        .where_clause
        .unwrap_or_else(|| panic!("Expected WHERE clause in: {sql}"))
        .cond
}

pub fn format(sql: &str) -> String {
    printer::print(&parse(sql), &Config::default())
}

/// Verifies that formatting is a fixed point: the formatted text parses
/// again and formats to the same string.
pub fn round_trip(sql: &str) {
    let rendered1 = format(sql);
    let rendered2 = format(&rendered1);
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
}
