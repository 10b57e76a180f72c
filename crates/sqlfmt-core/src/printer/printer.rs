//! Pretty-printer implementation.

use std::io::{self, Write};

use super::Config;
use crate::ast::{
    BinaryOp, CaseExpr, Column, Expr, GroupByClause, Ident, OrderByClause, SelectStmt, Stmt, Table,
    TableExpr, WhereClause,
};

/// Formats `stmt` according to `config`.
#[must_use]
pub fn print(stmt: &Stmt, config: &Config) -> String {
    let mut printer = Printer::new(config);
    match stmt {
        Stmt::Select(select) => printer.select_stmt(select),
    }
    printer.output
}

/// Formats `stmt` and writes the result to `out`.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn fprint<W: Write + ?Sized>(out: &mut W, stmt: &Stmt, config: &Config) -> io::Result<()> {
    out.write_all(print(stmt, config).as_bytes())
}

struct Printer<'c> {
    config: &'c Config,
    indent: usize,
    output: String,
}

impl<'c> Printer<'c> {
    const fn new(config: &'c Config) -> Self {
        Self {
            config,
            indent: 0,
            output: String::new(),
        }
    }

    fn select_stmt(&mut self, stmt: &SelectStmt) {
        for group in &stmt.comments {
            for comment in &group.list {
                self.output.push_str(&comment.text);
                self.newline();
            }
        }

        let cols: Vec<String> = stmt.select.cols.iter().map(|c| self.column(c)).collect();
        self.list_clause("SELECT", &cols);

        let tables: Vec<String> = stmt.from.tables.iter().map(|t| self.table(t)).collect();
        self.list_clause("FROM", &tables);

        if let Some(where_clause) = &stmt.where_clause {
            self.where_clause(where_clause);
        }
        if let Some(GroupByClause { groups, .. }) = &stmt.group_by {
            let items: Vec<String> = groups.iter().map(|e| self.expr(e)).collect();
            self.list_clause("GROUP BY", &items);
        }
        if let Some(OrderByClause { orders, .. }) = &stmt.order_by {
            let items: Vec<String> = orders.iter().map(|e| self.expr(e)).collect();
            self.list_clause("ORDER BY", &items);
        }

        if self.config.implied_semicolon {
            self.output.push(';');
        }
    }

    /// Writes a clause keyword followed by one indented item per line.
    fn list_clause(&mut self, keyword: &str, items: &[String]) {
        let keyword = self.keyword(keyword);
        self.output.push_str(&keyword);
        self.indent += 1;
        self.newline();

        for (i, item) in items.iter().enumerate() {
            self.output.push_str(item);
            if i + 1 < items.len() {
                self.output.push(',');
            } else {
                self.indent -= 1;
            }
            self.newline();
        }
    }

    /// Writes WHERE, breaking the top-level AND/OR chain over several lines.
    fn where_clause(&mut self, clause: &WhereClause) {
        let (op, operands) = split_logical(&clause.cond);
        let lines: Vec<String> = match op {
            Some(op) => operands
                .iter()
                .enumerate()
                .map(|(i, e)| self.operand(e, op.precedence(), i > 0))
                .collect(),
            None => operands.iter().map(|e| self.expr(e)).collect(),
        };
        let op = op.map(|op| self.keyword(op.as_str()));

        let keyword = self.keyword("WHERE");
        self.output.push_str(&keyword);
        self.indent += 1;
        self.newline();

        for (i, line) in lines.iter().enumerate() {
            if let Some(op) = op.as_ref().filter(|_| i > 0) {
                self.output.push_str(op);
                self.output.push(' ');
            }
            self.output.push_str(line);
            if i + 1 == lines.len() {
                self.indent -= 1;
            }
            self.newline();
        }
    }

    fn newline(&mut self) {
        self.output.push_str(&self.config.newline);
        let width = self.indent * self.config.indent_width;
        self.output.extend(std::iter::repeat_n(' ', width));
    }

    fn keyword(&self, keyword: &str) -> String {
        if self.config.uppercase_keywords {
            keyword.to_ascii_uppercase()
        } else {
            keyword.to_ascii_lowercase()
        }
    }

    fn column(&self, column: &Column) -> String {
        let expr = self.expr(&column.expr);
        match &column.alias {
            Some(alias) => format!("{expr} {} {}", self.keyword("AS"), alias.name),
            None => expr,
        }
    }

    fn table(&self, table: &Table) -> String {
        let name = match &table.expr {
            TableExpr::Basic(t) => t.name.clone(),
        };
        match &table.alias {
            Some(alias) => format!("{name} {} {}", self.keyword("AS"), alias.name),
            None => name,
        }
    }

    /// Formats an expression on a single line.
    fn expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Ident(ident) => ident_text(ident),
            Expr::BasicLit(lit) => lit.value.clone(),
            Expr::Unary(unary) => {
                let x = match unary.x.as_ref() {
                    Expr::Binary(_) => format!("({})", self.expr(&unary.x)),
                    x => self.expr(x),
                };
                format!("{}{x}", unary.op.as_str())
            }
            Expr::Binary(binary) => {
                let prec = binary.op.precedence();
                let x = self.operand(&binary.x, prec, false);
                let y = self.operand(&binary.y, prec, true);
                format!("{x} {} {y}", self.operator(binary.op))
            }
            Expr::Call(call) => {
                let args: Vec<String> = call.args.iter().map(|a| self.expr(a)).collect();
                format!("{}({})", call.func_name, args.join(", "))
            }
            Expr::Case(case) => self.case_expr(case),
            Expr::IsNull(is_null) => {
                let x = match is_null.x.as_ref() {
                    Expr::Binary(_) => format!("({})", self.expr(&is_null.x)),
                    x => self.expr(x),
                };
                format!("{x} {} {}", self.keyword("IS"), self.keyword("NULL"))
            }
            Expr::Paren(paren) => format!("({})", self.expr(&paren.x)),
        }
    }

    /// Formats one side of a binary expression, adding parentheses where the
    /// tree would not survive a re-parse without them.
    fn operand(&self, expr: &Expr, parent_prec: u8, right: bool) -> String {
        let text = self.expr(expr);
        match expr {
            Expr::Binary(b)
                if b.op.precedence() < parent_prec
                    || (right && b.op.precedence() == parent_prec) =>
            {
                format!("({text})")
            }
            _ => text,
        }
    }

    fn operator(&self, op: BinaryOp) -> String {
        if op.is_logical() {
            self.keyword(op.as_str())
        } else {
            op.as_str().to_string()
        }
    }

    fn case_expr(&self, case: &CaseExpr) -> String {
        let mut out = self.keyword("CASE");
        if let Some(key) = &case.switch_key {
            out.push(' ');
            out.push_str(&self.expr(key));
        }
        for when in &case.whens {
            out.push_str(&format!(
                " {} {} {} {}",
                self.keyword("WHEN"),
                self.expr(&when.cond),
                self.keyword("THEN"),
                self.expr(&when.result)
            ));
        }
        if let Some(else_clause) = &case.else_clause {
            out.push_str(&format!(
                " {} {}",
                self.keyword("ELSE"),
                self.expr(&else_clause.result)
            ));
        }
        out.push(' ');
        out.push_str(&self.keyword("END"));
        out
    }
}

fn ident_text(ident: &Ident) -> String {
    match &ident.table {
        Some(table) => format!("{table}.{}", ident.name),
        None => ident.name.clone(),
    }
}

/// Splits a condition whose root is AND/OR into the operands of the
/// left-leaning chain of that operator.
fn split_logical(cond: &Expr) -> (Option<BinaryOp>, Vec<&Expr>) {
    let Some(root) = cond.as_binary().filter(|b| b.op.is_logical()) else {
        return (None, vec![cond]);
    };

    let mut tail = Vec::new();
    let mut current = cond;
    while let Some(b) = current.as_binary().filter(|b| b.op == root.op) {
        tail.push(b.y.as_ref());
        current = b.x.as_ref();
    }
    tail.push(current);
    tail.reverse();
    (Some(root.op), tail)
}
