//! SQL Parser implementation.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use super::error::ParseError;
use super::pratt::{infix_binding_power, token_to_binary_op, token_to_unary_op};
use crate::ast::{
    Alias, BasicLit, CallExpr, CaseExpr, Column, Comment, CommentGroup, ElseClause, Expr,
    FromClause, GroupByClause, Ident, LitKind, OrderByClause, ParenExpr, SelectClause, SelectStmt,
    Stmt, Table, TableBasicLit, TableExpr, WhenClause, WhereClause,
};
use crate::lexer::{Keyword, Lexer, Token, TokenKind};
use crate::source::{File, FileSet, Pos};

/// Identifiers that start a join after a table name.
const JOIN_WORDS: [&str; 8] = [
    "JOIN", "INNER", "LEFT", "RIGHT", "FULL", "OUTER", "CROSS", "NATURAL",
];

/// Deepest expression nesting accepted before parsing gives up.
pub const MAX_NESTING_DEPTH: usize = 64;

/// SQL Parser.
///
/// Holds one token of lookahead in `current`. Comment tokens never reach
/// the grammar: [`Parser::advance`] collects them into comment groups that
/// are attached to the finished statement.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    comments: Vec<CommentGroup>,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for `src`, the full content of `file`.
    ///
    /// # Panics
    ///
    /// Panics if `file` was registered with a size other than `src.len()`.
    #[must_use]
    pub fn new(file: Arc<File>, src: &'a str) -> Self {
        Self {
            lexer: Lexer::new(file, src),
            current: Token::new(Pos::NONE, TokenKind::Eof, ""),
            comments: Vec::new(),
            depth: 0,
        }
    }

    /// Aborts lexing once `deadline` passes.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.lexer = self.lexer.with_deadline(deadline);
        self
    }

    /// Forwards every lexical problem to `handler`.
    #[must_use]
    pub fn with_error_handler(mut self, handler: impl FnMut(Pos, &str) + 'a) -> Self {
        self.lexer = self.lexer.with_error_handler(handler);
        self
    }

    /// Parses a single SQL statement.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not exactly one supported
    /// SELECT statement, optionally terminated by `;`.
    pub fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        self.advance()?;

        let mut stmt = match self.current.kind {
            TokenKind::Keyword(Keyword::Select) => self.parse_select_statement()?,
            _ => return Err(ParseError::unexpected("SELECT statement", &self.current)),
        };

        let terminated = self.check(TokenKind::Semicolon);
        if terminated {
            self.advance()?;
        }
        if !self.current.is_eof() {
            if terminated {
                return Err(ParseError::unsupported(
                    "multiple statements",
                    self.current.pos,
                ));
            }
            return Err(ParseError::unexpected("end of statement", &self.current));
        }

        stmt.comments = std::mem::take(&mut self.comments);
        debug!(
            file = self.lexer.file().name(),
            columns = stmt.select.cols.len(),
            tables = stmt.from.tables.len(),
            has_where = stmt.where_clause.is_some(),
            has_group_by = stmt.group_by.is_some(),
            has_order_by = stmt.order_by.is_some(),
            comment_groups = stmt.comments.len(),
            "parsed statement"
        );
        Ok(Stmt::Select(stmt))
    }

    /// Parses a SELECT statement.
    fn parse_select_statement(&mut self) -> Result<SelectStmt, ParseError> {
        let select = self.parse_select_clause()?;
        let from = self.parse_from_clause()?;

        // WHERE clause
        let where_clause = if self.check_keyword(Keyword::Where) {
            let pos = self.current.pos;
            self.advance()?;
            let cond = self.parse_expression()?;
            Some(WhereClause { pos, cond })
        } else {
            None
        };

        // GROUP BY clause
        let group_by = if self.check_keyword(Keyword::Group) {
            let pos = self.current.pos;
            self.advance()?;
            let by_pos = self.expect_keyword(Keyword::By)?;
            let groups = self.parse_expression_list()?;
            Some(GroupByClause::new(pos, by_pos, groups))
        } else {
            None
        };

        // ORDER BY clause
        let order_by = if self.check_keyword(Keyword::Order) {
            let pos = self.current.pos;
            self.advance()?;
            let by_pos = self.expect_keyword(Keyword::By)?;
            let orders = self.parse_expression_list()?;
            Some(OrderByClause::new(pos, by_pos, orders))
        } else {
            None
        };

        Ok(SelectStmt {
            select,
            from,
            where_clause,
            group_by,
            order_by,
            comments: Vec::new(),
        })
    }

    /// Parses `SELECT col [AS alias], ...` up to (not including) FROM.
    fn parse_select_clause(&mut self) -> Result<SelectClause, ParseError> {
        let pos = self.expect_keyword(Keyword::Select)?;
        let mut cols = Vec::new();
        loop {
            let expr = self.parse_expression()?;
            let alias = self.parse_optional_alias()?;
            cols.push(Column { expr, alias });

            if self.check(TokenKind::Comma) {
                self.advance()?;
            } else if self.check_keyword(Keyword::From) {
                break;
            } else {
                return Err(ParseError::unexpected("`,` or FROM", &self.current));
            }
        }
        Ok(SelectClause::new(pos, cols))
    }

    /// Parses `FROM table [AS alias], ...`.
    fn parse_from_clause(&mut self) -> Result<FromClause, ParseError> {
        let pos = self.expect_keyword(Keyword::From)?;
        let mut tables = Vec::new();
        loop {
            if self.check(TokenKind::LeftParen) {
                return Err(ParseError::unsupported("subquery", self.current.pos));
            }
            let (name_pos, name) = self.expect_identifier()?;
            let alias = self.parse_optional_alias()?;
            tables.push(Table {
                expr: TableExpr::Basic(TableBasicLit {
                    pos: name_pos,
                    name,
                }),
                alias,
            });

            if self.is_join_word() {
                return Err(ParseError::unsupported("JOIN", self.current.pos));
            }
            if self.check(TokenKind::Comma) {
                self.advance()?;
            } else if self.at_table_list_end() {
                break;
            } else {
                return Err(ParseError::unexpected(
                    "`,`, WHERE, GROUP BY, ORDER BY or end of statement",
                    &self.current,
                ));
            }
        }
        Ok(FromClause::new(pos, tables))
    }

    fn is_join_word(&self) -> bool {
        self.check(TokenKind::Ident)
            && JOIN_WORDS
                .iter()
                .any(|w| w.eq_ignore_ascii_case(&self.current.lit))
    }

    fn at_table_list_end(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Keyword(Keyword::Where | Keyword::Group | Keyword::Order)
                | TokenKind::Semicolon
                | TokenKind::Eof
        )
    }

    /// Parses an optional `AS name`.
    fn parse_optional_alias(&mut self) -> Result<Option<Alias>, ParseError> {
        if !self.check_keyword(Keyword::As) {
            return Ok(None);
        }
        let as_pos = self.current.pos;
        self.advance()?;
        let (name_pos, name) = self.expect_identifier()?;
        Ok(Some(Alias {
            as_pos,
            name_pos,
            name,
        }))
    }

    /// Parses a comma-separated list of expressions.
    fn parse_expression_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![self.parse_expression()?];
        while self.check(TokenKind::Comma) {
            self.advance()?;
            exprs.push(self.parse_expression()?);
        }
        Ok(exprs)
    }

    /// Parses a full expression.
    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.enter()?;
        let expr = self.parse_binary(0);
        self.depth -= 1;
        expr
    }

    /// Parses binary operators by precedence climbing.
    fn parse_binary(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_operand()?;

        while let Some(op) = token_to_binary_op(&self.current.kind) {
            let (l_bp, r_bp) = infix_binding_power(op);
            if l_bp < min_bp {
                break;
            }
            let op_pos = self.current.pos;
            self.advance()?;
            let rhs = self.parse_binary(r_bp)?;
            lhs = Expr::binary(lhs, op_pos, op, rhs);
        }

        Ok(lhs)
    }

    /// Parses a unary operand and an optional trailing `IS NULL`.
    fn parse_operand(&mut self) -> Result<Expr, ParseError> {
        let x = self.parse_unary()?;
        if !self.check_keyword(Keyword::Is) {
            return Ok(x);
        }
        let is_pos = self.current.pos;
        self.advance()?;
        let null_pos = self.expect_keyword(Keyword::Null)?;
        Ok(Expr::is_null(x, is_pos, null_pos))
    }

    /// Parses a prefix expression.
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if let Some(op) = token_to_unary_op(&self.current.kind) {
            let op_pos = self.current.pos;
            self.advance()?;
            self.enter()?;
            let x = self.parse_unary();
            self.depth -= 1;
            return Ok(Expr::unary(op_pos, op, x?));
        }
        self.parse_primary()
    }

    /// Parses a primary expression.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.current.clone();

        match token.kind {
            TokenKind::Ident => {
                self.advance()?;
                if self.check(TokenKind::Dot) {
                    self.advance()?;
                    let (name_pos, name) = self.expect_identifier()?;
                    return Ok(Expr::Ident(Ident::qualified(
                        token.pos, token.lit, name_pos, name,
                    )));
                }
                if self.check(TokenKind::LeftParen) {
                    return self.parse_function_call(token.pos, token.lit);
                }
                Ok(Expr::Ident(Ident::new(token.pos, token.lit)))
            }
            TokenKind::Int | TokenKind::Real | TokenKind::String => {
                self.advance()?;
                let kind = match token.kind {
                    TokenKind::Int => LitKind::Int,
                    TokenKind::Real => LitKind::Real,
                    _ => LitKind::String,
                };
                Ok(Expr::BasicLit(BasicLit::new(token.pos, kind, token.lit)))
            }
            // A `*` where an operand is expected is the wildcard.
            TokenKind::Star => {
                self.advance()?;
                Ok(Expr::BasicLit(BasicLit::wildcard(token.pos)))
            }
            TokenKind::Keyword(Keyword::Case) => self.parse_case_expression(),
            TokenKind::LeftParen => {
                self.advance()?;
                if self.check_keyword(Keyword::Select) {
                    return Err(ParseError::unsupported("subquery", token.pos));
                }
                let x = self.parse_expression()?;
                let rparen = self.expect(TokenKind::RightParen)?;
                Ok(Expr::Paren(ParenExpr {
                    lparen: token.pos,
                    x: Box::new(x),
                    rparen,
                }))
            }
            TokenKind::Eof => Err(ParseError::unexpected_eof("expression", token.pos)),
            _ => Err(ParseError::unexpected("expression", &token)),
        }
    }

    /// Parses the argument list of `name(...)`; `current` is the `(`.
    fn parse_function_call(&mut self, pos: Pos, func_name: String) -> Result<Expr, ParseError> {
        let lparen = self.expect(TokenKind::LeftParen)?;

        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if self.current.is_eof() {
                    return Err(ParseError::unexpected_eof(
                        "function argument",
                        self.current.pos,
                    ));
                }
                args.push(self.parse_expression()?);
                if !self.check(TokenKind::Comma) {
                    break;
                }
                self.advance()?;
            }
        }
        let rparen = self.expect(TokenKind::RightParen)?;

        Ok(Expr::Call(CallExpr {
            pos,
            func_name,
            lparen,
            args,
            rparen,
        }))
    }

    /// Parses `CASE [key] WHEN .. THEN .. [ELSE ..] END`.
    fn parse_case_expression(&mut self) -> Result<Expr, ParseError> {
        let pos = self.expect_keyword(Keyword::Case)?;

        let switch_key = if matches!(
            self.current.kind,
            TokenKind::Keyword(Keyword::When | Keyword::Else | Keyword::End)
        ) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        let mut whens = Vec::new();
        while self.check_keyword(Keyword::When) {
            let when_pos = self.current.pos;
            self.advance()?;
            let cond = self.parse_expression()?;
            let then_pos = self.expect_keyword(Keyword::Then)?;
            let result = self.parse_expression()?;
            whens.push(WhenClause {
                pos: when_pos,
                cond,
                then_pos,
                result,
            });
        }
        if whens.is_empty()
            || !matches!(
                self.current.kind,
                TokenKind::Keyword(Keyword::Else | Keyword::End)
            )
        {
            return Err(ParseError::unexpected("WHEN, ELSE, or END", &self.current));
        }

        let else_clause = if self.check_keyword(Keyword::Else) {
            let else_pos = self.current.pos;
            self.advance()?;
            let result = self.parse_expression()?;
            Some(ElseClause {
                pos: else_pos,
                result,
            })
        } else {
            None
        };

        let end_pos = self.expect_keyword(Keyword::End)?;

        Ok(Expr::Case(CaseExpr::new(
            pos,
            switch_key,
            whens,
            else_clause,
            end_pos,
        )))
    }

    // --- Helper methods ---

    /// Descends one nesting level of expressions.
    fn enter(&mut self) -> Result<(), ParseError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::unexpected("shallower nesting", &self.current));
        }
        self.depth += 1;
        Ok(())
    }

    /// Advances to the next non-comment token.
    fn advance(&mut self) -> Result<(), ParseError> {
        let mut token = self.lexer.scan()?;
        let mut group = Vec::new();
        while token.kind == TokenKind::Comment {
            group.push(Comment::new(token.pos, token.lit));
            token = self.lexer.scan()?;
        }
        if !group.is_empty() {
            self.comments.push(CommentGroup::new(group));
        }
        self.current = token;
        Ok(())
    }

    /// Checks if the current token is of the given kind.
    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Checks if the current token is the given keyword.
    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.check(TokenKind::Keyword(keyword))
    }

    /// Expects the current token to be of the given kind and returns its position.
    fn expect(&mut self, kind: TokenKind) -> Result<Pos, ParseError> {
        if self.check(kind) {
            let pos = self.current.pos;
            self.advance()?;
            Ok(pos)
        } else {
            Err(ParseError::unexpected(kind.to_string(), &self.current))
        }
    }

    /// Expects the current token to be the given keyword and returns its position.
    fn expect_keyword(&mut self, keyword: Keyword) -> Result<Pos, ParseError> {
        self.expect(TokenKind::Keyword(keyword))
    }

    /// Expects and returns an identifier.
    fn expect_identifier(&mut self) -> Result<(Pos, String), ParseError> {
        if self.check(TokenKind::Ident) {
            let pos = self.current.pos;
            let name = std::mem::take(&mut self.current.lit);
            self.advance()?;
            Ok((pos, name))
        } else {
            Err(ParseError::unexpected("identifier", &self.current))
        }
    }
}

/// Source text handed to [`parse_statement`].
#[derive(Debug, Clone, Copy)]
pub enum Source<'a> {
    /// UTF-8 text.
    Text(&'a str),
    /// Raw bytes, which must be valid UTF-8.
    Bytes(&'a [u8]),
}

impl<'a> From<&'a str> for Source<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<&'a String> for Source<'a> {
    fn from(s: &'a String) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<&'a [u8]> for Source<'a> {
    fn from(b: &'a [u8]) -> Self {
        Self::Bytes(b)
    }
}

/// Registers `filename` in `fset` and parses one statement from it.
///
/// With `src == None` the file is read from disk.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read,
/// `ParseError::Input` if the source is not valid UTF-8, and any lexical,
/// syntax or unsupported-construct error from parsing.
pub fn parse_statement(
    fset: &FileSet,
    filename: impl AsRef<Path>,
    src: Option<Source<'_>>,
) -> Result<Stmt, ParseError> {
    let path = filename.as_ref();
    let owned;
    let text: &str = match src {
        Some(Source::Text(s)) => s,
        Some(Source::Bytes(b)) => std::str::from_utf8(b)
            .map_err(|e| ParseError::Input(format!("source is not valid UTF-8: {e}")))?,
        None => {
            let bytes = std::fs::read(path).map_err(|source| ParseError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            owned = String::from_utf8(bytes).map_err(|e| {
                ParseError::Input(format!(
                    "'{}' is not valid UTF-8: {}",
                    path.display(),
                    e.utf8_error()
                ))
            })?;
            &owned
        }
    };

    let file = fset.register(path.to_string_lossy(), None, text.len());
    let mut parser = Parser::new(file, text);
    parser.parse_statement()
}
