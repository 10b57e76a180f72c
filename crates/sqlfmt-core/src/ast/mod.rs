//! Abstract Syntax Tree (AST) types for SELECT statements.
//!
//! Every node carries the [`Pos`] values of the tokens it was built from and
//! reports its source range through the [`Node`] trait. Optional clauses are
//! `Option`s; an absent clause reports [`Pos::NONE`] for both ends.

mod comment;
mod expression;
mod statement;

pub use comment::{Comment, CommentGroup};
pub use expression::{
    BasicLit, BinaryExpr, BinaryOp, CallExpr, CaseExpr, ElseClause, Expr, Ident, IsNullExpr,
    LitKind, ParenExpr, UnaryExpr, UnaryOp, WhenClause,
};
pub use statement::{
    Alias, Clause, Column, FromClause, GroupByClause, OrderByClause, SelectClause, SelectStmt,
    Stmt, Table, TableBasicLit, TableExpr, WhereClause,
};

use crate::source::Pos;

/// The source range of a syntax node.
pub trait Node {
    /// Position of the first character belonging to the node.
    fn pos(&self) -> Pos;

    /// Position immediately after the node.
    fn end(&self) -> Pos;
}

impl<T: Node> Node for Option<T> {
    fn pos(&self) -> Pos {
        self.as_ref().map_or(Pos::NONE, Node::pos)
    }

    fn end(&self) -> Pos {
        self.as_ref().map_or(Pos::NONE, Node::end)
    }
}

impl<T: Node + ?Sized> Node for Box<T> {
    fn pos(&self) -> Pos {
        (**self).pos()
    }

    fn end(&self) -> Pos {
        (**self).end()
    }
}
