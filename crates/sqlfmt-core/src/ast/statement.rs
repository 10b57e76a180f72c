//! SQL statement AST types.

use super::comment::CommentGroup;
use super::expression::Expr;
use super::Node;
use crate::source::Pos;

/// An `AS name` alias on a column or table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Alias {
    /// Position of `AS`.
    pub as_pos: Pos,
    /// Position of the alias name.
    pub name_pos: Pos,
    /// The alias name.
    pub name: String,
}

impl Node for Alias {
    fn pos(&self) -> Pos {
        self.as_pos
    }

    fn end(&self) -> Pos {
        self.name_pos + self.name.len()
    }
}

/// One entry of the SELECT column list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Column {
    /// The selected expression.
    pub expr: Expr,
    /// Alias (optional).
    pub alias: Option<Alias>,
}

impl Node for Column {
    fn pos(&self) -> Pos {
        self.expr.pos()
    }

    fn end(&self) -> Pos {
        self.alias
            .as_ref()
            .map_or_else(|| self.expr.end(), Node::end)
    }
}

/// A bare table name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TableBasicLit {
    /// Position of the name.
    pub pos: Pos,
    /// Table name.
    pub name: String,
}

impl Node for TableBasicLit {
    fn pos(&self) -> Pos {
        self.pos
    }

    fn end(&self) -> Pos {
        self.pos + self.name.len()
    }
}

/// Something that can appear in a FROM list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TableExpr {
    /// A simple table name.
    Basic(TableBasicLit),
}

impl Node for TableExpr {
    fn pos(&self) -> Pos {
        match self {
            Self::Basic(t) => t.pos(),
        }
    }

    fn end(&self) -> Pos {
        match self {
            Self::Basic(t) => t.end(),
        }
    }
}

/// One entry of the FROM table list.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Table {
    /// The table.
    pub expr: TableExpr,
    /// Alias (optional).
    pub alias: Option<Alias>,
}

impl Node for Table {
    fn pos(&self) -> Pos {
        self.expr.pos()
    }

    fn end(&self) -> Pos {
        self.alias
            .as_ref()
            .map_or_else(|| self.expr.end(), Node::end)
    }
}

/// `SELECT col, ...`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SelectClause {
    /// Position of `SELECT`.
    pub pos: Pos,
    /// Selected columns, never empty.
    pub cols: Vec<Column>,
}

impl SelectClause {
    /// Creates a SELECT clause.
    ///
    /// # Panics
    ///
    /// Panics if `cols` is empty.
    #[must_use]
    pub fn new(pos: Pos, cols: Vec<Column>) -> Self {
        assert!(!cols.is_empty(), "SELECT clause without columns");
        Self { pos, cols }
    }
}

impl Node for SelectClause {
    fn pos(&self) -> Pos {
        self.pos
    }

    fn end(&self) -> Pos {
        self.cols.last().map_or(Pos::NONE, Node::end)
    }
}

/// `FROM table, ...`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FromClause {
    /// Position of `FROM`.
    pub pos: Pos,
    /// Tables, never empty.
    pub tables: Vec<Table>,
}

impl FromClause {
    /// Creates a FROM clause.
    ///
    /// # Panics
    ///
    /// Panics if `tables` is empty.
    #[must_use]
    pub fn new(pos: Pos, tables: Vec<Table>) -> Self {
        assert!(!tables.is_empty(), "FROM clause without tables");
        Self { pos, tables }
    }
}

impl Node for FromClause {
    fn pos(&self) -> Pos {
        self.pos
    }

    fn end(&self) -> Pos {
        self.tables.last().map_or(Pos::NONE, Node::end)
    }
}

/// `WHERE cond`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WhereClause {
    /// Position of `WHERE`.
    pub pos: Pos,
    /// The condition.
    pub cond: Expr,
}

impl Node for WhereClause {
    fn pos(&self) -> Pos {
        self.pos
    }

    fn end(&self) -> Pos {
        self.cond.end()
    }
}

/// `GROUP BY expr, ...`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GroupByClause {
    /// Position of `GROUP`.
    pub pos: Pos,
    /// Position of `BY`.
    pub by_pos: Pos,
    /// Grouping expressions, never empty.
    pub groups: Vec<Expr>,
}

impl GroupByClause {
    /// Creates a GROUP BY clause.
    ///
    /// # Panics
    ///
    /// Panics if `groups` is empty.
    #[must_use]
    pub fn new(pos: Pos, by_pos: Pos, groups: Vec<Expr>) -> Self {
        assert!(!groups.is_empty(), "GROUP BY clause without expressions");
        Self {
            pos,
            by_pos,
            groups,
        }
    }
}

impl Node for GroupByClause {
    fn pos(&self) -> Pos {
        self.pos
    }

    fn end(&self) -> Pos {
        self.groups.last().map_or(Pos::NONE, Node::end)
    }
}

/// `ORDER BY expr, ...`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OrderByClause {
    /// Position of `ORDER`.
    pub pos: Pos,
    /// Position of `BY`.
    pub by_pos: Pos,
    /// Ordering expressions, never empty.
    pub orders: Vec<Expr>,
}

impl OrderByClause {
    /// Creates an ORDER BY clause.
    ///
    /// # Panics
    ///
    /// Panics if `orders` is empty.
    #[must_use]
    pub fn new(pos: Pos, by_pos: Pos, orders: Vec<Expr>) -> Self {
        assert!(!orders.is_empty(), "ORDER BY clause without expressions");
        Self {
            pos,
            by_pos,
            orders,
        }
    }
}

impl Node for OrderByClause {
    fn pos(&self) -> Pos {
        self.pos
    }

    fn end(&self) -> Pos {
        self.orders.last().map_or(Pos::NONE, Node::end)
    }
}

/// A borrowed view of any clause of a SELECT statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause<'a> {
    Select(&'a SelectClause),
    From(&'a FromClause),
    Where(&'a WhereClause),
    GroupBy(&'a GroupByClause),
    OrderBy(&'a OrderByClause),
}

impl Clause<'_> {
    /// Returns the clause keyword(s) in upper case.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Select(_) => "SELECT",
            Self::From(_) => "FROM",
            Self::Where(_) => "WHERE",
            Self::GroupBy(_) => "GROUP BY",
            Self::OrderBy(_) => "ORDER BY",
        }
    }
}

impl Node for Clause<'_> {
    fn pos(&self) -> Pos {
        match self {
            Self::Select(c) => c.pos(),
            Self::From(c) => c.pos(),
            Self::Where(c) => c.pos(),
            Self::GroupBy(c) => c.pos(),
            Self::OrderBy(c) => c.pos(),
        }
    }

    fn end(&self) -> Pos {
        match self {
            Self::Select(c) => c.end(),
            Self::From(c) => c.end(),
            Self::Where(c) => c.end(),
            Self::GroupBy(c) => c.end(),
            Self::OrderBy(c) => c.end(),
        }
    }
}

/// A complete SELECT statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SelectStmt {
    /// SELECT clause.
    pub select: SelectClause,
    /// FROM clause.
    pub from: FromClause,
    /// WHERE clause (optional).
    pub where_clause: Option<WhereClause>,
    /// GROUP BY clause (optional).
    pub group_by: Option<GroupByClause>,
    /// ORDER BY clause (optional).
    pub order_by: Option<OrderByClause>,
    /// Every comment group of the statement, in source order.
    pub comments: Vec<CommentGroup>,
}

impl SelectStmt {
    /// Returns the comment group directly preceding `SELECT`, if any.
    #[must_use]
    pub fn leading_comments(&self) -> Option<&CommentGroup> {
        self.comments
            .first()
            .filter(|group| group.end() <= self.select.pos)
    }

    /// Returns the present clauses in source order.
    #[must_use]
    pub fn clauses(&self) -> Vec<Clause<'_>> {
        let mut clauses = vec![Clause::Select(&self.select), Clause::From(&self.from)];
        if let Some(c) = &self.where_clause {
            clauses.push(Clause::Where(c));
        }
        if let Some(c) = &self.group_by {
            clauses.push(Clause::GroupBy(c));
        }
        if let Some(c) = &self.order_by {
            clauses.push(Clause::OrderBy(c));
        }
        clauses
    }
}

impl Node for SelectStmt {
    fn pos(&self) -> Pos {
        self.select.pos
    }

    fn end(&self) -> Pos {
        if let Some(c) = &self.order_by {
            c.end()
        } else if let Some(c) = &self.group_by {
            c.end()
        } else if let Some(c) = &self.where_clause {
            c.end()
        } else {
            self.from.end()
        }
    }
}

/// A parsed statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Stmt {
    /// A SELECT statement.
    Select(SelectStmt),
}

impl Stmt {
    /// Returns the SELECT statement.
    #[must_use]
    pub const fn as_select(&self) -> &SelectStmt {
        match self {
            Self::Select(s) => s,
        }
    }
}

impl Node for Stmt {
    fn pos(&self) -> Pos {
        match self {
            Self::Select(s) => s.pos(),
        }
    }

    fn end(&self) -> Pos {
        match self {
            Self::Select(s) => s.end(),
        }
    }
}
