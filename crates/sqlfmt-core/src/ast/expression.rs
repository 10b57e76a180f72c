//! Expression AST types.

use super::Node;
use crate::source::Pos;

/// A column reference, optionally qualified with a table name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Ident {
    /// Position of the first character (the table name when qualified).
    pub pos: Pos,
    /// Table name or alias (optional).
    pub table: Option<String>,
    /// Position of the column name.
    pub name_pos: Pos,
    /// Column name.
    pub name: String,
}

impl Ident {
    /// Creates an unqualified identifier.
    #[must_use]
    pub fn new(pos: Pos, name: impl Into<String>) -> Self {
        Self {
            pos,
            table: None,
            name_pos: pos,
            name: name.into(),
        }
    }

    /// Creates a `table.name` identifier.
    #[must_use]
    pub fn qualified(
        pos: Pos,
        table: impl Into<String>,
        name_pos: Pos,
        name: impl Into<String>,
    ) -> Self {
        Self {
            pos,
            table: Some(table.into()),
            name_pos,
            name: name.into(),
        }
    }
}

impl Node for Ident {
    fn pos(&self) -> Pos {
        self.pos
    }

    fn end(&self) -> Pos {
        self.name_pos + self.name.len()
    }
}

/// The kind of a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum LitKind {
    /// Integer literal, e.g. `42` or `-1`.
    Int,
    /// Real literal, e.g. `3.14` or `1e10`.
    Real,
    /// String literal, quotes included.
    String,
    /// The `*` wildcard.
    Wildcard,
}

/// A literal, kept as its exact source text.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BasicLit {
    /// Literal position.
    pub pos: Pos,
    /// Literal kind.
    pub kind: LitKind,
    /// Source text, e.g. `'abc'`, `42` or `*`.
    pub value: String,
}

impl BasicLit {
    /// Creates a literal.
    #[must_use]
    pub fn new(pos: Pos, kind: LitKind, value: impl Into<String>) -> Self {
        Self {
            pos,
            kind,
            value: value.into(),
        }
    }

    /// Creates the `*` wildcard at `pos`.
    #[must_use]
    pub fn wildcard(pos: Pos) -> Self {
        Self::new(pos, LitKind::Wildcard, "*")
    }
}

impl Node for BasicLit {
    fn pos(&self) -> Pos {
        self.pos
    }

    fn end(&self) -> Pos {
        self.pos + self.value.len()
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum UnaryOp {
    /// Identity (+)
    Plus,
    /// Negation (-)
    Neg,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Neg => "-",
        }
    }
}

/// A prefix `+` or `-` applied to an operand.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct UnaryExpr {
    /// Position of the operator.
    pub op_pos: Pos,
    /// Operator.
    pub op: UnaryOp,
    /// Operand.
    pub x: Box<Expr>,
}

impl Node for UnaryExpr {
    fn pos(&self) -> Pos {
        self.op_pos
    }

    fn end(&self) -> Pos {
        self.x.end()
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BinaryOp {
    // Logical
    Or,
    And,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Or => "OR",
            Self::And => "AND",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
        }
    }

    /// Returns the precedence of the operator (higher = binds tighter).
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => 3,
            Self::Add | Self::Sub => 4,
            Self::Mul | Self::Div | Self::Mod => 5,
        }
    }

    /// Returns true for `AND` and `OR`.
    #[must_use]
    pub const fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// A binary expression `x op y`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BinaryExpr {
    /// Left operand.
    pub x: Box<Expr>,
    /// Position of the operator.
    pub op_pos: Pos,
    /// Operator.
    pub op: BinaryOp,
    /// Right operand.
    pub y: Box<Expr>,
}

impl Node for BinaryExpr {
    fn pos(&self) -> Pos {
        self.x.pos()
    }

    fn end(&self) -> Pos {
        self.y.end()
    }
}

/// A function call `name(args)`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CallExpr {
    /// Position of the function name.
    pub pos: Pos,
    /// Function name as written.
    pub func_name: String,
    /// Position of `(`.
    pub lparen: Pos,
    /// The arguments.
    pub args: Vec<Expr>,
    /// Position of `)`.
    pub rparen: Pos,
}

impl Node for CallExpr {
    fn pos(&self) -> Pos {
        self.pos
    }

    fn end(&self) -> Pos {
        self.rparen + 1
    }
}

/// One `WHEN cond THEN result` arm of a CASE expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WhenClause {
    /// Position of `WHEN`.
    pub pos: Pos,
    /// Condition, or the value compared against the switch key.
    pub cond: Expr,
    /// Position of `THEN`.
    pub then_pos: Pos,
    /// Result expression.
    pub result: Expr,
}

impl Node for WhenClause {
    fn pos(&self) -> Pos {
        self.pos
    }

    fn end(&self) -> Pos {
        self.result.end()
    }
}

/// The `ELSE result` arm of a CASE expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ElseClause {
    /// Position of `ELSE`.
    pub pos: Pos,
    /// Result expression.
    pub result: Expr,
}

impl Node for ElseClause {
    fn pos(&self) -> Pos {
        self.pos
    }

    fn end(&self) -> Pos {
        self.result.end()
    }
}

/// `CASE [key] WHEN .. THEN .. [ELSE ..] END`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CaseExpr {
    /// Position of `CASE`.
    pub pos: Pos,
    /// The value compared against each WHEN (optional).
    pub switch_key: Option<Box<Expr>>,
    /// WHEN arms, never empty.
    pub whens: Vec<WhenClause>,
    /// ELSE arm (optional).
    pub else_clause: Option<Box<ElseClause>>,
    /// Position of `END`.
    pub end_pos: Pos,
}

impl CaseExpr {
    /// Creates a CASE expression.
    ///
    /// # Panics
    ///
    /// Panics if `whens` is empty.
    #[must_use]
    pub fn new(
        pos: Pos,
        switch_key: Option<Expr>,
        whens: Vec<WhenClause>,
        else_clause: Option<ElseClause>,
        end_pos: Pos,
    ) -> Self {
        assert!(!whens.is_empty(), "CASE expression without WHEN arms");
        Self {
            pos,
            switch_key: switch_key.map(Box::new),
            whens,
            else_clause: else_clause.map(Box::new),
            end_pos,
        }
    }

    /// Returns true if the CASE compares a key against each WHEN value.
    #[must_use]
    pub const fn has_switch_key(&self) -> bool {
        self.switch_key.is_some()
    }
}

impl Node for CaseExpr {
    fn pos(&self) -> Pos {
        self.pos
    }

    fn end(&self) -> Pos {
        self.end_pos + "END".len()
    }
}

/// A postfix `x IS NULL` predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IsNullExpr {
    /// The tested expression.
    pub x: Box<Expr>,
    /// Position of `IS`.
    pub is_pos: Pos,
    /// Position of `NULL`.
    pub null_pos: Pos,
}

impl Node for IsNullExpr {
    fn pos(&self) -> Pos {
        self.x.pos()
    }

    fn end(&self) -> Pos {
        self.null_pos + "NULL".len()
    }
}

/// A parenthesised expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParenExpr {
    /// Position of `(`.
    pub lparen: Pos,
    /// Inner expression.
    pub x: Box<Expr>,
    /// Position of `)`.
    pub rparen: Pos,
}

impl Node for ParenExpr {
    fn pos(&self) -> Pos {
        self.lparen
    }

    fn end(&self) -> Pos {
        self.rparen + 1
    }
}

/// An SQL expression.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Expr {
    /// A column reference.
    Ident(Ident),
    /// A literal or the `*` wildcard.
    BasicLit(BasicLit),
    /// A prefix operator expression.
    Unary(UnaryExpr),
    /// A binary operator expression.
    Binary(BinaryExpr),
    /// A function call.
    Call(CallExpr),
    /// A CASE expression.
    Case(CaseExpr),
    /// An IS NULL predicate.
    IsNull(IsNullExpr),
    /// A parenthesised expression.
    Paren(ParenExpr),
}

impl Expr {
    /// Creates a unary expression.
    #[must_use]
    pub fn unary(op_pos: Pos, op: UnaryOp, x: Self) -> Self {
        Self::Unary(UnaryExpr {
            op_pos,
            op,
            x: Box::new(x),
        })
    }

    /// Creates a binary expression.
    #[must_use]
    pub fn binary(x: Self, op_pos: Pos, op: BinaryOp, y: Self) -> Self {
        Self::Binary(BinaryExpr {
            x: Box::new(x),
            op_pos,
            op,
            y: Box::new(y),
        })
    }

    /// Creates an IS NULL predicate.
    #[must_use]
    pub fn is_null(x: Self, is_pos: Pos, null_pos: Pos) -> Self {
        Self::IsNull(IsNullExpr {
            x: Box::new(x),
            is_pos,
            null_pos,
        })
    }

    /// Returns the binary node if this is a binary expression.
    #[must_use]
    pub const fn as_binary(&self) -> Option<&BinaryExpr> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }
}

impl Node for Expr {
    fn pos(&self) -> Pos {
        match self {
            Self::Ident(e) => e.pos(),
            Self::BasicLit(e) => e.pos(),
            Self::Unary(e) => e.pos(),
            Self::Binary(e) => e.pos(),
            Self::Call(e) => e.pos(),
            Self::Case(e) => e.pos(),
            Self::IsNull(e) => e.pos(),
            Self::Paren(e) => e.pos(),
        }
    }

    fn end(&self) -> Pos {
        match self {
            Self::Ident(e) => e.end(),
            Self::BasicLit(e) => e.end(),
            Self::Unary(e) => e.end(),
            Self::Binary(e) => e.end(),
            Self::Call(e) => e.end(),
            Self::Case(e) => e.end(),
            Self::IsNull(e) => e.end(),
            Self::Paren(e) => e.end(),
        }
    }
}
