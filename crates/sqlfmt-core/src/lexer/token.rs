//! Token types for the SQL lexer.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::source::Pos;

/// SQL keywords recognised by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Keyword {
    Select,
    From,
    Where,
    Group,
    Order,
    By,
    /// `AS`, introducing an alias.
    As,
    Case,
    When,
    Then,
    Else,
    End,
    And,
    Or,
    Is,
    Null,
}

static KEYWORDS: LazyLock<HashMap<&'static str, Keyword>> =
    LazyLock::new(|| Keyword::ALL.iter().map(|kw| (kw.as_str(), *kw)).collect());

impl Keyword {
    /// Every keyword, in declaration order.
    pub const ALL: [Self; 16] = [
        Self::Select,
        Self::From,
        Self::Where,
        Self::Group,
        Self::Order,
        Self::By,
        Self::As,
        Self::Case,
        Self::When,
        Self::Then,
        Self::Else,
        Self::End,
        Self::And,
        Self::Or,
        Self::Is,
        Self::Null,
    ];

    /// Looks up a keyword (case-insensitive).
    #[must_use]
    pub fn lookup(s: &str) -> Option<Self> {
        KEYWORDS.get(s.to_ascii_uppercase().as_str()).copied()
    }

    /// Returns the keyword as an upper-case string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Group => "GROUP",
            Self::Order => "ORDER",
            Self::By => "BY",
            Self::As => "AS",
            Self::Case => "CASE",
            Self::When => "WHEN",
            Self::Then => "THEN",
            Self::Else => "ELSE",
            Self::End => "END",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Is => "IS",
            Self::Null => "NULL",
        }
    }
}

/// The kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Literals
    /// Identifier (e.g., user_mst)
    Ident,
    /// Integer literal (e.g., 42)
    Int,
    /// Real literal (e.g., 3.14, 1e10)
    Real,
    /// String literal (e.g., 'hello'), quotes included in the literal
    String,

    /// SQL keyword
    Keyword(Keyword),

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// =
    Eq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,

    // Special
    /// `-- ...`, `# ...` or `/* ... */`
    Comment,
    /// End of input
    Eof,
    /// A character no rule accepts
    Illegal,
}

impl TokenKind {
    /// Returns true if a token of this kind can be the last token of an
    /// operand, so that a following `-` must be an operator.
    #[must_use]
    pub const fn ends_operand(&self) -> bool {
        matches!(
            self,
            Self::Ident
                | Self::Int
                | Self::Real
                | Self::String
                | Self::RightParen
                | Self::Keyword(Keyword::End | Keyword::Null)
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Ident => "identifier",
            Self::Int => "integer",
            Self::Real => "real",
            Self::String => "string",
            Self::Keyword(kw) => kw.as_str(),
            Self::Plus => "`+`",
            Self::Minus => "`-`",
            Self::Star => "`*`",
            Self::Slash => "`/`",
            Self::Percent => "`%`",
            Self::Eq => "`=`",
            Self::NotEq => "`<>`",
            Self::Lt => "`<`",
            Self::LtEq => "`<=`",
            Self::Gt => "`>`",
            Self::GtEq => "`>=`",
            Self::LeftParen => "`(`",
            Self::RightParen => "`)`",
            Self::Comma => "`,`",
            Self::Semicolon => "`;`",
            Self::Dot => "`.`",
            Self::Comment => "comment",
            Self::Eof => "end of input",
            Self::Illegal => "illegal character",
        };
        f.write_str(s)
    }
}

/// A token with its position and source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Position of the first byte.
    pub pos: Pos,
    /// The kind of token.
    pub kind: TokenKind,
    /// The exact source text of the token (empty for EOF).
    pub lit: String,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub fn new(pos: Pos, kind: TokenKind, lit: impl Into<String>) -> Self {
        Self {
            pos,
            kind,
            lit: lit.into(),
        }
    }

    /// Returns the position immediately after the token.
    #[must_use]
    pub fn end(&self) -> Pos {
        self.pos + self.lit.len()
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }
}
