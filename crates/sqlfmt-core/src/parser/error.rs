//! Parser error types.

use std::path::PathBuf;

use crate::lexer::{LexError, Token, TokenKind};
use crate::source::Pos;

/// Errors that can occur while parsing a statement.
///
/// A parse either yields a complete statement or one of these; no partial
/// tree is ever returned.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The lexer could not make progress.
    #[error("lexical error: {0}")]
    Lexical(#[from] LexError),

    /// A token did not fit the grammar.
    #[error("syntax error at {pos}: expected {expected}, found {found}")]
    Syntax {
        /// Position of the offending token.
        pos: Pos,
        /// What the grammar required.
        expected: String,
        /// Description of the token actually found.
        found: String,
    },

    /// Valid SQL that this parser deliberately does not handle.
    #[error("unsupported construct at {pos}: {construct}")]
    Unsupported {
        /// Position where the construct starts.
        pos: Pos,
        /// Name of the construct, e.g. `JOIN`.
        construct: &'static str,
    },

    /// Invalid arguments to the parse entry point.
    #[error("invalid input: {0}")]
    Input(String),

    /// The source file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
}

impl ParseError {
    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: &Token) -> Self {
        Self::Syntax {
            pos: found.pos,
            expected: expected.into(),
            found: describe(found),
        }
    }

    /// Creates an "unexpected end of input" error.
    #[must_use]
    pub fn unexpected_eof(expected: impl Into<String>, pos: Pos) -> Self {
        Self::Syntax {
            pos,
            expected: expected.into(),
            found: TokenKind::Eof.to_string(),
        }
    }

    /// Creates an "unsupported construct" error.
    #[must_use]
    pub const fn unsupported(construct: &'static str, pos: Pos) -> Self {
        Self::Unsupported { pos, construct }
    }

    /// Returns the position the error refers to, or [`Pos::NONE`].
    #[must_use]
    pub const fn pos(&self) -> Pos {
        match self {
            Self::Lexical(err) => err.pos(),
            Self::Syntax { pos, .. } | Self::Unsupported { pos, .. } => *pos,
            Self::Input(_) | Self::Io { .. } => Pos::NONE,
        }
    }

    /// Returns true for errors caused by the statement text itself.
    #[must_use]
    pub const fn is_source_error(&self) -> bool {
        matches!(
            self,
            Self::Lexical(_) | Self::Syntax { .. } | Self::Unsupported { .. }
        )
    }
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Ident | TokenKind::Int | TokenKind::Real | TokenKind::String => {
            format!("{} `{}`", token.kind, token.lit)
        }
        TokenKind::Illegal => format!("illegal character `{}`", token.lit),
        kind => kind.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Keyword;

    #[test]
    fn test_unexpected_message() {
        let tok = Token::new(Pos::new(8), TokenKind::Keyword(Keyword::From), "from");
        let err = ParseError::unexpected("expression", &tok);
        assert_eq!(err.pos(), Pos::new(8));
        assert_eq!(
            err.to_string(),
            "syntax error at 8: expected expression, found FROM"
        );
    }

    #[test]
    fn test_unexpected_identifier_shows_text() {
        let tok = Token::new(Pos::new(3), TokenKind::Ident, "foo");
        let err = ParseError::unexpected("`,` or FROM", &tok);
        assert!(err.to_string().ends_with("found identifier `foo`"));
    }

    #[test]
    fn test_unexpected_eof() {
        let err = ParseError::unexpected_eof("`)`", Pos::new(20));
        assert_eq!(err.pos(), Pos::new(20));
        assert!(err.to_string().contains("end of input"));
    }

    #[test]
    fn test_lexical_pos() {
        let err: ParseError = LexError::UnterminatedString { pos: Pos::new(4) }.into();
        assert_eq!(err.pos(), Pos::new(4));
        assert!(err.is_source_error());
        assert!(!ParseError::Input(String::from("x")).is_source_error());
    }
}
