//! Lexer error types.

use crate::source::Pos;

/// A lexical error that makes further scanning of a statement impossible.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    /// End of input reached before the closing quote.
    #[error("unterminated string literal starting at {pos}")]
    UnterminatedString {
        /// Position of the opening quote.
        pos: Pos,
    },

    /// End of input reached before `*/`.
    #[error("unterminated block comment starting at {pos}")]
    UnterminatedComment {
        /// Position of the opening `/*`.
        pos: Pos,
    },

    /// A numeric literal with a misplaced decimal point or exponent.
    #[error("malformed number `{literal}` at {pos}: {reason}")]
    MalformedNumber {
        /// Position of the first character of the literal.
        pos: Pos,
        /// The text scanned so far.
        literal: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// The scan deadline passed while inside a token.
    #[error("scan deadline exceeded in token starting at {pos}")]
    DeadlineExceeded {
        /// Position of the token being scanned.
        pos: Pos,
    },
}

impl LexError {
    /// Returns the position of the token that caused the error.
    #[must_use]
    pub const fn pos(&self) -> Pos {
        match self {
            Self::UnterminatedString { pos }
            | Self::UnterminatedComment { pos }
            | Self::MalformedNumber { pos, .. }
            | Self::DeadlineExceeded { pos } => *pos,
        }
    }
}
