//! SQL Lexer/Tokenizer
//!
//! A hand-written, pull-based lexer that turns the source of one registered
//! file into a stream of positioned tokens.

mod error;
mod token;
mod tokenizer;

pub use error::LexError;
pub use token::{Keyword, Token, TokenKind};
pub use tokenizer::{ErrorHandler, Lexer};
