//! SQL Parser
//!
//! A hand-written recursive descent parser with precedence climbing for
//! binary expressions. One call parses exactly one SELECT statement.

mod error;
mod parser;
mod pratt;

pub use error::ParseError;
pub use parser::{parse_statement, Parser, Source, MAX_NESTING_DEPTH};
