//! # sqlfmt-core
//!
//! A position-tracking front end for SQL SELECT statements.
//!
//! This crate provides:
//! - A file set that gives every registered source file its own range of
//!   global positions and records line starts as they are scanned
//! - A hand-written lexer producing positioned tokens
//! - A recursive descent parser with precedence climbing that builds a
//!   typed AST in which every node knows its source range
//! - A pretty-printer that re-emits the AST one clause per line
//!
//! ## Parsing and formatting
//!
//! ```rust
//! use sqlfmt_core::ast::Node;
//! use sqlfmt_core::printer::{self, Config};
//! use sqlfmt_core::{parse_statement, FileSet, Pos};
//!
//! let fset = FileSet::new();
//! let stmt = parse_statement(&fset, "query.sql", Some("select * from table1".into())).unwrap();
//!
//! assert_eq!(stmt.pos(), Pos::new(1));
//! assert_eq!(stmt.end(), Pos::new(21));
//! assert_eq!(
//!     printer::print(&stmt, &Config::default()),
//!     "SELECT\n    *\nFROM\n    table1\n;"
//! );
//! ```
//!
//! Positions resolve back to a file, line and column through the file set:
//!
//! ```rust
//! use sqlfmt_core::{parse_statement, FileSet, ParseError};
//!
//! let fset = FileSet::new();
//! let err = parse_statement(&fset, "bad.sql", Some("select a\nfrom".into())).unwrap_err();
//! assert!(matches!(err, ParseError::Syntax { .. }));
//! let position = fset.position(err.pos()).unwrap();
//! assert_eq!(position.to_string(), "bad.sql:2:5");
//! ```

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod source;

pub use ast::{Expr, Node, SelectStmt, Stmt};
pub use lexer::{LexError, Lexer, Token, TokenKind};
pub use parser::{parse_statement, ParseError, Parser, Source};
pub use source::{File, FileId, FileSet, Pos, Position};
