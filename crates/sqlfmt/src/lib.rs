//! Command-line formatter for SQL `SELECT` statements.
//!
//! `sqlfmt` reads one statement per input file, parses it with
//! [`sqlfmt_core`] and writes it back in a canonical layout:
//!
//! - One clause keyword per line, its items indented below it
//! - Top-level `AND`/`OR` conditions of `WHERE` on separate lines
//! - Leading comments kept above the statement
//!
//! All inputs share one [`FileSet`](sqlfmt_core::FileSet), so every error
//! carries a `file:line:column` location.
//!
//! # Example
//!
//! ```rust,no_run
//! use sqlfmt::{run, Options};
//!
//! # async fn demo() -> Result<(), sqlfmt::error::SqlfmtError> {
//! let options = Options {
//!     files: vec!["query.sql".into()],
//!     ..Options::default()
//! };
//! let summary = run(&options).await?;
//! assert_eq!(summary.formatted, 1);
//! # Ok(())
//! # }
//! ```
//!
//! # CLI Usage
//!
//! ```bash
//! # Format to standard output
//! sqlfmt query.sql
//!
//! # Format several files into one output file, skipping broken ones
//! sqlfmt --keep-going -o formatted.sql a.sql b.sql
//!
//! # Dump the syntax tree as JSON
//! sqlfmt --dump-ast query.sql
//! ```

pub mod driver;
pub mod error;

pub use driver::{run, Options, Summary, STDIN_PATH};
pub use error::SqlfmtError;
pub use sqlfmt_core::printer::Config;
