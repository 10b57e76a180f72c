//! SQL pretty-printer.
//!
//! Re-emits a parsed statement with one clause keyword per line and one
//! list item per indented line.

mod config;
mod printer;

pub use config::Config;
pub use printer::{fprint, print};
