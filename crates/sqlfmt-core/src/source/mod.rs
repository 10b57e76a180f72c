//! Source position registry.
//!
//! Every file handed to the lexer is first registered in a [`FileSet`],
//! which assigns it a non-overlapping range of [`Pos`] values. Positions
//! from different files can therefore be compared and stored without
//! carrying a file reference around.

mod file_set;
mod pos;

pub use file_set::{File, FileId, FileSet};
pub use pos::{Pos, Position};
