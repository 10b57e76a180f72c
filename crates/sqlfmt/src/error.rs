//! Error types for the formatter driver.

use std::path::{Path, PathBuf};

use sqlfmt_core::{FileSet, ParseError};

/// Errors that can occur while formatting a set of files.
#[derive(Debug, thiserror::Error)]
pub enum SqlfmtError {
    /// An input could not be read or the output could not be written.
    #[error("IO error on '{path}': {source}")]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },

    /// An input did not contain one supported statement.
    #[error("{location}: {source}")]
    Parse {
        /// The input file.
        path: PathBuf,
        /// `file:line:column` of the error, or the file name alone.
        location: String,
        /// The parse error.
        source: ParseError,
    },

    /// The AST could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A worker task panicked or was cancelled.
    #[error("worker failed: {0}")]
    Join(String),
}

impl SqlfmtError {
    /// Creates an IO error for `path`.
    #[must_use]
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Creates a parse error, resolving its position through `fset`.
    #[must_use]
    pub fn parse(fset: &FileSet, path: &Path, source: ParseError) -> Self {
        let location = fset
            .position(source.pos())
            .map_or_else(|| path.display().to_string(), |pos| pos.to_string());
        Self::Parse {
            path: path.to_path_buf(),
            location,
            source,
        }
    }
}
