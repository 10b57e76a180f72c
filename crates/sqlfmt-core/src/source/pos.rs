//! Compact source positions shared by every file in a [`FileSet`](super::FileSet).

use core::fmt;
use core::ops::Add;

/// An offset into the global coordinate space of a file set.
///
/// A file registered with base `b` and size `n` owns the positions `b..=b + n`.
/// The zero value is reserved and means "no position".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Pos(usize);

impl Pos {
    /// The "no position" sentinel.
    pub const NONE: Self = Self(0);

    /// Creates a position from a raw offset.
    #[must_use]
    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// Returns the raw offset.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    /// Returns true unless this is [`Pos::NONE`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }
}

impl Add<usize> for Pos {
    type Output = Self;

    fn add(self, rhs: usize) -> Self {
        Self(self.0 + rhs)
    }
}

impl From<Pos> for usize {
    fn from(pos: Pos) -> Self {
        pos.0
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A human-readable source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Name of the file as registered.
    pub filename: String,
    /// Line number, starting at 1.
    pub line: usize,
    /// Byte column, starting at 1.
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.filename.is_empty() {
            write!(f, "{}:{}", self.line, self.column)
        } else {
            write!(f, "{}:{}:{}", self.filename, self.line, self.column)
        }
    }
}
