//! Printer configuration.

/// Controls the layout produced by [`print`](super::print).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Terminate the statement with `;` on its own line.
    pub implied_semicolon: bool,
    /// Line separator.
    pub newline: String,
    /// Print keywords in upper case instead of lower case.
    pub uppercase_keywords: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent_width: 4,
            implied_semicolon: true,
            newline: String::from("\n"),
            uppercase_keywords: true,
        }
    }
}

impl Config {
    /// Sets the indentation width.
    #[must_use]
    pub const fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Enables or disables the trailing `;`.
    #[must_use]
    pub const fn with_implied_semicolon(mut self, enabled: bool) -> Self {
        self.implied_semicolon = enabled;
        self
    }

    /// Sets the line separator.
    #[must_use]
    pub fn with_newline(mut self, newline: impl Into<String>) -> Self {
        self.newline = newline.into();
        self
    }

    /// Chooses upper- or lower-case keywords.
    #[must_use]
    pub const fn with_uppercase_keywords(mut self, uppercase: bool) -> Self {
        self.uppercase_keywords = uppercase;
        self
    }
}
