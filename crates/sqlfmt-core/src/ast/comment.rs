//! Comment nodes.

use super::Node;
use crate::source::Pos;

/// A single `-- ...`, `# ...` or `/* ... */` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Comment {
    /// Position of the comment marker.
    pub pos: Pos,
    /// Comment text including its markers.
    pub text: String,
}

impl Comment {
    /// Creates a comment.
    #[must_use]
    pub fn new(pos: Pos, text: impl Into<String>) -> Self {
        Self {
            pos,
            text: text.into(),
        }
    }

    /// Returns true for a `/* ... */` comment.
    #[must_use]
    pub fn is_block(&self) -> bool {
        self.text.starts_with("/*")
    }

    /// Returns the comment text without its markers.
    #[must_use]
    pub fn body(&self) -> &str {
        let text = self.text.as_str();
        if let Some(rest) = text.strip_prefix("/*") {
            rest.strip_suffix("*/").unwrap_or(rest).trim()
        } else if let Some(rest) = text.strip_prefix("--") {
            rest.trim()
        } else {
            text.strip_prefix('#').unwrap_or(text).trim()
        }
    }
}

impl Node for Comment {
    fn pos(&self) -> Pos {
        self.pos
    }

    fn end(&self) -> Pos {
        self.pos + self.text.len()
    }
}

/// A run of comments with no other token between them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CommentGroup {
    /// The comments, never empty.
    pub list: Vec<Comment>,
}

impl CommentGroup {
    /// Creates a comment group.
    ///
    /// # Panics
    ///
    /// Panics if `list` is empty.
    #[must_use]
    pub fn new(list: Vec<Comment>) -> Self {
        assert!(!list.is_empty(), "empty comment group");
        Self { list }
    }

    /// Returns the bodies of all comments, one per line.
    #[must_use]
    pub fn text(&self) -> String {
        self.list
            .iter()
            .map(Comment::body)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Node for CommentGroup {
    fn pos(&self) -> Pos {
        self.list.first().map_or(Pos::NONE, Node::pos)
    }

    fn end(&self) -> Pos {
        self.list.last().map_or(Pos::NONE, Node::end)
    }
}
