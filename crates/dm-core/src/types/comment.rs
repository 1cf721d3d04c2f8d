//! Documentation comments and the program element they describe.

use serde::{Deserialize, Serialize};

use super::location::SourceLocation;

/// The kind of program element a documentation comment describes.
///
/// The rewrite step places a comment differently depending on its role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum CommentRole {
    /// Describes a component class.
    Component,
    /// Describes a component property.
    Property,
    /// Describes a component method.
    Method,
}

/// A `/** ... */` block preceding a declaration.
///
/// # Examples
///
/// ```
/// use dm_core::{CommentRole, DocComment, SourceLocation};
///
/// let comment = DocComment::new("/**\n * A greeting.\n */", SourceLocation::default())
///     .with_role(CommentRole::Component);
///
/// assert_eq!(comment.text, "A greeting.");
/// assert!(comment.is_for(CommentRole::Component));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocComment {
    /// The comment exactly as written.
    pub raw: String,

    /// The comment body with delimiters and leading `*` gutters removed.
    pub text: String,

    /// Where the comment starts.
    pub location: SourceLocation,

    /// What the comment describes, once known.
    pub role: Option<CommentRole>,
}

impl DocComment {
    /// Creates a comment from its raw text. The role is left unset.
    #[must_use]
    pub fn new(raw: impl Into<String>, location: SourceLocation) -> Self {
        let raw = raw.into();
        Self {
            text: strip_delimiters(&raw),
            raw,
            location,
            role: None,
        }
    }

    /// Returns the comment tagged with `role`.
    #[must_use]
    pub fn with_role(mut self, role: CommentRole) -> Self {
        self.role = Some(role);
        self
    }

    /// Returns `true` if the comment has been tagged with `role`.
    #[inline]
    #[must_use]
    pub fn is_for(&self, role: CommentRole) -> bool {
        self.role == Some(role)
    }

    /// Returns `true` if `text` is a documentation block (`/** ... */`).
    ///
    /// ```
    /// use dm_core::DocComment;
    ///
    /// assert!(DocComment::is_doc_block("/** docs */"));
    /// assert!(!DocComment::is_doc_block("/* plain */"));
    /// assert!(!DocComment::is_doc_block("// line"));
    /// assert!(!DocComment::is_doc_block("/**/"));
    /// ```
    #[must_use]
    pub fn is_doc_block(text: &str) -> bool {
        text.starts_with("/**") && text.ends_with("*/") && text.len() > 4
    }
}

fn strip_delimiters(raw: &str) -> String {
    let body = raw.trim();
    let body = body.strip_prefix("/**").unwrap_or(body);
    let body = body.strip_suffix("*/").unwrap_or(body);

    let lines: Vec<&str> = body
        .lines()
        .map(|line| {
            let line = line.trim();
            match line.strip_prefix('*') {
                Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
                None => line,
            }
        })
        .collect();

    lines.join("\n").trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_comment() {
        let comment = DocComment::new("/** Short description */", SourceLocation::default());
        assert_eq!(comment.text, "Short description");
        assert_eq!(comment.role, None);
    }

    #[test]
    fn test_multi_line_comment_keeps_inner_lines() {
        let raw = "/**\n   * First line.\n   *\n   * @customElement my-el\n   */";
        let comment = DocComment::new(raw, SourceLocation::default());
        assert_eq!(comment.text, "First line.\n\n@customElement my-el");
    }

    #[test]
    fn test_with_role() {
        let comment =
            DocComment::new("/** x */", SourceLocation::default()).with_role(CommentRole::Method);
        assert!(comment.is_for(CommentRole::Method));
        assert!(!comment.is_for(CommentRole::Component));
    }
}
