//! Error types for the dm-ts-parser crate.
//!
//! This module provides the [`ParseError`] type for errors that can occur
//! while building a parser or turning source text into a declaration tree.

/// Errors that can occur during TypeScript parsing.
///
/// # Examples
///
/// ```
/// use dm_ts_parser::ParseError;
///
/// fn describe(err: &ParseError) -> String {
///     match err {
///         ParseError::Syntax { line, column, .. } => format!("bad input at {line}:{column}"),
///         other => other.to_string(),
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Failed to set the TypeScript language on the parser.
    #[error("failed to set TypeScript language")]
    LanguageInit,

    /// Failed to compile a tree-sitter query.
    #[error("failed to compile query at offset {offset}: {message}")]
    QueryCompile {
        /// The byte offset in the query string where the error occurred.
        offset: usize,
        /// The error reported by tree-sitter.
        message: String,
    },

    /// The parser produced no tree.
    ///
    /// This typically indicates the parser ran out of memory or was cancelled.
    #[error("failed to parse source code")]
    Parse,

    /// The source text is not valid TypeScript.
    ///
    /// Describes the first offending node in document order.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        /// Line of the offending node (1-indexed).
        line: u32,
        /// Column of the offending node (0-indexed).
        column: u32,
        /// What the parser found.
        message: String,
    },
}

impl ParseError {
    /// Returns `true` if the error describes the input rather than the parser.
    #[inline]
    #[must_use]
    pub const fn is_syntax(&self) -> bool {
        matches!(self, Self::Syntax { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_init_display() {
        let err = ParseError::LanguageInit;
        assert_eq!(err.to_string(), "failed to set TypeScript language");
        assert!(!err.is_syntax());
    }

    #[test]
    fn test_parse_display() {
        assert_eq!(ParseError::Parse.to_string(), "failed to parse source code");
    }

    #[test]
    fn test_syntax_display() {
        let err = ParseError::Syntax {
            line: 4,
            column: 2,
            message: "unexpected `}}`".to_owned(),
        };
        assert!(err.is_syntax());
        insta::assert_snapshot!(err.to_string(), @"syntax error at 4:2: unexpected `}}`");
    }
}
