//! Positions inside source files.
//!
//! [`SourceLocation`] is a point (used for diagnostics), [`ByteSpan`] is a
//! range (used to replace declaration text), and [`SourceRef`] ties both to a
//! file path.

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// A point within a source file.
///
/// `line` is 1-indexed, `column` is a 0-indexed UTF-8 byte column and
/// `byte_offset` is absolute from the start of the file.
///
/// # Examples
///
/// ```
/// use dm_core::SourceLocation;
///
/// let loc = SourceLocation::new(3, 4, 57);
/// assert_eq!(loc.to_string(), "3:4");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceLocation {
    /// Line number (1-indexed).
    pub line: u32,

    /// Column number (0-indexed).
    pub column: u32,

    /// Absolute byte offset from the start of the file.
    pub byte_offset: u32,
}

impl SourceLocation {
    /// Creates a new source location.
    #[inline]
    #[must_use]
    pub const fn new(line: u32, column: u32, byte_offset: u32) -> Self {
        Self {
            line,
            column,
            byte_offset,
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open byte range `start..end` within a source file.
///
/// # Examples
///
/// ```
/// use dm_core::ByteSpan;
///
/// let source = "@Component class Foo {}";
/// let span = ByteSpan::new(11, 23);
/// assert_eq!(span.slice(source), Some("class Foo {}"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ByteSpan {
    /// First byte of the range.
    pub start: u32,

    /// One past the last byte of the range.
    pub end: u32,
}

impl ByteSpan {
    /// Creates a new span.
    #[inline]
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Length of the span in bytes.
    #[inline]
    #[must_use]
    pub const fn len(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the span covers no bytes.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Returns the covered text, or `None` if the span is out of bounds or
    /// splits a UTF-8 character.
    #[must_use]
    pub fn slice(self, source: &str) -> Option<&str> {
        source.get(self.start as usize..self.end as usize)
    }
}

/// Where a descriptor was read from.
///
/// Kept on every descriptor so diagnostics can name the declaration and the
/// rewrite step can replace its text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SourceRef {
    /// The file the declaration was parsed from.
    pub path: Utf8PathBuf,

    /// Start of the declaration.
    pub location: SourceLocation,

    /// Full extent of the declaration, including an enclosing `export`.
    pub span: ByteSpan,
}

impl std::fmt::Display for SourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.path, self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len_and_empty() {
        assert_eq!(ByteSpan::new(4, 10).len(), 6);
        assert!(ByteSpan::new(7, 7).is_empty());
        // Inverted spans never underflow
        assert_eq!(ByteSpan::new(10, 4).len(), 0);
    }

    #[test]
    fn test_span_slice_out_of_bounds() {
        assert_eq!(ByteSpan::new(0, 100).slice("short"), None);
    }

    #[test]
    fn test_source_ref_display() {
        let source = SourceRef {
            path: Utf8PathBuf::from("src/app/my-el.ts"),
            location: SourceLocation::new(12, 2, 310),
            span: ByteSpan::new(310, 420),
        };
        insta::assert_snapshot!(source.to_string(), @"src/app/my-el.ts:12:2");
    }
}
