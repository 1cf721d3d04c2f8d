//! Decorator metadata attached to declarations.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::location::SourceLocation;

/// A decorator invocation as written in the source.
///
/// Decorators are inspected, never evaluated, so arguments are kept as the raw
/// text of each argument expression.
///
/// # Examples
///
/// ```
/// use dm_core::{Annotation, SourceLocation};
/// use smallvec::smallvec;
///
/// let annotation = Annotation {
///     name: "customElement".to_owned(),
///     arguments: smallvec!["'my-element'".to_owned()],
///     is_call: true,
///     raw: "@customElement('my-element')".to_owned(),
///     location: SourceLocation::new(1, 0, 0),
/// };
///
/// assert!(annotation.is_named("customElement"));
/// assert_eq!(annotation.to_string(), "@customElement('my-element')");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    /// Callee text without the `@`, e.g. `component` or
    /// `Polymer.decorators.customElement`.
    pub name: String,

    /// Raw text of each argument expression, in order.
    pub arguments: SmallVec<[String; 4]>,

    /// Whether the decorator was written as a call (`@Foo()` vs `@Foo`).
    pub is_call: bool,

    /// The decorator exactly as written, including the `@`.
    pub raw: String,

    /// Where the decorator starts.
    pub location: SourceLocation,
}

impl Annotation {
    /// Creates a decorator without arguments or parentheses.
    #[must_use]
    pub fn bare(name: impl Into<String>, location: SourceLocation) -> Self {
        let name = name.into();
        Self {
            raw: format!("@{name}"),
            name,
            arguments: SmallVec::new(),
            is_call: false,
            location,
        }
    }

    /// Returns `true` if the decorator's name is `name`, either exactly or as
    /// the last segment of a dotted name (`Polymer.decorators.customElement`
    /// is named `customElement`).
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name == name || self.name.rsplit('.').next() == Some(name)
    }
}

impl std::fmt::Display for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.name)?;
        if self.is_call {
            write!(f, "({})", self.arguments.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_bare_annotation() {
        let annotation = Annotation::bare("Component", SourceLocation::default());
        assert_eq!(annotation.raw, "@Component");
        assert!(!annotation.is_call);
        assert!(annotation.arguments.is_empty());
        assert_eq!(annotation.to_string(), "@Component");
    }

    #[test]
    fn test_is_named_matches_last_segment() {
        let annotation = Annotation::bare("Polymer.decorators.customElement", SourceLocation::default());
        assert!(annotation.is_named("customElement"));
        assert!(annotation.is_named("Polymer.decorators.customElement"));
        assert!(!annotation.is_named("decorators"));
    }

    #[test]
    fn test_display_normalizes_argument_spacing() {
        let annotation = Annotation {
            name: "Foo".to_owned(),
            arguments: smallvec!["1".to_owned(), "2".to_owned()],
            is_call: true,
            raw: "@Foo(1,2)".to_owned(),
            location: SourceLocation::default(),
        };
        assert_eq!(annotation.to_string(), "@Foo(1, 2)");
    }

    #[test]
    fn test_empty_call_keeps_parentheses() {
        let annotation = Annotation {
            name: "Bar".to_owned(),
            arguments: smallvec![],
            is_call: true,
            raw: "@Bar()".to_owned(),
            location: SourceLocation::default(),
        };
        assert_eq!(annotation.to_string(), "@Bar()");
    }
}
