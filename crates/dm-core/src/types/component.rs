//! The component descriptor handed to the rewrite step.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::annotation::Annotation;
use super::comment::DocComment;
use super::location::SourceRef;

/// One decorated class declaration discovered while scanning.
///
/// Descriptors are complete when created and are never modified afterwards;
/// the rewrite step receives them by shared reference.
///
/// # Namespace Tracking
///
/// [`namespace`](Self::namespace) is the text of the last namespace header the
/// scanner visited before this class in the same file. It is not a stack of
/// enclosing scopes: in `namespace A { namespace B {} class X {} }` the class
/// `X` reports `B`.
///
/// # Examples
///
/// ```
/// use dm_core::{Annotation, ComponentDescriptor, SourceLocation, SourceRef};
/// use smallvec::smallvec;
///
/// let component = ComponentDescriptor {
///     name: "MyElement".to_owned(),
///     namespace: Some("MyApp".to_owned()),
///     comment: None,
///     annotations: smallvec![Annotation::bare("component", SourceLocation::default())],
///     extends: Some("Polymer.Element".to_owned()),
///     use_metadata_reflection: false,
///     source: SourceRef::default(),
/// };
///
/// assert_eq!(component.qualified_name(), "MyApp.MyElement");
/// assert!(component.has_annotation("component"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDescriptor {
    /// The class identifier.
    pub name: String,

    /// The namespace header active when the class was visited.
    pub namespace: Option<String>,

    /// The documentation block preceding the class.
    pub comment: Option<DocComment>,

    /// Decorators in source order. Never empty.
    pub annotations: SmallVec<[Annotation; 2]>,

    /// Text of the `extends` clause, if any.
    pub extends: Option<String>,

    /// Copied from the run options when the descriptor was created.
    pub use_metadata_reflection: bool,

    /// Where the class was declared.
    pub source: SourceRef,
}

impl ComponentDescriptor {
    /// Returns `Namespace.Name`, or just the name outside any namespace.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.namespace {
            Some(namespace) => format!("{namespace}.{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Returns the first decorator matching `name`.
    ///
    /// Matching follows [`Annotation::is_named`].
    #[must_use]
    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.is_named(name))
    }

    /// Returns `true` if any decorator matches `name`.
    #[inline]
    #[must_use]
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }

    /// Returns the decorator names in source order.
    pub fn annotation_names(&self) -> impl Iterator<Item = &str> {
        self.annotations.iter().map(|a| a.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceLocation;
    use smallvec::smallvec;

    fn descriptor(namespace: Option<&str>) -> ComponentDescriptor {
        ComponentDescriptor {
            name: "Foo".to_owned(),
            namespace: namespace.map(ToOwned::to_owned),
            comment: None,
            annotations: smallvec![
                Annotation::bare("Polymer.decorators.customElement", SourceLocation::default()),
                Annotation::bare("behavior", SourceLocation::new(2, 0, 40)),
            ],
            extends: None,
            use_metadata_reflection: true,
            source: SourceRef::default(),
        }
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(descriptor(Some("NS")).qualified_name(), "NS.Foo");
        assert_eq!(descriptor(Some("A.B")).qualified_name(), "A.B.Foo");
        assert_eq!(descriptor(None).qualified_name(), "Foo");
    }

    #[test]
    fn test_annotation_lookup() {
        let component = descriptor(None);
        let found = component.annotation("behavior").expect("behavior decorator");
        assert_eq!(found.location.line, 2);
        assert!(component.has_annotation("customElement"));
        assert!(!component.has_annotation("property"));
    }

    #[test]
    fn test_annotation_names_in_order() {
        let d = descriptor(None);
        let names: Vec<_> = d.annotation_names().collect();
        assert_eq!(names, vec!["Polymer.decorators.customElement", "behavior"]);
    }

    #[test]
    fn test_serialization_round_trip() {
        let component = descriptor(Some("NS"));
        let json = serde_json::to_string(&component).unwrap();
        let parsed: ComponentDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(component, parsed);
    }
}
