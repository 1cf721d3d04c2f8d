//! The declaration tree produced by the parser.
//!
//! A [`DeclarationTree`] keeps only the declarations the scanner cares about,
//! namespace headers and class declarations, nested the way they are nested
//! in the source. Every other construct is transparent: its declarations are
//! lifted to the nearest modeled ancestor, which preserves the pre-order of
//! the full syntax tree.
//!
//! ```text
//! namespace App {              Namespace "App"
//!   function setup() {           ├── Class "Inner"
//!     class Inner {}             └── Class "Shell"
//!   }
//!   @component('x')
//!   class Shell {}
//! }
//! ```

use dm_core::{Annotation, ByteSpan, DocComment, SourceLocation};
use smallvec::SmallVec;

/// A `namespace` or `module` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    /// The full name as written (`App`, `App.Elements`, `'vendor-module'`).
    pub name: String,
    /// Where the header starts.
    pub location: SourceLocation,
}

/// A `class` or `abstract class` declaration with a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    /// The class identifier.
    pub name: String,
    /// Decorators in source order, including those written before `export`.
    pub decorators: SmallVec<[Annotation; 2]>,
    /// The documentation block immediately preceding the declaration.
    pub doc_comment: Option<DocComment>,
    /// Text of the `extends` clause.
    pub extends: Option<String>,
    /// Where the declaration starts (its first decorator, if any).
    pub location: SourceLocation,
    /// Extent of the declaration, widened to an enclosing `export` statement.
    pub span: ByteSpan,
}

impl ClassDecl {
    /// Returns `true` if at least one decorator is attached.
    #[inline]
    #[must_use]
    pub fn is_decorated(&self) -> bool {
        !self.decorators.is_empty()
    }
}

/// The kind of a modeled declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    /// A namespace-like declaration.
    Namespace(NamespaceDecl),
    /// A class-like declaration.
    Class(ClassDecl),
}

/// A modeled declaration and the declarations nested inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclNode {
    /// What this node declares.
    pub kind: DeclKind,
    /// Nested declarations in source order.
    pub children: Vec<DeclNode>,
}

/// The top-level declarations of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclarationTree {
    /// Top-level declarations in source order.
    pub nodes: Vec<DeclNode>,
}

impl DeclarationTree {
    /// Returns `true` if the file declares no namespaces or classes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over every declaration in pre-order.
    ///
    /// # Examples
    ///
    /// ```
    /// use dm_ts_parser::TsParser;
    ///
    /// let mut parser = TsParser::new()?;
    /// let result = parser.parse("namespace A { class X {} } class Y {}")?;
    /// assert_eq!(result.declarations.preorder().count(), 3);
    /// # Ok::<(), dm_ts_parser::ParseError>(())
    /// ```
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            stack: self.nodes.iter().rev().collect(),
        }
    }

    /// Iterates over every class declaration in pre-order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassDecl> {
        self.preorder().filter_map(|node| match &node.kind {
            DeclKind::Class(class) => Some(class),
            DeclKind::Namespace(_) => None,
        })
    }
}

/// Pre-order iterator over a [`DeclarationTree`].
#[derive(Debug)]
pub struct Preorder<'a> {
    stack: Vec<&'a DeclNode>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a DeclNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn namespace(name: &str, children: Vec<DeclNode>) -> DeclNode {
        DeclNode {
            kind: DeclKind::Namespace(NamespaceDecl {
                name: name.to_owned(),
                location: SourceLocation::default(),
            }),
            children,
        }
    }

    fn class(name: &str) -> DeclNode {
        DeclNode {
            kind: DeclKind::Class(ClassDecl {
                name: name.to_owned(),
                decorators: SmallVec::new(),
                doc_comment: None,
                extends: None,
                location: SourceLocation::default(),
                span: ByteSpan::default(),
            }),
            children: Vec::new(),
        }
    }

    fn label(node: &DeclNode) -> &str {
        match &node.kind {
            DeclKind::Namespace(ns) => &ns.name,
            DeclKind::Class(class) => &class.name,
        }
    }

    #[test]
    fn test_preorder_visits_parent_before_children() {
        let tree = DeclarationTree {
            nodes: vec![
                namespace("A", vec![class("X"), namespace("B", vec![class("Y")])]),
                class("Z"),
            ],
        };
        let order: Vec<_> = tree.preorder().map(label).collect();
        assert_eq!(order, vec!["A", "X", "B", "Y", "Z"]);
    }

    #[test]
    fn test_classes_skip_namespaces() {
        let tree = DeclarationTree {
            nodes: vec![namespace("A", vec![class("X")]), class("Y")],
        };
        let names: Vec<_> = tree.classes().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["X", "Y"]);
    }

    #[test]
    fn test_empty_tree() {
        assert!(DeclarationTree::default().is_empty());
        assert_eq!(DeclarationTree::default().preorder().count(), 0);
    }
}
