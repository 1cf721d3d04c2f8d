//! Component extraction from declaration trees.
//!
//! The walk is a pre-order visit over a file's [`DeclarationTree`] that
//! threads a [`WalkState`] by value. Namespace tracking is flat: visiting a
//! namespace header overwrites the current namespace and leaving it restores
//! nothing, so a class is attributed to the last header seen before it in
//! source order, not to its enclosing scope.
//!
//! ```text
//! namespace A {          current = A
//!   namespace B {}       current = B
//!   @C class X {}        X.namespace = B
//! }
//! @C class Y {}          Y.namespace = B
//! ```

use dm_core::{CommentRole, ComponentDescriptor, SourceRef};
use dm_ts_parser::{ClassDecl, DeclKind, DeclNode};

use crate::source::SourceFile;

/// State threaded through the walk of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkState {
    /// Name of the most recently visited namespace header.
    pub namespace: Option<String>,

    /// Descriptors produced so far, in visit order.
    pub components: Vec<ComponentDescriptor>,
}

/// Visits declaration nodes of one file and builds descriptors.
#[derive(Debug, Clone, Copy)]
pub struct ComponentWalker<'a> {
    file: &'a SourceFile,
    use_metadata_reflection: bool,
}

impl<'a> ComponentWalker<'a> {
    /// Creates a walker for `file`.
    #[must_use]
    pub const fn new(file: &'a SourceFile, use_metadata_reflection: bool) -> Self {
        Self {
            file,
            use_metadata_reflection,
        }
    }

    /// Visits `node` and its descendants in pre-order.
    #[must_use]
    pub fn visit(&self, node: &DeclNode, mut state: WalkState) -> WalkState {
        match &node.kind {
            DeclKind::Namespace(namespace) => {
                state.namespace = Some(namespace.name.clone());
            }
            DeclKind::Class(class) if class.is_decorated() => {
                let component = self.describe(class, state.namespace.clone());
                state.components.push(component);
            }
            DeclKind::Class(_) => {}
        }

        node.children
            .iter()
            .fold(state, |state, child| self.visit(child, state))
    }

    fn describe(&self, class: &ClassDecl, namespace: Option<String>) -> ComponentDescriptor {
        ComponentDescriptor {
            name: class.name.clone(),
            namespace,
            comment: class
                .doc_comment
                .clone()
                .map(|comment| comment.with_role(CommentRole::Component)),
            annotations: class.decorators.clone(),
            extends: class.extends.clone(),
            use_metadata_reflection: self.use_metadata_reflection,
            source: SourceRef {
                path: self.file.path.clone(),
                location: class.location,
                span: class.span,
            },
        }
    }
}

/// Extracts the component descriptors of one file in pre-order.
///
/// Every class with at least one decorator yields a descriptor; undecorated
/// classes are skipped, and a file without components yields an empty list.
///
/// # Examples
///
/// ```ignore
/// let file = loader.load(path)?;
/// for component in extract(&file, false) {
///     println!("{}", component.qualified_name());
/// }
/// ```
#[must_use]
pub fn extract(file: &SourceFile, use_metadata_reflection: bool) -> Vec<ComponentDescriptor> {
    let walker = ComponentWalker::new(file, use_metadata_reflection);
    file.declarations
        .nodes
        .iter()
        .fold(WalkState::default(), |state, node| walker.visit(node, state))
        .components
}
