//! Declaration extraction from TypeScript syntax trees.
//!
//! This module turns a tree-sitter [`Tree`] into a [`DeclarationTree`] by
//! keeping namespace headers and named class declarations and lifting every
//! other construct out of the way.

use dm_core::{Annotation, ByteSpan, DocComment, SourceLocation};
use smallvec::SmallVec;
use tree_sitter::{Node, Tree};

use crate::syntax::{ClassDecl, DeclKind, DeclNode, DeclarationTree, NamespaceDecl};

/// Node kinds that open a namespace (`namespace X {}` and `module X {}`).
const NAMESPACE_KINDS: &[&str] = &["internal_module", "module"];

/// Node kinds that declare a class.
const CLASS_KINDS: &[&str] = &["class_declaration", "abstract_class_declaration"];

/// Statements that wrap a declaration without changing what it declares.
const WRAPPER_KINDS: &[&str] = &["export_statement", "ambient_declaration"];

/// Builds the declaration tree for a parsed file.
///
/// # Arguments
///
/// * `tree` - The parsed syntax tree
/// * `source` - The original source code (needed to extract text from nodes)
///
/// # Examples
///
/// ```ignore
/// let tree = parser.parse(source, None)?;
/// let declarations = extract_declarations(&tree, source);
/// ```
pub fn extract_declarations(tree: &Tree, source: &str) -> DeclarationTree {
    let root = tree.root_node();
    let mut open = vec![Frame {
        id: root.id(),
        kind: None,
        children: Vec::new(),
    }];

    // Pre-order walk with a cursor; nesting depth is bounded by the heap,
    // not the call stack.
    let mut cursor = tree.walk();
    if cursor.goto_first_child() {
        'walk: loop {
            let node = cursor.node();
            if let Some(kind) = declaration_kind(node, source) {
                open.push(Frame {
                    id: node.id(),
                    kind: Some(kind),
                    children: Vec::new(),
                });
            }

            if cursor.goto_first_child() {
                continue;
            }

            loop {
                close(&mut open, cursor.node().id());
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() || cursor.node().id() == root.id() {
                    break 'walk;
                }
            }
        }
    }

    DeclarationTree {
        nodes: open.into_iter().next().map(|frame| frame.children).unwrap_or_default(),
    }
}

/// A declaration whose subtree is still being walked.
struct Frame {
    id: usize,
    kind: Option<DeclKind>,
    children: Vec<DeclNode>,
}

/// Finishes the innermost open declaration if it belongs to node `id`.
fn close(open: &mut Vec<Frame>, id: usize) {
    if open.len() < 2 || open.last().is_none_or(|frame| frame.id != id) {
        return;
    }
    let Some(Frame {
        kind: Some(kind),
        children,
        ..
    }) = open.pop()
    else {
        return;
    };
    if let Some(parent) = open.last_mut() {
        parent.children.push(DeclNode { kind, children });
    }
}

/// Classifies `node` as a namespace or named class declaration.
fn declaration_kind(node: Node<'_>, source: &str) -> Option<DeclKind> {
    let kind = node.kind();
    if NAMESPACE_KINDS.contains(&kind) {
        namespace_decl(node, source).map(DeclKind::Namespace)
    } else if CLASS_KINDS.contains(&kind) {
        class_decl(node, source).map(DeclKind::Class)
    } else {
        None
    }
}

fn namespace_decl(node: Node<'_>, source: &str) -> Option<NamespaceDecl> {
    let name = node.child_by_field_name("name")?;
    Some(NamespaceDecl {
        name: node_text(name, source)?.to_owned(),
        location: node_to_location(node),
    })
}

fn class_decl(node: Node<'_>, source: &str) -> Option<ClassDecl> {
    let name = node_text(node.child_by_field_name("name")?, source)?.to_owned();
    let outer = outermost_wrapper(node);

    // Decorators written before `export` come first in source order.
    let mut decorators: SmallVec<[Annotation; 2]> = SmallVec::new();
    let mut wrappers = Vec::new();
    let mut current = node.parent();
    while let Some(parent) = current {
        if !WRAPPER_KINDS.contains(&parent.kind()) {
            break;
        }
        wrappers.push(parent);
        current = parent.parent();
    }
    for wrapper in wrappers.iter().rev() {
        decorators.extend(decorators_of(*wrapper, source));
    }
    decorators.extend(decorators_of(node, source));

    Some(ClassDecl {
        name,
        decorators,
        doc_comment: leading_doc_comment(outer, source),
        extends: extends_clause(node, source),
        location: node_to_location(outer),
        span: node_to_span(outer),
    })
}

/// Returns the `export`/`declare` statement enclosing `node`, or `node` itself.
fn outermost_wrapper(node: Node<'_>) -> Node<'_> {
    let mut outer = node;
    while let Some(parent) = outer.parent() {
        if !WRAPPER_KINDS.contains(&parent.kind()) {
            break;
        }
        outer = parent;
    }
    outer
}

fn decorators_of(node: Node<'_>, source: &str) -> SmallVec<[Annotation; 2]> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() == "decorator")
        .filter_map(|decorator| annotation_from(decorator, source))
        .collect()
}

/// Converts a `decorator` node into an [`Annotation`].
///
/// The decorator content is an identifier (`@Foo`), a member expression
/// (`@a.b.Foo`) or a call of either (`@Foo(...)`).
fn annotation_from(decorator: Node<'_>, source: &str) -> Option<Annotation> {
    let raw = node_text(decorator, source)?.to_owned();
    let mut cursor = decorator.walk();
    let expression = decorator
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment")?;

    let (name, arguments, is_call) = if expression.kind() == "call_expression" {
        let function = expression.child_by_field_name("function")?;
        let arguments = expression
            .child_by_field_name("arguments")
            .map(|args| argument_texts(args, source))
            .unwrap_or_default();
        (node_text(function, source)?, arguments, true)
    } else {
        (node_text(expression, source)?, SmallVec::new(), false)
    };

    Some(Annotation {
        name: name.to_owned(),
        arguments,
        is_call,
        raw,
        location: node_to_location(decorator),
    })
}

fn argument_texts(arguments: Node<'_>, source: &str) -> SmallVec<[String; 4]> {
    // Tagged templates (`@Foo`...``) have a single template argument.
    if arguments.kind() != "arguments" {
        return node_text(arguments, source)
            .map(|text| SmallVec::from_iter([text.to_owned()]))
            .unwrap_or_default();
    }

    let mut cursor = arguments.walk();
    arguments
        .named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .filter_map(|child| node_text(child, source))
        .map(str::to_owned)
        .collect()
}

/// Finds the documentation block immediately preceding `anchor`.
///
/// Only comments directly before the declaration are considered; the nearest
/// `/** ... */` among them wins.
fn leading_doc_comment(anchor: Node<'_>, source: &str) -> Option<DocComment> {
    let mut current = anchor.prev_sibling();
    while let Some(node) = current {
        if node.kind() != "comment" {
            return None;
        }
        let text = node_text(node, source)?;
        if DocComment::is_doc_block(text) {
            return Some(DocComment::new(text, node_to_location(node)));
        }
        current = node.prev_sibling();
    }
    None
}

fn extends_clause(class: Node<'_>, source: &str) -> Option<String> {
    let mut cursor = class.walk();
    let heritage = class
        .named_children(&mut cursor)
        .find(|child| child.kind() == "class_heritage")?;

    let mut cursor = heritage.walk();
    let clause = heritage
        .named_children(&mut cursor)
        .find(|child| child.kind() == "extends_clause")?;

    let text = node_text(clause, source)?;
    let base = text.strip_prefix("extends").unwrap_or(text).trim();
    (!base.is_empty()).then(|| base.to_owned())
}

/// Extracts text from a node.
fn node_text<'a>(node: Node<'_>, source: &'a str) -> Option<&'a str> {
    source.get(node.start_byte()..node.end_byte())
}

/// Converts a node's position to a [`SourceLocation`].
///
/// # Note
///
/// The casts from `usize` to `u32` are safe because source files
/// are limited to 4GB, which fits in `u32`.
#[allow(clippy::cast_possible_truncation)]
fn node_to_location(node: Node<'_>) -> SourceLocation {
    let start = node.start_position();
    SourceLocation::new(
        start.row as u32 + 1, // Convert 0-indexed to 1-indexed
        start.column as u32,
        node.start_byte() as u32,
    )
}

#[allow(clippy::cast_possible_truncation)]
fn node_to_span(node: Node<'_>) -> ByteSpan {
    ByteSpan::new(node.start_byte() as u32, node.end_byte() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::{Language, Parser};

    fn declarations(source: &str) -> DeclarationTree {
        let mut parser = Parser::new();
        let language: Language = tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into();
        parser
            .set_language(&language)
            .expect("Failed to set language");
        let tree = parser.parse(source, None).expect("Parse failed");
        extract_declarations(&tree, source)
    }

    fn only_class(tree: &DeclarationTree) -> &ClassDecl {
        let classes: Vec<_> = tree.classes().collect();
        assert_eq!(classes.len(), 1, "expected exactly one class");
        classes[0]
    }

    #[test]
    fn test_namespace_contains_class() {
        let tree = declarations("namespace NS { @Component class Foo {} }");
        assert_eq!(tree.nodes.len(), 1);

        let DeclKind::Namespace(ns) = &tree.nodes[0].kind else {
            panic!("Expected namespace, got {:?}", tree.nodes[0].kind);
        };
        assert_eq!(ns.name, "NS");
        assert_eq!(tree.nodes[0].children.len(), 1);

        let class = only_class(&tree);
        assert_eq!(class.name, "Foo");
        assert_eq!(class.decorators.len(), 1);
        assert_eq!(class.decorators[0].name, "Component");
        assert!(!class.decorators[0].is_call);
    }

    #[test]
    fn test_dotted_and_module_names() {
        let tree = declarations("namespace App.Elements { }\nmodule Legacy { }");
        let names: Vec<_> = tree
            .preorder()
            .filter_map(|node| match &node.kind {
                DeclKind::Namespace(ns) => Some(ns.name.as_str()),
                DeclKind::Class(_) => None,
            })
            .collect();
        assert_eq!(names, vec!["App.Elements", "Legacy"]);
    }

    #[test]
    fn test_call_decorator_arguments() {
        let tree = declarations(
            "@Polymer.decorators.customElement('my-el', { shadow: true })\nclass MyEl {}",
        );
        let class = only_class(&tree);
        let annotation = &class.decorators[0];

        assert_eq!(annotation.name, "Polymer.decorators.customElement");
        assert!(annotation.is_call);
        assert_eq!(annotation.arguments.len(), 2);
        assert_eq!(annotation.arguments[0], "'my-el'");
        assert_eq!(annotation.arguments[1], "{ shadow: true }");
        assert_eq!(
            annotation.raw,
            "@Polymer.decorators.customElement('my-el', { shadow: true })"
        );
        assert_eq!(annotation.location.line, 1);
    }

    #[test]
    fn test_decorators_keep_source_order() {
        let tree = declarations("@A @B() @C(1)\nclass Multi {}");
        let class = only_class(&tree);
        let names: Vec<_> = class.decorators.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_decorators_before_export() {
        let source = "@component('x-el')\nexport class XEl extends Polymer.Element {}";
        let tree = declarations(source);
        let class = only_class(&tree);

        assert_eq!(class.decorators.len(), 1);
        assert_eq!(class.decorators[0].name, "component");
        assert_eq!(class.extends.as_deref(), Some("Polymer.Element"));
        assert_eq!(class.span.slice(source), Some(source));
    }

    #[test]
    fn test_doc_comment_nearest_block_wins() {
        let source = "/** Older. */\n// note\n/**\n * The shell.\n */\n@Component\nclass Shell {}";
        let tree = declarations(source);
        let comment = only_class(&tree)
            .doc_comment
            .as_ref()
            .expect("should find doc comment");

        assert_eq!(comment.text, "The shell.");
        assert_eq!(comment.location.line, 3);
        assert_eq!(comment.role, None);
    }

    #[test]
    fn test_comment_separated_by_statement_is_ignored() {
        let source = "/** Not mine. */\nconst x = 1;\n@Component\nclass Foo {}";
        let tree = declarations(source);
        assert!(only_class(&tree).doc_comment.is_none());
    }

    #[test]
    fn test_plain_block_comment_is_not_doc() {
        let tree = declarations("/* plain */\n@Component class Foo {}");
        assert!(only_class(&tree).doc_comment.is_none());
    }

    #[test]
    fn test_class_nested_in_function_is_lifted() {
        let source = "namespace App {\n  function setup() {\n    @Inner class Inner {}\n  }\n}";
        let tree = declarations(source);

        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(tree.nodes[0].children.len(), 1);
        assert_eq!(only_class(&tree).name, "Inner");
    }

    #[test]
    fn test_abstract_and_undecorated_classes() {
        let tree = declarations("abstract class Base {}\nclass Plain {}");
        let classes: Vec<_> = tree.classes().collect();

        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].name, "Base");
        assert!(!classes[0].is_decorated());
        assert!(!classes[1].is_decorated());
        assert!(classes[1].extends.is_none());
    }

    #[test]
    fn test_deeply_nested_expression() {
        let depth = 5_000;
        let source = format!(
            "const x = {}1{};\nnamespace NS {{ @C class Foo {{}} }}",
            "[".repeat(depth),
            "]".repeat(depth)
        );
        let tree = declarations(&source);

        assert_eq!(tree.nodes.len(), 1);
        assert_eq!(only_class(&tree).name, "Foo");
    }

    #[test]
    fn test_siblings_after_nested_declarations() {
        let source = "namespace A { namespace B { @X class Inner {} } }\n@Y class After {}";
        let tree = declarations(source);

        assert_eq!(tree.nodes.len(), 2);
        assert_eq!(tree.nodes[0].children.len(), 1);
        assert_eq!(tree.nodes[0].children[0].children.len(), 1);
        assert!(matches!(&tree.nodes[1].kind, DeclKind::Class(c) if c.name == "After"));
    }

    #[test]
    fn test_location_is_one_indexed() {
        let tree = declarations("\n\n@Component\nclass Foo {}");
        let class = only_class(&tree);
        assert_eq!(class.location.line, 3);
        assert_eq!(class.location.column, 0);
    }
}
