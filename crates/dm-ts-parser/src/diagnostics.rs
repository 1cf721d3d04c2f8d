//! Syntax diagnostics for parsed trees.
//!
//! Tree-sitter always produces a tree; invalid input shows up as `ERROR`
//! nodes (skipped text) or `MISSING` nodes (tokens inserted during
//! recovery). [`first_syntax_error`] reports the earliest one.

use streaming_iterator::StreamingIterator;
use tree_sitter::{Node, Query, QueryCursor, Tree};

use crate::error::ParseError;
use crate::queries::CAPTURE_SYNTAX_ERROR;

/// Longest snippet of offending text quoted in a diagnostic.
const MAX_SNIPPET_CHARS: usize = 32;

/// Returns a [`ParseError::Syntax`] for the first `ERROR` or `MISSING` node,
/// or `None` if the tree is clean.
pub fn first_syntax_error(tree: &Tree, source: &str, query: &Query) -> Option<ParseError> {
    let root = tree.root_node();
    if !root.has_error() {
        return None;
    }

    let error = first_error_node(root, source, query);
    let missing = first_missing_node(root);

    let node = match (error, missing) {
        (Some(e), Some(m)) if m.start_byte() < e.start_byte() => m,
        (Some(e), _) => e,
        (None, Some(m)) => m,
        // has_error() guarantees one of the two exists
        (None, None) => root,
    };

    Some(describe(node, source))
}

fn first_error_node<'tree>(root: Node<'tree>, source: &str, query: &Query) -> Option<Node<'tree>> {
    let mut cursor = QueryCursor::new();
    let mut matches = cursor.matches(query, root, source.as_bytes());
    let mut first: Option<Node<'tree>> = None;

    while let Some(match_) = matches.next() {
        for capture in match_.captures {
            if capture.index != CAPTURE_SYNTAX_ERROR {
                continue;
            }
            let node = capture.node;
            if first.is_none_or(|f| node.start_byte() < f.start_byte()) {
                first = Some(node);
            }
        }
    }

    first
}

fn first_missing_node(root: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_missing() {
            return Some(node);
        }

        // Only subtrees containing an error can hold a MISSING node.
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }

        while !cursor.goto_next_sibling() {
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn describe(node: Node<'_>, source: &str) -> ParseError {
    let start = node.start_position();

    let message = if node.is_missing() {
        format!("missing `{}`", node.kind())
    } else {
        let text = source
            .get(node.start_byte()..node.end_byte())
            .unwrap_or_default();
        let snippet: String = text
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or_default()
            .chars()
            .take(MAX_SNIPPET_CHARS)
            .collect();
        if snippet.is_empty() {
            "unexpected input".to_owned()
        } else {
            format!("unexpected `{snippet}`")
        }
    };

    ParseError::Syntax {
        line: start.row as u32 + 1,
        column: start.column as u32,
        message,
    }
}
