//! Pre-compiled tree-sitter queries.
//!
//! This module provides the [`SYNTAX_ERROR_QUERY`] used to locate recovery
//! nodes in a parsed tree, and lazily compiled, globally cached instances of
//! it for the TypeScript and TSX grammars.

use std::sync::OnceLock;

use tree_sitter::{Language, Query};

use crate::error::ParseError;

/// Tree-sitter query matching every `ERROR` node.
///
/// # Capture Names
///
/// - `syntax.error` - A node the parser could not fit into the grammar
pub const SYNTAX_ERROR_QUERY: &str = r"
; Regions the parser skipped during error recovery
(ERROR) @syntax.error
";

/// Capture index for `syntax.error`.
pub const CAPTURE_SYNTAX_ERROR: u32 = 0;

/// Global cache for the compiled syntax error query (TypeScript).
static COMPILED_QUERY_TS: OnceLock<Query> = OnceLock::new();

/// Global cache for the compiled syntax error query (TSX).
static COMPILED_QUERY_TSX: OnceLock<Query> = OnceLock::new();

/// Returns the compiled syntax error query for TypeScript.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the query fails to compile.
pub fn get_typescript_error_query() -> Result<&'static Query, ParseError> {
    if let Some(query) = COMPILED_QUERY_TS.get() {
        return Ok(query);
    }

    let language: Language = tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into();
    let query = compile_query(&language)?;

    Ok(COMPILED_QUERY_TS.get_or_init(|| query))
}

/// Returns the compiled syntax error query for TSX.
///
/// # Errors
///
/// Returns [`ParseError::QueryCompile`] if the query fails to compile.
pub fn get_tsx_error_query() -> Result<&'static Query, ParseError> {
    if let Some(query) = COMPILED_QUERY_TSX.get() {
        return Ok(query);
    }

    let language: Language = tree_sitter_typescript::LANGUAGE_TSX.into();
    let query = compile_query(&language)?;

    Ok(COMPILED_QUERY_TSX.get_or_init(|| query))
}

fn compile_query(language: &Language) -> Result<Query, ParseError> {
    Query::new(language, SYNTAX_ERROR_QUERY).map_err(|e| ParseError::QueryCompile {
        offset: e.offset,
        message: e.message,
    })
}
