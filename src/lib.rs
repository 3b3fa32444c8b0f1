//! # theora-base
//!
//! Core library for parsing, validating and type-resolving structured
//! mathematical documents.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! semantic    → validators, type graph, symbol analysis
//!   ↓
//! syntax      → typed document model, printer, visitor, fold
//!   ↓
//! expression  → LaTeX-like statement notation, signatures
//!   ↓
//! parser      → Logos lexer, layout tokens, recursive-descent parser
//!   ↓
//! base        → Position, LineIndex, ParseError/ParseResult
//! ```
//!
//! ## Example
//!
//! ```
//! let result = theora::parse("[\\f(x)]\nDefines: f(x)\nmeans: 'f(x) is \\real'\n");
//! assert!(result.errors.is_empty());
//! let document = result.content.unwrap();
//! let signature = theora::syntax::signature_of_group(&document.groups[0]);
//! assert_eq!(signature.as_deref(), Some("f/1"));
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → expression → syntax → semantic)
// ============================================================================

/// Foundation types: Position, LineIndex, diagnostics
pub mod base;

/// Structural layer: Logos lexer, token stream, concrete tree, parser
pub mod parser;

/// Expression layer: statement notation and canonical signatures
pub mod expression;

/// Typed document model: nodes, printer, traversal
pub mod syntax;

/// Validation, type graph and symbol analysis
pub mod semantic;

// Re-export foundation types
pub use base::{ErrorKind, LineIndex, ParseError, ParseResult, Position, TextRange, TextSize};

// Re-export the document model and the semantic entry points
pub use semantic::{SymbolAnalyzer, TypeGraphError, TypeManager};
pub use syntax::{Document, FormatOptions, TopLevelGroup, signature_of_group};

use tracing::debug;

/// Parse and validate a document.
///
/// The document is always present; malformed constructs are replaced by
/// their defaults and reported in `errors`.
pub fn parse(text: &str) -> ParseResult<Document> {
    let (root, mut errors) = parser::parse_structure(text);
    let (document, semantic_errors) = semantic::validate(&root);
    errors.extend(semantic_errors);
    debug!(
        groups = document.groups.len(),
        errors = errors.len(),
        "parsed document"
    );
    ParseResult::with_content_and_errors(document, errors)
}

/// Parse a document, register its defines-like groups with `types` and
/// check the base types of its identifiers.
pub fn parse_and_check(text: &str, types: &mut TypeManager) -> ParseResult<Document> {
    let mut result = parse(text);
    if let Some(document) = &result.content {
        for group in &document.groups {
            if let Err(error) = types.add(group) {
                result
                    .errors
                    .push(ParseError::semantic(error.to_string(), group.position()));
            }
        }
        let analyzer = SymbolAnalyzer::new(types);
        result.errors.extend(analyzer.analyze(document));
    }
    result
}
