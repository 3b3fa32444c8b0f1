//! Helpers for parsing fixtures and inspecting diagnostics.

use theora::semantic::TypeManager;
use theora::syntax::{Document, TopLevelGroup};
use theora::{ParseError, parse, parse_and_check};

/// Parse a source that must be free of errors.
pub fn parse_ok(source: &str) -> Document {
    let result = parse(source);
    assert!(
        result.errors.is_empty(),
        "Expected no errors, got {} error(s):\n{}",
        result.errors.len(),
        render_errors(&result.errors)
    );
    result.content.unwrap_or_default()
}

/// Register every group of an error-free source with a fresh type manager.
pub fn types_from(source: &str) -> TypeManager {
    let mut types = TypeManager::new();
    let result = parse_and_check(source, &mut types);
    assert!(
        result.errors.is_empty(),
        "Expected no errors, got:\n{}",
        render_errors(&result.errors)
    );
    types
}

/// The messages of a list of errors
pub fn messages(errors: &[ParseError]) -> Vec<&str> {
    errors.iter().map(|e| e.message.as_str()).collect()
}

pub fn render_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| format!("  {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Kind names of the groups of a document
pub fn kinds(document: &Document) -> Vec<&'static str> {
    document.groups.iter().map(TopLevelGroup::kind_name).collect()
}
