//! Diagnostics shared by every layer.
//!
//! Errors are accumulated as values, never thrown across the public API:
//! every stage pushes [`ParseError`]s into a list and keeps going.

use super::Position;
use thiserror::Error;

/// Which stage of the pipeline reported a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// Unrecognized character or malformed token
    Lexical,
    /// Expected token not found, unexpected end of input
    Structural,
    /// Missing, unexpected or out-of-order section, wrong argument count
    SectionGrammar,
    /// Cross-field and type-level problems
    Semantic,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Structural => "structural",
            Self::SectionGrammar => "section-grammar",
            Self::Semantic => "semantic",
        }
    }
}

/// A diagnostic with a message and a 0-indexed source location.
///
/// `row`/`column` are `-1` when the location is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("{row}:{column}: {message}")]
pub struct ParseError {
    pub message: String,
    pub row: i32,
    pub column: i32,
    pub kind: ErrorKind,
}

impl ParseError {
    pub fn new(message: impl Into<String>, position: Position, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            row: position.row,
            column: position.column,
            kind,
        }
    }

    pub fn lexical(message: impl Into<String>, position: Position) -> Self {
        Self::new(message, position, ErrorKind::Lexical)
    }

    pub fn structural(message: impl Into<String>, position: Position) -> Self {
        Self::new(message, position, ErrorKind::Structural)
    }

    pub fn section(message: impl Into<String>, position: Position) -> Self {
        Self::new(message, position, ErrorKind::SectionGrammar)
    }

    pub fn semantic(message: impl Into<String>, position: Position) -> Self {
        Self::new(message, position, ErrorKind::Semantic)
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.column)
    }
}

/// Parse result containing content and any errors
#[derive(Debug, Clone)]
pub struct ParseResult<T> {
    pub content: Option<T>,
    pub errors: Vec<ParseError>,
}

impl<T> ParseResult<T> {
    pub fn ok(content: T) -> Self {
        Self {
            content: Some(content),
            errors: Vec::new(),
        }
    }

    pub fn with_content_and_errors(content: T, errors: Vec<ParseError>) -> Self {
        Self {
            content: Some(content),
            errors,
        }
    }

    /// Check if parsing succeeded without errors
    pub fn is_ok(&self) -> bool {
        self.content.is_some() && self.errors.is_empty()
    }

    /// Check if there are any parse errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get the parsed document (alias for content)
    pub fn document(&self) -> Option<&T> {
        self.content.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_location() {
        let err = ParseError::structural("Expected ':'", Position::new(2, 7));
        assert_eq!(err.to_string(), "2:7: Expected ':'");
    }

    #[test]
    fn test_unknown_location() {
        let err = ParseError::semantic("cycle", Position::UNKNOWN);
        assert_eq!(err.row, -1);
        assert_eq!(err.column, -1);
        assert_eq!(err.kind.as_str(), "semantic");
    }

    #[test]
    fn test_parse_result_flags() {
        let ok: ParseResult<u8> = ParseResult::ok(1);
        assert!(ok.is_ok());
        let failed: ParseResult<u8> =
            ParseResult::with_content_and_errors(1, vec![ParseError::lexical("x", Position::new(0, 0))]);
        assert!(!failed.is_ok());
        assert!(failed.has_errors());
        assert_eq!(failed.document(), Some(&1));
    }
}
