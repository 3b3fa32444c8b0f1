//! Position tracking for tokens and document nodes
//!
//! Stores the source location (row/column) of tokens and nodes so that
//! diagnostics can point back into the source text.

use std::fmt;

/// A position in source code (0-indexed).
///
/// `-1` in either field means "unknown location"; it is used by default
/// placeholder nodes and by nodes synthesized for pretty-printing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub row: i32,
    pub column: i32,
}

impl Position {
    /// The unknown location
    pub const UNKNOWN: Position = Position {
        row: -1,
        column: -1,
    };

    pub fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Check whether this position points into real source text
    pub fn is_known(&self) -> bool {
        self.row >= 0 && self.column >= 0
    }

    /// Shift a position that is relative to the start of an embedded text
    /// (for example the inside of a quoted statement) so that it becomes
    /// absolute, given the absolute position where the embedded text starts.
    pub fn relative_to(self, origin: Position) -> Position {
        if !self.is_known() || !origin.is_known() {
            return Position::UNKNOWN;
        }
        if self.row == 0 {
            Position::new(origin.row, origin.column + self.column)
        } else {
            Position::new(origin.row + self.row, self.column)
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unknown() {
        assert_eq!(Position::default(), Position::UNKNOWN);
        assert!(!Position::default().is_known());
    }

    #[test]
    fn test_relative_on_first_row_adds_column() {
        let origin = Position::new(3, 10);
        assert_eq!(Position::new(0, 4).relative_to(origin), Position::new(3, 14));
    }

    #[test]
    fn test_relative_on_later_row_keeps_column() {
        let origin = Position::new(3, 10);
        assert_eq!(Position::new(2, 4).relative_to(origin), Position::new(5, 4));
    }

    #[test]
    fn test_relative_unknown_stays_unknown() {
        assert_eq!(
            Position::UNKNOWN.relative_to(Position::new(1, 1)),
            Position::UNKNOWN
        );
    }
}
