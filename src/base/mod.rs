//! Foundation types for the theora toolchain.
//!
//! This module provides fundamental types used throughout the library:
//! - [`Position`] - Row/column positions carried by tokens and nodes
//! - [`LineIndex`] - Byte offset to row/column conversion
//! - [`ParseError`], [`ParseResult`] - Accumulated diagnostics
//!
//! This module has NO dependencies on other theora modules.

mod error;
mod line_index;
mod position;

pub use error::{ErrorKind, ParseError, ParseResult};
pub use line_index::LineIndex;
pub use position::Position;

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
