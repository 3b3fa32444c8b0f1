//! Structural layer: the indentation-based group/section notation
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → raw tokens with byte spans
//!     ↓
//! TokenStream → positioned tokens plus Begin / End / Newline
//!     ↓
//! Parser → Root (concrete groups, sections, arguments)
//!     ↓
//! semantic::validate → syntax::Document
//! ```
//!
//! Every stage is error tolerant. Problems are collected as
//! [`ParseError`](crate::base::ParseError)s and the parser always returns a
//! tree, possibly containing [`Target::Invalid`] placeholders.

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
mod lexer;
mod token;
mod token_stream;

pub use ast::{
    Abstraction, Aggregate, Argument, Assignment, Group, Mapping, Root, RootItem, Section, Target,
    Tuple,
};
pub use lexer::{Lexer, RawKind, RawToken, tokenize};
pub use parser::parse_structure;
pub use token::{Token, TokenKind};
pub use token_stream::TokenStream;
