//! # Semantic layer
//!
//! Turns the concrete tree into a typed [`Document`](crate::syntax::Document)
//! and reasons about the definitions it contains.
//!
//! - [`validate`]: one section grammar and validator per construct kind
//! - [`TypeManager`]: `is` and viewable-as graph keyed by signature
//! - [`SymbolAnalyzer`]: reports identifiers with incompatible base types

pub mod analysis;
pub mod grammar;
pub mod graphs;
mod validate;

pub use analysis::SymbolAnalyzer;
pub use grammar::{Arity, Rule};
pub use graphs::{TypeGraphError, TypeManager};
pub use validate::validate;
