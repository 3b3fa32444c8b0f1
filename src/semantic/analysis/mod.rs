//! Checks that run over validated groups with a populated [`TypeManager`](super::TypeManager)

mod symbols;

pub use symbols::SymbolAnalyzer;
