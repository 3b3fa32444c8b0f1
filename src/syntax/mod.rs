//! Typed document model
//!
//! The semantic validator turns the concrete tree of [`crate::parser`] into
//! these nodes. They can be traversed ([`visit`]), rewritten ([`fold`]) and
//! printed back to source text ([`Document::to_code`]).

mod clause;
mod document;
pub mod fold;
pub mod formatter;
mod nodes;
mod to_code;
pub mod visit;

pub use clause::{
    AndGroup, Clause, EquivalentlyGroup, ExistsGroup, ExistsUniqueGroup, ForAllGroup, IfGroup,
    IffGroup, NotGroup, OrGroup, PiecewiseGroup,
};
pub use document::{
    AxiomGroup, ConjectureGroup, DefinesBody, DefinesGroup, Document, EvaluatesGroup,
    FoundationGroup, MetadataItem, MetadataItemKind, MetadataSection, NoteGroup, ProvidingItem,
    ResourceGroup, ResourceItem, ResourceItemKind, ResultBody, SpecifyGroup, SpecifyItem,
    SpecifyKind, StatesGroup, SymbolsItem, TextBlock, TheoremGroup, TopLevelGroup, TopicGroup,
    ViewItem, ViewsGroup, signature_of_group,
};
pub use fold::Folder;
pub use formatter::FormatOptions;
pub use nodes::{Case, IdStatement, Statement, Target, Text};
pub use visit::Visitor;

// Re-export Position from base for convenience
pub use crate::base::Position;
