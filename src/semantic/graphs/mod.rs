//! Graphs built from validated documents

mod type_graph;

pub use type_graph::{TypeGraphError, TypeManager};
