//! Base-type consistency of identifiers.
//!
//! Within one group, an identifier declared with `x is \a` and `x is \b`
//! must have types that share a root in the type graph. When the roots of
//! all its declared types are disjoint the identifier is reported.

use crate::base::{ParseError, Position};
use crate::expression::ExprNode;
use crate::semantic::TypeManager;
use crate::syntax::{Document, Statement, TopLevelGroup, Visitor};
use indexmap::{IndexMap, IndexSet};
use smol_str::SmolStr;
use tracing::{debug, trace};

pub struct SymbolAnalyzer<'a> {
    types: &'a TypeManager,
}

impl<'a> SymbolAnalyzer<'a> {
    pub fn new(types: &'a TypeManager) -> Self {
        Self { types }
    }

    pub fn analyze(&self, document: &Document) -> Vec<ParseError> {
        document
            .groups
            .iter()
            .flat_map(|group| self.analyze_group(group))
            .collect()
    }

    pub fn analyze_group(&self, group: &TopLevelGroup) -> Vec<ParseError> {
        let mut collector = Collector::default();
        collector.visit_group(group);
        trace!(
            kind = group.kind_name(),
            identifiers = collector.occurrences.len(),
            "collected identifiers"
        );

        let mut errors = Vec::new();
        for (name, signatures) in &collector.declared {
            if signatures.len() < 2 || self.share_root(signatures) {
                continue;
            }
            let position = collector
                .occurrences
                .get(name)
                .copied()
                .unwrap_or(Position::UNKNOWN);
            let listed = signatures
                .iter()
                .map(SmolStr::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            errors.push(ParseError::semantic(
                format!(
                    "Identifier '{}' has multiple incompatible base types: {}",
                    name, listed
                ),
                position,
            ));
        }
        if !errors.is_empty() {
            debug!(kind = group.kind_name(), errors = errors.len(), "conflicting base types");
        }
        errors
    }

    /// Whether the root sets of every signature intersect
    fn share_root(&self, signatures: &IndexSet<SmolStr>) -> bool {
        let mut roots = signatures.iter().map(|signature| self.types.roots(signature));
        let Some(first) = roots.next() else {
            return true;
        };
        let common = roots.fold(first, |common, next| {
            common.into_iter().filter(|root| next.contains(root)).collect()
        });
        !common.is_empty()
    }
}

/// Identifier occurrences and `is` declarations of one group
#[derive(Default)]
struct Collector {
    /// First occurrence of each identifier name
    occurrences: IndexMap<SmolStr, Position>,
    /// Signatures each identifier is declared to be
    declared: IndexMap<SmolStr, IndexSet<SmolStr>>,
}

impl Visitor for Collector {
    fn visit_statement(&mut self, statement: &Statement) {
        let Some(expression) = &statement.expression else {
            return;
        };
        expression.root.for_each(&mut |node| {
            if let ExprNode::Identifier(identifier) = node {
                self.occurrences
                    .entry(identifier.name.clone())
                    .or_insert(identifier.position);
            }
        });

        let Some((lhs, rhs)) = expression.as_is() else {
            return;
        };
        let types: Vec<SmolStr> = rhs
            .iter()
            .filter_map(|node| match node {
                ExprNode::Command(command) => Some(command.signature()),
                _ => None,
            })
            .collect();
        for node in lhs {
            if let ExprNode::Identifier(identifier) = node {
                self.declared
                    .entry(identifier.name.clone())
                    .or_default()
                    .extend(types.iter().cloned());
            }
        }
    }
}
