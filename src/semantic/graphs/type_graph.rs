//! Type graph of defines-like groups.
//!
//! Keyed by canonical signature (`name/arity`), the graph holds:
//! - the group registered for each signature
//! - the `is` parent of each signature, taken from the first statement of
//!   its `means` section (`f(x) is \real` gives `f/1 -> real/0`)
//! - the signatures each one is viewable as, from its `providing` views
//!
//! Parent edges always form a forest: an edge that would close a cycle is
//! rejected by [`TypeManager::add`]. Viewable-as edges may form cycles and
//! every traversal over them carries a visited set.

use crate::expression::ExprNode;
use crate::syntax::{ProvidingItem, Statement, TopLevelGroup};
use indexmap::IndexSet;
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use std::collections::VecDeque;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Errors raised while registering a group
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeGraphError {
    /// The `is` parent of `signature` leads back to `signature`
    #[error("The 'is' relation of '{signature}' forms a cycle: {}", .chain.join(" -> "))]
    Cycle {
        signature: SmolStr,
        chain: Vec<SmolStr>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct TypeManager {
    sig_to_group: FxHashMap<SmolStr, TopLevelGroup>,
    sig_to_parent: FxHashMap<SmolStr, SmolStr>,
    sig_to_viewables: FxHashMap<SmolStr, IndexSet<SmolStr>>,
}

impl TypeManager {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a `Defines` or `Foundation` group; other groups are ignored.
    ///
    /// Re-adding a signature replaces its previous entries. When the `is`
    /// parent would close a cycle the group and its viewables are still
    /// registered but the parent edge is not.
    pub fn add(&mut self, group: &TopLevelGroup) -> Result<(), TypeGraphError> {
        let (signature, parent, viewables) = match group {
            TopLevelGroup::Defines(defines) => (
                defines.id.signature.clone(),
                defines.body.first_means_statement().and_then(is_parent),
                defines
                    .providing
                    .as_deref()
                    .map(view_signatures)
                    .unwrap_or_default(),
            ),
            TopLevelGroup::Foundation(foundation) => (
                foundation.id.signature.clone(),
                foundation.body.first_means_statement().and_then(is_parent),
                IndexSet::new(),
            ),
            _ => return Ok(()),
        };
        let Some(signature) = signature else {
            return Ok(());
        };

        self.remove_signature(&signature);
        debug!(%signature, ?parent, viewables = viewables.len(), "registering definition");
        self.sig_to_group.insert(signature.clone(), group.clone());
        if !viewables.is_empty() {
            self.sig_to_viewables.insert(signature.clone(), viewables);
        }

        let Some(parent) = parent else {
            return Ok(());
        };
        if let Some(chain) = self.cycle_through(&signature, &parent) {
            warn!(%signature, %parent, "rejecting 'is' edge that closes a cycle");
            return Err(TypeGraphError::Cycle { signature, chain });
        }
        trace!(%signature, %parent, "is edge");
        self.sig_to_parent.insert(signature, parent);
        Ok(())
    }

    /// Forget a group. Does nothing if it was never added.
    pub fn remove(&mut self, group: &TopLevelGroup) {
        if let Some(signature) = crate::syntax::signature_of_group(group) {
            self.remove_signature(&signature);
        }
    }

    pub fn remove_signature(&mut self, signature: &str) {
        let removed = self.sig_to_group.remove(signature).is_some();
        self.sig_to_parent.remove(signature);
        self.sig_to_viewables.remove(signature);
        if removed {
            trace!(signature, "removed definition");
        }
    }

    /// The chain `signature -> parent -> ... -> signature` if adding the
    /// edge `signature -> parent` would close a cycle
    fn cycle_through(&self, signature: &str, parent: &SmolStr) -> Option<Vec<SmolStr>> {
        let mut chain = vec![SmolStr::new(signature)];
        let mut visited = FxHashSet::default();
        let mut current = Some(parent.clone());
        while let Some(node) = current {
            chain.push(node.clone());
            if node == signature {
                return Some(chain);
            }
            if !visited.insert(node.clone()) {
                return None;
            }
            current = self.sig_to_parent.get(&node).cloned();
        }
        None
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get_defines(&self, signature: &str) -> Option<&TopLevelGroup> {
        self.sig_to_group.get(signature)
    }

    /// Registered signatures in sorted order
    pub fn signatures(&self) -> Vec<&SmolStr> {
        let mut out: Vec<_> = self.sig_to_group.keys().collect();
        out.sort();
        out
    }

    pub fn is_empty(&self) -> bool {
        self.sig_to_group.is_empty()
    }

    pub fn parent_of(&self, signature: &str) -> Option<&SmolStr> {
        self.sig_to_parent.get(signature)
    }

    pub fn viewables_of(&self, signature: &str) -> Option<&IndexSet<SmolStr>> {
        self.sig_to_viewables.get(signature)
    }

    /// Whether `target` is `signature` or one of its `is` ancestors
    pub fn is_sig_descendant_of(&self, signature: &str, target: &str) -> bool {
        let mut visited = FxHashSet::default();
        let mut current = Some(signature);
        while let Some(node) = current {
            if node == target {
                return true;
            }
            if !visited.insert(node) {
                warn!(signature, "cycle in 'is' chain");
                return false;
            }
            current = self.sig_to_parent.get(node).map(SmolStr::as_str);
        }
        false
    }

    /// Breadth-first search over viewable-as and parent edges for a node
    /// that is `target` or descends from it
    pub fn is_sig_viewable_as(&self, signature: &str, target: &str) -> bool {
        let mut visited: FxHashSet<&str> = FxHashSet::default();
        let mut queue: VecDeque<&str> = VecDeque::new();
        visited.insert(signature);
        self.push_neighbors(signature, &mut visited, &mut queue);
        while let Some(node) = queue.pop_front() {
            trace!(node, target, "viewable-as step");
            if self.is_sig_descendant_of(node, target) {
                return true;
            }
            self.push_neighbors(node, &mut visited, &mut queue);
        }
        false
    }

    fn push_neighbors<'a>(
        &'a self,
        node: &str,
        visited: &mut FxHashSet<&'a str>,
        queue: &mut VecDeque<&'a str>,
    ) {
        let viewables = self.sig_to_viewables.get(node).into_iter().flatten();
        let parent = self.sig_to_parent.get(node);
        for next in viewables.chain(parent) {
            if visited.insert(next.as_str()) {
                queue.push_back(next.as_str());
            }
        }
    }

    /// `signature` satisfies `target` by descent or by a view
    pub fn is_sig_is(&self, signature: &str, target: &str) -> bool {
        self.is_sig_descendant_of(signature, target) || self.is_sig_viewable_as(signature, target)
    }

    /// `signature` followed by each of its `is` ancestors up to the root
    pub fn lineage(&self, signature: &str) -> Vec<SmolStr> {
        let mut out = vec![SmolStr::new(signature)];
        let mut visited: FxHashSet<SmolStr> = FxHashSet::default();
        visited.insert(SmolStr::new(signature));
        let mut current = self.sig_to_parent.get(signature);
        while let Some(node) = current {
            if !visited.insert(node.clone()) {
                warn!(signature, "cycle in 'is' chain");
                break;
            }
            out.push(node.clone());
            current = self.sig_to_parent.get(node);
        }
        out
    }

    /// Deepest signature shared by the lineages of every input.
    ///
    /// `None` for an empty input or when the roots differ.
    pub fn least_common_ancestor<S: AsRef<str>>(&self, signatures: &[S]) -> Option<SmolStr> {
        let lineages: Vec<Vec<SmolStr>> = signatures
            .iter()
            .map(|signature| {
                let mut lineage = self.lineage(signature.as_ref());
                lineage.reverse();
                lineage
            })
            .collect();
        let first = lineages.first()?;
        let mut common = None;
        for (depth, candidate) in first.iter().enumerate() {
            let shared = lineages
                .iter()
                .all(|lineage| lineage.get(depth) == Some(candidate));
            if !shared {
                break;
            }
            common = Some(candidate.clone());
        }
        common
    }

    /// Every expected signature is satisfied by at least one actual one
    pub fn do_types_match<A: AsRef<str>, E: AsRef<str>>(&self, actual: &[A], expected: &[E]) -> bool {
        expected.iter().all(|expected| {
            actual
                .iter()
                .any(|actual| self.is_sig_is(actual.as_ref(), expected.as_ref()))
        })
    }

    /// Every path from `signature` along parent and viewable-as edges.
    ///
    /// A path ends at a node with no outgoing edge or at a node already on
    /// the path. The last element of each path is its root.
    pub fn type_paths(&self, signature: &str) -> Vec<Vec<SmolStr>> {
        let mut paths = Vec::new();
        let mut path = vec![SmolStr::new(signature)];
        self.collect_paths(&mut path, &mut paths);
        paths
    }

    fn collect_paths(&self, path: &mut Vec<SmolStr>, paths: &mut Vec<Vec<SmolStr>>) {
        let Some(node) = path.last().cloned() else {
            return;
        };
        let parent = self.sig_to_parent.get(&node);
        let viewables = self.sig_to_viewables.get(&node).into_iter().flatten();
        let next: Vec<&SmolStr> = parent
            .into_iter()
            .chain(viewables)
            .filter(|next| !path.contains(next))
            .collect();
        if next.is_empty() {
            paths.push(path.clone());
            return;
        }
        for step in next {
            path.push(step.clone());
            self.collect_paths(path, paths);
            path.pop();
        }
    }

    /// Roots reachable from `signature`, in discovery order
    pub fn roots(&self, signature: &str) -> IndexSet<SmolStr> {
        self.type_paths(signature)
            .into_iter()
            .filter_map(|mut path| path.pop())
            .collect()
    }
}

/// Signature of the command on the right of a top-level `is`
fn is_parent(statement: &Statement) -> Option<SmolStr> {
    let (_, rhs) = statement.expression.as_ref()?.as_is()?;
    rhs.iter().find_map(command_signature)
}

fn command_signature(node: &ExprNode) -> Option<SmolStr> {
    match node {
        ExprNode::Command(command) => Some(command.signature()),
        _ => None,
    }
}

/// Signature named by the `as` statement of a view: the right side of an
/// `is`, or the statement itself when it is a single command
fn view_signature(statement: &Statement) -> Option<SmolStr> {
    let expression = statement.expression.as_ref()?;
    match expression.as_is() {
        Some((_, rhs)) => rhs.iter().find_map(command_signature),
        None => command_signature(&expression.root),
    }
}

fn view_signatures(items: &[ProvidingItem]) -> IndexSet<SmolStr> {
    items
        .iter()
        .filter_map(|item| match item {
            ProvidingItem::View(view) => view_signature(&view.as_),
            ProvidingItem::Symbols(_) => None,
        })
        .collect()
}
