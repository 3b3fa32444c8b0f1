//! Clauses: the logical building blocks of `means`, `then`, `where` and
//! similar sections.

use super::nodes::{Case, Statement, Target, Text};
use crate::base::Position;

/// A clause is a statement, a string, or a nested clause group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    Statement(Statement),
    Text(Text),
    ForAll(ForAllGroup),
    Exists(ExistsGroup),
    ExistsUnique(ExistsUniqueGroup),
    If(IfGroup),
    Iff(IffGroup),
    Not(NotGroup),
    Or(OrGroup),
    And(AndGroup),
    Equivalently(EquivalentlyGroup),
    Piecewise(PiecewiseGroup),
}

impl Default for Clause {
    fn default() -> Self {
        Clause::Statement(Statement::default())
    }
}

impl Clause {
    pub fn position(&self) -> Position {
        match self {
            Clause::Statement(statement) => statement.position,
            Clause::Text(text) => text.position,
            Clause::ForAll(group) => group.position,
            Clause::Exists(group) => group.position,
            Clause::ExistsUnique(group) => group.position,
            Clause::If(group) => group.position,
            Clause::Iff(group) => group.position,
            Clause::Not(group) => group.position,
            Clause::Or(group) => group.position,
            Clause::And(group) => group.position,
            Clause::Equivalently(group) => group.position,
            Clause::Piecewise(group) => group.position,
        }
    }

    pub fn position_mut(&mut self) -> &mut Position {
        match self {
            Clause::Statement(statement) => &mut statement.position,
            Clause::Text(text) => &mut text.position,
            Clause::ForAll(group) => &mut group.position,
            Clause::Exists(group) => &mut group.position,
            Clause::ExistsUnique(group) => &mut group.position,
            Clause::If(group) => &mut group.position,
            Clause::Iff(group) => &mut group.position,
            Clause::Not(group) => &mut group.position,
            Clause::Or(group) => &mut group.position,
            Clause::And(group) => &mut group.position,
            Clause::Equivalently(group) => &mut group.position,
            Clause::Piecewise(group) => &mut group.position,
        }
    }
}

/// `forAll: targets`, `where?`, `suchThat?`, `then`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForAllGroup {
    pub targets: Vec<Target>,
    pub where_: Option<Vec<Clause>>,
    pub such_that: Option<Vec<Clause>>,
    pub then: Vec<Clause>,
    pub position: Position,
}

/// `exists: targets`, `where?`, `suchThat?`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistsGroup {
    pub targets: Vec<Target>,
    pub where_: Option<Vec<Clause>>,
    pub such_that: Option<Vec<Clause>>,
    pub position: Position,
}

/// `existsUnique: targets`, `where?`, `suchThat?`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistsUniqueGroup {
    pub targets: Vec<Target>,
    pub where_: Option<Vec<Clause>>,
    pub such_that: Option<Vec<Clause>>,
    pub position: Position,
}

/// `if: clauses`, `then`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IfGroup {
    pub conditions: Vec<Clause>,
    pub then: Vec<Clause>,
    pub position: Position,
}

/// `iff: clauses`, `then`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IffGroup {
    pub conditions: Vec<Clause>,
    pub then: Vec<Clause>,
    pub position: Position,
}

/// `not: clause`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotGroup {
    pub clause: Box<Clause>,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrGroup {
    pub clauses: Vec<Clause>,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AndGroup {
    pub clauses: Vec<Clause>,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquivalentlyGroup {
    pub clauses: Vec<Clause>,
    pub position: Position,
}

/// `piecewise:` followed by `(when, then)+` and `else?`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PiecewiseGroup {
    /// Every case has a `when`
    pub cases: Vec<Case<Vec<Clause>>>,
    pub else_: Option<Vec<Clause>>,
    pub position: Position,
}
