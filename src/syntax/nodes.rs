//! Leaf nodes shared by every construct
//!
//! Every node carries the [`Position`] of its first token. Default values
//! are empty with an unknown position; validators substitute them for
//! malformed input.

use crate::base::Position;
use crate::expression::Expression;
use crate::parser::{Abstraction, Aggregate, Assignment, Tuple};
use smol_str::SmolStr;

/// A `'...'` statement and its parsed expression.
///
/// `expression` is `None` when the text failed to parse; the parse errors
/// were reported when the document was validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Statement {
    /// Text between the quotes
    pub text: SmolStr,
    pub expression: Option<Expression>,
    pub position: Position,
}

impl Statement {
    /// Absolute position of the first character inside the quotes
    pub fn text_origin(&self) -> Position {
        if self.position.is_known() {
            Position::new(self.position.row, self.position.column + 1)
        } else {
            Position::UNKNOWN
        }
    }
}

/// A `"..."` string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    /// Text between the quotes
    pub text: SmolStr,
    pub position: Position,
}

/// The `[...]` line of a group
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdStatement {
    /// Text between the brackets, verbatim
    pub text: SmolStr,
    /// Canonical signature when the id is a single command
    pub signature: Option<SmolStr>,
    pub position: Position,
}

/// A target: the thing a construct introduces or quantifies over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Name { name: SmolStr, position: Position },
    Abstraction(Abstraction),
    Aggregate(Aggregate),
    Tuple(Tuple),
    Assignment(Assignment),
}

impl Default for Target {
    fn default() -> Self {
        Target::Name {
            name: SmolStr::default(),
            position: Position::UNKNOWN,
        }
    }
}

impl Target {
    pub fn position(&self) -> Position {
        match self {
            Target::Name { position, .. } => *position,
            Target::Abstraction(abstraction) => abstraction.position,
            Target::Aggregate(aggregate) => aggregate.position,
            Target::Tuple(tuple) => tuple.position,
            Target::Assignment(assignment) => assignment.lhs.position,
        }
    }
}

/// One `when?`/`then` pair of a case list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Case<T> {
    pub when: Option<Vec<super::Clause>>,
    pub then: T,
}
