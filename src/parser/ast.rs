//! Concrete syntax tree of the structural layer
//!
//! These nodes mirror the written notation one-to-one. They live only until
//! the semantic validator has turned them into typed document nodes, except
//! for the small target types ([`Abstraction`], [`Aggregate`], [`Tuple`],
//! [`Assignment`]) which the document model reuses as-is.

use super::token::{Token, TokenKind};
use crate::base::Position;

/// Ordered sequence of top-level groups and text blocks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Root {
    pub items: Vec<RootItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootItem {
    Group(Group),
    BlockComment(Token),
}

/// A group: optional `[id]` followed by one or more sections
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Group {
    pub id: Option<Token>,
    pub sections: Vec<Section>,
    pub position: Position,
}

impl Group {
    /// Name of the first section, which identifies the kind of group
    pub fn kind_name(&self) -> Option<&str> {
        self.sections.first().map(|s| s.name.text.as_str())
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name.text == name)
    }
}

/// A named section with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: Token,
    pub args: Vec<Argument>,
}

impl Section {
    pub fn position(&self) -> Position {
        self.name.position
    }
}

/// A section argument, wrapping exactly one target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub target: Target,
}

impl Argument {
    pub fn new(target: Target) -> Self {
        Self { target }
    }

    pub fn position(&self) -> Position {
        self.target.position()
    }
}

/// Everything that can appear as an argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A name, string or statement token
    Literal(Token),
    Group(Group),
    Tuple(Tuple),
    Assignment(Assignment),
    Abstraction(Abstraction),
    Aggregate(Aggregate),
    Mapping(Mapping),
    /// Placeholder substituted for a malformed argument
    Invalid(Token),
}

impl Target {
    pub fn position(&self) -> Position {
        match self {
            Target::Literal(token) | Target::Invalid(token) => token.position,
            Target::Group(group) => group.position,
            Target::Tuple(tuple) => tuple.position,
            Target::Assignment(assignment) => assignment.lhs.position,
            Target::Abstraction(abstraction) => abstraction.position,
            Target::Aggregate(aggregate) => aggregate.position,
            Target::Mapping(mapping) => mapping.name.position,
        }
    }

    /// The literal token if this target is a literal of the given kind
    pub fn literal(&self, kind: TokenKind) -> Option<&Token> {
        match self {
            Target::Literal(token) if token.kind == kind => Some(token),
            _ => None,
        }
    }
}

/// `(a, b, c)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuple {
    pub items: Vec<Target>,
    pub position: Position,
}

/// `name := rhs`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub lhs: Token,
    pub rhs: Box<Target>,
}

/// A name with parameter parts: `f(x, y)`, `x_i`, `a_{i, j}(x)`, `{x_i}_{i}...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Abstraction {
    pub name: Token,
    /// Parameters after `_`
    pub subparams: Option<Vec<Token>>,
    /// Parameters in parentheses
    pub params: Option<Vec<Token>>,
    /// Written inside `{...}`
    pub is_enclosed: bool,
    /// Parameters after the closing `}` of an enclosed abstraction
    pub outer_subparams: Option<Vec<Token>>,
    /// Followed by `...`
    pub is_varargs: bool,
    pub position: Position,
}

impl Abstraction {
    /// A plain `name(params)` form with nothing else attached
    pub fn is_function_like(&self) -> bool {
        self.params.is_some() && !self.is_enclosed && !self.is_varargs
    }

    /// Parameter names joined by `,` with no whitespace
    pub fn params_text(&self) -> Option<String> {
        self.params.as_ref().map(|params| join_names(params))
    }
}

/// `{a, b_i, f(x)}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregate {
    pub items: Vec<Abstraction>,
    pub position: Position,
}

/// `name = "value"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub name: Token,
    pub value: Token,
}

pub(crate) fn join_names(names: &[Token]) -> String {
    names
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(",")
}
