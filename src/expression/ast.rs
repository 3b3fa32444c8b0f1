//! Expression tree
//!
//! Produced by [`parse_expression`](super::parse_expression) and embedded in
//! statement nodes of the document model.

use crate::base::Position;
use smol_str::SmolStr;
use std::fmt;

/// Bracket kind of a [`ExprNode::Group`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    Paren,
    Curly,
    Square,
}

impl Delimiter {
    pub fn open(&self) -> &'static str {
        match self {
            Self::Paren => "(",
            Self::Curly => "{",
            Self::Square => "[",
        }
    }

    pub fn close(&self) -> &'static str {
        match self {
            Self::Paren => ")",
            Self::Curly => "}",
            Self::Square => "]",
        }
    }
}

/// A parsed statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expression {
    pub root: ExprNode,
}

impl Expression {
    pub fn new(root: ExprNode) -> Self {
        Self { root }
    }

    /// Both sides of a top-level `is` relation
    pub fn as_is(&self) -> Option<(&[ExprNode], &[ExprNode])> {
        match &self.root {
            ExprNode::Is { lhs, rhs, .. } => Some((lhs, rhs)),
            _ => None,
        }
    }

    pub fn is_colon_equals(&self) -> bool {
        matches!(self.root, ExprNode::ColonEquals { .. })
    }

    /// Every command in the expression, in pre-order
    pub fn commands(&self) -> Vec<&Command> {
        let mut out = Vec::new();
        self.root.for_each(&mut |node| {
            if let ExprNode::Command(command) = node {
                out.push(command);
            }
        });
        out
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)
    }
}

/// A node of the expression tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprNode {
    Identifier(Identifier),
    Number {
        value: SmolStr,
        position: Position,
    },
    Command(Command),
    /// An operator standing on its own, for example `...` in `1, ..., n`
    Operator {
        op: SmolStr,
        position: Position,
    },
    Prefix {
        op: SmolStr,
        operand: Box<ExprNode>,
        position: Position,
    },
    Postfix {
        op: SmolStr,
        operand: Box<ExprNode>,
        position: Position,
    },
    Binary {
        op: SmolStr,
        lhs: Box<ExprNode>,
        rhs: Box<ExprNode>,
        position: Position,
    },
    Group {
        delimiter: Delimiter,
        items: Vec<ExprNode>,
        position: Position,
    },
    /// Two or more comma separated expressions at the top level
    Sequence {
        items: Vec<ExprNode>,
        position: Position,
    },
    /// `a, b is \set`
    Is {
        lhs: Vec<ExprNode>,
        rhs: Vec<ExprNode>,
        position: Position,
    },
    /// `a, b in X`
    In {
        lhs: Vec<ExprNode>,
        rhs: Box<ExprNode>,
        position: Position,
    },
    /// `a := b`
    ColonEquals {
        lhs: Box<ExprNode>,
        rhs: Box<ExprNode>,
        position: Position,
    },
    /// `a ::= b`
    ColonColonEquals {
        lhs: Box<ExprNode>,
        rhs: Box<ExprNode>,
        position: Position,
    },
}

impl ExprNode {
    pub fn position(&self) -> Position {
        match self {
            Self::Identifier(identifier) => identifier.position,
            Self::Command(command) => command.position,
            Self::Number { position, .. }
            | Self::Operator { position, .. }
            | Self::Prefix { position, .. }
            | Self::Postfix { position, .. }
            | Self::Binary { position, .. }
            | Self::Group { position, .. }
            | Self::Sequence { position, .. }
            | Self::Is { position, .. }
            | Self::In { position, .. }
            | Self::ColonEquals { position, .. }
            | Self::ColonColonEquals { position, .. } => *position,
        }
    }

    /// Signature of a command or identifier node
    pub fn signature(&self) -> Option<SmolStr> {
        match self {
            Self::Command(command) => Some(command.signature()),
            Self::Identifier(identifier) => Some(identifier.signature()),
            _ => None,
        }
    }

    /// Direct children in source order
    pub fn children(&self) -> Vec<&ExprNode> {
        match self {
            Self::Number { .. } | Self::Operator { .. } => Vec::new(),
            Self::Identifier(identifier) => {
                let mut out = Vec::new();
                out.extend(identifier.subscript.as_deref());
                out.extend(identifier.superscript.as_deref());
                if let Some(args) = &identifier.args {
                    out.extend(args.iter());
                }
                out
            }
            Self::Command(command) => command.children(),
            Self::Prefix { operand, .. } | Self::Postfix { operand, .. } => vec![operand.as_ref()],
            Self::Binary { lhs, rhs, .. }
            | Self::ColonEquals { lhs, rhs, .. }
            | Self::ColonColonEquals { lhs, rhs, .. } => vec![lhs.as_ref(), rhs.as_ref()],
            Self::Group { items, .. } | Self::Sequence { items, .. } => items.iter().collect(),
            Self::Is { lhs, rhs, .. } => lhs.iter().chain(rhs.iter()).collect(),
            Self::In { lhs, rhs, .. } => {
                let mut out: Vec<&ExprNode> = lhs.iter().collect();
                out.push(rhs.as_ref());
                out
            }
        }
    }

    /// Visit this node and every descendant in pre-order
    pub fn for_each<'a>(&'a self, f: &mut impl FnMut(&'a ExprNode)) {
        f(self);
        for child in self.children() {
            child.for_each(f);
        }
    }
}

/// `x`, `x_i`, `f(x, y)`, `a_{n}^{2}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: SmolStr,
    pub subscript: Option<Box<ExprNode>>,
    pub superscript: Option<Box<ExprNode>>,
    /// Parenthesized arguments of a function-like use
    pub args: Option<Vec<ExprNode>>,
    pub position: Position,
}

impl Identifier {
    pub fn signature(&self) -> SmolStr {
        let arity = self.args.as_ref().map_or(0, Vec::len);
        SmolStr::new(format!("{}/{}", self.name, arity))
    }
}

/// A backslash command: `\a.b[x]_{i}^{j}{y}:named{z}(w)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub parts: Vec<CommandPart>,
    /// Trailing parenthesized group after the last part
    pub params: Option<Vec<ExprNode>>,
    pub position: Position,
}

impl Command {
    /// Dotted part names
    pub fn name(&self) -> String {
        self.parts
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Canonical `name/arity` key, independent of whitespace and of every
    /// group other than the trailing parentheses.
    pub fn signature(&self) -> SmolStr {
        let arity = self.params.as_ref().map_or(0, Vec::len);
        SmolStr::new(format!("{}/{}", self.name(), arity))
    }

    fn children(&self) -> Vec<&ExprNode> {
        let mut out = Vec::new();
        for part in &self.parts {
            if let Some(square) = &part.square {
                out.extend(square.iter());
            }
            out.extend(part.subscript.as_deref());
            out.extend(part.superscript.as_deref());
            for curly in &part.curly {
                out.extend(curly.iter());
            }
            for named in &part.named {
                out.extend(named.items.iter());
            }
        }
        if let Some(params) = &self.params {
            out.extend(params.iter());
        }
        out
    }
}

/// One dotted component of a command
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandPart {
    pub name: SmolStr,
    pub square: Option<Vec<ExprNode>>,
    pub subscript: Option<Box<ExprNode>>,
    pub superscript: Option<Box<ExprNode>>,
    pub curly: Vec<Vec<ExprNode>>,
    pub named: Vec<NamedGroup>,
}

/// `:name{items}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedGroup {
    pub name: SmolStr,
    pub items: Vec<ExprNode>,
}

// =============================================================================
// Display
// =============================================================================

struct Items<'a>(&'a [ExprNode]);

impl fmt::Display for Items<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

fn write_script(f: &mut fmt::Formatter<'_>, marker: &str, script: &ExprNode) -> fmt::Result {
    write!(f, "{}{}", marker, script)
}

impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier(identifier) => identifier.fmt(f),
            Self::Number { value, .. } => f.write_str(value),
            Self::Command(command) => command.fmt(f),
            Self::Operator { op, .. } => f.write_str(op),
            Self::Prefix { op, operand, .. } => write!(f, "{}{}", op, operand),
            Self::Postfix { op, operand, .. } => write!(f, "{}{}", operand, op),
            Self::Binary { op, lhs, rhs, .. } if op.is_empty() => write!(f, "{} {}", lhs, rhs),
            Self::Binary { op, lhs, rhs, .. } => write!(f, "{} {} {}", lhs, op, rhs),
            Self::Group {
                delimiter, items, ..
            } => write!(f, "{}{}{}", delimiter.open(), Items(items), delimiter.close()),
            Self::Sequence { items, .. } => Items(items).fmt(f),
            Self::Is { lhs, rhs, .. } => write!(f, "{} is {}", Items(lhs), Items(rhs)),
            Self::In { lhs, rhs, .. } => write!(f, "{} in {}", Items(lhs), rhs),
            Self::ColonEquals { lhs, rhs, .. } => write!(f, "{} := {}", lhs, rhs),
            Self::ColonColonEquals { lhs, rhs, .. } => write!(f, "{} ::= {}", lhs, rhs),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(sub) = &self.subscript {
            write_script(f, "_", sub)?;
        }
        if let Some(sup) = &self.superscript {
            write_script(f, "^", sup)?;
        }
        if let Some(args) = &self.args {
            write!(f, "({})", Items(args))?;
        }
        Ok(())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\\")?;
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&part.name)?;
            if let Some(square) = &part.square {
                write!(f, "[{}]", Items(square))?;
            }
            if let Some(sub) = &part.subscript {
                write_script(f, "_", sub)?;
            }
            if let Some(sup) = &part.superscript {
                write_script(f, "^", sup)?;
            }
            for curly in &part.curly {
                write!(f, "{{{}}}", Items(curly))?;
            }
            for named in &part.named {
                write!(f, ":{}{{{}}}", named.name, Items(&named.items))?;
            }
        }
        if let Some(params) = &self.params {
            write!(f, "({})", Items(params))?;
        }
        Ok(())
    }
}
