//! Expression layer: the LaTeX-like notation inside statements
//!
//! Statements (`'...'`) and, where a construct expects math, strings are
//! parsed into an [`Expression`] tree. Commands expose a canonical
//! [`signature`](Command::signature) used as the key of the type graph.

mod ast;
mod lexer;
mod parser;

pub use ast::{Command, CommandPart, Delimiter, ExprNode, Expression, Identifier, NamedGroup};
pub use lexer::{ExprKind, ExprToken, ExprTokenStream};
pub use parser::{parse_expression, parse_expression_at};

use smol_str::SmolStr;

/// Signature of a standalone command text such as `\f(x, y)`.
///
/// Returns `None` unless the text parses to exactly one command.
pub fn signature_of_command_text(text: &str) -> Option<SmolStr> {
    match parse_expression(text) {
        (Some(Expression {
            root: ExprNode::Command(command),
        }), errors) if errors.is_empty() => Some(command.signature()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_of_command_text() {
        assert_eq!(signature_of_command_text("\\f(x)").as_deref(), Some("f/1"));
        assert_eq!(signature_of_command_text("\\a.b").as_deref(), Some("a.b/0"));
        assert_eq!(signature_of_command_text("x + y"), None);
    }
}
