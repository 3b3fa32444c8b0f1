//! Precedence-climbing parser for the expression layer
//!
//! ```text
//! statement := sequence ((is | in | := | ::=) sequence)?
//! sequence  := expr (',' expr)*
//! expr      := unary (Operator? expr)*         -- by precedence table
//! unary     := Operator unary | postfix
//! postfix   := atom Operator?
//! atom      := identifier | Number | command | group | Operator
//! ```
//!
//! Relations are only recognized at the top level of a statement. The parser
//! stops at the first error; the caller keeps the statement text and records
//! the errors.

use super::ast::{Command, CommandPart, Delimiter, ExprNode, Expression, Identifier, NamedGroup};
use super::lexer::{ExprKind, ExprToken, ExprTokenStream};
use crate::base::{ParseError, Position};
use smol_str::SmolStr;
use tracing::trace;

/// Binding power of juxtaposition, as in `2x`
const JUXTAPOSITION: u8 = 35;

/// Infix binding power and right associativity of an operator
fn precedence(op: &str) -> (u8, bool) {
    match op {
        "=>" | "<=>" | "->" | "<-" => (5, true),
        "=" | "!=" | "==" | "<" | ">" | "<=" | ">=" => (10, false),
        "+" | "-" => (20, false),
        "*" | "/" => (30, false),
        _ => (1, false),
    }
}

/// Parse an expression whose text starts at the top of the source.
pub fn parse_expression(text: &str) -> (Option<Expression>, Vec<ParseError>) {
    parse_expression_at(text, Position::new(0, 0))
}

/// Parse an expression embedded in a larger source, with `origin` the
/// absolute position of the first character of `text`.
pub fn parse_expression_at(text: &str, origin: Position) -> (Option<Expression>, Vec<ParseError>) {
    let stream = ExprTokenStream::new(text, origin);
    let mut parser = ExprParser {
        stream,
        errors: Vec::new(),
    };
    let root = parser.parse_statement();
    let ExprParser { stream, errors } = parser;
    let mut all = stream.into_errors();
    let lexical = !all.is_empty();
    all.extend(errors);
    trace!(text, errors = all.len(), "expression parsed");
    match root {
        Some(root) if !lexical => (Some(Expression::new(root)), all),
        _ => (None, all),
    }
}

struct ExprParser {
    stream: ExprTokenStream,
    errors: Vec<ParseError>,
}

impl ExprParser {
    // =========================================================================
    // Token helpers
    // =========================================================================

    fn at(&self, kind: ExprKind) -> bool {
        self.stream.peek_kind() == Some(kind)
    }

    fn nth_kind(&self, n: usize) -> Option<ExprKind> {
        self.stream.nth(n).map(|t| t.kind)
    }

    fn eat(&mut self, kind: ExprKind) -> Option<ExprToken> {
        if self.at(kind) { self.stream.next() } else { None }
    }

    fn expect(&mut self, kind: ExprKind) -> Option<ExprToken> {
        if let Some(token) = self.eat(kind) {
            return Some(token);
        }
        self.unexpected(kind.describe());
        None
    }

    fn unexpected(&mut self, expected: &str) {
        let position = self.stream.current_position();
        let message = match self.stream.peek() {
            Some(token) if token.kind.is_relation() => format!(
                "'{}' is only allowed once at the top level of a statement",
                token.text
            ),
            Some(token) => format!("Expected {} but found '{}'", expected, token.text),
            None => format!("Expected {} but found the end of the statement", expected),
        };
        self.errors.push(ParseError::structural(message, position));
    }

    /// An operator token followed by something that can start an operand
    fn at_infix_operator(&self) -> bool {
        self.at(ExprKind::Operator)
            && self
                .nth_kind(1)
                .is_some_and(|k| k.starts_operand() || k == ExprKind::Operator)
    }

    // =========================================================================
    // Statement level
    // =========================================================================

    fn parse_statement(&mut self) -> Option<ExprNode> {
        if !self.stream.has_next() {
            self.errors.push(ParseError::structural(
                "Expected an expression",
                self.stream.current_position(),
            ));
            return None;
        }
        let position = self.stream.current_position();
        let lhs = self.parse_sequence()?;

        let node = match self.stream.peek_kind() {
            Some(ExprKind::Is) => {
                self.stream.next();
                let rhs = self.parse_sequence()?;
                ExprNode::Is { lhs, rhs, position }
            }
            Some(ExprKind::In) => {
                self.stream.next();
                let rhs = self.parse_single("'in'")?;
                ExprNode::In {
                    lhs,
                    rhs: Box::new(rhs),
                    position,
                }
            }
            Some(kind @ (ExprKind::ColonEquals | ExprKind::ColonColonEquals)) => {
                let op = self.stream.next()?;
                let lhs = self.single_lhs(lhs, &op)?;
                let rhs = self.parse_single(kind.describe())?;
                if kind == ExprKind::ColonEquals {
                    ExprNode::ColonEquals {
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                        position,
                    }
                } else {
                    ExprNode::ColonColonEquals {
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                        position,
                    }
                }
            }
            _ => collapse(lhs, position),
        };

        if self.stream.has_next() {
            self.unexpected("the end of the statement");
            return None;
        }
        Some(node)
    }

    /// A relation side that must hold exactly one expression
    fn parse_single(&mut self, after: &str) -> Option<ExprNode> {
        let position = self.stream.current_position();
        let mut items = self.parse_sequence()?;
        if items.len() != 1 {
            self.errors.push(ParseError::structural(
                format!("Expected a single expression after {}", after),
                position,
            ));
            return None;
        }
        items.pop()
    }

    fn single_lhs(&mut self, mut lhs: Vec<ExprNode>, op: &ExprToken) -> Option<ExprNode> {
        if lhs.len() != 1 {
            self.errors.push(ParseError::structural(
                format!("Expected a single expression before '{}'", op.text),
                op.position,
            ));
            return None;
        }
        lhs.pop()
    }

    /// expr (',' expr)*
    fn parse_sequence(&mut self) -> Option<Vec<ExprNode>> {
        let mut items = vec![self.parse_expr(0)?];
        while self.eat(ExprKind::Comma).is_some() {
            items.push(self.parse_expr(0)?);
        }
        Some(items)
    }

    /// A possibly empty sequence up to (not including) `close`
    fn parse_items_until(&mut self, close: ExprKind) -> Option<Vec<ExprNode>> {
        if self.at(close) {
            return Some(Vec::new());
        }
        self.parse_sequence()
    }

    // =========================================================================
    // Operators
    // =========================================================================

    fn parse_expr(&mut self, min_precedence: u8) -> Option<ExprNode> {
        let mut lhs = self.parse_unary()?;
        loop {
            let (op, next_min) = if self.at_infix_operator() {
                let Some(token) = self.stream.peek() else {
                    break;
                };
                let (prec, right_assoc) = precedence(&token.text);
                if prec < min_precedence {
                    break;
                }
                let op = self.stream.next()?.text;
                (op, if right_assoc { prec } else { prec + 1 })
            } else if self.stream.peek_kind().is_some_and(|k| k.starts_operand())
                && JUXTAPOSITION >= min_precedence
            {
                (SmolStr::default(), JUXTAPOSITION + 1)
            } else {
                break;
            };
            let rhs = self.parse_expr(next_min)?;
            let position = lhs.position();
            lhs = ExprNode::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
                position,
            };
        }
        Some(lhs)
    }

    fn parse_unary(&mut self) -> Option<ExprNode> {
        if self.at(ExprKind::Operator) {
            let op = self.stream.next()?;
            let next = self.stream.peek_kind();
            if next.is_some_and(|k| k.starts_operand() || k == ExprKind::Operator) {
                let operand = self.parse_unary()?;
                return Some(ExprNode::Prefix {
                    op: op.text,
                    operand: Box::new(operand),
                    position: op.position,
                });
            }
            return Some(ExprNode::Operator {
                op: op.text,
                position: op.position,
            });
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Option<ExprNode> {
        let atom = self.parse_atom()?;
        let trailing = self.at(ExprKind::Operator)
            && !self.nth_kind(1).is_some_and(|k| k.starts_operand() || k == ExprKind::Operator);
        if trailing {
            let op = self.stream.next()?;
            let position = atom.position();
            return Some(ExprNode::Postfix {
                op: op.text,
                operand: Box::new(atom),
                position,
            });
        }
        Some(atom)
    }

    // =========================================================================
    // Atoms
    // =========================================================================

    fn parse_atom(&mut self) -> Option<ExprNode> {
        match self.stream.peek_kind() {
            Some(ExprKind::Identifier) => self.parse_identifier().map(ExprNode::Identifier),
            Some(ExprKind::Number) => {
                let token = self.stream.next()?;
                Some(ExprNode::Number {
                    value: token.text,
                    position: token.position,
                })
            }
            Some(ExprKind::Backslash) => self.parse_command().map(ExprNode::Command),
            Some(ExprKind::LParen) => self.parse_group(Delimiter::Paren),
            Some(ExprKind::LCurly) => self.parse_group(Delimiter::Curly),
            Some(ExprKind::LSquare) => self.parse_group(Delimiter::Square),
            _ => {
                self.unexpected("an expression");
                None
            }
        }
    }

    fn parse_group(&mut self, delimiter: Delimiter) -> Option<ExprNode> {
        let (open, close) = delimiter_kinds(delimiter);
        let start = self.expect(open)?;
        let items = self.parse_items_until(close)?;
        self.expect(close)?;
        Some(ExprNode::Group {
            delimiter,
            items,
            position: start.position,
        })
    }

    /// Identifier ('_' script)? ('^' script)? ('(' sequence? ')')?
    fn parse_identifier(&mut self) -> Option<Identifier> {
        let name = self.expect(ExprKind::Identifier)?;
        let subscript = self.parse_script(ExprKind::Underscore)?;
        let superscript = self.parse_script(ExprKind::Caret)?;
        let args = self.parse_trailing_parens()?;
        Some(Identifier {
            name: name.text,
            subscript,
            superscript,
            args,
            position: name.position,
        })
    }

    /// `marker script`, where a script is a single simple atom or a curly group.
    ///
    /// Returns `Some(None)` when the marker is absent.
    fn parse_script(&mut self, marker: ExprKind) -> Option<Option<Box<ExprNode>>> {
        if self.eat(marker).is_none() {
            return Some(None);
        }
        let script = match self.stream.peek_kind() {
            Some(ExprKind::LCurly) => self.parse_group(Delimiter::Curly)?,
            Some(ExprKind::LParen) => self.parse_group(Delimiter::Paren)?,
            Some(ExprKind::Backslash) => ExprNode::Command(self.parse_command()?),
            Some(ExprKind::Identifier) => {
                let token = self.stream.next()?;
                ExprNode::Identifier(Identifier {
                    name: token.text,
                    subscript: None,
                    superscript: None,
                    args: None,
                    position: token.position,
                })
            }
            Some(ExprKind::Number) => {
                let token = self.stream.next()?;
                ExprNode::Number {
                    value: token.text,
                    position: token.position,
                }
            }
            _ => {
                self.unexpected("a script");
                return None;
            }
        };
        Some(Some(Box::new(script)))
    }

    fn parse_trailing_parens(&mut self) -> Option<Option<Vec<ExprNode>>> {
        if self.eat(ExprKind::LParen).is_none() {
            return Some(None);
        }
        let items = self.parse_items_until(ExprKind::RParen)?;
        self.expect(ExprKind::RParen)?;
        Some(Some(items))
    }

    /// '\' part ('.' part)* ('(' sequence? ')')?
    fn parse_command(&mut self) -> Option<Command> {
        let start = self.expect(ExprKind::Backslash)?;
        let mut parts = vec![self.parse_command_part()?];
        while self.at_part_separator() {
            self.stream.next();
            parts.push(self.parse_command_part()?);
        }
        let params = self.parse_trailing_parens()?;
        if params.is_some() && (self.at_part_separator() || self.at(ExprKind::LParen)) {
            self.errors.push(ParseError::structural(
                "A command takes a single parenthesized group, after its last part",
                self.stream.current_position(),
            ));
            return None;
        }
        Some(Command {
            parts,
            params,
            position: start.position,
        })
    }

    fn at_part_separator(&self) -> bool {
        self.stream.peek().is_some_and(|t| t.kind == ExprKind::Operator && t.text == ".")
            && self.nth_kind(1) == Some(ExprKind::Identifier)
    }

    /// Identifier ('[' sequence ']')? ('_' script)? ('^' script)?
    /// ('{' sequence '}')* (':' Identifier '{' sequence '}')*
    fn parse_command_part(&mut self) -> Option<CommandPart> {
        let name = self.expect(ExprKind::Identifier)?;
        let mut part = CommandPart {
            name: name.text,
            ..CommandPart::default()
        };

        if self.eat(ExprKind::LSquare).is_some() {
            part.square = Some(self.parse_items_until(ExprKind::RSquare)?);
            self.expect(ExprKind::RSquare)?;
        }
        part.subscript = self.parse_script(ExprKind::Underscore)?;
        part.superscript = self.parse_script(ExprKind::Caret)?;

        while self.eat(ExprKind::LCurly).is_some() {
            part.curly.push(self.parse_items_until(ExprKind::RCurly)?);
            self.expect(ExprKind::RCurly)?;
        }

        while self.at(ExprKind::Colon) {
            self.stream.next();
            let name: SmolStr = self.expect(ExprKind::Identifier)?.text;
            self.expect(ExprKind::LCurly)?;
            let items = self.parse_items_until(ExprKind::RCurly)?;
            self.expect(ExprKind::RCurly)?;
            part.named.push(NamedGroup { name, items });
        }
        Some(part)
    }
}

fn delimiter_kinds(delimiter: Delimiter) -> (ExprKind, ExprKind) {
    match delimiter {
        Delimiter::Paren => (ExprKind::LParen, ExprKind::RParen),
        Delimiter::Curly => (ExprKind::LCurly, ExprKind::RCurly),
        Delimiter::Square => (ExprKind::LSquare, ExprKind::RSquare),
    }
}

fn collapse(mut items: Vec<ExprNode>, position: Position) -> ExprNode {
    if items.len() == 1 {
        if let Some(item) = items.pop() {
            return item;
        }
    }
    ExprNode::Sequence { items, position }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(text: &str) -> ExprNode {
        let (expr, errors) = parse_expression(text);
        assert!(errors.is_empty(), "unexpected errors for {:?}: {:?}", text, errors);
        expr.expect("expression").root
    }

    #[test]
    fn test_precedence() {
        let node = parse_ok("a + b * c = d");
        match &node {
            ExprNode::Binary { op, lhs, .. } => {
                assert_eq!(op, "=");
                assert!(matches!(lhs.as_ref(), ExprNode::Binary { op, .. } if op == "+"));
            }
            other => panic!("expected binary, got {:?}", other),
        }
        assert_eq!(node.to_string(), "a + b * c = d");
    }

    #[test]
    fn test_arrows_are_right_associative() {
        match parse_ok("a => b => c") {
            ExprNode::Binary { lhs, rhs, .. } => {
                assert!(matches!(*lhs, ExprNode::Identifier(_)));
                assert!(matches!(*rhs, ExprNode::Binary { .. }));
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_prefix_postfix_and_standalone() {
        assert!(matches!(parse_ok("-x"), ExprNode::Prefix { .. }));
        assert!(matches!(parse_ok("n!"), ExprNode::Postfix { .. }));
        match parse_ok("1, ..., n") {
            ExprNode::Sequence { items, .. } => {
                assert_eq!(items.len(), 3);
                assert!(matches!(&items[1], ExprNode::Operator { op, .. } if op == "..."));
            }
            other => panic!("expected sequence, got {:?}", other),
        }
    }

    #[test]
    fn test_juxtaposition() {
        match parse_ok("2x + 1") {
            ExprNode::Binary { op, lhs, .. } => {
                assert_eq!(op, "+");
                assert!(matches!(lhs.as_ref(), ExprNode::Binary { op, .. } if op.is_empty()));
            }
            other => panic!("expected binary, got {:?}", other),
        }
    }

    #[test]
    fn test_is_relation() {
        match parse_ok("x, y is \\real") {
            ExprNode::Is { lhs, rhs, .. } => {
                assert_eq!(lhs.len(), 2);
                assert_eq!(rhs[0].signature().as_deref(), Some("real/0"));
            }
            other => panic!("expected is, got {:?}", other),
        }
    }

    #[test]
    fn test_in_takes_single_rhs() {
        assert!(matches!(parse_ok("x in A"), ExprNode::In { .. }));
        let (expr, errors) = parse_expression("x in A, B");
        assert!(expr.is_none());
        assert_eq!(errors[0].message, "Expected a single expression after 'in'");
    }

    #[test]
    fn test_colon_equals() {
        match parse_ok("f(x) := x + 1") {
            ExprNode::ColonEquals { lhs, .. } => {
                assert_eq!(lhs.signature().as_deref(), Some("f/1"));
            }
            other => panic!("expected :=, got {:?}", other),
        }
        assert!(matches!(parse_ok("a ::= b"), ExprNode::ColonColonEquals { .. }));
    }

    #[test]
    fn test_relation_inside_group_is_error() {
        let (expr, errors) = parse_expression("(x is y)");
        assert!(expr.is_none());
        assert_eq!(
            errors[0].message,
            "'is' is only allowed once at the top level of a statement"
        );
    }

    #[test]
    fn test_second_relation_is_error() {
        let (expr, errors) = parse_expression("x is y is z");
        assert!(expr.is_none());
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_command_parts() {
        let node = parse_ok("\\set.of[x]_{i}^{2}{y}{z}:over{A}(a, b)");
        let ExprNode::Command(command) = node else {
            panic!("expected command");
        };
        assert_eq!(command.parts.len(), 2);
        let last = &command.parts[1];
        assert_eq!(last.name, "of");
        assert!(last.square.is_some());
        assert!(last.subscript.is_some());
        assert!(last.superscript.is_some());
        assert_eq!(last.curly.len(), 2);
        assert_eq!(last.named[0].name, "over");
        assert_eq!(command.signature(), "set.of/2");
        assert_eq!(
            command.to_string(),
            "\\set.of[x]_{i}^{2}{y}{z}:over{A}(a, b)"
        );
    }

    #[test]
    fn test_parens_only_after_last_part() {
        for text in ["\\a(x).b", "\\f(x)(y)"] {
            let (expr, errors) = parse_expression(text);
            assert!(expr.is_none(), "{:?} parsed", text);
            assert_eq!(errors.len(), 1, "{:?}", errors);
            assert_eq!(errors[0].kind, crate::base::ErrorKind::Structural);
            assert_eq!(
                errors[0].message,
                "A command takes a single parenthesized group, after its last part"
            );
        }
        assert_eq!(parse_ok("\\a.b(x)").signature().as_deref(), Some("a.b/1"));
    }

    #[test]
    fn test_signature_ignores_whitespace() {
        let sigs: Vec<_> = ["\\f(x, y)", "\\f(x,y)", "\\f( x , y )"]
            .iter()
            .map(|text| parse_ok(text).signature())
            .collect();
        assert!(sigs.iter().all(|s| s.as_deref() == Some("f/2")));
    }

    #[test]
    fn test_positions_are_absolute() {
        let (expr, errors) = parse_expression_at("x is \\real", Position::new(2, 8));
        assert!(errors.is_empty());
        let root = expr.unwrap().root;
        let ExprNode::Is { rhs, .. } = root else {
            panic!("expected is");
        };
        assert_eq!(rhs[0].position(), Position::new(2, 13));
    }

    #[test]
    fn test_empty_statement_is_error() {
        let (expr, errors) = parse_expression("  ");
        assert!(expr.is_none());
        assert_eq!(errors[0].message, "Expected an expression");
    }
}
