//! Logos-based lexer for the expression layer
//!
//! Operators are maximal runs of symbol characters, so `+`, `++`, `+...`
//! and `...+` each lex as a single operator token. Whitespace is skipped.

use crate::base::{LineIndex, ParseError, Position, TextSize};
use logos::Logos;
use smol_str::SmolStr;
use tracing::trace;

/// Logos token enum for the expression layer
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n]+")]
pub enum ExprKind {
    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("is")]
    Is,

    #[token("in")]
    In,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[A-Za-z][A-Za-z0-9]*")]
    Identifier,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number,

    #[regex(r"[+\-*/=<>!&|~.@#$%?;]+")]
    Operator,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("\\")]
    Backslash,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LCurly,

    #[token("}")]
    RCurly,

    #[token("[")]
    LSquare,

    #[token("]")]
    RSquare,

    #[token(",")]
    Comma,

    #[token("_")]
    Underscore,

    #[token("^")]
    Caret,

    #[token(":")]
    Colon,

    #[token(":=")]
    ColonEquals,

    #[token("::=")]
    ColonColonEquals,

    /// Not produced by logos; stands in for unrecognized input
    Invalid,
}

impl ExprKind {
    /// Whether a token of this kind can start an operand
    pub fn starts_operand(&self) -> bool {
        matches!(
            self,
            Self::Identifier
                | Self::Number
                | Self::Backslash
                | Self::LParen
                | Self::LCurly
                | Self::LSquare
        )
    }

    /// `is`, `in`, `:=` and `::=`
    pub fn is_relation(&self) -> bool {
        matches!(
            self,
            Self::Is | Self::In | Self::ColonEquals | Self::ColonColonEquals
        )
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::Is => "'is'",
            Self::In => "'in'",
            Self::Identifier => "an identifier",
            Self::Number => "a number",
            Self::Operator => "an operator",
            Self::Backslash => "'\\'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LCurly => "'{'",
            Self::RCurly => "'}'",
            Self::LSquare => "'['",
            Self::RSquare => "']'",
            Self::Comma => "','",
            Self::Underscore => "'_'",
            Self::Caret => "'^'",
            Self::Colon => "':'",
            Self::ColonEquals => "':='",
            Self::ColonColonEquals => "'::='",
            Self::Invalid => "an invalid token",
        }
    }
}

/// An expression token with its absolute position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprToken {
    pub kind: ExprKind,
    pub text: SmolStr,
    pub position: Position,
}

/// Token stream over an embedded expression with two token lookahead
#[derive(Debug, Clone)]
pub struct ExprTokenStream {
    tokens: Vec<ExprToken>,
    index: usize,
    errors: Vec<ParseError>,
}

impl ExprTokenStream {
    /// Tokenize `text`, which starts at `origin` in the enclosing source.
    pub fn new(text: &str, origin: Position) -> Self {
        let line_index = LineIndex::new(text);
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        let mut lexer = ExprKind::lexer(text);
        while let Some(result) = lexer.next() {
            let span = lexer.span();
            let position = line_index
                .position(text, TextSize::new(span.start as u32))
                .relative_to(origin);
            let kind = match result {
                Ok(kind) => kind,
                Err(()) => {
                    errors.push(ParseError::lexical(
                        format!("Unrecognized character '{}'", lexer.slice()),
                        position,
                    ));
                    ExprKind::Invalid
                }
            };
            tokens.push(ExprToken {
                kind,
                text: SmolStr::new(lexer.slice()),
                position,
            });
        }
        trace!(count = tokens.len(), "expression tokens");
        Self {
            tokens,
            index: 0,
            errors,
        }
    }

    pub fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    pub fn peek(&self) -> Option<&ExprToken> {
        self.tokens.get(self.index)
    }

    pub fn peek_peek(&self) -> Option<&ExprToken> {
        self.tokens.get(self.index + 1)
    }

    pub fn nth(&self, n: usize) -> Option<&ExprToken> {
        self.tokens.get(self.index + n)
    }

    pub fn peek_kind(&self) -> Option<ExprKind> {
        self.peek().map(|t| t.kind)
    }

    /// Position of the next token, or just past the last one
    pub fn current_position(&self) -> Position {
        match self.peek().or_else(|| self.tokens.last()) {
            Some(token) => token.position,
            None => Position::UNKNOWN,
        }
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    pub fn tokens(&self) -> &[ExprToken] {
        &self.tokens
    }
}

impl Iterator for ExprTokenStream {
    type Item = ExprToken;

    fn next(&mut self) -> Option<ExprToken> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<ExprKind> {
        ExprTokenStream::new(text, Position::new(0, 0))
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("x is \\real"),
            vec![ExprKind::Identifier, ExprKind::Is, ExprKind::Backslash, ExprKind::Identifier]
        );
        assert_eq!(kinds("island"), vec![ExprKind::Identifier]);
    }

    #[test]
    fn test_operator_maximal_munch() {
        let tokens: Vec<_> = ExprTokenStream::new("a +... b ...+ c", Position::new(0, 0)).collect();
        assert_eq!(tokens[1].text, "+...");
        assert_eq!(tokens[3].text, "...+");
    }

    #[test]
    fn test_colon_forms() {
        assert_eq!(
            kinds("a := b ::= c : d"),
            vec![
                ExprKind::Identifier,
                ExprKind::ColonEquals,
                ExprKind::Identifier,
                ExprKind::ColonColonEquals,
                ExprKind::Identifier,
                ExprKind::Colon,
                ExprKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_positions_are_shifted_by_origin() {
        let tokens: Vec<_> = ExprTokenStream::new("x = y\nz", Position::new(4, 10)).collect();
        assert_eq!(tokens[0].position, Position::new(4, 10));
        assert_eq!(tokens[2].position, Position::new(4, 14));
        assert_eq!(tokens[3].position, Position::new(5, 0));
    }

    #[test]
    fn test_unrecognized_character() {
        let stream = ExprTokenStream::new("x \u{00e9}", Position::new(0, 0));
        assert!(stream.tokens().iter().any(|t| t.kind == ExprKind::Invalid));
        assert_eq!(stream.into_errors().len(), 1);
    }
}
