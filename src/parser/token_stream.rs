//! Layout-aware token stream for the structural layer
//!
//! The raw lexer knows nothing about lines or indentation. This stream walks
//! the raw tokens line by line and synthesizes the layout tokens the parser
//! relies on:
//!
//! - `Begin` when a top-level group starts and after every `. ` item marker
//! - `End` whenever the indentation drops back below an open block, and for
//!   every open block at a blank line, an id line or the end of input
//! - `Newline` at the end of every non-blank line inside a group
//!
//! With these tokens in place the parser never looks at whitespace.
//!
//! ## Algorithm
//!
//! 1. Split the raw tokens into lines (multi-line strings and statements
//!    are single raw tokens, so they never split a line)
//! 2. For each line, take the column of its first token as its indent
//! 3. A `. ` item at column d closes blocks deeper than d, then opens a
//!    new block at d + 2
//! 4. A plain line at column i closes blocks deeper than i; the remaining
//!    block must sit exactly at i
//!
//! The stream never fails: malformed input becomes `Invalid` tokens plus an
//! entry in [`TokenStream::errors`].

use super::lexer::{RawKind, RawToken, tokenize};
use super::token::{Token, TokenKind};
use crate::base::{LineIndex, ParseError, Position, TextSize};
use tracing::trace;

/// One physical line of significant raw tokens
struct Line {
    tokens: Vec<Token>,
    /// Leading whitespace contained a tab
    tab_indented: bool,
}

/// Token stream with one and two token lookahead
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    index: usize,
    errors: Vec<ParseError>,
}

impl TokenStream {
    pub fn new(text: &str) -> Self {
        let line_index = LineIndex::new(text);
        let mut errors = Vec::new();
        let lines = split_lines(text, &line_index, &mut errors);
        let end_position = line_index.position(text, TextSize::new(text.len() as u32));
        let tokens = Layout::default().run(lines, end_position, &mut errors);
        trace!(count = tokens.len(), "structural tokens synthesized");
        Self {
            tokens,
            index: 0,
            errors,
        }
    }

    pub fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    /// The token after [`peek`](Self::peek)
    pub fn peek_peek(&self) -> Option<&Token> {
        self.tokens.get(self.index + 1)
    }

    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    pub fn peek_peek_kind(&self) -> Option<TokenKind> {
        self.peek_peek().map(|t| t.kind)
    }

    /// Position of the next token, or of the last token at end of input
    pub fn current_position(&self) -> Position {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|t| t.position)
            .unwrap_or_default()
    }

    /// Lexical errors found while building the stream
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ParseError> {
        self.errors
    }

    /// All tokens, regardless of how far the stream has been consumed
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}

impl Iterator for TokenStream {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.index).cloned();
        if token.is_some() {
            self.index += 1;
        }
        token
    }
}

/// Convert raw tokens into lines of positioned tokens, reporting malformed
/// literals along the way.
fn split_lines(text: &str, line_index: &LineIndex, errors: &mut Vec<ParseError>) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut current = Line {
        tokens: Vec::new(),
        tab_indented: false,
    };

    for raw in tokenize(text) {
        let position = line_index.position(text, TextSize::new(raw.span.start as u32));
        match raw.kind {
            Some(RawKind::LineBreak) => {
                lines.push(std::mem::replace(
                    &mut current,
                    Line {
                        tokens: Vec::new(),
                        tab_indented: false,
                    },
                ));
            }
            Some(RawKind::Whitespace) => {
                if current.tokens.is_empty() && raw.text.contains('\t') {
                    current.tab_indented = true;
                }
            }
            _ => current.tokens.push(classify(&raw, position, errors)),
        }
    }
    lines.push(current);
    lines
}

fn classify(raw: &RawToken<'_>, position: Position, errors: &mut Vec<ParseError>) -> Token {
    let Some(kind) = raw.kind else {
        errors.push(ParseError::lexical(
            format!("Unrecognized character '{}'", raw.text),
            position,
        ));
        return Token::new(TokenKind::Invalid, raw.text, position);
    };

    let closed = |open: &str, close: &str| {
        raw.text.len() >= open.len() + close.len() && raw.text.ends_with(close)
    };

    let (kind, unterminated) = match kind {
        RawKind::Id => (TokenKind::Id, !closed("[", "]")),
        RawKind::Name => (TokenKind::Name, false),
        RawKind::String => (TokenKind::String, !closed("\"", "\"")),
        RawKind::Statement => (TokenKind::Statement, !closed("'", "'")),
        RawKind::BlockComment => (TokenKind::BlockComment, !closed("::", "::")),
        RawKind::ColonEquals => (TokenKind::ColonEquals, false),
        RawKind::Colon => (TokenKind::Colon, false),
        RawKind::Equals => (TokenKind::Equals, false),
        RawKind::Comma => (TokenKind::Comma, false),
        RawKind::LParen => (TokenKind::LParen, false),
        RawKind::RParen => (TokenKind::RParen, false),
        RawKind::LCurly => (TokenKind::LCurly, false),
        RawKind::RCurly => (TokenKind::RCurly, false),
        RawKind::Underscore => (TokenKind::Underscore, false),
        RawKind::DotDotDot => (TokenKind::DotDotDot, false),
        RawKind::DotSpace => (TokenKind::DotSpace, false),
        RawKind::LineBreak | RawKind::Whitespace => unreachable!("layout tokens are handled by split_lines"),
    };

    if unterminated {
        errors.push(ParseError::lexical(
            format!("Unterminated {}", kind.describe().trim_start_matches("a ").trim_start_matches("an ")),
            position,
        ));
        return Token::new(TokenKind::Invalid, raw.text, position);
    }
    Token::new(kind, raw.text, position)
}

/// Indentation state machine
#[derive(Default)]
struct Layout {
    /// Columns of the open blocks; empty when outside of any group
    levels: Vec<i32>,
    out: Vec<Token>,
}

impl Layout {
    fn run(mut self, lines: Vec<Line>, end: Position, errors: &mut Vec<ParseError>) -> Vec<Token> {
        for line in lines {
            let Some(first) = line.tokens.first().cloned() else {
                self.close_all(end_of_previous(&self.out, end));
                continue;
            };

            match first.kind {
                TokenKind::Id | TokenKind::BlockComment => {
                    self.close_all(first.position);
                    self.out.push(first.clone());
                    for extra in &line.tokens[1..] {
                        errors.push(ParseError::lexical(
                            format!(
                                "Expected a new line after {} but found '{}'",
                                first.kind.describe(),
                                extra.text
                            ),
                            extra.position,
                        ));
                        self.out
                            .push(Token::new(TokenKind::Invalid, extra.text.clone(), extra.position));
                    }
                }
                _ => self.content_line(line, first, errors),
            }
        }
        self.close_all(end);
        self.out
    }

    fn content_line(&mut self, line: Line, first: Token, errors: &mut Vec<ParseError>) {
        if line.tab_indented {
            errors.push(ParseError::lexical(
                "Tabs cannot be used for indentation",
                first.position,
            ));
        }

        let column = first.position.column;
        if self.levels.is_empty() {
            self.out.push(Token::synthetic(TokenKind::Begin, first.position));
            self.levels.push(column);
        }

        let mut rest = &line.tokens[..];
        if first.kind == TokenKind::DotSpace {
            self.close_deeper_than(column, first.position);
            self.check_level(column, first.position, errors);
            self.out.push(first.clone());
            self.out.push(Token::synthetic(TokenKind::Begin, first.position));
            self.levels.push(column + 2);
            rest = &rest[1..];
        } else {
            if self.levels.last().is_some_and(|top| column > *top) {
                errors.push(ParseError::lexical("Unexpected indentation", first.position));
            } else {
                self.close_deeper_than(column, first.position);
                self.check_level(column, first.position, errors);
            }
        }

        for token in rest {
            if token.kind == TokenKind::DotSpace {
                errors.push(ParseError::lexical(
                    "'. ' can only start a line",
                    token.position,
                ));
                self.out
                    .push(Token::new(TokenKind::Invalid, token.text.clone(), token.position));
            } else {
                self.out.push(token.clone());
            }
        }

        let last = rest.last().unwrap_or(&first);
        self.out
            .push(Token::synthetic(TokenKind::Newline, end_of(last)));
    }

    fn check_level(&self, column: i32, position: Position, errors: &mut Vec<ParseError>) {
        if self.levels.last().is_some_and(|top| *top != column) {
            errors.push(ParseError::lexical("Inconsistent indentation", position));
        }
    }

    fn close_deeper_than(&mut self, column: i32, position: Position) {
        while self.levels.len() > 1 && self.levels.last().is_some_and(|top| *top > column) {
            self.levels.pop();
            self.out.push(Token::synthetic(TokenKind::End, position));
        }
    }

    fn close_all(&mut self, position: Position) {
        while self.levels.pop().is_some() {
            self.out.push(Token::synthetic(TokenKind::End, position));
        }
    }
}

/// Position just past the last character of `token`
fn end_of(token: &Token) -> Position {
    match token.text.rsplit_once('\n') {
        Some((before, last_line)) => Position::new(
            token.position.row + before.matches('\n').count() as i32 + 1,
            last_line.chars().count() as i32,
        ),
        None => Position::new(
            token.position.row,
            token.position.column + token.text.chars().count() as i32,
        ),
    }
}

fn end_of_previous(out: &[Token], fallback: Position) -> Position {
    out.last().map(|t| t.position).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use TokenKind::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        TokenStream::new(text).map(|t| t.kind).collect()
    }

    #[test]
    fn test_single_section_group() {
        assert_eq!(
            kinds("Note:\ncontent: \"x\"\n"),
            vec![Begin, Name, Colon, Newline, Name, Colon, String, Newline, End]
        );
    }

    #[test]
    fn test_items_open_and_close_blocks() {
        let text = "means:\n. 'a'\n. forAll: y\n  then: 'b'\nMetadata:\n";
        assert_eq!(
            kinds(text),
            vec![
                Begin, Name, Colon, Newline, // means:
                DotSpace, Begin, Statement, Newline, // . 'a'
                End, DotSpace, Begin, Name, Colon, Name, Newline, // . forAll: y
                Name, Colon, Statement, Newline, // then: 'b'
                End, Name, Colon, Newline, // Metadata:
                End,
            ]
        );
    }

    #[test]
    fn test_nested_items() {
        let text = "a:\n. b:\n  . 'c'\n";
        assert_eq!(
            kinds(text),
            vec![
                Begin, Name, Colon, Newline, DotSpace, Begin, Name, Colon, Newline, DotSpace,
                Begin, Statement, Newline, End, End, End,
            ]
        );
    }

    #[test]
    fn test_blank_line_separates_groups_and_id_starts_group() {
        let text = "A:\n\n[x]\nB:\n";
        assert_eq!(
            kinds(text),
            vec![Begin, Name, Colon, Newline, End, Id, Begin, Name, Colon, Newline, End]
        );
    }

    #[test]
    fn test_unexpected_indentation_is_reported() {
        let stream = TokenStream::new("A:\n  B:\n");
        assert_eq!(stream.errors().len(), 1);
        assert_eq!(stream.errors()[0].message, "Unexpected indentation");
        assert_eq!(stream.errors()[0].row, 1);
    }

    #[test]
    fn test_unterminated_statement_is_invalid() {
        let stream = TokenStream::new("A: 'x\n");
        assert!(stream.tokens().iter().any(|t| t.kind == Invalid));
        assert_eq!(stream.errors()[0].message, "Unterminated statement");
    }

    #[test]
    fn test_newline_after_multi_line_statement() {
        let stream = TokenStream::new("A: 'x\nlong'\n");
        assert!(stream.errors().is_empty(), "{:?}", stream.errors());
        let newline = stream
            .tokens()
            .iter()
            .find(|t| t.kind == Newline)
            .cloned()
            .unwrap();
        assert_eq!(newline.position, Position::new(1, 5));
    }

    #[test]
    fn test_newline_after_single_line_token() {
        let stream = TokenStream::new("A: 'xy'\n");
        let newline = stream
            .tokens()
            .iter()
            .find(|t| t.kind == Newline)
            .cloned()
            .unwrap();
        assert_eq!(newline.position, Position::new(0, 7));
    }

    #[test]
    fn test_lookahead() {
        let mut stream = TokenStream::new("x: y\n");
        assert_eq!(stream.peek_kind(), Some(Begin));
        assert_eq!(stream.peek_peek_kind(), Some(Name));
        stream.next();
        assert!(stream.has_next());
        assert_eq!(stream.peek().map(|t| t.text.as_str()), Some("x"));
    }

    #[test]
    fn test_positions_are_zero_based() {
        let stream = TokenStream::new("A:\n. 'x'\n");
        let stmt = stream
            .tokens()
            .iter()
            .find(|t| t.kind == Statement)
            .cloned()
            .unwrap();
        assert_eq!(stmt.position, Position::new(1, 2));
    }
}
