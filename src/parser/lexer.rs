//! Logos-based raw lexer for the structural layer
//!
//! Produces a flat list of raw tokens with byte spans. Layout (indentation,
//! `Begin`/`End`, `Newline`) is handled afterwards by the
//! [`TokenStream`](super::TokenStream).

use logos::Logos;
use std::ops::Range;

/// A raw token with its text and byte span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawToken<'a> {
    /// `None` when logos could not match any rule at this position
    pub kind: Option<RawKind>,
    pub text: &'a str,
    pub span: Range<usize>,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, RawKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: RawKind::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = RawToken<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?;
        Some(RawToken {
            kind: result.ok(),
            text: self.inner.slice(),
            span: self.inner.span(),
        })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<RawToken<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum for the structural layer
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    // =========================================================================
    // LAYOUT
    // =========================================================================
    #[regex(r"\r?\n")]
    LineBreak,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[token(". ")]
    DotSpace,

    // =========================================================================
    // LITERALS
    // =========================================================================
    /// Closing bracket is checked by the token stream
    #[token("[", lex_id)]
    Id,

    #[regex(r"[A-Za-z0-9$#]+")]
    Name,

    /// Closing quote is checked by the token stream
    #[regex(r#""[^"]*"?"#)]
    String,

    #[regex(r"'[^']*'?")]
    Statement,

    #[token("::", lex_block_comment)]
    BlockComment,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token(":=")]
    ColonEquals,

    #[token(":")]
    Colon,

    #[token("=")]
    Equals,

    #[token(",")]
    Comma,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("{")]
    LCurly,

    #[token("}")]
    RCurly,

    #[token("_")]
    Underscore,

    #[token("...")]
    DotDotDot,
}

/// Consume a balanced `[...]` on the current line.
///
/// Stops at the end of the line when the brackets never balance; the
/// token stream reports that as an unterminated id.
fn lex_id(lex: &mut logos::Lexer<RawKind>) -> bool {
    let mut depth = 1usize;
    let mut consumed = 0usize;
    for c in lex.remainder().chars() {
        if c == '\n' || c == '\r' {
            break;
        }
        consumed += c.len_utf8();
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            _ => {}
        }
    }
    lex.bump(consumed);
    true
}

/// Consume a text block up to and including the closing `::`.
fn lex_block_comment(lex: &mut logos::Lexer<RawKind>) -> bool {
    let remainder = lex.remainder();
    let consumed = match remainder.find("::") {
        Some(end) => end + 2,
        None => remainder.len(),
    };
    lex.bump(consumed);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<Option<RawKind>> {
        tokenize(input)
            .into_iter()
            .filter(|t| t.kind != Some(RawKind::Whitespace))
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_section_line() {
        assert_eq!(
            kinds("means: 'x', \"y\""),
            vec![
                Some(RawKind::Name),
                Some(RawKind::Colon),
                Some(RawKind::Statement),
                Some(RawKind::Comma),
                Some(RawKind::String),
            ]
        );
    }

    #[test]
    fn test_id_is_balanced() {
        let tokens = tokenize("[\\f[x](y)]\n");
        assert_eq!(tokens[0].kind, Some(RawKind::Id));
        assert_eq!(tokens[0].text, "[\\f[x](y)]");
        assert_eq!(tokens[1].kind, Some(RawKind::LineBreak));
    }

    #[test]
    fn test_unterminated_id_stops_at_line_end() {
        let tokens = tokenize("[\\f(x)\nDefines: f");
        assert_eq!(tokens[0].text, "[\\f(x)");
        assert_eq!(tokens[1].kind, Some(RawKind::LineBreak));
    }

    #[test]
    fn test_statement_spans_lines() {
        let tokens = tokenize("'a\nb'");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, Some(RawKind::Statement));
    }

    #[test]
    fn test_punctuation_longest_match() {
        assert_eq!(
            kinds("x := {a}_{i}..."),
            vec![
                Some(RawKind::Name),
                Some(RawKind::ColonEquals),
                Some(RawKind::LCurly),
                Some(RawKind::Name),
                Some(RawKind::RCurly),
                Some(RawKind::Underscore),
                Some(RawKind::LCurly),
                Some(RawKind::Name),
                Some(RawKind::RCurly),
                Some(RawKind::DotDotDot),
            ]
        );
    }

    #[test]
    fn test_dot_space_and_block_comment() {
        assert_eq!(
            kinds(". x"),
            vec![Some(RawKind::DotSpace), Some(RawKind::Name)]
        );
        let tokens = tokenize("::some: text::");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, Some(RawKind::BlockComment));
    }

    #[test]
    fn test_unknown_character_is_error() {
        assert_eq!(kinds("x ! y"), vec![Some(RawKind::Name), None, Some(RawKind::Name)]);
    }
}
