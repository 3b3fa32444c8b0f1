//! Tokens of the structural layer.

use crate::base::Position;
use smol_str::SmolStr;
use std::fmt;

/// Kinds of structural tokens.
///
/// `Begin`, `End` and `Newline` are synthetic: they carry no source text and
/// are produced by the [`TokenStream`](super::TokenStream) from the
/// indentation of each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `[...]` at the start of a line
    Id,
    Name,
    /// `"..."`
    String,
    /// `'...'`
    Statement,
    Colon,
    ColonEquals,
    Equals,
    Comma,
    LParen,
    RParen,
    LCurly,
    RCurly,
    Underscore,
    DotDotDot,
    /// `. ` introducing a list item
    DotSpace,
    Newline,
    Begin,
    End,
    /// `::...::`
    BlockComment,
    Invalid,
}

impl TokenKind {
    /// Human readable description used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Id => "an id",
            Self::Name => "a name",
            Self::String => "a string",
            Self::Statement => "a statement",
            Self::Colon => "':'",
            Self::ColonEquals => "':='",
            Self::Equals => "'='",
            Self::Comma => "','",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LCurly => "'{'",
            Self::RCurly => "'}'",
            Self::Underscore => "'_'",
            Self::DotDotDot => "'...'",
            Self::DotSpace => "'. '",
            Self::Newline => "a new line",
            Self::Begin => "the start of a block",
            Self::End => "the end of a block",
            Self::BlockComment => "a text block",
            Self::Invalid => "an invalid token",
        }
    }

    /// Whether the kind is synthesized from layout rather than read from text
    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::Begin | Self::End | Self::Newline)
    }
}

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: SmolStr,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<SmolStr>, position: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    /// A synthetic token with no text
    pub fn synthetic(kind: TokenKind, position: Position) -> Self {
        Self::new(kind, "", position)
    }

    /// A token built for printing, without a source location
    pub fn detached(kind: TokenKind, text: impl Into<SmolStr>) -> Self {
        Self::new(kind, text, Position::UNKNOWN)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// The text between the delimiters of a string, statement, id or text block.
    ///
    /// Returns the text unchanged for any other kind.
    pub fn inner_text(&self) -> &str {
        let text = self.text.as_str();
        let (open, close) = match self.kind {
            TokenKind::String => ("\"", "\""),
            TokenKind::Statement => ("'", "'"),
            TokenKind::Id => ("[", "]"),
            TokenKind::BlockComment => ("::", "::"),
            _ => return text,
        };
        let text = text.strip_prefix(open).unwrap_or(text);
        text.strip_suffix(close).unwrap_or(text)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.is_synthetic() {
            write!(f, "<{:?}>", self.kind)
        } else {
            f.write_str(&self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_text_strips_delimiters() {
        let stmt = Token::detached(TokenKind::Statement, "'x is \\real'");
        assert_eq!(stmt.inner_text(), "x is \\real");
        let id = Token::detached(TokenKind::Id, "[\\f(x)]");
        assert_eq!(id.inner_text(), "\\f(x)");
        let name = Token::detached(TokenKind::Name, "x");
        assert_eq!(name.inner_text(), "x");
    }

    #[test]
    fn test_synthetic_display() {
        let begin = Token::synthetic(TokenKind::Begin, Position::new(0, 0));
        assert_eq!(begin.to_string(), "<Begin>");
        assert!(TokenKind::End.is_synthetic());
        assert!(!TokenKind::Name.is_synthetic());
    }
}
