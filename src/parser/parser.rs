//! Recursive descent parser for the structural layer
//!
//! Builds a [`Root`] from the layout-aware [`TokenStream`].
//! Error tolerant: malformed constructs are reported, replaced by
//! [`Target::Invalid`] placeholders or skipped, and parsing resumes at the
//! next line or block boundary so every error in the document is collected
//! in a single pass.

use super::ast::{
    Abstraction, Aggregate, Argument, Assignment, Group, Mapping, Root, RootItem, Section, Target,
    Tuple,
};
use super::token::{Token, TokenKind};
use super::token_stream::TokenStream;
use crate::base::{ParseError, Position};
use tracing::debug;

/// Parse structural source text into a concrete tree.
///
/// Lexical errors from the token stream come first in the returned list,
/// followed by structural errors in source order.
pub fn parse_structure(text: &str) -> (Root, Vec<ParseError>) {
    let stream = TokenStream::new(text);
    let mut parser = Parser::new(stream);
    let root = parser.parse_root();
    let (stream, mut errors) = (parser.stream, parser.errors);
    let mut all = stream.into_errors();
    all.append(&mut errors);
    debug!(
        items = root.items.len(),
        errors = all.len(),
        "structural parse finished"
    );
    (root, all)
}

/// The parser state
struct Parser {
    stream: TokenStream,
    errors: Vec<ParseError>,
}

impl Parser {
    fn new(stream: TokenStream) -> Self {
        Self {
            stream,
            errors: Vec::new(),
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn at(&self, kind: TokenKind) -> bool {
        self.stream.peek_kind() == Some(kind)
    }

    fn at_eof(&self) -> bool {
        !self.stream.has_next()
    }

    fn nth_is(&self, kind: TokenKind) -> bool {
        self.stream.peek_peek_kind() == Some(kind)
    }

    /// At a section header, that is `Name Colon`
    fn at_section_start(&self) -> bool {
        self.at(TokenKind::Name) && self.nth_is(TokenKind::Colon)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) -> Option<Token> {
        self.stream.next()
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.at(kind) { self.bump() } else { None }
    }

    fn expect(&mut self, kind: TokenKind) -> Option<Token> {
        if let Some(token) = self.eat(kind) {
            return Some(token);
        }
        let found = self
            .stream
            .peek()
            .map(describe_found)
            .unwrap_or_else(|| "the end of input".to_string());
        self.error(format!("Expected {} but found {}", kind.describe(), found));
        None
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let position = self.stream.current_position();
        self.errors.push(ParseError::structural(message, position));
    }

    /// Skip to the end of the current line, stepping over nested blocks.
    ///
    /// Consumes the `Newline`, stops before an `End` that closes the current
    /// block.
    fn recover_line(&mut self) {
        let mut depth = 0usize;
        while let Some(kind) = self.stream.peek_kind() {
            match kind {
                TokenKind::Begin => depth += 1,
                TokenKind::End if depth == 0 => return,
                TokenKind::End => depth -= 1,
                TokenKind::Newline if depth == 0 => {
                    self.bump();
                    return;
                }
                _ => {}
            }
            self.bump();
        }
    }

    /// Skip everything up to the `End` closing the current block
    fn recover_block(&mut self) {
        let mut depth = 0usize;
        while let Some(kind) = self.stream.peek_kind() {
            match kind {
                TokenKind::Begin => depth += 1,
                TokenKind::End if depth == 0 => return,
                TokenKind::End => depth -= 1,
                _ => {}
            }
            self.bump();
        }
    }

    // =========================================================================
    // Grammar rules
    // =========================================================================

    /// root := (BlockComment | group)*
    fn parse_root(&mut self) -> Root {
        let mut items = Vec::new();
        while let Some(kind) = self.stream.peek_kind() {
            match kind {
                TokenKind::BlockComment => {
                    if let Some(token) = self.bump() {
                        items.push(RootItem::BlockComment(token));
                    }
                }
                TokenKind::Id | TokenKind::Begin => {
                    if let Some(group) = self.parse_group() {
                        items.push(RootItem::Group(group));
                    }
                }
                _ => {
                    let found = self.stream.peek().map(describe_found).unwrap_or_default();
                    self.error(format!("Expected a group but found {}", found));
                    self.bump();
                }
            }
        }
        Root { items }
    }

    /// group := Id? Begin section+ End
    fn parse_group(&mut self) -> Option<Group> {
        let id = self.eat(TokenKind::Id);
        let Some(begin) = self.eat(TokenKind::Begin) else {
            self.error("Expected a group after the id");
            return None;
        };
        let position = id.as_ref().map(|t| t.position).unwrap_or(begin.position);
        let sections = self.parse_sections();
        self.expect(TokenKind::End);
        if sections.is_empty() {
            self.errors.push(ParseError::structural(
                "Expected at least one section",
                begin.position,
            ));
            return None;
        }
        Some(Group {
            id,
            sections,
            position,
        })
    }

    /// section+ up to the `End` of the current block
    fn parse_sections(&mut self) -> Vec<Section> {
        let mut sections = Vec::new();
        while !self.at_eof() && !self.at(TokenKind::End) {
            if self.at_section_start() {
                sections.push(self.parse_section());
            } else {
                let found = self.stream.peek().map(describe_found).unwrap_or_default();
                self.error(format!(
                    "Expected a section name followed by ':' but found {}",
                    found
                ));
                self.recover_line();
                // Items following a broken header have no section to attach to
                while self.at(TokenKind::DotSpace) {
                    self.bump();
                    self.recover_block_with_end();
                }
            }
        }
        sections
    }

    /// section := Name Colon [argument (Comma argument)*] Newline item*
    fn parse_section(&mut self) -> Section {
        let name = self.bump().unwrap_or_else(|| {
            Token::synthetic(TokenKind::Invalid, self.stream.current_position())
        });
        self.bump(); // ':'

        let mut args = Vec::new();
        if !self.at(TokenKind::Newline) && !self.at(TokenKind::End) && !self.at_eof() {
            loop {
                args.push(self.parse_argument());
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
            if !self.at(TokenKind::Newline) {
                self.expect(TokenKind::Comma);
                self.recover_line();
            }
        }
        self.eat(TokenKind::Newline);

        while self.at(TokenKind::DotSpace) {
            args.push(self.parse_item());
        }

        Section { name, args }
    }

    /// item := DotSpace Begin (section+ | argument Newline) End
    fn parse_item(&mut self) -> Argument {
        let dot = self.bump();
        let position = dot
            .map(|t| Position::new(t.position.row, t.position.column + 2))
            .unwrap_or_default();
        if self.expect(TokenKind::Begin).is_none() {
            self.recover_line();
            return Argument::new(Target::Invalid(Token::synthetic(TokenKind::Invalid, position)));
        }

        let argument = if self.at_section_start() {
            let sections = self.parse_sections();
            Argument::new(Target::Group(Group {
                id: None,
                sections,
                position,
            }))
        } else {
            let argument = self.parse_argument();
            if !self.at(TokenKind::Newline) {
                let found = self.stream.peek().map(describe_found).unwrap_or_default();
                self.error(format!("Expected a new line after an item but found {}", found));
            }
            self.recover_line();
            if !self.at(TokenKind::End) && !self.at_eof() {
                self.error("Only one argument is allowed per item");
                self.recover_block();
            }
            argument
        };
        self.expect(TokenKind::End);
        argument
    }

    fn recover_block_with_end(&mut self) {
        self.eat(TokenKind::Begin);
        self.recover_block();
        self.eat(TokenKind::End);
    }

    /// argument := literal | mapping | tupleItem
    fn parse_argument(&mut self) -> Argument {
        if let Some(token) = self.parse_literal() {
            return Argument::new(Target::Literal(token));
        }
        if self.at(TokenKind::Name) && self.nth_is(TokenKind::Equals) {
            return Argument::new(self.parse_mapping());
        }
        Argument::new(self.parse_tuple_item())
    }

    /// literal := String | Statement
    fn parse_literal(&mut self) -> Option<Token> {
        self.eat(TokenKind::String)
            .or_else(|| self.eat(TokenKind::Statement))
    }

    /// mapping := Name Equals String
    fn parse_mapping(&mut self) -> Target {
        let name = self.bump().unwrap_or_else(|| Token::synthetic(TokenKind::Invalid, Position::UNKNOWN));
        self.bump(); // '='
        match self.expect(TokenKind::String) {
            Some(value) => Target::Mapping(Mapping { name, value }),
            None => Target::Invalid(name),
        }
    }

    /// tupleItem := assignment | tuple | aggregate | abstraction
    fn parse_tuple_item(&mut self) -> Target {
        match self.stream.peek_kind() {
            Some(TokenKind::Name) if self.nth_is(TokenKind::ColonEquals) => self.parse_assignment(),
            Some(TokenKind::LParen) => self.parse_tuple(),
            Some(TokenKind::LCurly) => self.parse_curly(),
            Some(TokenKind::Name) => self.parse_abstraction(),
            _ => self.invalid_argument(),
        }
    }

    fn invalid_argument(&mut self) -> Target {
        let position = self.stream.current_position();
        let found = self.stream.peek().map(describe_found).unwrap_or_else(|| "the end of input".to_string());
        self.error(format!("Expected an argument but found {}", found));
        match self.stream.peek_kind() {
            Some(TokenKind::Newline | TokenKind::End | TokenKind::Begin | TokenKind::Comma | TokenKind::DotSpace)
            | None => Target::Invalid(Token::synthetic(TokenKind::Invalid, position)),
            Some(_) => {
                let token = self.bump().unwrap_or_else(|| Token::synthetic(TokenKind::Invalid, position));
                Target::Invalid(Token::new(TokenKind::Invalid, token.text, token.position))
            }
        }
    }

    /// assignment := Name ColonEquals (literal | tupleItem)
    fn parse_assignment(&mut self) -> Target {
        let lhs = self.bump().unwrap_or_else(|| Token::synthetic(TokenKind::Invalid, Position::UNKNOWN));
        self.bump(); // ':='
        let rhs = match self.parse_literal() {
            Some(token) => Target::Literal(token),
            None => self.parse_tuple_item(),
        };
        Target::Assignment(Assignment {
            lhs,
            rhs: Box::new(rhs),
        })
    }

    /// tuple := LParen tupleItem (Comma tupleItem)* RParen
    fn parse_tuple(&mut self) -> Target {
        let open = self.bump();
        let position = open.map(|t| t.position).unwrap_or_default();
        let mut items = vec![self.parse_tuple_item()];
        while self.eat(TokenKind::Comma).is_some() {
            items.push(self.parse_tuple_item());
        }
        self.expect(TokenKind::RParen);
        Target::Tuple(Tuple { items, position })
    }

    /// aggregate := LCurly core (Comma core)+ RCurly
    /// abstraction := LCurly core RCurly (Underscore subParams)? DotDotDot?
    fn parse_curly(&mut self) -> Target {
        let open = self.bump();
        let position = open.map(|t| t.position).unwrap_or_default();
        let Some(first) = self.parse_core() else {
            return self.invalid_argument();
        };

        if self.at(TokenKind::Comma) {
            let mut items = vec![first];
            while self.eat(TokenKind::Comma).is_some() {
                match self.parse_core() {
                    Some(core) => items.push(core),
                    None => {
                        self.error("Expected a name in the parameter set");
                        break;
                    }
                }
            }
            self.expect(TokenKind::RCurly);
            return Target::Aggregate(Aggregate { items, position });
        }

        self.expect(TokenKind::RCurly);
        let outer_subparams = if self.eat(TokenKind::Underscore).is_some() {
            self.parse_sub_params()
        } else {
            None
        };
        let is_varargs = self.eat(TokenKind::DotDotDot).is_some();
        Target::Abstraction(Abstraction {
            is_enclosed: true,
            outer_subparams,
            is_varargs,
            position,
            ..first
        })
    }

    /// core DotDotDot? as a target, collapsing bare names into literals
    fn parse_abstraction(&mut self) -> Target {
        let Some(mut core) = self.parse_core() else {
            return self.invalid_argument();
        };
        core.is_varargs = self.eat(TokenKind::DotDotDot).is_some();
        if core.subparams.is_none() && core.params.is_none() && !core.is_varargs {
            return Target::Literal(core.name);
        }
        Target::Abstraction(core)
    }

    /// core := Name (Underscore subParams)? (LParen nameList RParen)?
    fn parse_core(&mut self) -> Option<Abstraction> {
        let name = self.expect(TokenKind::Name)?;
        let subparams = if self.eat(TokenKind::Underscore).is_some() {
            self.parse_sub_params()
        } else {
            None
        };
        let params = if self.eat(TokenKind::LParen).is_some() {
            let names = self.parse_name_list(TokenKind::RParen);
            self.expect(TokenKind::RParen);
            Some(names)
        } else {
            None
        };
        Some(Abstraction {
            position: name.position,
            name,
            subparams,
            params,
            is_enclosed: false,
            outer_subparams: None,
            is_varargs: false,
        })
    }

    /// subParams := Name | LCurly nameList RCurly
    fn parse_sub_params(&mut self) -> Option<Vec<Token>> {
        if let Some(name) = self.eat(TokenKind::Name) {
            return Some(vec![name]);
        }
        if self.eat(TokenKind::LCurly).is_some() {
            let names = self.parse_name_list(TokenKind::RCurly);
            self.expect(TokenKind::RCurly);
            return Some(names);
        }
        self.error("Expected a name or '{' after '_'");
        None
    }

    /// nameList := Name (Comma Name)*, possibly empty before `close`
    fn parse_name_list(&mut self, close: TokenKind) -> Vec<Token> {
        let mut names = Vec::new();
        if self.at(close) {
            return names;
        }
        loop {
            match self.expect(TokenKind::Name) {
                Some(name) => names.push(name),
                None => break,
            }
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        names
    }
}

fn describe_found(token: &Token) -> String {
    if token.kind.is_synthetic() || token.text.is_empty() {
        token.kind.describe().to_string()
    } else {
        format!("'{}'", token.text)
    }
}
