//! Semantic validation: concrete tree to typed document
//!
//! One validator per construct kind. Each matches the group's sections
//! against its [`Rule`](super::grammar::Rule) list, converts the arguments of
//! every present section to the expected shape and applies the construct's
//! cross-field checks.
//!
//! Errors never abort validation. A construct whose own checks fail is
//! replaced by its `Default` value and validation moves on to the next
//! sibling.

mod clauses;
mod definitions;
mod entries;
mod results;

use super::grammar::{Arity, Matched, Rule, match_sections};
use crate::base::{ParseError, Position};
use crate::expression::{Command, ExprNode, Expression, parse_expression_at, signature_of_command_text};
use crate::parser::{self, Argument, Group, Root, RootItem, Section, Token, TokenKind};
use crate::syntax::{Document, IdStatement, Statement, Target, Text, TextBlock, TopLevelGroup};
use tracing::{debug, trace};

/// Validate a concrete tree.
///
/// The returned document holds one node per recognized top-level group, in
/// source order, with defaults in place of malformed constructs.
pub fn validate(root: &Root) -> (Document, Vec<ParseError>) {
    let mut validator = Validator::default();
    let mut groups = Vec::with_capacity(root.items.len());
    for item in &root.items {
        match item {
            RootItem::BlockComment(token) => groups.push(TopLevelGroup::TextBlock(TextBlock {
                text: token.inner_text().into(),
                position: token.position,
            })),
            RootItem::Group(group) => {
                if let Some(group) = validator.top_level(group) {
                    groups.push(group);
                }
            }
        }
    }
    debug!(
        groups = groups.len(),
        errors = validator.errors.len(),
        "validated document"
    );
    (Document { groups }, validator.errors)
}

#[derive(Debug, Default)]
pub(crate) struct Validator {
    errors: Vec<ParseError>,
}

impl Validator {
    fn top_level(&mut self, group: &Group) -> Option<TopLevelGroup> {
        let kind = group.kind_name()?;
        trace!(kind, row = group.position.row, "validating group");
        let node = match kind {
            "Defines" => TopLevelGroup::Defines(self.defines(group).unwrap_or_default()),
            "Foundation" => TopLevelGroup::Foundation(self.foundation(group).unwrap_or_default()),
            "States" => TopLevelGroup::States(self.states(group).unwrap_or_default()),
            "Views" => TopLevelGroup::Views(self.views(group).unwrap_or_default()),
            "Evaluates" => TopLevelGroup::Evaluates(self.evaluates(group).unwrap_or_default()),
            "Axiom" => TopLevelGroup::Axiom(self.result_body("Axiom", group).unwrap_or_default()),
            "Conjecture" => {
                TopLevelGroup::Conjecture(self.result_body("Conjecture", group).unwrap_or_default())
            }
            "Theorem" => TopLevelGroup::Theorem(self.theorem(group).unwrap_or_default()),
            "Resource" => TopLevelGroup::Resource(self.resource(group).unwrap_or_default()),
            "Topic" => TopLevelGroup::Topic(self.topic(group).unwrap_or_default()),
            "Note" => TopLevelGroup::Note(self.note(group).unwrap_or_default()),
            "Specify" => TopLevelGroup::Specify(self.specify(group).unwrap_or_default()),
            other => {
                self.report(ParseError::section(
                    format!("Unknown top-level group '{}'", other),
                    group.position,
                ));
                return None;
            }
        };
        Some(node)
    }

    fn report(&mut self, error: ParseError) {
        trace!(message = %error.message, row = error.row, "reported");
        self.errors.push(error);
    }

    // =========================================================================
    // Sections
    // =========================================================================

    fn sections<'a>(&mut self, group: &'a Group, rules: &[Rule]) -> Option<Matched<'a>> {
        match match_sections(&group.sections, rules, group.position) {
            Ok(matched) => Some(matched),
            Err(error) => {
                self.report(error);
                None
            }
        }
    }

    fn arity(&mut self, section: &Section, arity: Arity) -> Option<()> {
        match arity.check(section) {
            Ok(()) => Some(()),
            Err(error) => {
                self.report(error);
                None
            }
        }
    }

    /// Convert every argument of `section` with `convert`.
    ///
    /// All arguments are visited so each malformed one is reported; the
    /// section fails if any of them did.
    fn each<T>(
        &mut self,
        section: &Section,
        arity: Arity,
        mut convert: impl FnMut(&mut Self, &Argument) -> Option<T>,
    ) -> Option<Vec<T>> {
        self.arity(section, arity)?;
        let mut out = Vec::with_capacity(section.args.len());
        let mut ok = true;
        for arg in &section.args {
            match convert(self, arg) {
                Some(value) => out.push(value),
                None => ok = false,
            }
        }
        ok.then_some(out)
    }

    /// Convert an optional section. An absent section is `Some(None)`; a
    /// present one that fails to convert fails the caller.
    fn optional<T>(
        &mut self,
        section: Option<&Section>,
        convert: impl FnOnce(&mut Self, &Section) -> Option<T>,
    ) -> Option<Option<T>> {
        match section {
            Some(section) => Some(Some(convert(self, section)?)),
            None => Some(None),
        }
    }

    fn statements(&mut self, section: &Section, arity: Arity) -> Option<Vec<Statement>> {
        self.each(section, arity, Self::statement)
    }

    fn single_statement(&mut self, section: &Section) -> Option<Statement> {
        self.statements(section, Arity::Exactly(1))?.pop()
    }

    fn texts(&mut self, section: &Section, arity: Arity) -> Option<Vec<Text>> {
        self.each(section, arity, Self::text)
    }

    fn targets(&mut self, section: &Section, arity: Arity) -> Option<Vec<Target>> {
        self.each(section, arity, Self::target)
    }

    /// `using` statements, each of which must be a `:=` definition
    fn using(&mut self, section: &Section) -> Option<Vec<Statement>> {
        let statements = self.statements(section, Arity::AtLeast(1))?;
        let mut ok = true;
        for statement in &statements {
            if matches!(&statement.expression, Some(expr) if !expr.is_colon_equals()) {
                self.report(ParseError::semantic(
                    "A 'using' statement must be of the form 'name := expression'",
                    statement.position,
                ));
                ok = false;
            }
        }
        ok.then_some(statements)
    }

    /// Arguments of a header section that may only hold strings.
    ///
    /// Reports a single error for the whole section.
    fn header_strings(&mut self, section: &Section) -> Option<Vec<Text>> {
        let all_strings = section
            .args
            .iter()
            .all(|arg| arg.target.literal(TokenKind::String).is_some());
        if !all_strings {
            self.report(ParseError::section(
                format!(
                    "Expected every argument of section '{}' to be a string",
                    section.name.text
                ),
                section.position(),
            ));
            return None;
        }
        self.texts(section, Arity::AtLeast(0))
    }

    /// Nested single-section groups such as metadata and resource items
    fn items<'a>(&mut self, section: &'a Section) -> Option<Vec<&'a Group>> {
        self.arity(section, Arity::AtLeast(1))?;
        let mut out = Vec::with_capacity(section.args.len());
        let mut ok = true;
        for arg in &section.args {
            match &arg.target {
                parser::Target::Group(group) => out.push(group),
                other => {
                    self.wrong_shape::<()>("an item", other);
                    ok = false;
                }
            }
        }
        ok.then_some(out)
    }

    // =========================================================================
    // Leaves
    // =========================================================================

    fn statement(&mut self, arg: &Argument) -> Option<Statement> {
        match arg.target.literal(TokenKind::Statement) {
            Some(token) => Some(self.statement_token(token)),
            None => self.wrong_shape("a statement", &arg.target),
        }
    }

    fn statement_token(&mut self, token: &Token) -> Statement {
        let mut statement = Statement {
            text: token.inner_text().into(),
            expression: None,
            position: token.position,
        };
        let (expression, errors) = parse_expression_at(&statement.text, statement.text_origin());
        self.errors.extend(errors);
        statement.expression = expression;
        statement
    }

    fn text(&mut self, arg: &Argument) -> Option<Text> {
        match arg.target.literal(TokenKind::String) {
            Some(token) => Some(Text {
                text: token.inner_text().into(),
                position: token.position,
            }),
            None => self.wrong_shape("a string", &arg.target),
        }
    }

    fn target(&mut self, arg: &Argument) -> Option<Target> {
        match &arg.target {
            parser::Target::Literal(token) if token.is(TokenKind::Name) => Some(Target::Name {
                name: token.text.clone(),
                position: token.position,
            }),
            parser::Target::Abstraction(abstraction) => {
                Some(Target::Abstraction(abstraction.clone()))
            }
            parser::Target::Aggregate(aggregate) => Some(Target::Aggregate(aggregate.clone())),
            parser::Target::Tuple(tuple) => Some(Target::Tuple(tuple.clone())),
            parser::Target::Assignment(assignment) => Some(Target::Assignment(assignment.clone())),
            other => self.wrong_shape("a target", other),
        }
    }

    /// Report an argument of the wrong shape.
    ///
    /// Arguments the structural parser already rejected are not reported
    /// twice.
    fn wrong_shape<T>(&mut self, expected: &str, found: &parser::Target) -> Option<T> {
        if !matches!(found, parser::Target::Invalid(_)) {
            self.report(ParseError::section(
                format!("Expected {} but found {}", expected, describe(found)),
                found.position(),
            ));
        }
        None
    }

    // =========================================================================
    // Ids
    // =========================================================================

    /// The id of a group that must be a single command, with that command
    fn command_id(&mut self, kind: &str, group: &Group) -> Option<(IdStatement, Command)> {
        let Some(token) = &group.id else {
            self.report(ParseError::semantic(
                format!("A '{}' group requires an id", kind),
                group.position,
            ));
            return None;
        };
        let text = token.inner_text();
        let origin = text_origin(token.position);
        match parse_expression_at(text, origin) {
            (
                Some(Expression {
                    root: ExprNode::Command(command),
                }),
                errors,
            ) if errors.is_empty() => {
                let id = IdStatement {
                    text: text.into(),
                    signature: Some(command.signature()),
                    position: token.position,
                };
                Some((id, command))
            }
            (_, errors) => {
                self.errors.extend(errors);
                self.report(ParseError::semantic(
                    format!(
                        "The id of a '{}' group must be a single command such as \\name(x)",
                        kind
                    ),
                    token.position,
                ));
                None
            }
        }
    }

    /// The id of a group that may be anything; required when `kind` is given
    fn free_id(&mut self, group: &Group, required_by: Option<&str>) -> Option<Option<IdStatement>> {
        match (&group.id, required_by) {
            (Some(token), _) => {
                let text = token.inner_text();
                Some(Some(IdStatement {
                    text: text.into(),
                    signature: signature_of_command_text(text),
                    position: token.position,
                }))
            }
            (None, Some(kind)) => {
                self.report(ParseError::semantic(
                    format!("A '{}' group requires an id", kind),
                    group.position,
                ));
                None
            }
            (None, None) => Some(None),
        }
    }

    /// Reject an id on a group kind that takes none
    fn no_id(&mut self, kind: &str, group: &Group) -> Option<()> {
        match &group.id {
            Some(token) => {
                self.report(ParseError::semantic(
                    format!("A '{}' group does not take an id", kind),
                    token.position,
                ));
                None
            }
            None => Some(()),
        }
    }
}

fn text_origin(position: Position) -> Position {
    if position.is_known() {
        Position::new(position.row, position.column + 1)
    } else {
        Position::UNKNOWN
    }
}

fn describe(target: &parser::Target) -> &'static str {
    match target {
        parser::Target::Literal(token) | parser::Target::Invalid(token) => token.kind.describe(),
        parser::Target::Group(_) => "a group",
        parser::Target::Tuple(_) => "a tuple",
        parser::Target::Assignment(_) => "an assignment",
        parser::Target::Abstraction(_) => "a name with parameters",
        parser::Target::Aggregate(_) => "an aggregate",
        parser::Target::Mapping(_) => "a mapping",
    }
}
