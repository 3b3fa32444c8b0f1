//! Conversion of typed nodes back to source text
//!
//! Every node lowers to the concrete tree of the structural layer, which
//! [`format_root`] prints. Sections are emitted in grammar order so the
//! output re-parses to an equal document.

use super::clause::Clause;
use super::document::{
    DefinesBody, DefinesGroup, Document, EvaluatesGroup, FoundationGroup, MetadataSection,
    NoteGroup, ProvidingItem, ResourceGroup, ResultBody, SpecifyGroup, StatesGroup, TheoremGroup,
    TopLevelGroup, TopicGroup, ViewsGroup,
};
use super::formatter::{FormatOptions, format_root};
use super::nodes::{Case, IdStatement, Statement, Target, Text};
use crate::base::Position;
use crate::parser::{self, Argument, Group, Root, RootItem, Section, Token, TokenKind};

impl Document {
    /// Print with the default [`FormatOptions`]
    pub fn to_code(&self) -> String {
        self.to_code_with(&FormatOptions::default())
    }

    pub fn to_code_with(&self, options: &FormatOptions) -> String {
        let root = Root {
            items: self.groups.iter().map(lower_top_level).collect(),
        };
        format_root(&root, options)
    }
}

impl TopLevelGroup {
    /// Print a single group
    pub fn to_code(&self) -> String {
        let root = Root {
            items: vec![lower_top_level(self)],
        };
        format_root(&root, &FormatOptions::default())
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Accumulates the sections of one group
#[derive(Default)]
struct GroupBuilder {
    id: Option<Token>,
    sections: Vec<Section>,
}

impl GroupBuilder {
    fn new(id: Option<&IdStatement>) -> Self {
        Self {
            id: id.map(|id| Token::detached(TokenKind::Id, format!("[{}]", id.text))),
            sections: Vec::new(),
        }
    }

    fn section(mut self, name: &str, args: Vec<parser::Target>) -> Self {
        self.sections.push(Section {
            name: Token::detached(TokenKind::Name, name),
            args: args.into_iter().map(Argument::new).collect(),
        });
        self
    }

    fn optional(self, name: &str, args: Option<Vec<parser::Target>>) -> Self {
        match args {
            Some(args) => self.section(name, args),
            None => self,
        }
    }

    fn metadata(self, metadata: &Option<MetadataSection>) -> Self {
        let args = metadata.as_ref().map(|m| {
            m.items
                .iter()
                .map(|item| {
                    nested(GroupBuilder::default().section(item.kind.name(), texts(&item.values)))
                })
                .collect()
        });
        self.optional("Metadata", args)
    }

    fn cases<T>(
        mut self,
        cases: &[Case<T>],
        then_name: &str,
        then: impl Fn(&T) -> Vec<parser::Target>,
    ) -> Self {
        for case in cases {
            self = self
                .optional("when", case.when.as_deref().map(clauses))
                .section(then_name, then(&case.then));
        }
        self
    }

    fn build(self) -> Group {
        Group {
            id: self.id,
            sections: self.sections,
            position: Position::UNKNOWN,
        }
    }
}

fn nested(builder: GroupBuilder) -> parser::Target {
    parser::Target::Group(builder.build())
}

fn statement(statement: &Statement) -> parser::Target {
    parser::Target::Literal(Token::detached(
        TokenKind::Statement,
        format!("'{}'", statement.text),
    ))
}

fn statements(items: &[Statement]) -> Vec<parser::Target> {
    items.iter().map(statement).collect()
}

fn text(text: &Text) -> parser::Target {
    parser::Target::Literal(Token::detached(TokenKind::String, format!("\"{}\"", text.text)))
}

fn texts(items: &[Text]) -> Vec<parser::Target> {
    items.iter().map(text).collect()
}

fn target(target: &Target) -> parser::Target {
    match target {
        Target::Name { name, .. } => {
            parser::Target::Literal(Token::detached(TokenKind::Name, name.clone()))
        }
        Target::Abstraction(abstraction) => parser::Target::Abstraction(abstraction.clone()),
        Target::Aggregate(aggregate) => parser::Target::Aggregate(aggregate.clone()),
        Target::Tuple(tuple) => parser::Target::Tuple(tuple.clone()),
        Target::Assignment(assignment) => parser::Target::Assignment(assignment.clone()),
    }
}

fn targets(items: &[Target]) -> Vec<parser::Target> {
    items.iter().map(target).collect()
}

fn clauses(items: &[Clause]) -> Vec<parser::Target> {
    items.iter().map(clause).collect()
}

fn clause(node: &Clause) -> parser::Target {
    let builder = GroupBuilder::default();
    match node {
        Clause::Statement(s) => statement(s),
        Clause::Text(t) => text(t),
        Clause::ForAll(group) => nested(
            builder
                .section("forAll", targets(&group.targets))
                .optional("where", group.where_.as_deref().map(clauses))
                .optional("suchThat", group.such_that.as_deref().map(clauses))
                .section("then", clauses(&group.then)),
        ),
        Clause::Exists(group) => nested(
            builder
                .section("exists", targets(&group.targets))
                .optional("where", group.where_.as_deref().map(clauses))
                .optional("suchThat", group.such_that.as_deref().map(clauses)),
        ),
        Clause::ExistsUnique(group) => nested(
            builder
                .section("existsUnique", targets(&group.targets))
                .optional("where", group.where_.as_deref().map(clauses))
                .optional("suchThat", group.such_that.as_deref().map(clauses)),
        ),
        Clause::If(group) => nested(
            builder
                .section("if", clauses(&group.conditions))
                .section("then", clauses(&group.then)),
        ),
        Clause::Iff(group) => nested(
            builder
                .section("iff", clauses(&group.conditions))
                .section("then", clauses(&group.then)),
        ),
        Clause::Not(group) => nested(builder.section("not", vec![clause(&group.clause)])),
        Clause::Or(group) => nested(builder.section("or", clauses(&group.clauses))),
        Clause::And(group) => nested(builder.section("and", clauses(&group.clauses))),
        Clause::Equivalently(group) => {
            nested(builder.section("equivalently", clauses(&group.clauses)))
        }
        Clause::Piecewise(group) => nested(
            builder
                .section("piecewise", Vec::new())
                .cases(&group.cases, "then", |then| clauses(then))
                .optional("else", group.else_.as_deref().map(clauses)),
        ),
    }
}

fn providing(items: &[ProvidingItem]) -> Vec<parser::Target> {
    items
        .iter()
        .map(|item| match item {
            ProvidingItem::View(view) => nested(
                GroupBuilder::default()
                    .section("view", Vec::new())
                    .section("as", vec![statement(&view.as_)])
                    .optional("via", view.via.as_ref().map(|s| vec![statement(s)]))
                    .optional("by", view.by.as_ref().map(|s| vec![statement(s)])),
            ),
            ProvidingItem::Symbols(symbols) => nested(
                GroupBuilder::default()
                    .section("symbols", targets(&symbols.targets))
                    .section("where", statements(&symbols.where_)),
            ),
        })
        .collect()
}

fn body(builder: GroupBuilder, body: &DefinesBody) -> GroupBuilder {
    match body {
        DefinesBody::Means(items) => builder.section("means", clauses(items)),
        DefinesBody::Computes(items) => builder.section("computes", statements(items)),
    }
}

// =============================================================================
// Top-level groups
// =============================================================================

fn lower_top_level(group: &TopLevelGroup) -> RootItem {
    let group = match group {
        TopLevelGroup::TextBlock(block) => {
            return RootItem::BlockComment(Token::detached(
                TokenKind::BlockComment,
                format!("::{}::", block.text),
            ));
        }
        TopLevelGroup::Defines(group) => lower_defines(group),
        TopLevelGroup::Foundation(group) => lower_foundation(group),
        TopLevelGroup::States(group) => lower_states(group),
        TopLevelGroup::Views(group) => lower_views(group),
        TopLevelGroup::Evaluates(group) => lower_evaluates(group),
        TopLevelGroup::Axiom(group) => lower_result("Axiom", group),
        TopLevelGroup::Conjecture(group) => lower_result("Conjecture", group),
        TopLevelGroup::Theorem(group) => lower_theorem(group),
        TopLevelGroup::Resource(group) => lower_resource(group),
        TopLevelGroup::Topic(group) => lower_topic(group),
        TopLevelGroup::Note(group) => lower_note(group),
        TopLevelGroup::Specify(group) => lower_specify(group),
    };
    RootItem::Group(group)
}

fn lower_defines(group: &DefinesGroup) -> Group {
    let builder = GroupBuilder::new(Some(&group.id))
        .section("Defines", vec![target(&group.target)])
        .optional("given", group.given.as_deref().map(targets))
        .optional("when", group.when.as_deref().map(clauses));
    body(builder, &group.body)
        .optional("providing", group.providing.as_deref().map(providing))
        .optional("using", group.using.as_deref().map(statements))
        .optional("written", group.written.as_deref().map(texts))
        .optional("called", group.called.as_deref().map(texts))
        .metadata(&group.metadata)
        .build()
}

fn lower_foundation(group: &FoundationGroup) -> Group {
    let builder = GroupBuilder::new(Some(&group.id))
        .section("Foundation", vec![target(&group.target)]);
    body(builder, &group.body).metadata(&group.metadata).build()
}

fn lower_states(group: &StatesGroup) -> Group {
    GroupBuilder::new(Some(&group.id))
        .section("States", Vec::new())
        .optional("given", group.given.as_deref().map(targets))
        .cases(&group.cases, "then", |then| clauses(then))
        .optional("else", group.else_.as_deref().map(clauses))
        .optional("using", group.using.as_deref().map(statements))
        .optional("written", group.written.as_deref().map(texts))
        .metadata(&group.metadata)
        .build()
}

fn lower_views(group: &ViewsGroup) -> Group {
    GroupBuilder::new(Some(&group.id))
        .section("Views", Vec::new())
        .section("from", vec![statement(&group.from)])
        .cases(&group.cases, "to", |to| vec![statement(to)])
        .optional("else", group.else_.as_ref().map(|s| vec![statement(s)]))
        .optional("using", group.using.as_deref().map(statements))
        .optional("written", group.written.as_deref().map(texts))
        .metadata(&group.metadata)
        .build()
}

fn lower_evaluates(group: &EvaluatesGroup) -> Group {
    GroupBuilder::new(Some(&group.id))
        .section("Evaluates", Vec::new())
        .cases(&group.cases, "then", |then| statements(then))
        .optional("else", group.else_.as_deref().map(statements))
        .optional("using", group.using.as_deref().map(statements))
        .optional("written", group.written.as_deref().map(texts))
        .metadata(&group.metadata)
        .build()
}

fn lower_result(kind: &str, group: &ResultBody) -> Group {
    GroupBuilder::new(group.id.as_ref())
        .section(kind, texts(&group.names))
        .optional("given", group.given.as_deref().map(targets))
        .optional("where", group.where_.as_deref().map(clauses))
        .section("then", clauses(&group.then))
        .optional("iff", group.iff.as_deref().map(clauses))
        .optional("using", group.using.as_deref().map(statements))
        .metadata(&group.metadata)
        .build()
}

fn lower_theorem(group: &TheoremGroup) -> Group {
    GroupBuilder::new(group.id.as_ref())
        .section("Theorem", texts(&group.names))
        .optional("given", group.given.as_deref().map(targets))
        .optional("where", group.where_.as_deref().map(clauses))
        .section("then", clauses(&group.then))
        .optional("iff", group.iff.as_deref().map(clauses))
        .optional("using", group.using.as_deref().map(statements))
        .optional("Proof", group.proof.as_deref().map(texts))
        .metadata(&group.metadata)
        .build()
}

fn lower_resource(group: &ResourceGroup) -> Group {
    let items = group
        .items
        .iter()
        .map(|item| nested(GroupBuilder::default().section(item.kind.name(), texts(&item.values))))
        .collect();
    GroupBuilder::new(Some(&group.id))
        .section("Resource", items)
        .build()
}

fn lower_topic(group: &TopicGroup) -> Group {
    GroupBuilder::new(Some(&group.id))
        .section("Topic", texts(&group.names))
        .section("content", vec![text(&group.content)])
        .metadata(&group.metadata)
        .build()
}

fn lower_note(group: &NoteGroup) -> Group {
    GroupBuilder::new(None)
        .section("Note", Vec::new())
        .section("content", vec![text(&group.content)])
        .metadata(&group.metadata)
        .build()
}

fn lower_specify(group: &SpecifyGroup) -> Group {
    let items = group
        .items
        .iter()
        .map(|item| {
            nested(
                GroupBuilder::default()
                    .section(item.kind.name(), Vec::new())
                    .section("is", vec![statement(&item.is)]),
            )
        })
        .collect();
    GroupBuilder::new(None).section("Specify", items).build()
}
