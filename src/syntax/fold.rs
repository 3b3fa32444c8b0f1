//! Children-first rewriting of the document model.
//!
//! A [`Folder`] takes nodes by value and returns their replacement. The
//! default hooks rebuild a node from its folded children through the
//! matching `walk_*` function; an override that rewrites a node calls the
//! walker first so children are always folded before their parent.

use super::clause::Clause;
use super::document::{
    DefinesBody, Document, MetadataSection, ProvidingItem, TopLevelGroup,
};
use super::nodes::{Case, IdStatement, Statement, Target, Text};
use crate::base::Position;
use crate::expression::parse_expression_at;
use crate::parser::{self, Abstraction, Token};

/// Rewriter over typed document nodes
pub trait Folder {
    fn fold_document(&mut self, document: Document) -> Document {
        walk_document(self, document)
    }

    fn fold_group(&mut self, group: TopLevelGroup) -> TopLevelGroup {
        walk_group(self, group)
    }

    fn fold_clause(&mut self, clause: Clause) -> Clause {
        walk_clause(self, clause)
    }

    fn fold_providing_item(&mut self, item: ProvidingItem) -> ProvidingItem {
        walk_providing_item(self, item)
    }

    fn fold_metadata(&mut self, metadata: MetadataSection) -> MetadataSection {
        walk_metadata(self, metadata)
    }

    fn fold_id(&mut self, id: IdStatement) -> IdStatement {
        id
    }

    fn fold_statement(&mut self, statement: Statement) -> Statement {
        statement
    }

    fn fold_text(&mut self, text: Text) -> Text {
        text
    }

    fn fold_target(&mut self, target: Target) -> Target {
        target
    }
}

impl Document {
    /// Rewrite every node children-first
    pub fn transform<F: Folder + ?Sized>(self, folder: &mut F) -> Document {
        folder.fold_document(self)
    }

    /// The same document with every position set to unknown.
    ///
    /// Two documents that differ only in where their nodes were written
    /// compare equal after this.
    pub fn without_positions(self) -> Document {
        self.transform(&mut ErasePositions)
    }
}

// =============================================================================
// Walkers
// =============================================================================

fn fold_vec<T>(items: Vec<T>, mut f: impl FnMut(T) -> T) -> Vec<T> {
    items.into_iter().map(&mut f).collect()
}

fn fold_clauses<F: Folder + ?Sized>(folder: &mut F, items: Vec<Clause>) -> Vec<Clause> {
    fold_vec(items, |c| folder.fold_clause(c))
}

fn fold_statements<F: Folder + ?Sized>(folder: &mut F, items: Vec<Statement>) -> Vec<Statement> {
    fold_vec(items, |s| folder.fold_statement(s))
}

fn fold_texts<F: Folder + ?Sized>(folder: &mut F, items: Vec<Text>) -> Vec<Text> {
    fold_vec(items, |t| folder.fold_text(t))
}

fn fold_targets<F: Folder + ?Sized>(folder: &mut F, items: Vec<Target>) -> Vec<Target> {
    fold_vec(items, |t| folder.fold_target(t))
}

fn fold_cases<F: Folder + ?Sized, T>(
    folder: &mut F,
    cases: Vec<Case<T>>,
    mut then: impl FnMut(&mut F, T) -> T,
) -> Vec<Case<T>> {
    cases
        .into_iter()
        .map(|case| {
            let when = case.when.map(|w| fold_clauses(folder, w));
            let then = then(folder, case.then);
            Case { when, then }
        })
        .collect()
}

fn fold_body<F: Folder + ?Sized>(folder: &mut F, body: DefinesBody) -> DefinesBody {
    match body {
        DefinesBody::Means(clauses) => DefinesBody::Means(fold_clauses(folder, clauses)),
        DefinesBody::Computes(statements) => {
            DefinesBody::Computes(fold_statements(folder, statements))
        }
    }
}

pub fn walk_document<F: Folder + ?Sized>(folder: &mut F, document: Document) -> Document {
    Document {
        groups: fold_vec(document.groups, |g| folder.fold_group(g)),
    }
}

pub fn walk_group<F: Folder + ?Sized>(folder: &mut F, group: TopLevelGroup) -> TopLevelGroup {
    match group {
        TopLevelGroup::Defines(mut g) => {
            g.id = folder.fold_id(g.id);
            g.target = folder.fold_target(g.target);
            g.given = g.given.map(|t| fold_targets(folder, t));
            g.when = g.when.map(|c| fold_clauses(folder, c));
            g.body = fold_body(folder, g.body);
            g.providing = g
                .providing
                .map(|items| fold_vec(items, |i| folder.fold_providing_item(i)));
            g.using = g.using.map(|s| fold_statements(folder, s));
            g.written = g.written.map(|t| fold_texts(folder, t));
            g.called = g.called.map(|t| fold_texts(folder, t));
            g.metadata = g.metadata.map(|m| folder.fold_metadata(m));
            TopLevelGroup::Defines(g)
        }
        TopLevelGroup::Foundation(mut g) => {
            g.id = folder.fold_id(g.id);
            g.target = folder.fold_target(g.target);
            g.body = fold_body(folder, g.body);
            g.metadata = g.metadata.map(|m| folder.fold_metadata(m));
            TopLevelGroup::Foundation(g)
        }
        TopLevelGroup::States(mut g) => {
            g.id = folder.fold_id(g.id);
            g.given = g.given.map(|t| fold_targets(folder, t));
            g.cases = fold_cases(folder, g.cases, |f, then| fold_clauses(f, then));
            g.else_ = g.else_.map(|c| fold_clauses(folder, c));
            g.using = g.using.map(|s| fold_statements(folder, s));
            g.written = g.written.map(|t| fold_texts(folder, t));
            g.metadata = g.metadata.map(|m| folder.fold_metadata(m));
            TopLevelGroup::States(g)
        }
        TopLevelGroup::Views(mut g) => {
            g.id = folder.fold_id(g.id);
            g.from = folder.fold_statement(g.from);
            g.cases = fold_cases(folder, g.cases, |f, to| f.fold_statement(to));
            g.else_ = g.else_.map(|s| folder.fold_statement(s));
            g.using = g.using.map(|s| fold_statements(folder, s));
            g.written = g.written.map(|t| fold_texts(folder, t));
            g.metadata = g.metadata.map(|m| folder.fold_metadata(m));
            TopLevelGroup::Views(g)
        }
        TopLevelGroup::Evaluates(mut g) => {
            g.id = folder.fold_id(g.id);
            g.cases = fold_cases(folder, g.cases, |f, then| fold_statements(f, then));
            g.else_ = g.else_.map(|s| fold_statements(folder, s));
            g.using = g.using.map(|s| fold_statements(folder, s));
            g.written = g.written.map(|t| fold_texts(folder, t));
            g.metadata = g.metadata.map(|m| folder.fold_metadata(m));
            TopLevelGroup::Evaluates(g)
        }
        TopLevelGroup::Axiom(g) => TopLevelGroup::Axiom(walk_result(folder, g)),
        TopLevelGroup::Conjecture(g) => TopLevelGroup::Conjecture(walk_result(folder, g)),
        TopLevelGroup::Theorem(mut g) => {
            g.id = g.id.map(|id| folder.fold_id(id));
            g.names = fold_texts(folder, g.names);
            g.given = g.given.map(|t| fold_targets(folder, t));
            g.where_ = g.where_.map(|c| fold_clauses(folder, c));
            g.then = fold_clauses(folder, g.then);
            g.iff = g.iff.map(|c| fold_clauses(folder, c));
            g.using = g.using.map(|s| fold_statements(folder, s));
            g.proof = g.proof.map(|t| fold_texts(folder, t));
            g.metadata = g.metadata.map(|m| folder.fold_metadata(m));
            TopLevelGroup::Theorem(g)
        }
        TopLevelGroup::Resource(mut g) => {
            g.id = folder.fold_id(g.id);
            for item in &mut g.items {
                item.values = fold_texts(folder, std::mem::take(&mut item.values));
            }
            TopLevelGroup::Resource(g)
        }
        TopLevelGroup::Topic(mut g) => {
            g.id = folder.fold_id(g.id);
            g.names = fold_texts(folder, g.names);
            g.content = folder.fold_text(g.content);
            g.metadata = g.metadata.map(|m| folder.fold_metadata(m));
            TopLevelGroup::Topic(g)
        }
        TopLevelGroup::Note(mut g) => {
            g.content = folder.fold_text(g.content);
            g.metadata = g.metadata.map(|m| folder.fold_metadata(m));
            TopLevelGroup::Note(g)
        }
        TopLevelGroup::Specify(mut g) => {
            for item in &mut g.items {
                item.is = folder.fold_statement(std::mem::take(&mut item.is));
            }
            TopLevelGroup::Specify(g)
        }
        TopLevelGroup::TextBlock(block) => TopLevelGroup::TextBlock(block),
    }
}

fn walk_result<F: Folder + ?Sized>(
    folder: &mut F,
    mut g: super::document::ResultBody,
) -> super::document::ResultBody {
    g.id = g.id.map(|id| folder.fold_id(id));
    g.names = fold_texts(folder, g.names);
    g.given = g.given.map(|t| fold_targets(folder, t));
    g.where_ = g.where_.map(|c| fold_clauses(folder, c));
    g.then = fold_clauses(folder, g.then);
    g.iff = g.iff.map(|c| fold_clauses(folder, c));
    g.using = g.using.map(|s| fold_statements(folder, s));
    g.metadata = g.metadata.map(|m| folder.fold_metadata(m));
    g
}

pub fn walk_clause<F: Folder + ?Sized>(folder: &mut F, clause: Clause) -> Clause {
    match clause {
        Clause::Statement(s) => Clause::Statement(folder.fold_statement(s)),
        Clause::Text(t) => Clause::Text(folder.fold_text(t)),
        Clause::ForAll(mut g) => {
            g.targets = fold_targets(folder, g.targets);
            g.where_ = g.where_.map(|c| fold_clauses(folder, c));
            g.such_that = g.such_that.map(|c| fold_clauses(folder, c));
            g.then = fold_clauses(folder, g.then);
            Clause::ForAll(g)
        }
        Clause::Exists(mut g) => {
            g.targets = fold_targets(folder, g.targets);
            g.where_ = g.where_.map(|c| fold_clauses(folder, c));
            g.such_that = g.such_that.map(|c| fold_clauses(folder, c));
            Clause::Exists(g)
        }
        Clause::ExistsUnique(mut g) => {
            g.targets = fold_targets(folder, g.targets);
            g.where_ = g.where_.map(|c| fold_clauses(folder, c));
            g.such_that = g.such_that.map(|c| fold_clauses(folder, c));
            Clause::ExistsUnique(g)
        }
        Clause::If(mut g) => {
            g.conditions = fold_clauses(folder, g.conditions);
            g.then = fold_clauses(folder, g.then);
            Clause::If(g)
        }
        Clause::Iff(mut g) => {
            g.conditions = fold_clauses(folder, g.conditions);
            g.then = fold_clauses(folder, g.then);
            Clause::Iff(g)
        }
        Clause::Not(mut g) => {
            g.clause = Box::new(folder.fold_clause(*g.clause));
            Clause::Not(g)
        }
        Clause::Or(mut g) => {
            g.clauses = fold_clauses(folder, g.clauses);
            Clause::Or(g)
        }
        Clause::And(mut g) => {
            g.clauses = fold_clauses(folder, g.clauses);
            Clause::And(g)
        }
        Clause::Equivalently(mut g) => {
            g.clauses = fold_clauses(folder, g.clauses);
            Clause::Equivalently(g)
        }
        Clause::Piecewise(mut g) => {
            g.cases = fold_cases(folder, g.cases, |f, then| fold_clauses(f, then));
            g.else_ = g.else_.map(|c| fold_clauses(folder, c));
            Clause::Piecewise(g)
        }
    }
}

pub fn walk_providing_item<F: Folder + ?Sized>(folder: &mut F, item: ProvidingItem) -> ProvidingItem {
    match item {
        ProvidingItem::View(mut view) => {
            view.as_ = folder.fold_statement(view.as_);
            view.via = view.via.map(|s| folder.fold_statement(s));
            view.by = view.by.map(|s| folder.fold_statement(s));
            ProvidingItem::View(view)
        }
        ProvidingItem::Symbols(mut symbols) => {
            symbols.targets = fold_targets(folder, symbols.targets);
            symbols.where_ = fold_statements(folder, symbols.where_);
            ProvidingItem::Symbols(symbols)
        }
    }
}

pub fn walk_metadata<F: Folder + ?Sized>(folder: &mut F, mut metadata: MetadataSection) -> MetadataSection {
    for item in &mut metadata.items {
        item.values = fold_texts(folder, std::mem::take(&mut item.values));
    }
    metadata
}

// =============================================================================
// Position erasure
// =============================================================================

/// Folder that resets every position to [`Position::UNKNOWN`]
pub struct ErasePositions;

impl Folder for ErasePositions {
    fn fold_group(&mut self, group: TopLevelGroup) -> TopLevelGroup {
        let mut group = walk_group(self, group);
        *group.position_mut() = Position::UNKNOWN;
        match &mut group {
            TopLevelGroup::Resource(g) => {
                g.items.iter_mut().for_each(|i| i.position = Position::UNKNOWN);
            }
            TopLevelGroup::Specify(g) => {
                g.items.iter_mut().for_each(|i| i.position = Position::UNKNOWN);
            }
            _ => {}
        }
        group
    }

    fn fold_clause(&mut self, clause: Clause) -> Clause {
        let mut clause = walk_clause(self, clause);
        *clause.position_mut() = Position::UNKNOWN;
        clause
    }

    fn fold_providing_item(&mut self, item: ProvidingItem) -> ProvidingItem {
        let mut item = walk_providing_item(self, item);
        match &mut item {
            ProvidingItem::View(view) => view.position = Position::UNKNOWN,
            ProvidingItem::Symbols(symbols) => symbols.position = Position::UNKNOWN,
        }
        item
    }

    fn fold_metadata(&mut self, metadata: MetadataSection) -> MetadataSection {
        let mut metadata = walk_metadata(self, metadata);
        metadata.position = Position::UNKNOWN;
        metadata.items.iter_mut().for_each(|i| i.position = Position::UNKNOWN);
        metadata
    }

    fn fold_id(&mut self, id: IdStatement) -> IdStatement {
        IdStatement {
            position: Position::UNKNOWN,
            ..id
        }
    }

    fn fold_statement(&mut self, statement: Statement) -> Statement {
        let expression = match statement.expression {
            Some(_) => parse_expression_at(&statement.text, Position::UNKNOWN).0,
            None => None,
        };
        Statement {
            text: statement.text,
            expression,
            position: Position::UNKNOWN,
        }
    }

    fn fold_text(&mut self, text: Text) -> Text {
        Text {
            position: Position::UNKNOWN,
            ..text
        }
    }

    fn fold_target(&mut self, target: Target) -> Target {
        match target {
            Target::Name { name, .. } => Target::Name {
                name,
                position: Position::UNKNOWN,
            },
            Target::Abstraction(a) => Target::Abstraction(erase_abstraction(a)),
            Target::Aggregate(mut a) => {
                a.items = a.items.into_iter().map(erase_abstraction).collect();
                a.position = Position::UNKNOWN;
                Target::Aggregate(a)
            }
            Target::Tuple(mut t) => {
                t.items = t.items.into_iter().map(erase_concrete).collect();
                t.position = Position::UNKNOWN;
                Target::Tuple(t)
            }
            Target::Assignment(mut a) => {
                a.lhs = erase_token(a.lhs);
                a.rhs = Box::new(erase_concrete(*a.rhs));
                Target::Assignment(a)
            }
        }
    }
}

fn erase_token(token: Token) -> Token {
    Token {
        position: Position::UNKNOWN,
        ..token
    }
}

fn erase_tokens(tokens: Option<Vec<Token>>) -> Option<Vec<Token>> {
    tokens.map(|t| t.into_iter().map(erase_token).collect())
}

fn erase_abstraction(a: Abstraction) -> Abstraction {
    Abstraction {
        name: erase_token(a.name),
        subparams: erase_tokens(a.subparams),
        params: erase_tokens(a.params),
        outer_subparams: erase_tokens(a.outer_subparams),
        position: Position::UNKNOWN,
        ..a
    }
}

fn erase_concrete(target: parser::Target) -> parser::Target {
    match target {
        parser::Target::Literal(token) => parser::Target::Literal(erase_token(token)),
        parser::Target::Invalid(token) => parser::Target::Invalid(erase_token(token)),
        parser::Target::Abstraction(a) => parser::Target::Abstraction(erase_abstraction(a)),
        parser::Target::Aggregate(mut a) => {
            a.items = a.items.into_iter().map(erase_abstraction).collect();
            a.position = Position::UNKNOWN;
            parser::Target::Aggregate(a)
        }
        parser::Target::Tuple(mut t) => {
            t.items = t.items.into_iter().map(erase_concrete).collect();
            t.position = Position::UNKNOWN;
            parser::Target::Tuple(t)
        }
        parser::Target::Assignment(mut a) => {
            a.lhs = erase_token(a.lhs);
            a.rhs = Box::new(erase_concrete(*a.rhs));
            parser::Target::Assignment(a)
        }
        parser::Target::Mapping(mut m) => {
            m.name = erase_token(m.name);
            m.value = erase_token(m.value);
            parser::Target::Mapping(m)
        }
        parser::Target::Group(mut g) => {
            g.position = Position::UNKNOWN;
            parser::Target::Group(g)
        }
    }
}
