//! Read-only traversal of the document model.
//!
//! Implement [`Visitor`] and override the hooks you care about. The default
//! hooks recurse through the matching `walk_*` function, so an override that
//! still wants the children calls the walker itself.

use super::clause::Clause;
use super::document::{
    DefinesBody, Document, MetadataSection, ProvidingItem, TopLevelGroup,
};
use super::nodes::{Case, IdStatement, Statement, Target, Text};

/// Visitor over typed document nodes. Default implementations recurse.
pub trait Visitor {
    fn visit_document(&mut self, document: &Document) {
        walk_document(self, document);
    }

    fn visit_group(&mut self, group: &TopLevelGroup) {
        walk_group(self, group);
    }

    fn visit_clause(&mut self, clause: &Clause) {
        walk_clause(self, clause);
    }

    fn visit_providing_item(&mut self, item: &ProvidingItem) {
        walk_providing_item(self, item);
    }

    fn visit_metadata(&mut self, metadata: &MetadataSection) {
        walk_metadata(self, metadata);
    }

    fn visit_id(&mut self, _id: &IdStatement) {}
    fn visit_statement(&mut self, _statement: &Statement) {}
    fn visit_text(&mut self, _text: &Text) {}
    fn visit_target(&mut self, _target: &Target) {}
}

pub fn walk_document<V: Visitor + ?Sized>(visitor: &mut V, document: &Document) {
    for group in &document.groups {
        visitor.visit_group(group);
    }
}

fn visit_statements<V: Visitor + ?Sized>(visitor: &mut V, items: &[Statement]) {
    for statement in items {
        visitor.visit_statement(statement);
    }
}

fn visit_texts<V: Visitor + ?Sized>(visitor: &mut V, items: &[Text]) {
    for text in items {
        visitor.visit_text(text);
    }
}

fn visit_targets<V: Visitor + ?Sized>(visitor: &mut V, items: &[Target]) {
    for target in items {
        visitor.visit_target(target);
    }
}

fn visit_clauses<V: Visitor + ?Sized>(visitor: &mut V, items: &[Clause]) {
    for clause in items {
        visitor.visit_clause(clause);
    }
}

fn visit_cases<V: Visitor + ?Sized, T>(
    visitor: &mut V,
    cases: &[Case<T>],
    mut then: impl FnMut(&mut V, &T),
) {
    for case in cases {
        if let Some(when) = &case.when {
            visit_clauses(visitor, when);
        }
        then(visitor, &case.then);
    }
}

fn visit_body<V: Visitor + ?Sized>(visitor: &mut V, body: &DefinesBody) {
    match body {
        DefinesBody::Means(clauses) => visit_clauses(visitor, clauses),
        DefinesBody::Computes(statements) => visit_statements(visitor, statements),
    }
}

pub fn walk_group<V: Visitor + ?Sized>(visitor: &mut V, group: &TopLevelGroup) {
    if let Some(id) = group.id() {
        visitor.visit_id(id);
    }
    match group {
        TopLevelGroup::Defines(group) => {
            visitor.visit_target(&group.target);
            if let Some(given) = &group.given {
                visit_targets(visitor, given);
            }
            if let Some(when) = &group.when {
                visit_clauses(visitor, when);
            }
            visit_body(visitor, &group.body);
            for item in group.providing.iter().flatten() {
                visitor.visit_providing_item(item);
            }
            visit_statements(visitor, group.using.as_deref().unwrap_or_default());
            visit_texts(visitor, group.written.as_deref().unwrap_or_default());
            visit_texts(visitor, group.called.as_deref().unwrap_or_default());
            if let Some(metadata) = &group.metadata {
                visitor.visit_metadata(metadata);
            }
        }
        TopLevelGroup::Foundation(group) => {
            visitor.visit_target(&group.target);
            visit_body(visitor, &group.body);
            if let Some(metadata) = &group.metadata {
                visitor.visit_metadata(metadata);
            }
        }
        TopLevelGroup::States(group) => {
            visit_targets(visitor, group.given.as_deref().unwrap_or_default());
            visit_cases(visitor, &group.cases, |v, then| visit_clauses(v, then));
            visit_clauses(visitor, group.else_.as_deref().unwrap_or_default());
            visit_statements(visitor, group.using.as_deref().unwrap_or_default());
            visit_texts(visitor, group.written.as_deref().unwrap_or_default());
            if let Some(metadata) = &group.metadata {
                visitor.visit_metadata(metadata);
            }
        }
        TopLevelGroup::Views(group) => {
            visitor.visit_statement(&group.from);
            visit_cases(visitor, &group.cases, |v, to| v.visit_statement(to));
            if let Some(other) = &group.else_ {
                visitor.visit_statement(other);
            }
            visit_statements(visitor, group.using.as_deref().unwrap_or_default());
            visit_texts(visitor, group.written.as_deref().unwrap_or_default());
            if let Some(metadata) = &group.metadata {
                visitor.visit_metadata(metadata);
            }
        }
        TopLevelGroup::Evaluates(group) => {
            visit_cases(visitor, &group.cases, |v, then| visit_statements(v, then));
            visit_statements(visitor, group.else_.as_deref().unwrap_or_default());
            visit_statements(visitor, group.using.as_deref().unwrap_or_default());
            visit_texts(visitor, group.written.as_deref().unwrap_or_default());
            if let Some(metadata) = &group.metadata {
                visitor.visit_metadata(metadata);
            }
        }
        TopLevelGroup::Axiom(group) | TopLevelGroup::Conjecture(group) => {
            visit_texts(visitor, &group.names);
            visit_targets(visitor, group.given.as_deref().unwrap_or_default());
            visit_clauses(visitor, group.where_.as_deref().unwrap_or_default());
            visit_clauses(visitor, &group.then);
            visit_clauses(visitor, group.iff.as_deref().unwrap_or_default());
            visit_statements(visitor, group.using.as_deref().unwrap_or_default());
            if let Some(metadata) = &group.metadata {
                visitor.visit_metadata(metadata);
            }
        }
        TopLevelGroup::Theorem(group) => {
            visit_texts(visitor, &group.names);
            visit_targets(visitor, group.given.as_deref().unwrap_or_default());
            visit_clauses(visitor, group.where_.as_deref().unwrap_or_default());
            visit_clauses(visitor, &group.then);
            visit_clauses(visitor, group.iff.as_deref().unwrap_or_default());
            visit_statements(visitor, group.using.as_deref().unwrap_or_default());
            visit_texts(visitor, group.proof.as_deref().unwrap_or_default());
            if let Some(metadata) = &group.metadata {
                visitor.visit_metadata(metadata);
            }
        }
        TopLevelGroup::Resource(group) => {
            for item in &group.items {
                visit_texts(visitor, &item.values);
            }
        }
        TopLevelGroup::Topic(group) => {
            visit_texts(visitor, &group.names);
            visitor.visit_text(&group.content);
            if let Some(metadata) = &group.metadata {
                visitor.visit_metadata(metadata);
            }
        }
        TopLevelGroup::Note(group) => {
            visitor.visit_text(&group.content);
            if let Some(metadata) = &group.metadata {
                visitor.visit_metadata(metadata);
            }
        }
        TopLevelGroup::Specify(group) => {
            for item in &group.items {
                visitor.visit_statement(&item.is);
            }
        }
        TopLevelGroup::TextBlock(_) => {}
    }
}

pub fn walk_clause<V: Visitor + ?Sized>(visitor: &mut V, clause: &Clause) {
    match clause {
        Clause::Statement(statement) => visitor.visit_statement(statement),
        Clause::Text(text) => visitor.visit_text(text),
        Clause::ForAll(group) => {
            visit_targets(visitor, &group.targets);
            visit_clauses(visitor, group.where_.as_deref().unwrap_or_default());
            visit_clauses(visitor, group.such_that.as_deref().unwrap_or_default());
            visit_clauses(visitor, &group.then);
        }
        Clause::Exists(group) => {
            visit_targets(visitor, &group.targets);
            visit_clauses(visitor, group.where_.as_deref().unwrap_or_default());
            visit_clauses(visitor, group.such_that.as_deref().unwrap_or_default());
        }
        Clause::ExistsUnique(group) => {
            visit_targets(visitor, &group.targets);
            visit_clauses(visitor, group.where_.as_deref().unwrap_or_default());
            visit_clauses(visitor, group.such_that.as_deref().unwrap_or_default());
        }
        Clause::If(group) => {
            visit_clauses(visitor, &group.conditions);
            visit_clauses(visitor, &group.then);
        }
        Clause::Iff(group) => {
            visit_clauses(visitor, &group.conditions);
            visit_clauses(visitor, &group.then);
        }
        Clause::Not(group) => visitor.visit_clause(&group.clause),
        Clause::Or(group) => visit_clauses(visitor, &group.clauses),
        Clause::And(group) => visit_clauses(visitor, &group.clauses),
        Clause::Equivalently(group) => visit_clauses(visitor, &group.clauses),
        Clause::Piecewise(group) => {
            visit_cases(visitor, &group.cases, |v, then| visit_clauses(v, then));
            visit_clauses(visitor, group.else_.as_deref().unwrap_or_default());
        }
    }
}

pub fn walk_providing_item<V: Visitor + ?Sized>(visitor: &mut V, item: &ProvidingItem) {
    match item {
        ProvidingItem::View(view) => {
            visitor.visit_statement(&view.as_);
            if let Some(via) = &view.via {
                visitor.visit_statement(via);
            }
            if let Some(by) = &view.by {
                visitor.visit_statement(by);
            }
        }
        ProvidingItem::Symbols(symbols) => {
            visit_targets(visitor, &symbols.targets);
            visit_statements(visitor, &symbols.where_);
        }
    }
}

pub fn walk_metadata<V: Visitor + ?Sized>(visitor: &mut V, metadata: &MetadataSection) {
    for item in &metadata.items {
        visit_texts(visitor, &item.values);
    }
}
