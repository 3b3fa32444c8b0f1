//! Visitors and folders over parsed documents

use theora::syntax::visit::{Visitor, walk_clause};
use theora::syntax::{Clause, Folder, Statement, Text, TopLevelGroup};

use crate::helpers::document_helpers::parse_ok;
use crate::helpers::source_fixtures::{DEFINES_F, EVERY_CONSTRUCT};

#[derive(Default)]
struct Counter {
    statements: usize,
    quantifiers: usize,
    texts: Vec<String>,
}

impl Visitor for Counter {
    fn visit_clause(&mut self, clause: &Clause) {
        if matches!(
            clause,
            Clause::ForAll(_) | Clause::Exists(_) | Clause::ExistsUnique(_)
        ) {
            self.quantifiers += 1;
        }
        walk_clause(self, clause);
    }

    fn visit_statement(&mut self, _statement: &Statement) {
        self.statements += 1;
    }

    fn visit_text(&mut self, text: &Text) {
        self.texts.push(text.text.to_string());
    }
}

#[test]
fn test_visitor_counts_statements() {
    let mut counter = Counter::default();
    counter.visit_document(&parse_ok(DEFINES_F));
    assert_eq!(counter.statements, 1);
    assert_eq!(counter.quantifiers, 0);
}

#[test]
fn test_visitor_reaches_nested_quantifiers() {
    let mut counter = Counter::default();
    counter.visit_document(&parse_ok(EVERY_CONSTRUCT));
    // forAll in Defines and Axiom, exists and existsUnique in Conjecture
    assert_eq!(counter.quantifiers, 4);
    assert!(counter.texts.iter().any(|t| t == "A remark"), "{:?}", counter.texts);
}

struct RenameStatements;

impl Folder for RenameStatements {
    fn fold_statement(&mut self, statement: Statement) -> Statement {
        Statement {
            text: statement.text.replace("real", "complex").into(),
            ..statement
        }
    }
}

#[test]
fn test_folder_rewrites_statements() {
    let document = parse_ok(DEFINES_F).transform(&mut RenameStatements);
    let TopLevelGroup::Defines(defines) = &document.groups[0] else {
        panic!("expected a Defines group");
    };
    let statement = defines.body.first_means_statement().unwrap();
    assert_eq!(statement.text, "f(x) is \\complex");
    assert!(document.to_code().contains("'f(x) is \\complex'"));
}
