//! Validation of whole documents: recovery, section grammars, arities

use rstest::rstest;
use theora::parser::parse_structure;
use theora::semantic::grammar::{Rule, match_sections};
use theora::syntax::{ResourceItemKind, Target, TopLevelGroup};
use theora::{ErrorKind, Position, parse, parse_and_check};

use crate::helpers::document_helpers::{kinds, messages, parse_ok};
use crate::helpers::source_fixtures::{DEFINES_F, THREE_BROKEN};

#[test]
fn test_broken_groups_become_defaults() {
    let result = parse(THREE_BROKEN);
    let document = result.content.unwrap();
    assert_eq!(kinds(&document), ["Defines", "Defines", "Note", "Defines"]);
    let defaults = document
        .groups
        .iter()
        .filter(|group| **group == TopLevelGroup::Defines(Default::default()))
        .count();
    assert_eq!(defaults, 3);
    assert_eq!(result.errors.len(), 3, "{:?}", result.errors);
    assert!(result.errors.iter().all(|e| e.kind == ErrorKind::SectionGrammar));
    let TopLevelGroup::Note(note) = &document.groups[2] else {
        panic!("expected a Note group");
    };
    assert_eq!(note.content.text, "fine");
}

#[test]
fn test_errors_are_in_source_order() {
    let result = parse(THREE_BROKEN);
    let rows: Vec<i32> = result.errors.iter().map(|e| e.position().row).collect();
    let mut sorted = rows.clone();
    sorted.sort();
    assert_eq!(rows, sorted);
}

const FOO: &[Rule] = &[
    Rule::Required("Foo"),
    Rule::Optional("when"),
    Rule::Required("then"),
];

#[rstest]
#[case("Foo:\nthen: x\n", None)]
#[case("Foo:\nwhen: x\nthen: y\n", None)]
#[case("Foo:\nthen: x\nwhen: y\n", Some("unexpected section 'when'"))]
#[case("Foo:\nwhen: x\n", Some("missing required section 'then'"))]
#[case("Foo:\n", Some("missing required section 'then'"))]
fn test_section_order(#[case] source: &str, #[case] expected: Option<&str>) {
    let (root, errors) = parse_structure(source);
    assert!(errors.is_empty(), "{:?}", errors);
    let theora::parser::RootItem::Group(group) = &root.items[0] else {
        panic!("expected a group");
    };
    let result = match_sections(&group.sections, FOO, group.position);
    assert_eq!(result.err().map(|e| e.message), expected.map(String::from));
}

#[test]
fn test_axiom_sections_out_of_order() {
    let result = parse("Axiom:\nthen: 'x'\ngiven: x\n");
    assert_eq!(messages(&result.errors), ["unexpected section 'given'"]);
    assert_eq!(result.errors[0].position(), Position::new(2, 0));
    let document = result.content.unwrap();
    assert_eq!(document.groups[0], TopLevelGroup::Axiom(Default::default()));
}

#[test]
fn test_resource_author_needs_a_value() {
    let result = parse("[@book]\nResource:\n. author:\n");
    assert_eq!(result.errors.len(), 1, "{:?}", result.errors);
    assert!(
        result.errors[0]
            .message
            .contains("Expected at least 1 arguments"),
        "{}",
        result.errors[0].message
    );

    let document = parse_ok("[@book]\nResource:\n. author: \"A\", \"B\", \"C\"\n");
    let TopLevelGroup::Resource(resource) = &document.groups[0] else {
        panic!("expected a Resource group");
    };
    assert_eq!(resource.items[0].kind, ResourceItemKind::Author);
    assert_eq!(resource.items[0].values.len(), 3);
}

#[test]
fn test_unknown_top_level_group_is_skipped() {
    let result = parse("Lemma:\nthen: 'x'\n\nNote:\ncontent: \"kept\"\n");
    assert_eq!(messages(&result.errors), ["Unknown top-level group 'Lemma'"]);
    assert_eq!(kinds(&result.content.unwrap()), ["Note"]);
}

#[test]
fn test_defines_function() {
    let document = parse_ok(DEFINES_F);
    let TopLevelGroup::Defines(defines) = &document.groups[0] else {
        panic!("expected a Defines group");
    };
    assert_eq!(defines.id.text, "\\f(x)");
    assert_eq!(defines.id.signature.as_deref(), Some("f/1"));
    assert!(matches!(defines.target, Target::Abstraction(_)));
    let means = defines.body.first_means_statement().unwrap();
    assert_eq!(means.text, "f(x) is \\real");
    let (_, rhs) = means.expression.as_ref().unwrap().as_is().unwrap();
    assert_eq!(rhs[0].signature().as_deref(), Some("real/0"));
}

#[test]
fn test_statement_errors_keep_the_text() {
    let result = parse("[\\a]\nDefines: a\nmeans: 'a is'\n");
    assert!(!result.errors.is_empty());
    let document = result.content.unwrap();
    let TopLevelGroup::Defines(defines) = &document.groups[0] else {
        panic!("expected a Defines group");
    };
    let means = defines.body.first_means_statement().unwrap();
    assert_eq!(means.text, "a is");
    assert!(means.expression.is_none());
}

#[test]
fn test_incompatible_base_types() {
    let mut types = theora::TypeManager::new();
    let result = parse_and_check(
        "[\\a]\nDefines: a\nmeans: 'a is \\c'\n\n[\\b]\nDefines: b\nmeans: 'b is \\d'\n\nAxiom:\nthen: 'x is \\a'\n. 'x is \\b'\n",
        &mut types,
    );
    assert_eq!(
        messages(&result.errors),
        ["Identifier 'x' has multiple incompatible base types: a/0, b/0"]
    );
    assert_eq!(result.errors[0].kind, ErrorKind::Semantic);
}
