//! Structural layer: layout tokens, concrete tree and recovery

use rstest::rstest;
use theora::ErrorKind;
use theora::parser::{RootItem, Target, TokenKind, TokenStream, parse_structure};

use crate::helpers::source_fixtures::EVERY_CONSTRUCT;

#[test]
fn test_every_construct_parses_structurally() {
    let (root, errors) = parse_structure(EVERY_CONSTRUCT);
    assert!(errors.is_empty(), "{:?}", errors);
    // text block + 12 groups
    assert_eq!(root.items.len(), 13);
    assert!(matches!(root.items[0], RootItem::BlockComment(_)));
}

#[test]
fn test_layout_tokens_balance() {
    let tokens: Vec<_> = TokenStream::new(EVERY_CONSTRUCT).collect();
    let begins = tokens.iter().filter(|t| t.is(TokenKind::Begin)).count();
    let ends = tokens.iter().filter(|t| t.is(TokenKind::End)).count();
    assert_eq!(begins, ends);
}

#[test]
fn test_token_positions_are_zero_based() {
    let tokens: Vec<_> = TokenStream::new("[\\a]\nDefines: a\n")
        .filter(|t| !t.kind.is_synthetic())
        .collect();
    assert_eq!(tokens[0].kind, TokenKind::Id);
    assert_eq!((tokens[0].position.row, tokens[0].position.column), (0, 0));
    let name = tokens.iter().find(|t| t.text == "a").unwrap();
    assert_eq!((name.position.row, name.position.column), (1, 9));
}

#[rstest]
#[case("Note:\ncontent: \"unterminated\n")]
#[case("Note:\n\tcontent: \"x\"\n")]
#[case("Note:\ncontent: \"x\"\n  stray: y\n")]
fn test_lexical_problems_are_reported(#[case] source: &str) {
    let (_, errors) = parse_structure(source);
    assert!(!errors.is_empty());
    assert!(errors.iter().any(|e| e.kind == ErrorKind::Lexical), "{:?}", errors);
}

#[test]
fn test_broken_group_does_not_stop_the_parse() {
    let source = "A: )\n\nNote:\ncontent: \"x\"\n\nB: (\n\nNote:\ncontent: \"y\"\n";
    let (root, errors) = parse_structure(source);
    assert!(errors.len() >= 2, "{:?}", errors);
    let groups = root
        .items
        .iter()
        .filter(|item| matches!(item, RootItem::Group(g) if g.kind_name() == Some("Note")))
        .count();
    assert_eq!(groups, 2);
}

#[test]
fn test_invalid_argument_placeholder() {
    let (root, errors) = parse_structure("A: x, ), y\n");
    assert!(!errors.is_empty());
    let RootItem::Group(group) = &root.items[0] else {
        panic!("expected a group");
    };
    let args = &group.sections[0].args;
    assert!(matches!(args[0].target, Target::Literal(_)));
    assert!(args.iter().any(|a| matches!(a.target, Target::Invalid(_))));
}
