//! Canonical signatures and relation shapes of statements

use rstest::rstest;
use theora::expression::{ExprNode, parse_expression, signature_of_command_text};

#[rstest]
#[case("\\f(x, y)", "f/2")]
#[case("\\f(x,y)", "f/2")]
#[case("\\f( x , y )", "f/2")]
#[case("\\real", "real/0")]
#[case("\\set.of{x}(a)", "set.of/1")]
#[case("\\natural.to.real", "natural.to.real/0")]
fn test_command_signatures(#[case] text: &str, #[case] expected: &str) {
    assert_eq!(signature_of_command_text(text).as_deref(), Some(expected));
}

#[rstest]
#[case("x + y")]
#[case("\\a, \\b")]
#[case("\\f(")]
#[case("\\a(x).b")]
#[case("\\f(x)(y)")]
fn test_non_command_texts_have_no_signature(#[case] text: &str) {
    assert_eq!(signature_of_command_text(text), None);
}

#[test]
fn test_is_statement_splits_sides() {
    let (expression, errors) = parse_expression("a, b is \\set, \\group");
    assert!(errors.is_empty(), "{:?}", errors);
    let expression = expression.unwrap();
    let (lhs, rhs) = expression.as_is().unwrap();
    assert_eq!(lhs.len(), 2);
    let types: Vec<_> = rhs.iter().filter_map(ExprNode::signature).collect();
    assert_eq!(types, ["set/0", "group/0"]);
}

#[test]
fn test_commands_are_collected_in_source_order() {
    let (expression, errors) = parse_expression("\\f(x) = \\g(\\h)");
    assert!(errors.is_empty(), "{:?}", errors);
    let names: Vec<_> = expression
        .unwrap()
        .commands()
        .iter()
        .map(|command| command.signature())
        .collect();
    assert_eq!(names, ["f/1", "g/1", "h/0"]);
}

#[test]
fn test_broken_statement_has_no_tree() {
    let (expression, errors) = parse_expression("x is");
    assert!(expression.is_none());
    assert!(!errors.is_empty());
}
