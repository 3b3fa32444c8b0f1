//! Printing a document and parsing it again gives the same document

use rstest::rstest;
use theora::syntax::{Document, FormatOptions, TopLevelGroup};

use crate::helpers::document_helpers::{kinds, parse_ok};
use crate::helpers::source_fixtures::{DEFINES_F, EVERY_CONSTRUCT, TYPE_CHAIN, VIEW_CYCLE};

fn assert_round_trip(document: Document, options: &FormatOptions) {
    let printed = document.to_code_with(options);
    let reparsed = parse_ok(&printed);
    assert_eq!(
        reparsed.without_positions(),
        document.without_positions(),
        "printed source:\n{}",
        printed
    );
}

#[test]
fn test_every_construct_is_recognized() {
    let document = parse_ok(EVERY_CONSTRUCT);
    assert_eq!(
        kinds(&document),
        [
            "TextBlock",
            "Foundation",
            "Defines",
            "States",
            "Views",
            "Evaluates",
            "Axiom",
            "Theorem",
            "Conjecture",
            "Resource",
            "Topic",
            "Note",
            "Specify",
        ]
    );
}

#[rstest]
#[case(DEFINES_F)]
#[case(TYPE_CHAIN)]
#[case(VIEW_CYCLE)]
#[case(EVERY_CONSTRUCT)]
fn test_round_trip_with_default_options(#[case] source: &str) {
    assert_round_trip(parse_ok(source), &FormatOptions::default());
}

#[test]
fn test_round_trip_with_narrow_width() {
    let options = FormatOptions {
        print_width: 20,
        blank_lines_between_groups: 2,
    };
    assert_round_trip(parse_ok(EVERY_CONSTRUCT), &options);
}

#[test]
fn test_printed_defines_reads_like_the_source() {
    let document = parse_ok(DEFINES_F);
    assert_eq!(document.to_code(), DEFINES_F);
}

#[test]
fn test_single_group_to_code() {
    let document = parse_ok(TYPE_CHAIN);
    let printed = document.groups[1].to_code();
    assert_eq!(printed, "[\\B]\nDefines: B\nmeans: 'B is \\C'\n");
    let reparsed = parse_ok(&printed);
    assert!(matches!(reparsed.groups[0], TopLevelGroup::Defines(_)));
}
