//! The type graph built from parsed definitions

use theora::semantic::{TypeGraphError, TypeManager};
use theora::syntax::TopLevelGroup;

use crate::helpers::document_helpers::{parse_ok, types_from};
use crate::helpers::source_fixtures::{DEFINES_F, EVERY_CONSTRUCT, TYPE_CHAIN, VIEW_CYCLE};

#[test]
fn test_chain_descent_and_lineage() {
    let types = types_from(TYPE_CHAIN);
    assert!(types.is_sig_descendant_of("A/0", "C/0"));
    assert!(types.is_sig_descendant_of("A/0", "A/0"));
    assert!(!types.is_sig_descendant_of("C/0", "A/0"));
    assert_eq!(types.lineage("A/0"), ["A/0", "B/0", "C/0"]);
    assert_eq!(types.signatures(), ["A/0", "B/0", "C/0"]);
}

#[test]
fn test_least_common_ancestor() {
    let types = types_from(TYPE_CHAIN);
    assert_eq!(types.least_common_ancestor(&["A/0", "B/0"]).as_deref(), Some("B/0"));
    assert_eq!(types.least_common_ancestor(&["A/0", "unknown/0"]), None);
    assert_eq!(types.least_common_ancestor::<&str>(&[]), None);
}

#[test]
fn test_view_cycle_terminates() {
    let types = types_from(VIEW_CYCLE);
    assert!(types.is_sig_viewable_as("A/0", "B/0"));
    assert!(types.is_sig_viewable_as("B/0", "A/0"));
    assert!(!types.is_sig_viewable_as("A/0", "C/0"));
}

#[test]
fn test_defines_with_parameters_is_real() {
    let types = types_from(DEFINES_F);
    assert!(types.is_sig_is("f/1", "real/0"));
    assert!(!types.is_sig_is("f/1", "natural/0"));
    assert!(types.get_defines("f/1").is_some());
}

#[test]
fn test_every_construct_registers_definitions() {
    let types = types_from(EVERY_CONSTRUCT);
    assert_eq!(types.signatures(), ["set/0", "subset/2"]);
    assert!(types.is_sig_is("set/0", "collection/0"));
    assert!(types.is_sig_is("subset/2", "relation/0"));
    assert!(types.do_types_match(&["subset/2"], &["relation/0"]));
    assert!(!types.do_types_match(&["set/0"], &["relation/0"]));
}

#[test]
fn test_roots_follow_views_and_parents() {
    let types = types_from(EVERY_CONSTRUCT);
    let roots: Vec<_> = types.roots("subset/2").into_iter().collect();
    assert_eq!(roots, ["relation/0"]);
    let roots: Vec<_> = types.roots("unknown/0").into_iter().collect();
    assert_eq!(roots, ["unknown/0"]);
}

#[test]
fn test_remove_is_idempotent() {
    let document = parse_ok(TYPE_CHAIN);
    let mut types = TypeManager::new();
    for group in &document.groups {
        types.add(group).unwrap();
    }
    types.remove(&document.groups[1]);
    types.remove(&document.groups[1]);
    assert!(types.get_defines("B/0").is_none());
    assert!(!types.is_sig_descendant_of("B/0", "C/0"));
    // A still points at B
    assert_eq!(types.parent_of("A/0").map(|p| p.as_str()), Some("B/0"));
    assert!(!types.is_sig_descendant_of("A/0", "C/0"));
}

#[test]
fn test_cycle_is_rejected() {
    let document = parse_ok("[\\x]\nDefines: x\nmeans: 'x is \\y'\n\n[\\y]\nDefines: y\nmeans: 'y is \\x'\n");
    let mut types = TypeManager::new();
    types.add(&document.groups[0]).unwrap();
    let error = types.add(&document.groups[1]).unwrap_err();
    let TypeGraphError::Cycle { signature, chain } = &error;
    assert_eq!(signature, "y/0");
    assert_eq!(chain, &["y/0", "x/0", "y/0"]);
    assert!(types.parent_of("y/0").is_none());
    assert!(matches!(
        types.get_defines("y/0"),
        Some(TopLevelGroup::Defines(_))
    ));
}
