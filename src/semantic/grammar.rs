//! Section grammars
//!
//! Every construct declares the ordered list of sections it accepts as a
//! slice of [`Rule`]s. [`match_sections`] walks a group's sections against
//! that list in one pass and reports the first mismatch:
//!
//! - a required section that is absent: `missing required section 'x'`
//! - a section that does not fit the next rule: `unexpected section 'x'`
//!
//! Argument counts are checked separately with [`Arity`].

use crate::base::{ParseError, Position};
use crate::parser::Section;
use std::fmt;

/// One entry of a section grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required(&'static str),
    Optional(&'static str),
    /// One or more `when`/`then` pairs. `when` may be omitted in every pair
    /// unless `when_required` is set.
    Cases {
        when: &'static str,
        then: &'static str,
        when_required: bool,
    },
}

/// Argument count constraint of a section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, count: usize) -> bool {
        match *self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }

    /// Check the argument count of `section`
    pub fn check(&self, section: &Section) -> Result<(), ParseError> {
        let count = section.args.len();
        if self.accepts(count) {
            return Ok(());
        }
        Err(ParseError::section(
            format!(
                "Expected {} arguments for section '{}' but found {}",
                self, section.name.text, count
            ),
            section.position(),
        ))
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {}", n),
            Arity::AtLeast(n) => write!(f, "at least {}", n),
        }
    }
}

/// A `when`/`then` pair found by the matcher
#[derive(Debug, Clone, Copy)]
pub struct CaseMatch<'a> {
    pub when: Option<&'a Section>,
    pub then: &'a Section,
}

/// Sections of a group assigned to the rules of its grammar
#[derive(Debug, Default)]
pub struct Matched<'a> {
    sections: Vec<(&'static str, &'a Section)>,
    cases: Vec<CaseMatch<'a>>,
}

impl<'a> Matched<'a> {
    /// The section matched by the `Required`/`Optional` rule named `name`
    pub fn get(&self, name: &str) -> Option<&'a Section> {
        self.sections
            .iter()
            .find(|(rule, _)| *rule == name)
            .map(|(_, section)| *section)
    }

    pub fn cases(&self) -> &[CaseMatch<'a>] {
        &self.cases
    }
}

fn is(section: Option<&Section>, name: &str) -> bool {
    section.is_some_and(|s| s.name.text == name)
}

/// Match `sections` against `rules`, in order.
///
/// `position` locates "missing section" errors when the group has run out of
/// sections.
pub fn match_sections<'a>(
    sections: &'a [Section],
    rules: &[Rule],
    position: Position,
) -> Result<Matched<'a>, ParseError> {
    let mut matched = Matched::default();
    let mut index = 0usize;

    let missing = |name: &str, current: Option<&Section>| match current {
        Some(section) => ParseError::section(
            format!("unexpected section '{}'", section.name.text),
            section.position(),
        ),
        None => ParseError::section(format!("missing required section '{}'", name), position),
    };

    for rule in rules {
        match *rule {
            Rule::Required(name) => {
                let current = sections.get(index);
                if !is(current, name) {
                    return Err(missing(name, current));
                }
                if let Some(section) = current {
                    matched.sections.push((name, section));
                }
                index += 1;
            }
            Rule::Optional(name) => {
                if let Some(section) = sections.get(index).filter(|s| s.name.text == name) {
                    matched.sections.push((name, section));
                    index += 1;
                }
            }
            Rule::Cases {
                when,
                then,
                when_required,
            } => {
                loop {
                    let when_section = sections.get(index).filter(|s| s.name.text == when);
                    if when_section.is_none() && when_required {
                        break;
                    }
                    let then_index = index + usize::from(when_section.is_some());
                    match sections.get(then_index).filter(|s| s.name.text == then) {
                        Some(then_section) => {
                            matched.cases.push(CaseMatch {
                                when: when_section,
                                then: then_section,
                            });
                            index = then_index + 1;
                        }
                        None if when_section.is_some() => {
                            return Err(missing(then, sections.get(then_index)));
                        }
                        None => break,
                    }
                }
                if matched.cases.is_empty() {
                    let expected = if when_required { when } else { then };
                    return Err(missing(expected, sections.get(index)));
                }
            }
        }
    }

    if let Some(extra) = sections.get(index) {
        return Err(ParseError::section(
            format!("unexpected section '{}'", extra.name.text),
            extra.position(),
        ));
    }
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Group, Root, RootItem, parse_structure};
    use rstest::rstest;

    fn group(text: &str) -> Group {
        let (root, errors) = parse_structure(text);
        assert!(errors.is_empty(), "{:?}", errors);
        let Root { mut items } = root;
        match items.remove(0) {
            RootItem::Group(group) => group,
            RootItem::BlockComment(_) => panic!("expected a group"),
        }
    }

    const FOO: &[Rule] = &[
        Rule::Required("Foo"),
        Rule::Optional("when"),
        Rule::Required("then"),
    ];

    #[rstest]
    #[case("Foo:\nthen: x\n", None)]
    #[case("Foo:\nwhen: y\nthen: x\n", None)]
    #[case("Foo:\nthen: x\nwhen: y\n", Some("unexpected section 'when'"))]
    #[case("Foo:\nwhen: y\n", Some("missing required section 'then'"))]
    #[case("Bar:\nthen: x\n", Some("unexpected section 'Bar'"))]
    fn test_ordered_grammar(#[case] text: &str, #[case] error: Option<&str>) {
        let group = group(text);
        let result = match_sections(&group.sections, FOO, group.position);
        assert_eq!(result.err().map(|e| e.message), error.map(String::from));
    }

    #[test]
    fn test_case_pairs() {
        let rules = [
            Rule::Required("States"),
            Rule::Cases {
                when: "when",
                then: "then",
                when_required: false,
            },
            Rule::Optional("else"),
        ];
        let group = group("States:\nwhen: a\nthen: b\nthen: c\nwhen: d\nthen: e\nelse: f\n");
        let matched = match_sections(&group.sections, &rules, group.position).unwrap();
        let cases = matched.cases();
        assert_eq!(cases.len(), 3);
        assert!(cases[0].when.is_some());
        assert!(cases[1].when.is_none());
        assert!(matched.get("else").is_some());
    }

    #[test]
    fn test_when_without_then() {
        let rules = [
            Rule::Required("piecewise"),
            Rule::Cases {
                when: "when",
                then: "then",
                when_required: true,
            },
        ];
        let group = group("piecewise:\nwhen: a\n");
        let err = match_sections(&group.sections, &rules, group.position).unwrap_err();
        assert_eq!(err.message, "missing required section 'then'");
    }

    #[rstest]
    #[case(Arity::Exactly(1), 1, true)]
    #[case(Arity::Exactly(1), 2, false)]
    #[case(Arity::AtLeast(1), 0, false)]
    #[case(Arity::AtLeast(1), 3, true)]
    fn test_arity(#[case] arity: Arity, #[case] count: usize, #[case] ok: bool) {
        assert_eq!(arity.accepts(count), ok);
    }

    #[test]
    fn test_arity_message() {
        let group = group("author:\n");
        let err = Arity::AtLeast(1).check(&group.sections[0]).unwrap_err();
        assert_eq!(err.message, "Expected at least 1 arguments for section 'author' but found 0");
    }
}
