//! Clauses and nested clause groups

use super::Validator;
use crate::base::ParseError;
use crate::parser::{self, Argument, Group, Section, TokenKind};
use crate::semantic::grammar::{Arity, CaseMatch, Rule};
use crate::syntax::{
    AndGroup, Case, Clause, EquivalentlyGroup, ExistsGroup, ExistsUniqueGroup, ForAllGroup,
    IfGroup, IffGroup, NotGroup, OrGroup, PiecewiseGroup, Text,
};

const FOR_ALL: &[Rule] = &[
    Rule::Required("forAll"),
    Rule::Optional("where"),
    Rule::Optional("suchThat"),
    Rule::Required("then"),
];

const EXISTS: &[Rule] = &[
    Rule::Required("exists"),
    Rule::Optional("where"),
    Rule::Optional("suchThat"),
];

const EXISTS_UNIQUE: &[Rule] = &[
    Rule::Required("existsUnique"),
    Rule::Optional("where"),
    Rule::Optional("suchThat"),
];

const IF: &[Rule] = &[Rule::Required("if"), Rule::Required("then")];
const IFF: &[Rule] = &[Rule::Required("iff"), Rule::Required("then")];

const PIECEWISE: &[Rule] = &[
    Rule::Required("piecewise"),
    Rule::Cases {
        when: "when",
        then: "then",
        when_required: true,
    },
    Rule::Optional("else"),
];

impl Validator {
    pub(super) fn clauses(&mut self, section: &Section, arity: Arity) -> Option<Vec<Clause>> {
        self.each(section, arity, Self::clause)
    }

    /// A statement, a string or a clause group.
    ///
    /// A clause group with internal errors becomes its default; only an
    /// argument that is not a clause at all fails.
    fn clause(&mut self, arg: &Argument) -> Option<Clause> {
        match &arg.target {
            parser::Target::Literal(token) if token.is(TokenKind::Statement) => {
                Some(Clause::Statement(self.statement_token(token)))
            }
            parser::Target::Literal(token) if token.is(TokenKind::String) => {
                Some(Clause::Text(Text {
                    text: token.inner_text().into(),
                    position: token.position,
                }))
            }
            parser::Target::Group(group) => self.clause_group(group),
            other => self.wrong_shape("a clause", other),
        }
    }

    fn clause_group(&mut self, group: &Group) -> Option<Clause> {
        let clause = match group.kind_name().unwrap_or_default() {
            "forAll" => Clause::ForAll(self.for_all(group).unwrap_or_default()),
            "exists" => Clause::Exists(self.exists(group).unwrap_or_default()),
            "existsUnique" => Clause::ExistsUnique(self.exists_unique(group).unwrap_or_default()),
            "if" => Clause::If(self.if_group(group).unwrap_or_default()),
            "iff" => Clause::Iff(self.iff_group(group).unwrap_or_default()),
            "not" => Clause::Not(self.not_group(group).unwrap_or_default()),
            "or" => Clause::Or(self.or_group(group).unwrap_or_default()),
            "and" => Clause::And(self.and_group(group).unwrap_or_default()),
            "equivalently" => {
                Clause::Equivalently(self.equivalently_group(group).unwrap_or_default())
            }
            "piecewise" => Clause::Piecewise(self.piecewise(group).unwrap_or_default()),
            other => {
                self.report(ParseError::section(
                    format!("Unknown clause '{}'", other),
                    group.position,
                ));
                return None;
            }
        };
        Some(clause)
    }

    pub(super) fn optional_clauses(
        &mut self,
        section: Option<&Section>,
    ) -> Option<Option<Vec<Clause>>> {
        self.optional(section, |this, section| this.clauses(section, Arity::AtLeast(1)))
    }

    fn for_all(&mut self, group: &Group) -> Option<ForAllGroup> {
        let matched = self.sections(group, FOR_ALL)?;
        Some(ForAllGroup {
            targets: self.targets(matched.get("forAll")?, Arity::AtLeast(1))?,
            where_: self.optional_clauses(matched.get("where"))?,
            such_that: self.optional_clauses(matched.get("suchThat"))?,
            then: self.clauses(matched.get("then")?, Arity::AtLeast(1))?,
            position: group.position,
        })
    }

    fn exists(&mut self, group: &Group) -> Option<ExistsGroup> {
        let matched = self.sections(group, EXISTS)?;
        Some(ExistsGroup {
            targets: self.targets(matched.get("exists")?, Arity::AtLeast(1))?,
            where_: self.optional_clauses(matched.get("where"))?,
            such_that: self.optional_clauses(matched.get("suchThat"))?,
            position: group.position,
        })
    }

    fn exists_unique(&mut self, group: &Group) -> Option<ExistsUniqueGroup> {
        let matched = self.sections(group, EXISTS_UNIQUE)?;
        Some(ExistsUniqueGroup {
            targets: self.targets(matched.get("existsUnique")?, Arity::AtLeast(1))?,
            where_: self.optional_clauses(matched.get("where"))?,
            such_that: self.optional_clauses(matched.get("suchThat"))?,
            position: group.position,
        })
    }

    fn if_group(&mut self, group: &Group) -> Option<IfGroup> {
        let matched = self.sections(group, IF)?;
        Some(IfGroup {
            conditions: self.clauses(matched.get("if")?, Arity::AtLeast(1))?,
            then: self.clauses(matched.get("then")?, Arity::AtLeast(1))?,
            position: group.position,
        })
    }

    fn iff_group(&mut self, group: &Group) -> Option<IffGroup> {
        let matched = self.sections(group, IFF)?;
        Some(IffGroup {
            conditions: self.clauses(matched.get("iff")?, Arity::AtLeast(1))?,
            then: self.clauses(matched.get("then")?, Arity::AtLeast(1))?,
            position: group.position,
        })
    }

    fn not_group(&mut self, group: &Group) -> Option<NotGroup> {
        let matched = self.sections(group, &[Rule::Required("not")])?;
        let clause = self.clauses(matched.get("not")?, Arity::Exactly(1))?.pop()?;
        Some(NotGroup {
            clause: Box::new(clause),
            position: group.position,
        })
    }

    /// Body of a single-section connective such as `or:`
    fn connective(&mut self, name: &'static str, group: &Group) -> Option<Vec<Clause>> {
        let rules = [Rule::Required(name)];
        let matched = self.sections(group, &rules)?;
        self.clauses(matched.get(name)?, Arity::AtLeast(1))
    }

    fn or_group(&mut self, group: &Group) -> Option<OrGroup> {
        Some(OrGroup {
            clauses: self.connective("or", group)?,
            position: group.position,
        })
    }

    fn and_group(&mut self, group: &Group) -> Option<AndGroup> {
        Some(AndGroup {
            clauses: self.connective("and", group)?,
            position: group.position,
        })
    }

    fn equivalently_group(&mut self, group: &Group) -> Option<EquivalentlyGroup> {
        Some(EquivalentlyGroup {
            clauses: self.connective("equivalently", group)?,
            position: group.position,
        })
    }

    fn piecewise(&mut self, group: &Group) -> Option<PiecewiseGroup> {
        let matched = self.sections(group, PIECEWISE)?;
        self.arity(matched.get("piecewise")?, Arity::Exactly(0))?;
        let cases = self.cases(matched.cases(), |this, then| {
            this.clauses(then, Arity::AtLeast(1))
        })?;
        Some(PiecewiseGroup {
            cases,
            else_: self.optional_clauses(matched.get("else"))?,
            position: group.position,
        })
    }

    /// Convert matched `when`/`then` pairs; `then` sections go through
    /// `convert`.
    pub(super) fn cases<T>(
        &mut self,
        cases: &[CaseMatch<'_>],
        mut convert: impl FnMut(&mut Self, &Section) -> Option<T>,
    ) -> Option<Vec<Case<T>>> {
        let mut out = Vec::with_capacity(cases.len());
        for case in cases {
            let when = self.optional_clauses(case.when)?;
            let then = convert(self, case.then)?;
            out.push(Case { when, then });
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::parse_structure;
    use crate::semantic::validate;
    use crate::syntax::{Clause, DefinesBody, TopLevelGroup};

    fn means(text: &str) -> (Vec<Clause>, usize) {
        let source = format!("[\\a]\nDefines: a\nmeans:\n{}", text);
        let (root, structural) = parse_structure(&source);
        assert!(structural.is_empty(), "{:?}", structural);
        let (doc, errors) = validate(&root);
        let TopLevelGroup::Defines(defines) = &doc.groups[0] else {
            panic!("expected a Defines group");
        };
        let DefinesBody::Means(clauses) = &defines.body else {
            panic!("expected means");
        };
        (clauses.clone(), errors.len())
    }

    #[test]
    fn test_for_all() {
        let (clauses, errors) = means(". forAll: x\n  where: 'x is \\set'\n  then: 'x = x'\n");
        assert_eq!(errors, 0);
        let Clause::ForAll(group) = &clauses[0] else {
            panic!("expected forAll");
        };
        assert_eq!(group.targets.len(), 1);
        assert!(group.where_.is_some());
        assert!(group.such_that.is_none());
        assert_eq!(group.then.len(), 1);
    }

    #[test]
    fn test_broken_clause_keeps_parent() {
        let (clauses, errors) = means(". 'a'\n. if: 'b'\n. 'c'\n");
        assert_eq!(errors, 1);
        assert_eq!(clauses.len(), 3);
        assert_eq!(clauses[1], Clause::If(Default::default()));
    }

    #[test]
    fn test_piecewise_requires_when() {
        let (clauses, errors) =
            means(". piecewise:\n  when: 'x > 0'\n  then: 'x'\n  else: '0'\n");
        assert_eq!(errors, 0);
        let Clause::Piecewise(group) = &clauses[0] else {
            panic!("expected piecewise");
        };
        assert_eq!(group.cases.len(), 1);
        assert!(group.cases[0].when.is_some());
        assert!(group.else_.is_some());
    }

    #[test]
    fn test_not_takes_one_clause() {
        let (clauses, errors) = means(". not: 'a', 'b'\n");
        assert_eq!(errors, 1);
        assert_eq!(clauses[0], Clause::Not(Default::default()));
    }
}
