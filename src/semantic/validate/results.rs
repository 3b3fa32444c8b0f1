//! Axioms, theorems and conjectures

use super::Validator;
use crate::parser::Group;
use crate::semantic::grammar::{Arity, Rule};
use crate::syntax::{ResultBody, TheoremGroup};

const AXIOM: &[Rule] = &[
    Rule::Required("Axiom"),
    Rule::Optional("given"),
    Rule::Optional("where"),
    Rule::Required("then"),
    Rule::Optional("iff"),
    Rule::Optional("using"),
    Rule::Optional("Metadata"),
];

const CONJECTURE: &[Rule] = &[
    Rule::Required("Conjecture"),
    Rule::Optional("given"),
    Rule::Optional("where"),
    Rule::Required("then"),
    Rule::Optional("iff"),
    Rule::Optional("using"),
    Rule::Optional("Metadata"),
];

const THEOREM: &[Rule] = &[
    Rule::Required("Theorem"),
    Rule::Optional("given"),
    Rule::Optional("where"),
    Rule::Required("then"),
    Rule::Optional("iff"),
    Rule::Optional("using"),
    Rule::Optional("Proof"),
    Rule::Optional("Metadata"),
];

impl Validator {
    /// `Axiom` or `Conjecture`
    pub(super) fn result_body(&mut self, kind: &'static str, group: &Group) -> Option<ResultBody> {
        let rules = if kind == "Axiom" { AXIOM } else { CONJECTURE };
        let matched = self.sections(group, rules)?;
        Some(ResultBody {
            id: self.free_id(group, None)?,
            names: self.header_strings(matched.get(kind)?)?,
            given: self.optional_targets(matched.get("given"))?,
            where_: self.optional_clauses(matched.get("where"))?,
            then: self.clauses(matched.get("then")?, Arity::AtLeast(1))?,
            iff: self.optional_clauses(matched.get("iff"))?,
            using: self.optional_using(matched.get("using"))?,
            metadata: self.metadata(matched.get("Metadata"))?,
            position: group.position,
        })
    }

    pub(super) fn theorem(&mut self, group: &Group) -> Option<TheoremGroup> {
        let matched = self.sections(group, THEOREM)?;
        Some(TheoremGroup {
            id: self.free_id(group, None)?,
            names: self.header_strings(matched.get("Theorem")?)?,
            given: self.optional_targets(matched.get("given"))?,
            where_: self.optional_clauses(matched.get("where"))?,
            then: self.clauses(matched.get("then")?, Arity::AtLeast(1))?,
            iff: self.optional_clauses(matched.get("iff"))?,
            using: self.optional_using(matched.get("using"))?,
            proof: self.optional(matched.get("Proof"), |this, section| {
                this.texts(section, Arity::AtLeast(1))
            })?,
            metadata: self.metadata(matched.get("Metadata"))?,
            position: group.position,
        })
    }
}
