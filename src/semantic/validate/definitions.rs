//! Defines-like groups: Defines, Foundation, States, Views, Evaluates

use super::Validator;
use crate::base::{ParseError, Position};
use crate::expression::Command;
use crate::parser::{Group, Section};
use crate::semantic::grammar::{Arity, Matched, Rule};
use crate::syntax::{
    DefinesBody, DefinesGroup, EvaluatesGroup, FoundationGroup, ProvidingItem, Statement,
    StatesGroup, SymbolsItem, Target, Text, ViewItem, ViewsGroup,
};

const DEFINES: &[Rule] = &[
    Rule::Required("Defines"),
    Rule::Optional("given"),
    Rule::Optional("when"),
    Rule::Optional("means"),
    Rule::Optional("computes"),
    Rule::Optional("providing"),
    Rule::Optional("using"),
    Rule::Optional("written"),
    Rule::Optional("called"),
    Rule::Optional("Metadata"),
];

const FOUNDATION: &[Rule] = &[
    Rule::Required("Foundation"),
    Rule::Optional("means"),
    Rule::Optional("computes"),
    Rule::Optional("Metadata"),
];

const STATES: &[Rule] = &[
    Rule::Required("States"),
    Rule::Optional("given"),
    Rule::Cases {
        when: "when",
        then: "then",
        when_required: false,
    },
    Rule::Optional("else"),
    Rule::Optional("using"),
    Rule::Optional("written"),
    Rule::Optional("Metadata"),
];

const VIEWS: &[Rule] = &[
    Rule::Required("Views"),
    Rule::Required("from"),
    Rule::Cases {
        when: "when",
        then: "to",
        when_required: false,
    },
    Rule::Optional("else"),
    Rule::Optional("using"),
    Rule::Optional("written"),
    Rule::Optional("Metadata"),
];

const EVALUATES: &[Rule] = &[
    Rule::Required("Evaluates"),
    Rule::Cases {
        when: "when",
        then: "then",
        when_required: false,
    },
    Rule::Optional("else"),
    Rule::Optional("using"),
    Rule::Optional("written"),
    Rule::Optional("Metadata"),
];

const VIEW_ITEM: &[Rule] = &[
    Rule::Required("view"),
    Rule::Required("as"),
    Rule::Optional("via"),
    Rule::Optional("by"),
];

const SYMBOLS_ITEM: &[Rule] = &[Rule::Required("symbols"), Rule::Required("where")];

impl Validator {
    pub(super) fn defines(&mut self, group: &Group) -> Option<DefinesGroup> {
        let matched = self.sections(group, DEFINES)?;
        let (id, command) = self.command_id("Defines", group)?;
        let target = self.single_target(matched.get("Defines")?)?;
        self.check_id_params(&command, &target, id.position)?;
        Some(DefinesGroup {
            id,
            target,
            given: self.optional_targets(matched.get("given"))?,
            when: self.optional_clauses(matched.get("when"))?,
            body: self.body("Defines", group, &matched)?,
            providing: self.optional(matched.get("providing"), Self::providing)?,
            using: self.optional_using(matched.get("using"))?,
            written: self.optional_texts(matched.get("written"))?,
            called: self.optional_texts(matched.get("called"))?,
            metadata: self.metadata(matched.get("Metadata"))?,
            position: group.position,
        })
    }

    pub(super) fn foundation(&mut self, group: &Group) -> Option<FoundationGroup> {
        let matched = self.sections(group, FOUNDATION)?;
        let (id, command) = self.command_id("Foundation", group)?;
        let target = self.single_target(matched.get("Foundation")?)?;
        self.check_id_params(&command, &target, id.position)?;
        Some(FoundationGroup {
            id,
            target,
            body: self.body("Foundation", group, &matched)?,
            metadata: self.metadata(matched.get("Metadata"))?,
            position: group.position,
        })
    }

    pub(super) fn states(&mut self, group: &Group) -> Option<StatesGroup> {
        let matched = self.sections(group, STATES)?;
        let (id, _) = self.command_id("States", group)?;
        self.arity(matched.get("States")?, Arity::Exactly(0))?;
        Some(StatesGroup {
            id,
            given: self.optional_targets(matched.get("given"))?,
            cases: self.cases(matched.cases(), |this, then| {
                this.clauses(then, Arity::AtLeast(1))
            })?,
            else_: self.optional_clauses(matched.get("else"))?,
            using: self.optional_using(matched.get("using"))?,
            written: self.optional_texts(matched.get("written"))?,
            metadata: self.metadata(matched.get("Metadata"))?,
            position: group.position,
        })
    }

    pub(super) fn views(&mut self, group: &Group) -> Option<ViewsGroup> {
        let matched = self.sections(group, VIEWS)?;
        let (id, _) = self.command_id("Views", group)?;
        self.arity(matched.get("Views")?, Arity::Exactly(0))?;
        Some(ViewsGroup {
            id,
            from: self.single_statement(matched.get("from")?)?,
            cases: self.cases(matched.cases(), Self::single_statement)?,
            else_: self.optional_statement(matched.get("else"))?,
            using: self.optional_using(matched.get("using"))?,
            written: self.optional_texts(matched.get("written"))?,
            metadata: self.metadata(matched.get("Metadata"))?,
            position: group.position,
        })
    }

    pub(super) fn evaluates(&mut self, group: &Group) -> Option<EvaluatesGroup> {
        let matched = self.sections(group, EVALUATES)?;
        let (id, _) = self.command_id("Evaluates", group)?;
        self.arity(matched.get("Evaluates")?, Arity::Exactly(0))?;
        Some(EvaluatesGroup {
            id,
            cases: self.cases(matched.cases(), |this, then| {
                this.statements(then, Arity::AtLeast(1))
            })?,
            else_: self.optional(matched.get("else"), |this, section| {
                this.statements(section, Arity::AtLeast(1))
            })?,
            using: self.optional_using(matched.get("using"))?,
            written: self.optional_texts(matched.get("written"))?,
            metadata: self.metadata(matched.get("Metadata"))?,
            position: group.position,
        })
    }

    // =========================================================================
    // Shared pieces
    // =========================================================================

    fn single_target(&mut self, section: &Section) -> Option<Target> {
        self.targets(section, Arity::Exactly(1))?.pop()
    }

    pub(super) fn optional_targets(
        &mut self,
        section: Option<&Section>,
    ) -> Option<Option<Vec<Target>>> {
        self.optional(section, |this, section| this.targets(section, Arity::AtLeast(1)))
    }

    pub(super) fn optional_using(
        &mut self,
        section: Option<&Section>,
    ) -> Option<Option<Vec<Statement>>> {
        self.optional(section, Self::using)
    }

    fn optional_texts(&mut self, section: Option<&Section>) -> Option<Option<Vec<Text>>> {
        self.optional(section, |this, section| this.texts(section, Arity::AtLeast(1)))
    }

    fn optional_statement(&mut self, section: Option<&Section>) -> Option<Option<Statement>> {
        self.optional(section, Self::single_statement)
    }

    /// Exactly one of `means` and `computes`
    fn body(&mut self, kind: &str, group: &Group, matched: &Matched<'_>) -> Option<DefinesBody> {
        match (matched.get("means"), matched.get("computes")) {
            (Some(means), None) => Some(DefinesBody::Means(
                self.clauses(means, Arity::AtLeast(1))?,
            )),
            (None, Some(computes)) => Some(DefinesBody::Computes(
                self.statements(computes, Arity::AtLeast(1))?,
            )),
            _ => {
                self.report(ParseError::section(
                    format!(
                        "A '{}' group requires exactly one of the sections 'means' or 'computes'",
                        kind
                    ),
                    group.position,
                ));
                None
            }
        }
    }

    /// When the id has parameters, the defined target must be a plain
    /// function whose parameters are spelled the same way.
    fn check_id_params(
        &mut self,
        command: &Command,
        target: &Target,
        position: Position,
    ) -> Option<()> {
        let Some(params) = &command.params else {
            return Some(());
        };
        let expected = params
            .iter()
            .map(|param| {
                param
                    .to_string()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join(",");
        let found = match target {
            Target::Abstraction(abstraction) if abstraction.is_function_like() => {
                abstraction.params_text()
            }
            _ => None,
        };
        match found {
            Some(found) if found == expected => Some(()),
            Some(found) => {
                self.report(ParseError::semantic(
                    format!(
                        "The parameters ({}) of the id do not match the parameters ({}) of the defined target",
                        expected, found
                    ),
                    position,
                ));
                None
            }
            None => {
                self.report(ParseError::semantic(
                    format!(
                        "The id has parameters ({}) so the defined target must be a function such as f({})",
                        expected, expected
                    ),
                    target.position(),
                ));
                None
            }
        }
    }

    // =========================================================================
    // Providing
    // =========================================================================

    fn providing(&mut self, section: &Section) -> Option<Vec<ProvidingItem>> {
        let items = self.items(section)?;
        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for item in items {
            match item.kind_name().unwrap_or_default() {
                "view" => out.push(ProvidingItem::View(self.view_item(item).unwrap_or_default())),
                "symbols" => out.push(ProvidingItem::Symbols(
                    self.symbols_item(item).unwrap_or_default(),
                )),
                other => {
                    self.report(ParseError::section(
                        format!("Unknown providing item '{}'", other),
                        item.position,
                    ));
                    ok = false;
                }
            }
        }
        ok.then_some(out)
    }

    fn view_item(&mut self, group: &Group) -> Option<ViewItem> {
        let matched = self.sections(group, VIEW_ITEM)?;
        self.arity(matched.get("view")?, Arity::Exactly(0))?;
        Some(ViewItem {
            as_: self.single_statement(matched.get("as")?)?,
            via: self.optional_statement(matched.get("via"))?,
            by: self.optional_statement(matched.get("by"))?,
            position: group.position,
        })
    }

    fn symbols_item(&mut self, group: &Group) -> Option<SymbolsItem> {
        let matched = self.sections(group, SYMBOLS_ITEM)?;
        Some(SymbolsItem {
            targets: self.targets(matched.get("symbols")?, Arity::AtLeast(1))?,
            where_: self.statements(matched.get("where")?, Arity::AtLeast(1))?,
            position: group.position,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::base::{ErrorKind, ParseError};
    use crate::parser::parse_structure;
    use crate::semantic::validate;
    use crate::syntax::{Document, ProvidingItem, Target, TopLevelGroup};

    fn check(text: &str) -> (Document, Vec<ParseError>) {
        let (root, errors) = parse_structure(text);
        assert!(errors.is_empty(), "{:?}", errors);
        validate(&root)
    }

    #[test]
    fn test_defines_with_parameters() {
        let (doc, errors) = check("[\\f(x, y)]\nDefines: f(x,y)\nmeans: 'f(x, y) is \\real'\n");
        assert!(errors.is_empty(), "{:?}", errors);
        let TopLevelGroup::Defines(defines) = &doc.groups[0] else {
            panic!("expected a Defines group");
        };
        assert_eq!(defines.id.signature.as_deref(), Some("f/2"));
        assert!(matches!(defines.target, Target::Abstraction(_)));
    }

    #[test]
    fn test_parameter_mismatch() {
        let (doc, errors) = check("[\\f(x)]\nDefines: f(y)\nmeans: 'f(y)'\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::Semantic);
        assert_eq!(doc.groups[0], TopLevelGroup::Defines(Default::default()));
    }

    #[test]
    fn test_parameters_require_function_target() {
        let (_, errors) = check("[\\f(x)]\nDefines: f\nmeans: 'f'\n");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("must be a function"));
    }

    #[test]
    fn test_means_or_computes() {
        let (_, errors) = check("[\\a]\nDefines: a\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ErrorKind::SectionGrammar);

        let (_, errors) = check("[\\a]\nDefines: a\nmeans: 'a'\ncomputes: 'a'\n");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_missing_id() {
        let (_, errors) = check("Defines: a\nmeans: 'a'\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "A 'Defines' group requires an id");
    }

    #[test]
    fn test_providing() {
        let text = "[\\a]\nDefines: a\nmeans: 'a is \\set'\nproviding:\n. view:\n  as: '\\b'\n. symbols: x\n  where: 'x := a'\n";
        let (doc, errors) = check(text);
        assert!(errors.is_empty(), "{:?}", errors);
        let TopLevelGroup::Defines(defines) = &doc.groups[0] else {
            panic!("expected a Defines group");
        };
        let providing = defines.providing.as_ref().unwrap();
        assert!(matches!(providing[0], ProvidingItem::View(_)));
        assert!(matches!(providing[1], ProvidingItem::Symbols(_)));
    }

    #[test]
    fn test_states_cases() {
        let text = "[\\p]\nStates:\nwhen: 'x > 0'\nthen: 'x is \\positive'\nthen: 'x'\nelse: 'y'\n";
        let (doc, errors) = check(text);
        assert!(errors.is_empty(), "{:?}", errors);
        let TopLevelGroup::States(states) = &doc.groups[0] else {
            panic!("expected a States group");
        };
        assert_eq!(states.cases.len(), 2);
        assert!(states.else_.is_some());
    }

    #[test]
    fn test_views_out_of_order() {
        let text = "[\\v]\nViews:\nto: '\\b'\nfrom: '\\a'\n";
        let (doc, errors) = check(text);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "unexpected section 'to'");
        assert_eq!(doc.groups[0], TopLevelGroup::Views(Default::default()));
    }

    #[test]
    fn test_evaluates() {
        let text = "[\\e]\nEvaluates:\nwhen: 'x > 0'\nthen: 'x'\nelse: '0'\n";
        let (doc, errors) = check(text);
        assert!(errors.is_empty(), "{:?}", errors);
        assert!(matches!(&doc.groups[0], TopLevelGroup::Evaluates(e) if e.cases.len() == 1));
    }
}
