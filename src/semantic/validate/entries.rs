//! Metadata, resources, topics, notes and specify groups
//!
//! These are built from single-section items such as `. author: "A"`, each
//! with its own argument count.

use super::Validator;
use crate::base::ParseError;
use crate::parser::{Group, Section};
use crate::semantic::grammar::{Arity, Rule};
use crate::syntax::{
    MetadataItem, MetadataItemKind, MetadataSection, NoteGroup, ResourceGroup, ResourceItem,
    ResourceItemKind, SpecifyGroup, SpecifyItem, SpecifyKind, Text, TopicGroup,
};

const TOPIC: &[Rule] = &[
    Rule::Required("Topic"),
    Rule::Required("content"),
    Rule::Optional("Metadata"),
];

const NOTE: &[Rule] = &[
    Rule::Required("Note"),
    Rule::Required("content"),
    Rule::Optional("Metadata"),
];

fn metadata_arity(kind: MetadataItemKind) -> Arity {
    match kind {
        MetadataItemKind::Id => Arity::Exactly(1),
        MetadataItemKind::Tags | MetadataItemKind::Related | MetadataItemKind::Reference => {
            Arity::AtLeast(1)
        }
    }
}

fn resource_arity(kind: ResourceItemKind) -> Arity {
    match kind {
        ResourceItemKind::Author | ResourceItemKind::Editor => Arity::AtLeast(1),
        _ => Arity::Exactly(1),
    }
}

impl Validator {
    pub(super) fn metadata(
        &mut self,
        section: Option<&Section>,
    ) -> Option<Option<MetadataSection>> {
        let Some(section) = section else {
            return Some(None);
        };
        let items = self.items(section)?;
        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for item in items {
            let name = item.kind_name().unwrap_or_default();
            match MetadataItemKind::ALL.into_iter().find(|k| k.name() == name) {
                Some(kind) => {
                    let values = self.item_values(item, metadata_arity(kind));
                    out.push(MetadataItem {
                        kind,
                        values: values.unwrap_or_default(),
                        position: item.position,
                    });
                }
                None => {
                    self.unknown_item("metadata", name, item);
                    ok = false;
                }
            }
        }
        ok.then_some(Some(MetadataSection {
            items: out,
            position: section.position(),
        }))
    }

    pub(super) fn resource(&mut self, group: &Group) -> Option<ResourceGroup> {
        let matched = self.sections(group, &[Rule::Required("Resource")])?;
        let id = self.free_id(group, Some("Resource"))??;
        if !id.text.starts_with('@') {
            self.report(ParseError::semantic(
                format!("A resource id must start with '@' but found '{}'", id.text),
                id.position,
            ));
            return None;
        }
        let items = self.items(matched.get("Resource")?)?;
        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for item in items {
            let name = item.kind_name().unwrap_or_default();
            match ResourceItemKind::ALL.into_iter().find(|k| k.name() == name) {
                Some(kind) => {
                    let values = self.item_values(item, resource_arity(kind));
                    out.push(ResourceItem {
                        kind,
                        values: values.unwrap_or_default(),
                        position: item.position,
                    });
                }
                None => {
                    self.unknown_item("resource", name, item);
                    ok = false;
                }
            }
        }
        ok.then_some(ResourceGroup {
            id,
            items: out,
            position: group.position,
        })
    }

    pub(super) fn topic(&mut self, group: &Group) -> Option<TopicGroup> {
        let matched = self.sections(group, TOPIC)?;
        let id = self.free_id(group, Some("Topic"))??;
        Some(TopicGroup {
            id,
            names: self.header_strings(matched.get("Topic")?)?,
            content: self.texts(matched.get("content")?, Arity::Exactly(1))?.pop()?,
            metadata: self.metadata(matched.get("Metadata"))?,
            position: group.position,
        })
    }

    pub(super) fn note(&mut self, group: &Group) -> Option<NoteGroup> {
        let matched = self.sections(group, NOTE)?;
        self.no_id("Note", group)?;
        self.arity(matched.get("Note")?, Arity::Exactly(0))?;
        Some(NoteGroup {
            content: self.texts(matched.get("content")?, Arity::Exactly(1))?.pop()?,
            metadata: self.metadata(matched.get("Metadata"))?,
            position: group.position,
        })
    }

    pub(super) fn specify(&mut self, group: &Group) -> Option<SpecifyGroup> {
        let matched = self.sections(group, &[Rule::Required("Specify")])?;
        self.no_id("Specify", group)?;
        let items = self.items(matched.get("Specify")?)?;
        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for item in items {
            let name = item.kind_name().unwrap_or_default();
            match SpecifyKind::ALL.into_iter().find(|k| k.name() == name) {
                Some(kind) => out.push(self.specify_item(kind, item).unwrap_or(SpecifyItem {
                    kind,
                    ..Default::default()
                })),
                None => {
                    self.unknown_item("specify", name, item);
                    ok = false;
                }
            }
        }
        ok.then_some(SpecifyGroup {
            items: out,
            position: group.position,
        })
    }

    fn specify_item(&mut self, kind: SpecifyKind, item: &Group) -> Option<SpecifyItem> {
        let rules = [Rule::Required(kind.name()), Rule::Required("is")];
        let matched = self.sections(item, &rules)?;
        self.arity(matched.get(kind.name())?, Arity::Exactly(0))?;
        Some(SpecifyItem {
            kind,
            is: self.single_statement(matched.get("is")?)?,
            position: item.position,
        })
    }

    /// String values of a single-section item
    fn item_values(&mut self, item: &Group, arity: Arity) -> Option<Vec<Text>> {
        let section = match item.sections.as_slice() {
            [section] => section,
            [_, extra, ..] => {
                self.report(ParseError::section(
                    format!("unexpected section '{}'", extra.name.text),
                    extra.position(),
                ));
                return None;
            }
            [] => return None,
        };
        self.texts(section, arity)
    }

    fn unknown_item(&mut self, what: &str, name: &str, item: &Group) {
        self.report(ParseError::section(
            format!("Unknown {} item '{}'", what, name),
            item.position,
        ));
    }
}

#[cfg(test)]
mod tests {
    use crate::base::ParseError;
    use crate::parser::parse_structure;
    use crate::semantic::validate;
    use crate::syntax::{Document, ResourceItemKind, SpecifyKind, TopLevelGroup};

    fn check(text: &str) -> (Document, Vec<ParseError>) {
        let (root, errors) = parse_structure(text);
        assert!(errors.is_empty(), "{:?}", errors);
        validate(&root)
    }

    #[test]
    fn test_resource() {
        let text = "[@book]\nResource:\n. type: \"book\"\n. author: \"A\", \"B\"\n. year: \"1999\"\n";
        let (doc, errors) = check(text);
        assert!(errors.is_empty(), "{:?}", errors);
        let TopLevelGroup::Resource(resource) = &doc.groups[0] else {
            panic!("expected a Resource group");
        };
        assert_eq!(resource.id.text, "@book");
        let kinds: Vec<_> = resource.items.iter().map(|item| item.kind).collect();
        assert_eq!(
            kinds,
            vec![ResourceItemKind::Type, ResourceItemKind::Author, ResourceItemKind::Year]
        );
        assert_eq!(resource.items[1].values.len(), 2);
    }

    #[test]
    fn test_resource_id_needs_at() {
        let (doc, errors) = check("[book]\nResource:\n. type: \"book\"\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(doc.groups[0], TopLevelGroup::Resource(Default::default()));
    }

    #[test]
    fn test_metadata() {
        let text = "[\\a]\nDefines: a\nmeans: 'a'\nMetadata:\n. id: \"a\"\n. tags: \"x\", \"y\"\n";
        let (doc, errors) = check(text);
        assert!(errors.is_empty(), "{:?}", errors);
        let TopLevelGroup::Defines(defines) = &doc.groups[0] else {
            panic!("expected a Defines group");
        };
        assert_eq!(defines.metadata.as_ref().unwrap().items.len(), 2);
    }

    #[test]
    fn test_metadata_id_takes_one_value() {
        let text = "[\\a]\nDefines: a\nmeans: 'a'\nMetadata:\n. id: \"a\", \"b\"\n";
        let (_, errors) = check(text);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors[0].message,
            "Expected exactly 1 arguments for section 'id' but found 2"
        );
    }

    #[test]
    fn test_topic_and_note() {
        let text = "[matrices]\nTopic: \"Matrices\"\ncontent: \"Rectangular arrays\"\n\nNote:\ncontent: \"hello\"\n";
        let (doc, errors) = check(text);
        assert!(errors.is_empty(), "{:?}", errors);
        assert!(matches!(&doc.groups[0], TopLevelGroup::Topic(t) if t.content.text == "Rectangular arrays"));
        assert!(matches!(&doc.groups[1], TopLevelGroup::Note(n) if n.content.text == "hello"));
    }

    #[test]
    fn test_specify() {
        let text = "Specify:\n. zero:\n  is: '\\natural'\n. positiveFloat:\n  is: '\\real'\n";
        let (doc, errors) = check(text);
        assert!(errors.is_empty(), "{:?}", errors);
        let TopLevelGroup::Specify(specify) = &doc.groups[0] else {
            panic!("expected a Specify group");
        };
        assert_eq!(specify.items[0].kind, SpecifyKind::Zero);
        assert_eq!(specify.items[1].kind, SpecifyKind::PositiveFloat);
    }

    #[test]
    fn test_unknown_specify_item() {
        let (doc, errors) = check("Specify:\n. imaginary:\n  is: '\\i'\n");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "Unknown specify item 'imaginary'");
        assert_eq!(doc.groups[0], TopLevelGroup::Specify(Default::default()));
    }
}
