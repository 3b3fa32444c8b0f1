//! Typed document model produced by the semantic validator
//!
//! Each construct owns its sections as typed fields. Optional sections are
//! `Option`s, repeated case pairs are `Vec<Case<_>>`.

use super::clause::Clause;
use super::nodes::{Case, IdStatement, Statement, Target, Text};
use crate::base::Position;
use smol_str::SmolStr;

/// A validated document: the ordered top-level groups of one source text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub groups: Vec<TopLevelGroup>,
}

/// Every construct that can appear at the top level
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TopLevelGroup {
    Defines(DefinesGroup),
    Foundation(FoundationGroup),
    States(StatesGroup),
    Views(ViewsGroup),
    Evaluates(EvaluatesGroup),
    Axiom(AxiomGroup),
    Theorem(TheoremGroup),
    Conjecture(ConjectureGroup),
    Resource(ResourceGroup),
    Topic(TopicGroup),
    Note(NoteGroup),
    Specify(SpecifyGroup),
    TextBlock(TextBlock),
}

impl TopLevelGroup {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Defines(_) => "Defines",
            Self::Foundation(_) => "Foundation",
            Self::States(_) => "States",
            Self::Views(_) => "Views",
            Self::Evaluates(_) => "Evaluates",
            Self::Axiom(_) => "Axiom",
            Self::Theorem(_) => "Theorem",
            Self::Conjecture(_) => "Conjecture",
            Self::Resource(_) => "Resource",
            Self::Topic(_) => "Topic",
            Self::Note(_) => "Note",
            Self::Specify(_) => "Specify",
            Self::TextBlock(_) => "TextBlock",
        }
    }

    pub fn id(&self) -> Option<&IdStatement> {
        match self {
            Self::Defines(group) => Some(&group.id),
            Self::Foundation(group) => Some(&group.id),
            Self::States(group) => Some(&group.id),
            Self::Views(group) => Some(&group.id),
            Self::Evaluates(group) => Some(&group.id),
            Self::Axiom(group) => group.id.as_ref(),
            Self::Theorem(group) => group.id.as_ref(),
            Self::Conjecture(group) => group.id.as_ref(),
            Self::Resource(group) => Some(&group.id),
            Self::Topic(group) => Some(&group.id),
            Self::Note(_) | Self::Specify(_) | Self::TextBlock(_) => None,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Self::Defines(group) => group.position,
            Self::Foundation(group) => group.position,
            Self::States(group) => group.position,
            Self::Views(group) => group.position,
            Self::Evaluates(group) => group.position,
            Self::Axiom(group) => group.position,
            Self::Theorem(group) => group.position,
            Self::Conjecture(group) => group.position,
            Self::Resource(group) => group.position,
            Self::Topic(group) => group.position,
            Self::Note(group) => group.position,
            Self::Specify(group) => group.position,
            Self::TextBlock(block) => block.position,
        }
    }

    pub fn position_mut(&mut self) -> &mut Position {
        match self {
            Self::Defines(group) => &mut group.position,
            Self::Foundation(group) => &mut group.position,
            Self::States(group) => &mut group.position,
            Self::Views(group) => &mut group.position,
            Self::Evaluates(group) => &mut group.position,
            Self::Axiom(group) => &mut group.position,
            Self::Theorem(group) => &mut group.position,
            Self::Conjecture(group) => &mut group.position,
            Self::Resource(group) => &mut group.position,
            Self::Topic(group) => &mut group.position,
            Self::Note(group) => &mut group.position,
            Self::Specify(group) => &mut group.position,
            Self::TextBlock(block) => &mut block.position,
        }
    }
}

/// Canonical signature of a group, taken from its id.
///
/// `None` for groups without an id or whose id is not a single command.
pub fn signature_of_group(group: &TopLevelGroup) -> Option<SmolStr> {
    group.id().and_then(|id| id.signature.clone())
}

// =============================================================================
// Definitions
// =============================================================================

/// The definition of a `Defines` or `Foundation` group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinesBody {
    Means(Vec<Clause>),
    Computes(Vec<Statement>),
}

impl Default for DefinesBody {
    fn default() -> Self {
        DefinesBody::Means(Vec::new())
    }
}

impl DefinesBody {
    /// The first statement of a `means` section
    pub fn first_means_statement(&self) -> Option<&Statement> {
        match self {
            DefinesBody::Means(clauses) => clauses.iter().find_map(|clause| match clause {
                Clause::Statement(statement) => Some(statement),
                _ => None,
            }),
            DefinesBody::Computes(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefinesGroup {
    pub id: IdStatement,
    pub target: Target,
    pub given: Option<Vec<Target>>,
    pub when: Option<Vec<Clause>>,
    pub body: DefinesBody,
    pub providing: Option<Vec<ProvidingItem>>,
    pub using: Option<Vec<Statement>>,
    pub written: Option<Vec<Text>>,
    pub called: Option<Vec<Text>>,
    pub metadata: Option<MetadataSection>,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoundationGroup {
    pub id: IdStatement,
    pub target: Target,
    pub body: DefinesBody,
    pub metadata: Option<MetadataSection>,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatesGroup {
    pub id: IdStatement,
    pub given: Option<Vec<Target>>,
    pub cases: Vec<Case<Vec<Clause>>>,
    pub else_: Option<Vec<Clause>>,
    pub using: Option<Vec<Statement>>,
    pub written: Option<Vec<Text>>,
    pub metadata: Option<MetadataSection>,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewsGroup {
    pub id: IdStatement,
    pub from: Statement,
    pub cases: Vec<Case<Statement>>,
    pub else_: Option<Statement>,
    pub using: Option<Vec<Statement>>,
    pub written: Option<Vec<Text>>,
    pub metadata: Option<MetadataSection>,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluatesGroup {
    pub id: IdStatement,
    pub cases: Vec<Case<Vec<Statement>>>,
    pub else_: Option<Vec<Statement>>,
    pub using: Option<Vec<Statement>>,
    pub written: Option<Vec<Text>>,
    pub metadata: Option<MetadataSection>,
    pub position: Position,
}

// =============================================================================
// Results
// =============================================================================

/// Sections shared by axioms, theorems and conjectures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultBody {
    pub id: Option<IdStatement>,
    /// String arguments of the header section
    pub names: Vec<Text>,
    pub given: Option<Vec<Target>>,
    pub where_: Option<Vec<Clause>>,
    pub then: Vec<Clause>,
    pub iff: Option<Vec<Clause>>,
    pub using: Option<Vec<Statement>>,
    pub metadata: Option<MetadataSection>,
    pub position: Position,
}

/// An axiom; fields are those of [`ResultBody`]
pub type AxiomGroup = ResultBody;

/// A conjecture; fields are those of [`ResultBody`]
pub type ConjectureGroup = ResultBody;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TheoremGroup {
    pub id: Option<IdStatement>,
    pub names: Vec<Text>,
    pub given: Option<Vec<Target>>,
    pub where_: Option<Vec<Clause>>,
    pub then: Vec<Clause>,
    pub iff: Option<Vec<Clause>>,
    pub using: Option<Vec<Statement>>,
    pub proof: Option<Vec<Text>>,
    pub metadata: Option<MetadataSection>,
    pub position: Position,
}

// =============================================================================
// Providing and metadata
// =============================================================================

/// An item of a `providing` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvidingItem {
    View(ViewItem),
    Symbols(SymbolsItem),
}

/// `view:`, `as`, `via?`, `by?`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewItem {
    pub as_: Statement,
    pub via: Option<Statement>,
    pub by: Option<Statement>,
    pub position: Position,
}

/// `symbols: targets`, `where`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolsItem {
    pub targets: Vec<Target>,
    pub where_: Vec<Statement>,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataSection {
    pub items: Vec<MetadataItem>,
    pub position: Position,
}

/// Single-section items allowed under `Metadata:`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MetadataItemKind {
    #[default]
    Id,
    Tags,
    Related,
    Reference,
}

impl MetadataItemKind {
    pub const ALL: [MetadataItemKind; 4] = [Self::Id, Self::Tags, Self::Related, Self::Reference];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Tags => "tags",
            Self::Related => "related",
            Self::Reference => "reference",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataItem {
    pub kind: MetadataItemKind,
    pub values: Vec<Text>,
    pub position: Position,
}

// =============================================================================
// Resources, topics, notes, specify
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceGroup {
    /// `@key`
    pub id: IdStatement,
    pub items: Vec<ResourceItem>,
    pub position: Position,
}

/// Single-section items allowed under `Resource:`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ResourceItemKind {
    #[default]
    Type,
    Name,
    Author,
    Homepage,
    Url,
    Offset,
    Edition,
    Editor,
    Institution,
    Journal,
    Publisher,
    Volume,
    Month,
    Year,
    Description,
}

impl ResourceItemKind {
    pub const ALL: [ResourceItemKind; 15] = [
        Self::Type,
        Self::Name,
        Self::Author,
        Self::Homepage,
        Self::Url,
        Self::Offset,
        Self::Edition,
        Self::Editor,
        Self::Institution,
        Self::Journal,
        Self::Publisher,
        Self::Volume,
        Self::Month,
        Self::Year,
        Self::Description,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Name => "name",
            Self::Author => "author",
            Self::Homepage => "homepage",
            Self::Url => "url",
            Self::Offset => "offset",
            Self::Edition => "edition",
            Self::Editor => "editor",
            Self::Institution => "institution",
            Self::Journal => "journal",
            Self::Publisher => "publisher",
            Self::Volume => "volume",
            Self::Month => "month",
            Self::Year => "year",
            Self::Description => "description",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceItem {
    pub kind: ResourceItemKind,
    pub values: Vec<Text>,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicGroup {
    pub id: IdStatement,
    pub names: Vec<Text>,
    pub content: Text,
    pub metadata: Option<MetadataSection>,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteGroup {
    pub content: Text,
    pub metadata: Option<MetadataSection>,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecifyGroup {
    pub items: Vec<SpecifyItem>,
    pub position: Position,
}

/// Which kind of number literal a specify item describes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SpecifyKind {
    #[default]
    Zero,
    PositiveInt,
    NegativeInt,
    PositiveFloat,
    NegativeFloat,
}

impl SpecifyKind {
    pub const ALL: [SpecifyKind; 5] = [
        Self::Zero,
        Self::PositiveInt,
        Self::NegativeInt,
        Self::PositiveFloat,
        Self::NegativeFloat,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Zero => "zero",
            Self::PositiveInt => "positiveInt",
            Self::NegativeInt => "negativeInt",
            Self::PositiveFloat => "positiveFloat",
            Self::NegativeFloat => "negativeFloat",
        }
    }
}

/// `zero:` (or another kind) followed by `is: 'statement'`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecifyItem {
    pub kind: SpecifyKind,
    pub is: Statement,
    pub position: Position,
}

/// A top-level `::...::` block kept verbatim
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBlock {
    /// Text between the `::` delimiters
    pub text: SmolStr,
    pub position: Position,
}
