//! Declarative rule grammar shared by every report registry.
//!
//! A registry is data: sections of field, sweep, group and check items that
//! the builder walks in declared order. Nothing here evaluates anything.

use std::ops::Range;

use crate::field_table::Slot;
use crate::report::ReportType;

/// Identifies one row of the field table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKey {
    /// Row tagged `tag` among labelled ids `first..=last` (last match wins).
    Tagged {
        first: u32,
        last: u32,
        tag: &'static str,
    },
    /// Row whose id is exactly this label.
    Id(&'static str),
}

/// Where a rule reads its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Field { row: RowKey, slot: Slot },
    /// A slot of the group member currently being built.
    Member(Slot),
    /// The rank of the group member currently being built.
    Rank,
}

impl Source {
    /// `Input_1` of the row tagged `tag` in `first..=last`.
    pub const fn tagged(first: u32, last: u32, tag: &'static str) -> Self {
        Source::Field {
            row: RowKey::Tagged { first, last, tag },
            slot: Slot::Input(1),
        }
    }

    /// `Input_1` of the row with this exact id.
    pub const fn id(id: &'static str) -> Self {
        Source::Field {
            row: RowKey::Id(id),
            slot: Slot::Input(1),
        }
    }

    pub const fn member(slot: Slot) -> Self {
        Source::Member(slot)
    }

    pub const fn input(n: u8) -> Self {
        Source::Member(Slot::Input(n))
    }

    pub const fn description() -> Self {
        Source::Member(Slot::Description)
    }
}

/// Condition gating a rule. Values are compared after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Always,
    Present(Source),
    Empty(Source),
    Equals(Source, &'static str),
    EqualsIgnoreCase(Source, &'static str),
    Not(Box<Predicate>),
    /// At least one labelled row in `first..=last` exists, whatever its value.
    RowsExist { first: u32, last: u32 },
    All(Vec<Predicate>),
    Any(Vec<Predicate>),
}

impl Predicate {
    pub fn present(source: Source) -> Self {
        Predicate::Present(source)
    }

    pub fn empty(source: Source) -> Self {
        Predicate::Empty(source)
    }

    pub fn equals(source: Source, value: &'static str) -> Self {
        Predicate::Equals(source, value)
    }

    pub fn equals_ignore_case(source: Source, value: &'static str) -> Self {
        Predicate::EqualsIgnoreCase(source, value)
    }

    pub fn rows_exist(first: u32, last: u32) -> Self {
        Predicate::RowsExist { first, last }
    }

    pub fn negate(self) -> Self {
        Predicate::Not(Box::new(self))
    }
}

/// What happens when a rule's value is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    /// Empty fails with `MissingRequiredField`.
    Required,
    /// Empty skips the element.
    #[default]
    Optional,
    /// The element is emitted even when empty.
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transform {
    #[default]
    Verbatim,
    Upper,
    Lower,
    /// Keeps only the `YYYY-MM-DD` part of a date or date-time.
    DateOnly,
    /// Drops the value; the element is written empty.
    Blank,
}

/// Value-kind constraint checked on non-empty values before emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Whole, non-negative number written with digits only.
    UnsignedInteger,
    /// Maximum length in characters.
    MaxLength(usize),
    OneOf(&'static [&'static str]),
}

/// Emits one element from one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    pub element: &'static str,
    /// Containers between the enclosing node and the element.
    pub path: Vec<&'static str>,
    pub source: Source,
    pub when: Predicate,
    pub presence: Presence,
    pub transform: Transform,
    pub constraints: Vec<Constraint>,
}

impl FieldRule {
    pub fn new(element: &'static str, source: Source) -> Self {
        Self {
            element,
            path: Vec::new(),
            source,
            when: Predicate::Always,
            presence: Presence::Optional,
            transform: Transform::Verbatim,
            constraints: Vec::new(),
        }
    }

    /// Element named after the row tag it reads.
    pub fn tagged(first: u32, last: u32, tag: &'static str) -> Self {
        Self::new(tag, Source::tagged(first, last, tag))
    }

    pub fn member(element: &'static str, slot: Slot) -> Self {
        Self::new(element, Source::Member(slot))
    }

    /// `Ranking` element carrying the member rank.
    pub fn rank() -> Self {
        Self::new("Ranking", Source::Rank).always()
    }

    pub fn at(mut self, path: &[&'static str]) -> Self {
        self.path = path.to_vec();
        self
    }

    pub fn when(mut self, predicate: Predicate) -> Self {
        self.when = predicate;
        self
    }

    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    pub fn always(mut self) -> Self {
        self.presence = Presence::Always;
        self
    }

    pub fn upper(mut self) -> Self {
        self.transform = Transform::Upper;
        self
    }

    pub fn lower(mut self) -> Self {
        self.transform = Transform::Lower;
        self
    }

    pub fn date_only(mut self) -> Self {
        self.transform = Transform::DateOnly;
        self
    }

    pub fn blank(mut self) -> Self {
        self.transform = Transform::Blank;
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// Turns every labelled row in `first..=last` into an element named by its
/// tag. Rows sharing a tag collapse into one element at the position of the
/// first, carrying the value of the last.
///
/// With `wrap`, every entry gets a fresh wrapper element under `path`, and the
/// wrapper is written even when its entry is skipped as empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sweep {
    pub first: u32,
    pub last: u32,
    pub path: Vec<&'static str>,
    pub wrap: Option<&'static str>,
    pub when: Predicate,
    pub presence: Presence,
    pub transforms: Vec<(&'static str, Transform)>,
    pub skip_tags: Vec<&'static str>,
}

impl Sweep {
    pub fn rows(first: u32, last: u32) -> Self {
        Self {
            first,
            last,
            path: Vec::new(),
            wrap: None,
            when: Predicate::Always,
            presence: Presence::Optional,
            transforms: Vec::new(),
            skip_tags: Vec::new(),
        }
    }

    pub fn at(mut self, path: &[&'static str]) -> Self {
        self.path = path.to_vec();
        self
    }

    pub fn each_in(mut self, wrapper: &'static str) -> Self {
        self.wrap = Some(wrapper);
        self
    }

    pub fn when(mut self, predicate: Predicate) -> Self {
        self.when = predicate;
        self
    }

    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    pub fn always(mut self) -> Self {
        self.presence = Presence::Always;
        self
    }

    pub fn transform(mut self, tag: &'static str, transform: Transform) -> Self {
        self.transforms.push((tag, transform));
        self
    }

    pub fn skip(mut self, tag: &'static str) -> Self {
        self.skip_tags.push(tag);
        self
    }

    pub fn transform_for(&self, tag: &str) -> Transform {
        self.transforms
            .iter()
            .find(|(t, _)| *t == tag)
            .map_or(Transform::Verbatim, |(_, transform)| *transform)
    }
}

/// How the members of a repeating group are found and ranked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberSelector {
    /// Rows tagged `{prefix}{first}` .. `{prefix}{last}`; rank from the id column.
    Tags {
        prefix: &'static str,
        first: u32,
        last: u32,
    },
    /// Rows with these labelled ids, each with a declared rank.
    Ids(Vec<(&'static str, u32)>),
    /// Rows with numeric ids in `first..=last`; the id is the rank.
    NumericIds { first: u32, last: u32 },
}

/// Repeating group: one fresh `element` per member under `path`, in rank order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRule {
    pub members: MemberSelector,
    pub path: Vec<&'static str>,
    pub element: &'static str,
    pub items: Vec<Item>,
}

impl GroupRule {
    pub fn new(members: MemberSelector, path: &[&'static str], element: &'static str) -> Self {
        Self {
            members,
            path: path.to_vec(),
            element,
            items: Vec::new(),
        }
    }

    pub fn item(mut self, item: impl Into<Item>) -> Self {
        self.items.push(item.into());
        self
    }
}

/// A rule that emits nothing and may fail the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    /// When `when` holds, every listed field must be non-empty.
    RequireAll {
        when: Predicate,
        fields: Vec<(&'static str, Source)>,
    },
    /// Either both fields are filled or neither is.
    PairedPresence {
        first: (&'static str, Source),
        second: (&'static str, Source),
    },
    /// Applies a constraint to a non-empty value without emitting it.
    Constrain {
        element: &'static str,
        source: Source,
        constraint: Constraint,
    },
    /// Fails with `UnsupportedReportSubtype` when `when` holds.
    Unsupported {
        when: Predicate,
        element: &'static str,
        source: Source,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Field(FieldRule),
    Sweep(Sweep),
    Group(GroupRule),
    Check(Check),
}

impl Item {
    pub fn kind(&self) -> &'static str {
        match self {
            Item::Field(_) => "field",
            Item::Sweep(_) => "sweep",
            Item::Group(_) => "group",
            Item::Check(_) => "check",
        }
    }
}

impl From<FieldRule> for Item {
    fn from(rule: FieldRule) -> Self {
        Item::Field(rule)
    }
}

impl From<Sweep> for Item {
    fn from(sweep: Sweep) -> Self {
        Item::Sweep(sweep)
    }
}

impl From<GroupRule> for Item {
    fn from(group: GroupRule) -> Self {
        Item::Group(group)
    }
}

impl From<Check> for Item {
    fn from(check: Check) -> Self {
        Item::Check(check)
    }
}

/// One named output fragment. `parent` is relative to the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRule {
    pub name: &'static str,
    pub parent: Vec<&'static str>,
    pub items: Vec<Item>,
}

impl SectionRule {
    pub fn new(name: &'static str, parent: &[&'static str]) -> Self {
        Self {
            name,
            parent: parent.to_vec(),
            items: Vec::new(),
        }
    }

    pub fn item(mut self, item: impl Into<Item>) -> Self {
        self.items.push(item.into());
        self
    }

    /// Number of items of the given kind, counting group contents.
    pub fn count(&self, kind: &str) -> usize {
        fn walk(items: &[Item], kind: &str) -> usize {
            items
                .iter()
                .map(|item| {
                    let own = usize::from(item.kind() == kind);
                    match item {
                        Item::Group(group) => own + walk(&group.items, kind),
                        _ => own,
                    }
                })
                .sum()
        }
        walk(&self.items, kind)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `%Y-%m-%dT%H:%M:%S.0Z`
    FractionalZulu,
    /// `%Y-%m-%dT%H:%M:%S`
    Seconds,
}

impl TimestampFormat {
    pub fn pattern(&self) -> &'static str {
        match self {
            TimestampFormat::FractionalZulu => "%Y-%m-%dT%H:%M:%S.0Z",
            TimestampFormat::Seconds => "%Y-%m-%dT%H:%M:%S",
        }
    }
}

/// Value computed from the build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generated {
    Timestamp(TimestampFormat),
    /// `template` with `{period}` replaced by the previous month as `YYYY-MM`.
    ReportingPeriod { template: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootAttribute {
    Fixed {
        name: &'static str,
        value: &'static str,
    },
    Generated {
        name: &'static str,
        value: Generated,
    },
    /// The first `count` labelled rows in `first..=last`: attribute name is
    /// the row tag, value is `Input_1`.
    HeaderRows { first: u32, last: u32, count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootRule {
    pub element: &'static str,
    pub attributes: Vec<RootAttribute>,
    /// Generated elements placed before any section output.
    pub leading: Vec<(&'static str, Generated)>,
}

/// Slice over the named columns of a sheet. Negative bounds count from the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSlice {
    pub start: isize,
    pub end: Option<isize>,
}

impl ColumnSlice {
    /// `[start:end]`
    pub const fn range(start: isize, end: isize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// `[start:]`
    pub const fn from(start: isize) -> Self {
        Self { start, end: None }
    }

    /// Index range for a list of `len` items, clamped to the list.
    pub fn resolve(&self, len: usize) -> Range<usize> {
        let len = isize::try_from(len).unwrap_or(isize::MAX);
        let clamp = |idx: isize| -> usize {
            let idx = if idx < 0 { idx + len } else { idx };
            usize::try_from(idx.clamp(0, len)).unwrap_or(0)
        };
        let start = clamp(self.start);
        let end = self.end.map_or(clamp(len), clamp);
        start..end.max(start)
    }
}

/// Positional columns the regulator blocks; removed after the column checks
/// have resolved their names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockedColumns {
    Last,
    Indexes(&'static [usize]),
}

impl BlockedColumns {
    pub fn contains(&self, index: usize, len: usize) -> bool {
        match self {
            BlockedColumns::Last => len > 0 && index == len - 1,
            BlockedColumns::Indexes(indexes) => indexes.contains(&index),
        }
    }
}

/// Cell checks for one subform, by column-name membership in the slices.
/// Integer slices take precedence over text slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnChecks {
    pub integer: &'static [ColumnSlice],
    /// Only consulted for columns in `integer`.
    pub non_negative: &'static [ColumnSlice],
    pub text: &'static [ColumnSlice],
    /// A text column named `Land` must hold a two-letter code.
    pub country_code: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRules {
    pub skip_sheets: Vec<&'static str>,
    /// Sheet name to the element wrapping each data row.
    pub control_tags: Vec<(&'static str, &'static str)>,
    /// Sheets whose first column keeps its cell values instead of the row label.
    pub keep_key_cells: Vec<&'static str>,
    pub blocked: Vec<(&'static [&'static str], BlockedColumns)>,
    pub checks: Vec<(&'static [&'static str], ColumnChecks)>,
}

impl FormRules {
    pub fn skips(&self, sheet: &str) -> bool {
        self.skip_sheets.contains(&sheet)
    }

    pub fn control_tag(&self, sheet: &str) -> Option<&'static str> {
        self.control_tags
            .iter()
            .find(|(name, _)| *name == sheet)
            .map(|(_, tag)| *tag)
    }

    pub fn keeps_key_cells(&self, sheet: &str) -> bool {
        self.keep_key_cells.contains(&sheet)
    }

    pub fn blocked_for(&self, sheet: &str) -> Option<BlockedColumns> {
        self.blocked
            .iter()
            .find(|(sheets, _)| sheets.contains(&sheet))
            .map(|(_, blocked)| *blocked)
    }

    pub fn checks_for(&self, sheet: &str) -> Option<&ColumnChecks> {
        self.checks
            .iter()
            .find(|(sheets, _)| sheets.contains(&sheet))
            .map(|(_, checks)| checks)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryBody {
    Sections(Vec<SectionRule>),
    Forms(FormRules),
}

/// Static, versioned rule set for one report type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRegistry {
    pub report: ReportType,
    pub version: &'static str,
    /// Default XSD file name.
    pub schema: &'static str,
    pub root: RootRule,
    pub body: RegistryBody,
}

impl RuleRegistry {
    pub fn sections(&self) -> &[SectionRule] {
        match &self.body {
            RegistryBody::Sections(sections) => sections,
            RegistryBody::Forms(_) => &[],
        }
    }

    pub fn forms(&self) -> Option<&FormRules> {
        match &self.body {
            RegistryBody::Forms(forms) => Some(forms),
            RegistryBody::Sections(_) => None,
        }
    }
}
