//! Normalized view of an AIF/AIFM input sheet.
//!
//! Every missing or empty cell reads as the empty string; the empty string
//! means "not provided" everywhere in rule evaluation.

use serde::{Deserialize, Serialize};

/// Number of positional input columns (`Input_1` .. `Input_12`).
pub const INPUT_SLOTS: usize = 12;

/// Addresses one column of a [`FieldRow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    /// The `Id` column.
    Id,
    /// The `XMLDescription` column.
    Description,
    /// `Input_n`, 1-based.
    Input(u8),
}

/// How the `Id` cell of a row was written in the sheet.
///
/// Section rows carry text labels (`"4"`, `"1st"`), group member rows carry
/// plain numbers. Keeping them apart stops numeric member ids from colliding
/// with section row ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IdKind {
    #[default]
    Label,
    Number,
}

/// One logical input row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRow {
    /// Tag name with angle brackets stripped.
    pub tag: String,
    pub id: String,
    pub id_kind: IdKind,
    pub description: String,
    /// Always exactly [`INPUT_SLOTS`] entries.
    pub inputs: Vec<String>,
}

impl FieldRow {
    pub fn new(tag: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: id.into(),
            id_kind: IdKind::Label,
            description: String::new(),
            inputs: vec![String::new(); INPUT_SLOTS],
        }
    }

    pub fn with_id_kind(mut self, kind: IdKind) -> Self {
        self.id_kind = kind;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets `Input_n` (1-based). Out-of-range slots are ignored.
    pub fn with_input(mut self, slot: u8, value: impl Into<String>) -> Self {
        if let Some(cell) = input_index(slot).and_then(|idx| self.inputs.get_mut(idx)) {
            *cell = value.into();
        }
        self
    }

    /// Value of a slot, or `""` when the slot is missing.
    pub fn value(&self, slot: Slot) -> &str {
        match slot {
            Slot::Id => &self.id,
            Slot::Description => &self.description,
            Slot::Input(n) => input_index(n)
                .and_then(|idx| self.inputs.get(idx))
                .map_or("", String::as_str),
        }
    }

    /// Numeric value of a labelled id, used for row-range lookups.
    pub fn label_number(&self) -> Option<u32> {
        if self.id_kind != IdKind::Label {
            return None;
        }
        self.id.trim().parse().ok()
    }

    fn number(&self) -> Option<u32> {
        if self.id_kind != IdKind::Number {
            return None;
        }
        self.id.trim().parse().ok()
    }
}

fn input_index(slot: u8) -> Option<usize> {
    let idx = usize::from(slot).checked_sub(1)?;
    (idx < INPUT_SLOTS).then_some(idx)
}

/// Ordered rows of one input file. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTable {
    rows: Vec<FieldRow>,
}

impl FieldTable {
    pub fn new(rows: Vec<FieldRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[FieldRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose labelled id falls in `first..=last`, in sheet order.
    pub fn labelled(&self, first: u32, last: u32) -> impl Iterator<Item = &FieldRow> {
        self.rows.iter().filter(move |row| {
            row.label_number()
                .is_some_and(|n| (first..=last).contains(&n))
        })
    }

    /// Row tagged `tag` within the labelled range; the last match wins.
    pub fn tagged(&self, first: u32, last: u32, tag: &str) -> Option<&FieldRow> {
        self.labelled(first, last).filter(|row| row.tag == tag).last()
    }

    /// First row whose id equals `id` exactly.
    pub fn by_id(&self, id: &str) -> Option<&FieldRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Rows tagged `tag`, in sheet order.
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a FieldRow> + 'a {
        self.rows.iter().filter(move |row| row.tag == tag)
    }

    /// Rows with a numeric id in `first..=last`, in sheet order.
    pub fn numbered(&self, first: u32, last: u32) -> impl Iterator<Item = &FieldRow> {
        self.rows
            .iter()
            .filter(move |row| row.number().is_some_and(|n| (first..=last).contains(&n)))
    }
}

impl FromIterator<FieldRow> for FieldTable {
    fn from_iter<I: IntoIterator<Item = FieldRow>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
