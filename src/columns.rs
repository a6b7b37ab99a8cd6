//! Map arbitrary CSV headers onto the task fields we understand.
//!
//! Headers are compared in a normalised form (lowercase ASCII letters and
//! digits only), so `"Due date"`, `"due_date"` and `"DUE-DATE"` all end up as
//! `duedate`. Each [`SemanticField`] carries a static set of accepted spellings.

use derive_more::Display;
use itertools::Itertools;
use phf::{Set, phf_set};
use std::fmt;

use crate::ConvertError;

/// Normalised header of the column used when the due date column is empty.
pub const START_DATE_HEADER: &str = "startdate";

static TASK_SYNONYMS: Set<&'static str> = phf_set! {"task", "title", "name", "subject", "gorev"};
static PHASE_SYNONYMS: Set<&'static str> =
    phf_set! {"phase", "sprint", "bolum", "kategori", "group"};
static STATUS_SYNONYMS: Set<&'static str> = phf_set! {"status", "durum", "state"};
static ASSIGNEE_SYNONYMS: Set<&'static str> = phf_set! {"assignee", "owner", "sorumlu", "kim"};
static DUE_DATE_SYNONYMS: Set<&'static str> =
    phf_set! {"duedate", "date", "deadline", "tarih", "startdate", "enddate"};
static PRIORITY_SYNONYMS: Set<&'static str> =
    phf_set! {"priority", "oncelik", "importance", "prio"};

/// Lowercase `header` and drop everything outside `[a-z0-9]`.
pub fn normalize_header(header: &str) -> String {
    header
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum SemanticField {
    #[display("task")]
    Task,
    #[display("phase")]
    Phase,
    #[display("status")]
    Status,
    #[display("assignee")]
    Assignee,
    #[display("due_date")]
    DueDate,
    #[display("priority")]
    Priority,
}

impl SemanticField {
    pub const ALL: [Self; 6] = [
        Self::Task,
        Self::Phase,
        Self::Status,
        Self::Assignee,
        Self::DueDate,
        Self::Priority,
    ];

    /// Fields of which at least one has to be present in the header.
    /// Priority alone is not enough to make sense of a spreadsheet.
    pub const PRIMARY: [Self; 5] = [
        Self::Task,
        Self::Phase,
        Self::Status,
        Self::Assignee,
        Self::DueDate,
    ];

    /// Normalised header spellings accepted for this field.
    pub fn synonyms(self) -> &'static Set<&'static str> {
        match self {
            Self::Task => &TASK_SYNONYMS,
            Self::Phase => &PHASE_SYNONYMS,
            Self::Status => &STATUS_SYNONYMS,
            Self::Assignee => &ASSIGNEE_SYNONYMS,
            Self::DueDate => &DUE_DATE_SYNONYMS,
            Self::Priority => &PRIORITY_SYNONYMS,
        }
    }

    pub fn matches(self, normalized_header: &str) -> bool {
        self.synonyms().contains(normalized_header)
    }

    #[inline]
    const fn slot(self) -> usize {
        self as usize
    }
}

/// Column index per [`SemanticField`], resolved once from the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    columns: [Option<usize>; SemanticField::ALL.len()],
    start_date: Option<usize>,
}

impl ColumnMapping {
    /// Resolve every field to the left-most header matching one of its synonyms.
    ///
    /// Fails with [`ConvertError::UnmappedColumns`] if none of the
    /// [`SemanticField::PRIMARY`] fields could be found.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, ConvertError> {
        let normalized = headers
            .iter()
            .map(|header| normalize_header(header.as_ref()))
            .collect_vec();

        let mut mapping = Self {
            start_date: normalized.iter().position(|h| h == START_DATE_HEADER),
            ..Default::default()
        };
        for field in SemanticField::ALL {
            mapping.columns[field.slot()] = normalized.iter().position(|h| field.matches(h));
        }

        if SemanticField::PRIMARY
            .iter()
            .all(|field| mapping.get(*field).is_none())
        {
            return Err(ConvertError::UnmappedColumns {
                headers: headers.iter().map(|h| h.as_ref().to_owned()).collect(),
            });
        }
        Ok(mapping)
    }

    #[inline]
    pub fn get(&self, field: SemanticField) -> Option<usize> {
        self.columns[field.slot()]
    }

    /// Index of the first column literally named "Start Date" (in any spelling).
    #[inline]
    pub fn start_date(&self) -> Option<usize> {
        self.start_date
    }

    /// Trimmed value of `field` in `row`, empty if unmapped or out of range.
    pub fn value<'r>(&self, field: SemanticField, row: &'r [String]) -> &'r str {
        cell(row, self.get(field))
    }

    pub fn start_date_value<'r>(&self, row: &'r [String]) -> &'r str {
        cell(row, self.start_date)
    }
}

fn cell(row: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|index| row.get(index))
        .map_or("", |value| value.trim())
}

impl fmt::Display for ColumnMapping {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let fields = SemanticField::ALL.iter().map(|field| match self.get(*field) {
            Some(index) => format!("{field}={index}"),
            None => format!("{field}=-"),
        });
        write!(f, "{}", fields.format(", "))
    }
}
