//! Turn one CSV row into a calendar event, or explain why it was skipped.
//!
//! Rows are independent of each other: [`build_row`] only reads the shared
//! [`ColumnMapping`] and [`RunContext`].

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use itertools::Itertools;

use crate::columns::{ColumnMapping, SemanticField};
use crate::component::CalendarEvent;
use crate::types::{DateParseError, parse_date};

pub const UNTITLED_TASK: &str = "(Untitled Task)";
pub const DEFAULT_UID_DOMAIN: &str = "usdtg";

/// Per-run values shared by every row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Start of the run, used for both `DTSTAMP` and `UID`.
    pub started: DateTime<Utc>,
    pub uid_domain: String,
}

impl RunContext {
    pub fn new(started: DateTime<Utc>, uid_domain: impl Into<String>) -> Self {
        Self {
            started: started.trunc_subsecs(0),
            uid_domain: uid_domain.into(),
        }
    }

    pub fn now(uid_domain: impl Into<String>) -> Self {
        Self::new(Utc::now(), uid_domain)
    }

    /// `{ordinal}-{epoch seconds}@{domain}`, unique for every row of a run.
    pub fn uid(&self, ordinal: usize) -> String {
        format!(
            "{ordinal}-{}@{}",
            self.started.timestamp(),
            self.uid_domain
        )
    }
}

/// Why a row did not produce an event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("no due date")]
    MissingDueDate,
    #[error(transparent)]
    InvalidDate(#[from] DateParseError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Event(CalendarEvent),
    Skipped(SkipReason),
}

/// The task fields of one row with a resolved due date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    pub task: String,
    pub phase: String,
    pub status: String,
    pub assignee: String,
    pub priority: String,
    pub due_date: NaiveDate,
}

impl TaskRecord {
    /// Extract the mapped fields of `row`.
    ///
    /// If the due date column is empty, a column called "Start Date" is used
    /// instead, which is how calendar exports label it.
    pub fn from_row(row: &[String], mapping: &ColumnMapping) -> Result<Self, SkipReason> {
        let due_raw = match mapping.value(SemanticField::DueDate, row) {
            "" => mapping.start_date_value(row),
            due => due,
        };
        if due_raw.is_empty() {
            return Err(SkipReason::MissingDueDate);
        }

        let field = |field| mapping.value(field, row).to_owned();
        Ok(Self {
            task: field(SemanticField::Task),
            phase: field(SemanticField::Phase),
            status: field(SemanticField::Status),
            assignee: field(SemanticField::Assignee),
            priority: field(SemanticField::Priority),
            due_date: parse_date(due_raw)?,
        })
    }

    /// Task name followed by the phase in parentheses, if there is one.
    pub fn summary(&self) -> String {
        let title = if self.task.is_empty() {
            UNTITLED_TASK
        } else {
            self.task.as_str()
        };
        if self.phase.is_empty() {
            title.to_owned()
        } else {
            format!("{title} ({})", self.phase)
        }
    }

    /// Assignee, priority and status on separate lines, skipping empty ones.
    pub fn description(&self) -> Option<String> {
        let lines = [
            ("Assignee", &self.assignee),
            ("Priority", &self.priority),
            ("Status", &self.status),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(label, value)| format!("{label}: {value}"))
        .collect_vec();
        (!lines.is_empty()).then(|| lines.join("\n"))
    }

    pub fn into_event(self, ordinal: usize, ctx: &RunContext) -> Result<CalendarEvent, SkipReason> {
        let due_date = self.due_date;
        CalendarEvent::all_day(
            ctx.uid(ordinal),
            ctx.started,
            self.summary(),
            due_date,
            self.description(),
        )
        .ok_or(SkipReason::InvalidDate(DateParseError::OutOfRange(due_date)))
    }
}

/// Build the event for the data row numbered `ordinal` (starting at 1).
pub fn build_row(
    ordinal: usize,
    row: &[String],
    mapping: &ColumnMapping,
    ctx: &RunContext,
) -> RowOutcome {
    match TaskRecord::from_row(row, mapping).and_then(|record| record.into_event(ordinal, ctx)) {
        Ok(event) => RowOutcome::Event(event),
        Err(reason) => RowOutcome::Skipped(reason),
    }
}
