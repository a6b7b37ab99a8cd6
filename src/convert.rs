//! The whole CSV to iCalendar pipeline.
//!
//! # Examples
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use taskcal::{Converter, ConverterOptions, RunContext, generator::Emitter};
//!
//! let converter = Converter::new(ConverterOptions::default()).with_run_context(RunContext::new(
//!     Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap(),
//!     "example.com",
//! ));
//! let report = converter
//!     .convert_slice(b"Task;Due date\nWrite spec;05.09.2025\nLater;next Friday\n")
//!     .unwrap();
//!
//! assert_eq!(report.rows, 2);
//! assert_eq!(report.skipped.len(), 1);
//! assert!(report.calendar.generate().contains("UID:1-1756684800@example.com\r\n"));
//! ```

use itertools::{Either, Itertools};
use log::{debug, info};
use std::path::Path;

use crate::builder::{DEFAULT_UID_DOMAIN, RowOutcome, RunContext, SkipReason, build_row};
use crate::columns::ColumnMapping;
use crate::component::{CalendarEvent, DEFAULT_PRODUCT_ID, TaskCalendar};
use crate::generator::Emitter;
use crate::reader::read_rows;
use crate::ConvertError;

pub const DEFAULT_SNIFF_SAMPLE_LEN: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterOptions {
    /// Value of the calendar's `PRODID`.
    pub product_id: String,
    /// Domain part of every generated `UID`.
    pub uid_domain: String,
    /// Number of leading bytes looked at to detect the CSV dialect.
    pub sniff_sample_len: usize,
}

impl Default for ConverterOptions {
    fn default() -> Self {
        Self {
            product_id: DEFAULT_PRODUCT_ID.to_owned(),
            uid_domain: DEFAULT_UID_DOMAIN.to_owned(),
            sniff_sample_len: DEFAULT_SNIFF_SAMPLE_LEN,
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub calendar: TaskCalendar,
    pub mapping: ColumnMapping,
    /// Number of data rows, header excluded.
    pub rows: usize,
    /// Row number (starting at 1) and reason of every row without an event.
    pub skipped: Vec<(usize, SkipReason)>,
}

impl ConversionReport {
    pub fn events(&self) -> &[CalendarEvent] {
        &self.calendar.events
    }

    pub fn to_ics(&self) -> String {
        self.calendar.generate()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConverterOptions,
    context: Option<RunContext>,
}

impl Converter {
    pub fn new(options: ConverterOptions) -> Self {
        Self {
            options,
            context: None,
        }
    }

    /// Use a fixed run start instead of the current time.
    pub fn with_run_context(mut self, context: RunContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn options(&self) -> &ConverterOptions {
        &self.options
    }

    pub fn convert_path(&self, path: impl AsRef<Path>) -> Result<ConversionReport, ConvertError> {
        let input = std::fs::read(path.as_ref())?;
        self.convert_slice(&input)
    }

    /// Convert a CSV document.
    ///
    /// Fails only if the input has no rows at all or none of the primary
    /// columns could be found. Rows without a usable due date are reported in
    /// [`ConversionReport::skipped`].
    pub fn convert_slice(&self, input: &[u8]) -> Result<ConversionReport, ConvertError> {
        let table = read_rows(input, self.options.sniff_sample_len)?;
        let mapping = ColumnMapping::resolve(&table.header)?;
        info!("Column mapping: {mapping}");

        let context = self
            .context
            .clone()
            .unwrap_or_else(|| RunContext::now(self.options.uid_domain.as_str()));

        let (events, skipped): (Vec<_>, Vec<_>) = table
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| (index + 1, build_row(index + 1, row, &mapping, &context)))
            .partition_map(|(ordinal, outcome)| match outcome {
                RowOutcome::Event(event) => Either::Left(event),
                RowOutcome::Skipped(reason) => {
                    debug!("Skipping row {ordinal}: {reason}");
                    Either::Right((ordinal, reason))
                }
            });
        info!(
            "Created {} events, skipped {} rows",
            events.len(),
            skipped.len()
        );

        Ok(ConversionReport {
            calendar: TaskCalendar::new(self.options.product_id.as_str(), events),
            mapping,
            rows: table.rows.len(),
            skipped,
        })
    }
}
