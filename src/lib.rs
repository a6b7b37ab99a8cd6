//! Convert loosely structured task spreadsheets into RFC 5545 calendars.
//!
//! A CSV export with arbitrary header names is mapped onto a fixed set of
//! task fields, every row with a usable due date becomes an all-day `VEVENT`
//! and the result is serialised as a single `VCALENDAR`.
//!
//! ```rust
//! use taskcal::{Converter, generator::Emitter};
//!
//! let csv = "Task,Phase,Due date\nWrite spec,Design,2025-09-05\n";
//! let report = Converter::default().convert_slice(csv.as_bytes()).unwrap();
//! assert_eq!(report.events().len(), 1);
//! assert!(report.calendar.generate().contains("DTSTART;VALUE=DATE:20250905\r\n"));
//! ```

const PARAM_VALUE_DELIMITER: char = ',';
const VALUE_DELIMITER: char = ':';
const PARAM_DELIMITER: char = ';';
const PARAM_NAME_DELIMITER: char = '=';
const PARAM_QUOTE: char = '"';

mod error;
pub use error::ConvertError;

pub mod columns;
pub use columns::{ColumnMapping, SemanticField, normalize_header};

pub mod reader;
pub use reader::{Dialect, RawRow, RawTable, read_rows};

pub mod types;
pub use types::{DateParseError, parse_date};

pub mod builder;
pub use builder::{RowOutcome, RunContext, SkipReason, TaskRecord, build_row};

pub mod component;
pub use component::{CalendarEvent, TaskCalendar};

pub mod parser;
pub use parser::{ContentLine, ContentLineError, LineError, LineReader};

pub mod generator;

pub mod convert;
pub use convert::{ConversionReport, Converter, ConverterOptions};
