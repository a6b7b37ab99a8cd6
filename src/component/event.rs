use chrono::{DateTime, NaiveDate, Utc};

use super::Component;
use crate::generator::escape_text;
use crate::parser::ContentLine;

const DATE_FORMAT: &str = "%Y%m%d";
pub(crate) const DATETIME_UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// An all-day `VEVENT`. The end date is exclusive and always the day after
/// the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    uid: String,
    dtstamp: DateTime<Utc>,
    summary: String,
    dtstart: NaiveDate,
    dtend: NaiveDate,
    description: Option<String>,
}

impl CalendarEvent {
    /// Returns `None` if `dtstart` is the last date chrono can represent.
    pub fn all_day(
        uid: String,
        dtstamp: DateTime<Utc>,
        summary: String,
        dtstart: NaiveDate,
        description: Option<String>,
    ) -> Option<Self> {
        Some(Self {
            uid,
            dtstamp,
            summary,
            dtstart,
            dtend: dtstart.succ_opt()?,
            description,
        })
    }

    pub fn get_uid(&self) -> &str {
        &self.uid
    }

    pub fn get_dtstamp(&self) -> DateTime<Utc> {
        self.dtstamp
    }

    pub fn get_summary(&self) -> &str {
        &self.summary
    }

    pub fn get_dtstart(&self) -> NaiveDate {
        self.dtstart
    }

    pub fn get_dtend(&self) -> NaiveDate {
        self.dtend
    }

    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Component for CalendarEvent {
    const NAME: &'static str = "VEVENT";

    fn get_properties(&self) -> Vec<ContentLine> {
        let mut properties = vec![
            ContentLine::new("UID", escape_text(&self.uid)),
            ContentLine::new("DTSTAMP", self.dtstamp.format(DATETIME_UTC_FORMAT).to_string()),
            ContentLine::new("SUMMARY", escape_text(&self.summary)),
            ContentLine::new("DTSTART", self.dtstart.format(DATE_FORMAT).to_string())
                .with_param("VALUE", "DATE"),
            ContentLine::new("DTEND", self.dtend.format(DATE_FORMAT).to_string())
                .with_param("VALUE", "DATE"),
        ];
        if let Some(description) = &self.description {
            properties.push(ContentLine::new("DESCRIPTION", escape_text(description)));
        }
        properties
    }
}
