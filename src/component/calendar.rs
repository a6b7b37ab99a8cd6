use super::{CalendarEvent, Component};
use crate::generator::escape_text;
use crate::parser::ContentLine;

pub const DEFAULT_PRODUCT_ID: &str = "-//USdTG//Calendar//EN";

/// A `VCALENDAR` holding the converted events in row order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCalendar {
    pub product_id: String,
    pub events: Vec<CalendarEvent>,
}

impl Default for TaskCalendar {
    fn default() -> Self {
        Self {
            product_id: DEFAULT_PRODUCT_ID.to_owned(),
            events: vec![],
        }
    }
}

impl TaskCalendar {
    pub fn new(product_id: impl Into<String>, events: Vec<CalendarEvent>) -> Self {
        Self {
            product_id: product_id.into(),
            events,
        }
    }
}

impl Component for TaskCalendar {
    const NAME: &'static str = "VCALENDAR";

    fn get_properties(&self) -> Vec<ContentLine> {
        vec![
            ContentLine::new("VERSION", "2.0"),
            ContentLine::new("PRODID", escape_text(&self.product_id)),
            ContentLine::new("CALSCALE", "GREGORIAN"),
            ContentLine::new("METHOD", "PUBLISH"),
        ]
    }
}
