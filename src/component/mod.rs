//! The calendar objects we produce.
//!
//! Both components are immutable once built. Their properties are exposed as
//! [`ContentLine`]s in emission order, sub-components are emitted after them by
//! the [`crate::generator::Emitter`] implementations.

mod calendar;
pub use calendar::{DEFAULT_PRODUCT_ID, TaskCalendar};
mod event;
pub use event::CalendarEvent;

use crate::parser::ContentLine;

pub trait Component {
    const NAME: &'static str;

    fn get_comp_name(&self) -> &'static str {
        Self::NAME
    }

    /// Properties in the order they are emitted, values already escaped.
    fn get_properties(&self) -> Vec<ContentLine>;

    fn get_property(&self, name: &str) -> Option<ContentLine> {
        self.get_properties().into_iter().find(|p| p.name == name)
    }
}
