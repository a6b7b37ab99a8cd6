use crate::component::{CalendarEvent, Component, TaskCalendar};
use crate::generator::{CRLF, Emitter};

macro_rules! generate_emitter {
    ($struct:ty, $($sub:ident),*) => {
        impl Emitter for $struct {
            fn generate(&self) -> String {
                let compname = self.get_comp_name();
                let mut text = format!("BEGIN:{compname}{CRLF}");
                text += &self.get_properties().generate();
                $(text += &self.$sub.generate();)*
                text + "END:" + compname + CRLF
            }
        }
    };
}

generate_emitter!(CalendarEvent,);
generate_emitter!(TaskCalendar, events);
