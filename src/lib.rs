//! Parish activity scheduling: liturgical dates computed from Easter, merged
//! with manually entered events into one calendar.

pub mod bingo;
pub mod calendar;
pub mod config;
pub mod error;
pub mod liturgy;
pub mod report;

pub use calendar::{CalendarEvent, EventId, EventRecord};
pub use error::{Error, Result};
