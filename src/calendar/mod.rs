pub mod category;
pub mod draft;
pub mod event;
pub mod record;
pub mod schedule;
pub mod store;

pub use draft::EventDraft;
pub use event::{CalendarEvent, EventId, DEFAULT_LOCATION};
pub use record::EventRecord;
pub use schedule::{events_in_month, merge, merge_with, next_event, Schedule};
pub use store::{CsvStore, EventRepository, LoadReport, MemoryStore, SkippedRecord};
