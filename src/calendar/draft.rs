use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::category::{self, DEFAULT_CATEGORY};
use super::event::{CalendarEvent, EventId};
use crate::error::FormError;

/// A validated form submission, not yet assigned an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub start: NaiveDateTime,
    pub categoria: String,
    pub local: String,
}

impl EventDraft {
    /// Normalize plain form strings.
    ///
    /// Dates may be `dd/mm/yyyy` or `yyyy-mm-dd`, times `HH:MM` or `HH:MM:SS`.
    /// A blank category or location takes the given defaults.
    pub fn from_form(
        title: &str,
        date: &str,
        time: &str,
        categoria: &str,
        local: &str,
        default_local: &str,
    ) -> Result<Self, FormError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(FormError::EmptyTitle);
        }
        let date = parse_form_date(date)?;
        let time = parse_form_time(time)?;

        let categoria = match categoria.trim() {
            "" => DEFAULT_CATEGORY,
            c => c,
        };
        let local = match local.trim() {
            "" => default_local,
            l => l,
        };

        Ok(Self {
            title: title.to_string(),
            start: date.and_time(time),
            categoria: categoria.to_string(),
            local: local.to_string(),
        })
    }

    /// New manual event, title decorated with its category.
    pub fn into_event(self, id: u64) -> CalendarEvent {
        CalendarEvent {
            id: EventId::Manual(id),
            title: format!("[{}] {}", self.categoria, self.title),
            start: self.start,
            end: self.start,
            color: category::color_for(&self.categoria).to_string(),
            categoria: self.categoria,
            local: self.local,
        }
    }

    /// Apply an edit to an existing manual event. The title is taken as typed.
    pub fn apply_to(self, event: &mut CalendarEvent) {
        event.title = self.title;
        event.start = self.start;
        event.end = self.start;
        event.color = category::color_for(&self.categoria).to_string();
        event.categoria = self.categoria;
        event.local = self.local;
    }
}

fn parse_form_date(s: &str) -> Result<NaiveDate, FormError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .map_err(|_| FormError::Date(s.to_string()))
}

fn parse_form_time(s: &str) -> Result<NaiveTime, FormError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| FormError::Time(s.to_string()))
}
