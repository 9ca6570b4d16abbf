use chrono::{Datelike, NaiveDate, NaiveDateTime};

use super::event::CalendarEvent;
use crate::liturgy::{generate_liturgical_events_with, LiturgicalOptions};

/// Manual events followed by the liturgical entries of the reference year and
/// the year after. Nothing is de-duplicated.
pub fn merge(manual: &[CalendarEvent], reference: NaiveDateTime) -> Vec<CalendarEvent> {
    merge_with(manual, reference, &LiturgicalOptions::default())
}

pub fn merge_with(
    manual: &[CalendarEvent],
    reference: NaiveDateTime,
    options: &LiturgicalOptions,
) -> Vec<CalendarEvent> {
    let year = reference.year();
    let mut events = manual.to_vec();
    events.extend(generate_liturgical_events_with(year, options));
    events.extend(generate_liturgical_events_with(year + 1, options));
    events
}

/// The earliest event starting at or after `reference`. Ties go to the first one.
pub fn next_event(events: &[CalendarEvent], reference: NaiveDateTime) -> Option<&CalendarEvent> {
    events
        .iter()
        .filter(|e| e.start >= reference)
        .min_by_key(|e| e.start)
}

/// Events whose start falls in `month` (1..=12) of any year.
pub fn events_in_month(events: &[CalendarEvent], month: u32) -> Vec<&CalendarEvent> {
    events.iter().filter(|e| e.start.month() == month).collect()
}

/// The merged event set for one interaction.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    events: Vec<CalendarEvent>,
}

impl Schedule {
    pub fn build(manual: &[CalendarEvent], reference: NaiveDateTime, options: &LiturgicalOptions) -> Self {
        Self {
            events: merge_with(manual, reference, options),
        }
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn next_event(&self, reference: NaiveDateTime) -> Option<&CalendarEvent> {
        next_event(&self.events, reference)
    }

    pub fn events_for_date(&self, date: NaiveDate) -> Vec<&CalendarEvent> {
        self.sorted(|e| e.start.date() == date)
    }

    pub fn events_for_month(&self, year: i32, month: u32) -> Vec<&CalendarEvent> {
        self.sorted(|e| e.start.year() == year && e.start.month() == month)
    }

    fn sorted(&self, keep: impl Fn(&CalendarEvent) -> bool) -> Vec<&CalendarEvent> {
        let mut events: Vec<&CalendarEvent> = self.events.iter().filter(|e| keep(e)).collect();
        events.sort_by_key(|e| e.start);
        events
    }
}
