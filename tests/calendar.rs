use chrono::{Datelike, NaiveDate, NaiveDateTime};

use parish_calendar::calendar::{events_in_month, merge, next_event, EventDraft, DEFAULT_LOCATION};
use parish_calendar::liturgy::{compute_easter, Feast};
use parish_calendar::report::{month_label, MonthlyAgenda};
use parish_calendar::{CalendarEvent, EventId};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
}

fn manual(id: u64, title: &str, date: &str, time: &str) -> CalendarEvent {
    EventDraft::from_form(title, date, time, "Reunião", "", DEFAULT_LOCATION)
        .unwrap()
        .into_event(id)
}

#[test]
fn merged_calendar_covers_two_years() {
    let events = merge(&[], at(2025, 6, 1, 0, 0));
    assert_eq!(events.len(), 2 * Feast::ALL.len());
    assert!(events.iter().all(|e| !e.is_editable()));

    let years: Vec<i32> = events.iter().map(|e| e.start.year()).collect();
    assert!(years.iter().all(|y| *y == 2025 || *y == 2026));
}

#[test]
fn manual_events_come_first_in_the_merge() {
    let ours = manual(1, "Conselho", "10/06/2025", "20:00");
    let events = merge(std::slice::from_ref(&ours), at(2025, 6, 1, 0, 0));
    assert_eq!(events[0], ours);
}

#[test]
fn next_event_after_christmas_is_epiphany() {
    let events = merge(&[], at(2025, 12, 25, 0, 1));
    let next = next_event(&events, at(2025, 12, 25, 0, 1)).unwrap();
    assert_eq!(next.id, EventId::Liturgical { feast: Feast::Epiphany, year: 2026 });
}

#[test]
fn manual_event_wins_a_tie_with_a_feast() {
    // Easter 2025 mass starts at 08:00
    let easter = compute_easter(2025);
    let clash = manual(7, "Café da manhã", &easter.format("%d/%m/%Y").to_string(), "08:00");
    let events = merge(std::slice::from_ref(&clash), at(2025, 4, 1, 0, 0));
    assert_eq!(next_event(&events, at(2025, 4, 20, 0, 0)), Some(&clash));
}

#[test]
fn month_filter_ignores_the_year() {
    let events = merge(&[], at(2025, 1, 1, 0, 0));
    let december: Vec<_> = events_in_month(&events, 12);
    // Christmas Eve and Christmas in both years
    assert_eq!(december.len(), 4);
    assert!(events_in_month(&events, 13).is_empty());
}

#[test]
fn monthly_agenda_for_september() {
    let ours = manual(1, "Novena", "2025-09-14", "19:00");
    let events = merge(std::slice::from_ref(&ours), at(2025, 1, 1, 0, 0));
    let september = events_in_month(&events, 9)
        .into_iter()
        .filter(|e| e.start.year() == 2025);

    let agenda = MonthlyAgenda::build(month_label(2025, 9), september);
    assert_eq!(agenda.label, "Setembro de 2025");
    assert_eq!(agenda.rows.len(), 2);
    assert_eq!(agenda.rows[0].title, "[Reunião] Novena");
    assert_eq!(agenda.rows[1].date, "15/09/2025");
}
