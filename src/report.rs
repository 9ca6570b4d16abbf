//! Data handed to the printable-agenda collaborator.

use serde::Serialize;

use crate::calendar::CalendarEvent;

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "Janeiro",
        2 => "Fevereiro",
        3 => "Março",
        4 => "Abril",
        5 => "Maio",
        6 => "Junho",
        7 => "Julho",
        8 => "Agosto",
        9 => "Setembro",
        10 => "Outubro",
        11 => "Novembro",
        12 => "Dezembro",
        _ => "?",
    }
}

/// "Setembro de 2025"
pub fn month_label(year: i32, month: u32) -> String {
    format!("{} de {}", month_name(month), year)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaRow {
    /// `dd/mm/yyyy`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub title: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyAgenda {
    /// Printed above the month label when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parish: Option<String>,
    pub label: String,
    pub rows: Vec<AgendaRow>,
}

impl MonthlyAgenda {
    /// Rows ordered by start; events starting together keep their input order.
    pub fn build<'a>(label: impl Into<String>, events: impl IntoIterator<Item = &'a CalendarEvent>) -> Self {
        let mut events: Vec<&CalendarEvent> = events.into_iter().collect();
        events.sort_by_key(|e| e.start);

        let rows = events
            .into_iter()
            .map(|e| AgendaRow {
                date: e.date_display(),
                time: e.time_display(),
                title: e.title.clone(),
                location: e.local.clone(),
            })
            .collect();

        Self {
            parish: None,
            label: label.into(),
            rows,
        }
    }

    pub fn with_parish(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.parish = (!name.trim().is_empty()).then_some(name);
        self
    }

    /// Plain-text table, one row per line.
    pub fn to_text(&self) -> String {
        let title_w = self
            .rows
            .iter()
            .map(|r| r.title.chars().count())
            .max()
            .unwrap_or(0)
            .max("Evento".len());

        let mut out = String::new();
        if let Some(parish) = &self.parish {
            out.push_str(&format!("{parish}\n"));
        }
        out.push_str(&format!("Agenda Paroquial - {}\n\n", self.label));
        out.push_str(&format!("{:<10}  {:<5}  {:<title_w$}  Local\n", "Data", "Hora", "Evento"));
        for row in &self.rows {
            out.push_str(&format!(
                "{:<10}  {:<5}  {:<title_w$}  {}\n",
                row.date, row.time, row.title, row.location
            ));
        }
        if self.rows.is_empty() {
            out.push_str("(nenhum evento)\n");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate, NaiveDateTime};

    use super::*;
    use crate::calendar::{events_in_month, merge, EventDraft, DEFAULT_LOCATION};

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn agenda_rows_are_sorted() {
        let late = EventDraft::from_form("Festa", "20/09/2025", "18:00", "Social", "Salão", DEFAULT_LOCATION)
            .unwrap()
            .into_event(1);
        let events = merge(&[late], at(2025, 1, 1, 0));
        let september: Vec<&CalendarEvent> = events_in_month(&events, 9)
            .into_iter()
            .filter(|e| e.start.year() == 2025)
            .collect();

        let agenda = MonthlyAgenda::build(month_label(2025, 9), september);
        assert_eq!(agenda.label, "Setembro de 2025");
        let dates: Vec<&str> = agenda.rows.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, ["15/09/2025", "20/09/2025"]);
        assert_eq!(agenda.rows[1].time, "18:00");
        assert_eq!(agenda.rows[1].location, "Salão");
    }

    #[test]
    fn empty_agenda_text() {
        let agenda = MonthlyAgenda::build("Março de 2030", std::iter::empty::<&CalendarEvent>());
        assert!(agenda.to_text().contains("(nenhum evento)"));
    }

    #[test]
    fn parish_name_heads_the_text() {
        let agenda = MonthlyAgenda::build("Outubro de 2025", std::iter::empty::<&CalendarEvent>())
            .with_parish("Paróquia São José");
        let text = agenda.to_text();
        assert!(text.starts_with("Paróquia São José\nAgenda Paroquial - Outubro de 2025"));

        let blank = MonthlyAgenda::build("Outubro de 2025", std::iter::empty::<&CalendarEvent>()).with_parish("  ");
        assert_eq!(blank.parish, None);
    }
}
