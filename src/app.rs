use chrono::{Datelike, Local, Months, NaiveDate, NaiveDateTime};
use color_eyre::Result;

use parish_calendar::calendar::{EventRepository, LoadReport, Schedule};
use parish_calendar::config::Settings;
use parish_calendar::liturgy::LiturgicalOptions;
use parish_calendar::{CalendarEvent, EventId};

use crate::components::admin_view;
use crate::components::event_form::{EventFormState, FormMode};
use crate::components::month_view::MonthMarks;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMode {
    Month,
    Day,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Form,
    ConfirmPurge,
}

/// Source of the current local time.
pub type Clock = Box<dyn Fn() -> NaiveDateTime>;

pub struct App {
    pub running: bool,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub selected_date: NaiveDate,
    pub today: NaiveDate,
    pub now: NaiveDateTime,
    pub schedule: Schedule,
    pub stored: LoadReport,
    pub day_events: Vec<CalendarEvent>,
    pub day_selected: usize,
    pub month_marks: MonthMarks,
    pub next_event: Option<CalendarEvent>,
    pub admin_scroll: usize,
    pub form_state: Option<EventFormState>,
    pub show_detail: bool,
    pub show_help: bool,
    pub status_message: Option<String>,
    options: LiturgicalOptions,
    store: Box<dyn EventRepository>,
    clock: Clock,
}

impl App {
    pub fn new(store: Box<dyn EventRepository>, settings: &Settings) -> Result<Self> {
        Self::with_clock(store, settings, Box::new(|| Local::now().naive_local()))
    }

    pub fn with_clock(store: Box<dyn EventRepository>, settings: &Settings, clock: Clock) -> Result<Self> {
        let now = clock();
        let mut app = Self {
            running: true,
            view_mode: ViewMode::Month,
            input_mode: InputMode::Normal,
            selected_date: now.date(),
            today: now.date(),
            now,
            schedule: Schedule::default(),
            stored: LoadReport::default(),
            day_events: Vec::new(),
            day_selected: 0,
            month_marks: MonthMarks::default(),
            next_event: None,
            admin_scroll: 0,
            form_state: None,
            show_detail: false,
            show_help: false,
            status_message: None,
            options: settings.liturgical_options(),
            store,
            clock,
        };
        app.stored = app.store.load()?;
        if !app.stored.skipped.is_empty() {
            app.status_message = Some(format!("Event store: {}", app.stored.summary()));
        }
        app.rebuild();
        Ok(app)
    }

    /// Re-read the store and recompute the merged calendar as of now.
    pub fn reload(&mut self) {
        self.sync_clock();
        match self.store.load() {
            Ok(report) => self.stored = report,
            Err(e) => {
                tracing::error!(error = %e, "failed to load events");
                self.status_message = Some(e.to_string());
            }
        }
        self.rebuild();
    }

    /// Called once per loop iteration. Rebuilds only when the banner's event
    /// has started or the year rolled over.
    pub fn tick(&mut self) {
        let year = self.now.year();
        self.sync_clock();
        let started = self.next_event.as_ref().is_some_and(|e| e.start < self.now);
        if started || self.now.year() != year {
            self.rebuild();
        }
    }

    fn sync_clock(&mut self) {
        self.now = (self.clock)();
        self.today = self.now.date();
    }

    fn rebuild(&mut self) {
        self.schedule = Schedule::build(&self.stored.events, self.now, &self.options);
        self.next_event = self.schedule.next_event(self.now).cloned();
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        let year = self.selected_date.year();
        let month = self.selected_date.month();

        let mut marks = MonthMarks::default();
        for ev in self.schedule.events_for_month(year, month) {
            let day = ev.start.day();
            if ev.is_editable() {
                marks.manual.insert(day);
            } else {
                marks.liturgical.insert(day);
            }
        }
        self.month_marks = marks;

        self.day_events = self
            .schedule
            .events_for_date(self.selected_date)
            .into_iter()
            .cloned()
            .collect();
        self.day_selected = self.day_selected.min(self.day_events.len().saturating_sub(1));
        self.admin_scroll = self.admin_scroll.min(self.admin_scroll_limit());
    }

    fn admin_scroll_limit(&self) -> usize {
        admin_view::row_count(&self.stored).saturating_sub(1)
    }

    pub fn selected_event(&self) -> Option<&CalendarEvent> {
        self.day_events.get(self.day_selected)
    }

    // ── navigation ──

    pub fn next_day(&mut self) {
        self.selected_date = self.selected_date.succ_opt().unwrap_or(self.selected_date);
        self.on_date_changed();
    }

    pub fn prev_day(&mut self) {
        self.selected_date = self.selected_date.pred_opt().unwrap_or(self.selected_date);
        self.on_date_changed();
    }

    pub fn next_month(&mut self) {
        self.selected_date = self
            .selected_date
            .checked_add_months(Months::new(1))
            .unwrap_or(self.selected_date);
        self.on_date_changed();
    }

    pub fn prev_month(&mut self) {
        self.selected_date = self
            .selected_date
            .checked_sub_months(Months::new(1))
            .unwrap_or(self.selected_date);
        self.on_date_changed();
    }

    pub fn go_to_today(&mut self) {
        self.sync_clock();
        self.selected_date = self.today;
        // the year may have rolled over since the last rebuild
        self.rebuild();
    }

    pub fn select_down(&mut self) {
        match self.view_mode {
            ViewMode::Admin => self.admin_scroll = (self.admin_scroll + 1).min(self.admin_scroll_limit()),
            _ if self.day_selected + 1 < self.day_events.len() => self.day_selected += 1,
            _ => {}
        }
    }

    pub fn select_up(&mut self) {
        match self.view_mode {
            ViewMode::Admin => self.admin_scroll = self.admin_scroll.saturating_sub(1),
            _ => self.day_selected = self.day_selected.saturating_sub(1),
        }
    }

    fn on_date_changed(&mut self) {
        self.day_selected = 0;
        self.refresh_view();
    }

    // ── detail popup ──

    pub fn show_detail(&mut self) {
        self.show_detail = self.selected_event().is_some();
    }

    pub fn close_detail(&mut self) {
        self.show_detail = false;
    }

    // ── form ──

    pub fn open_event_form(&mut self) {
        self.form_state = Some(EventFormState::new(self.selected_date));
        self.input_mode = InputMode::Form;
    }

    pub fn open_edit_form(&mut self) {
        let Some(event) = self.selected_event().cloned() else {
            return;
        };
        match event.id {
            EventId::Manual(id) => {
                self.form_state = Some(EventFormState::edit(&event, id));
                self.input_mode = InputMode::Form;
            }
            EventId::Liturgical { .. } => {
                self.status_message = Some("Liturgical events are read-only".to_string());
            }
        }
    }

    pub fn close_event_form(&mut self) {
        self.form_state = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn submit_event_form(&mut self) {
        let Some(form) = self.form_state.as_ref() else {
            return;
        };
        let draft = match form.to_draft(&self.options.location) {
            Ok(draft) => draft,
            Err(e) => {
                // keep the form open so the input can be fixed
                self.status_message = Some(e.to_string());
                return;
            }
        };
        let date = draft.start.date();

        let outcome = match form.mode {
            FormMode::New => self.store.create(draft).map(|_| "Event saved"),
            FormMode::Edit(id) => match self.stored.events.iter().find(|e| e.id == EventId::Manual(id)) {
                Some(existing) => {
                    let mut event = existing.clone();
                    draft.apply_to(&mut event);
                    self.store.update(&event).map(|_| "Event updated")
                }
                None => Err(parish_calendar::error::StoreError::NotFound(id)),
            },
        };

        match outcome {
            Ok(msg) => {
                self.status_message = Some(msg.to_string());
                self.close_event_form();
                self.selected_date = date;
                self.day_selected = 0;
                self.reload();
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to save event");
                self.status_message = Some(e.to_string());
            }
        }
    }

    pub fn form_input_char(&mut self, c: char) {
        if let Some(ref mut f) = self.form_state {
            f.input_char(c);
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(ref mut f) = self.form_state {
            f.backspace();
        }
    }

    pub fn form_tab(&mut self) {
        if let Some(ref mut f) = self.form_state {
            f.active_field = f.active_field.next();
        }
    }

    pub fn form_backtab(&mut self) {
        if let Some(ref mut f) = self.form_state {
            f.active_field = f.active_field.prev();
        }
    }

    // ── deletion ──

    pub fn delete_selected_event(&mut self) {
        let Some(event_id) = self.selected_event().map(|e| e.id) else {
            return;
        };
        let Some(id) = event_id.manual() else {
            self.status_message = Some("Liturgical events are read-only".to_string());
            return;
        };

        match self.store.remove(id) {
            Ok(()) => {
                self.status_message = Some("Event deleted".to_string());
                self.reload();
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    pub fn request_purge(&mut self) {
        self.input_mode = InputMode::ConfirmPurge;
    }

    pub fn confirm_purge(&mut self, confirmed: bool) {
        self.input_mode = InputMode::Normal;
        if !confirmed {
            self.status_message = Some("Nothing deleted".to_string());
            return;
        }
        match self.store.clear() {
            Ok(()) => {
                self.status_message = Some("All manual events deleted".to_string());
                self.reload();
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use parish_calendar::calendar::MemoryStore;
    use parish_calendar::liturgy::Feast;

    use super::*;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(10, 0, 0).unwrap()
    }

    /// App with a clock the test can move.
    fn app_with_clock(now: NaiveDateTime) -> (App, Rc<Cell<NaiveDateTime>>) {
        let time = Rc::new(Cell::new(now));
        let clock = Rc::clone(&time);
        let app = App::with_clock(
            Box::new(MemoryStore::new()),
            &Settings::default(),
            Box::new(move || clock.get()),
        )
        .unwrap();
        (app, time)
    }

    fn app_at(y: i32, m: u32, d: u32) -> App {
        app_with_clock(at(y, m, d)).0
    }

    fn type_str(app: &mut App, s: &str) {
        s.chars().for_each(|c| app.form_input_char(c));
    }

    #[test]
    fn banner_points_at_next_liturgical_event() {
        let app = app_at(2025, 9, 1);
        let next = app.next_event.as_ref().unwrap();
        assert_eq!(next.id, EventId::Liturgical { feast: Feast::Patroness, year: 2025 });
    }

    #[test]
    fn create_edit_and_delete_through_the_form() {
        let mut app = app_at(2025, 9, 1);

        app.open_event_form();
        type_str(&mut app, "Reunião do conselho");
        app.submit_event_form();
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.stored.events.len(), 1);
        assert_eq!(app.day_events[0].title, "[Culto/Missa] Reunião do conselho");

        app.open_edit_form();
        app.form_tab();
        app.form_tab();
        for _ in 0..5 {
            app.form_backspace();
        }
        type_str(&mut app, "08:30");
        app.submit_event_form();
        assert_eq!(app.stored.events[0].time_display(), "08:30");

        app.delete_selected_event();
        assert!(app.stored.events.is_empty());
    }

    #[test]
    fn empty_title_keeps_form_open() {
        let mut app = app_at(2025, 9, 1);
        app.open_event_form();
        app.submit_event_form();
        assert_eq!(app.input_mode, InputMode::Form);
        assert!(app.stored.events.is_empty());
        assert!(app.status_message.is_some());
    }

    #[test]
    fn liturgical_events_cannot_be_deleted() {
        let mut app = app_at(2025, 12, 25);
        assert!(!app.day_events.is_empty());
        app.delete_selected_event();
        assert_eq!(app.status_message.as_deref(), Some("Liturgical events are read-only"));
        app.open_edit_form();
        assert!(app.form_state.is_none());
    }

    #[test]
    fn purge_requires_confirmation() {
        let mut app = app_at(2025, 9, 1);
        app.open_event_form();
        type_str(&mut app, "Bazar");
        app.submit_event_form();

        app.request_purge();
        app.confirm_purge(false);
        assert_eq!(app.stored.events.len(), 1);

        app.request_purge();
        app.confirm_purge(true);
        assert!(app.stored.events.is_empty());
    }

    #[test]
    fn banner_follows_the_clock() {
        let (mut app, time) = app_with_clock(at(2025, 9, 1));
        let patroness = EventId::Liturgical { feast: Feast::Patroness, year: 2025 };
        assert_eq!(app.next_event.as_ref().map(|e| e.id), Some(patroness));

        time.set(at(2025, 9, 16));
        app.tick();
        assert_eq!(app.today, NaiveDate::from_ymd_opt(2025, 9, 16).unwrap());
        let aparecida = EventId::Liturgical { feast: Feast::Aparecida, year: 2025 };
        assert_eq!(app.next_event.as_ref().map(|e| e.id), Some(aparecida));
    }

    #[test]
    fn reload_uses_the_current_year() {
        let (mut app, time) = app_with_clock(at(2025, 9, 1));

        time.set(at(2026, 12, 30));
        app.reload();
        let epiphany = EventId::Liturgical { feast: Feast::Epiphany, year: 2027 };
        assert_eq!(app.next_event.as_ref().map(|e| e.id), Some(epiphany));
    }

    #[test]
    fn admin_scroll_stops_at_the_last_row() {
        let mut app = app_at(2025, 9, 1);
        app.open_event_form();
        type_str(&mut app, "Bazar");
        app.submit_event_form();

        app.view_mode = ViewMode::Admin;
        for _ in 0..10 {
            app.select_down();
        }
        // header row + one event
        assert_eq!(app.admin_scroll, 1);

        app.request_purge();
        app.confirm_purge(true);
        assert_eq!(app.admin_scroll, 0);
    }
}
