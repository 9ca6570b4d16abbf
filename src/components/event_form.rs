use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use parish_calendar::calendar::category::{self, CATEGORIES};
use parish_calendar::calendar::EventDraft;
use parish_calendar::error::FormError;
use parish_calendar::CalendarEvent;

use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Title,
    Date,
    Time,
    Category,
    Location,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Title => FormField::Date,
            FormField::Date => FormField::Time,
            FormField::Time => FormField::Category,
            FormField::Category => FormField::Location,
            FormField::Location => FormField::Title,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormField::Title => FormField::Location,
            FormField::Date => FormField::Title,
            FormField::Time => FormField::Date,
            FormField::Category => FormField::Time,
            FormField::Location => FormField::Category,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormMode {
    New,
    Edit(u64),
}

#[derive(Debug, Clone)]
pub struct EventFormState {
    pub mode: FormMode,
    pub title: String,
    pub date: String,
    pub time: String,
    pub category: String,
    pub location: String,
    pub active_field: FormField,
}

impl EventFormState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            mode: FormMode::New,
            title: String::new(),
            date: date.format("%d/%m/%Y").to_string(),
            time: "19:00".to_string(),
            category: CATEGORIES[0].0.to_string(),
            location: String::new(),
            active_field: FormField::Title,
        }
    }

    /// Prefilled from a stored manual event.
    pub fn edit(event: &CalendarEvent, id: u64) -> Self {
        Self {
            mode: FormMode::Edit(id),
            title: event.title.clone(),
            date: event.date_display(),
            time: event.time_display(),
            category: event.categoria.clone(),
            location: event.local.clone(),
            active_field: FormField::Title,
        }
    }

    pub fn input_char(&mut self, c: char) {
        match self.active_field {
            FormField::Title => self.title.push(c),
            FormField::Date => self.date.push(c),
            FormField::Time => self.time.push(c),
            FormField::Location => self.location.push(c),
            FormField::Category => {}
        }
    }

    pub fn backspace(&mut self) {
        match self.active_field {
            FormField::Title => { self.title.pop(); }
            FormField::Date => { self.date.pop(); }
            FormField::Time => { self.time.pop(); }
            FormField::Location => { self.location.pop(); }
            FormField::Category => {}
        }
    }

    pub fn next_category(&mut self) {
        let next = category::position(&self.category).map_or(0, |i| (i + 1) % CATEGORIES.len());
        self.category = CATEGORIES[next].0.to_string();
    }

    pub fn to_draft(&self, default_location: &str) -> Result<EventDraft, FormError> {
        EventDraft::from_form(
            &self.title,
            &self.date,
            &self.time,
            &self.category,
            &self.location,
            default_location,
        )
    }
}

pub struct EventForm;

impl EventForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &EventFormState) {
        // Center the form popup
        let form_w = area.width.clamp(30, 56);
        let form_h = area.height.clamp(10, 12);
        let x = area.x + (area.width.saturating_sub(form_w)) / 2;
        let y = area.y + (area.height.saturating_sub(form_h)) / 2;
        let form_area = Rect::new(x, y, form_w, form_h);

        frame.render_widget(Clear, form_area);

        let heading = match state.mode {
            FormMode::New => " New Event ".to_string(),
            FormMode::Edit(id) => format!(" Edit Event #{id} "),
        };
        let block = Block::default()
            .title(heading)
            .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1), // date
            Constraint::Length(1), // time
            Constraint::Length(1), // category
            Constraint::Length(1), // location
            Constraint::Length(1), // spacer
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        let active = |f: FormField| state.active_field == f;
        render_field(frame, rows[0], "Title:", &state.title, active(FormField::Title));
        render_field(frame, rows[1], "Date:", &state.date, active(FormField::Date));
        render_field(frame, rows[2], "Time:", &state.time, active(FormField::Time));

        let swatch = theme::event_color(category::color_for(&state.category));
        let cat_style = if active(FormField::Category) {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        let cat_line = Line::from(vec![
            Span::styled(format!("{:<10}", "Type:"), theme::current().dim),
            Span::styled("\u{25CF} ", Style::default().fg(swatch)),
            Span::styled(state.category.clone(), cat_style),
        ]);
        frame.render_widget(Paragraph::new(cat_line), rows[3]);

        let placeholder = if state.location.is_empty() && !active(FormField::Location) {
            "(parish address)"
        } else {
            state.location.as_str()
        };
        render_field(frame, rows[4], "Place:", placeholder, active(FormField::Location));

        let help = Line::from(vec![
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Next ", theme::current().dim),
            Span::styled("Space", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Type ", theme::current().dim),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Save ", theme::current().dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cancel", theme::current().dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[6]);
    }
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
    let cursor = if active { "_" } else { "" };
    let style = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let spans = vec![
        Span::styled(format!("{:<10}", label), theme::current().dim),
        Span::styled(format!("{}{}", value, cursor), style),
    ];
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_cycles_through_the_table() {
        let mut form = EventFormState::new(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(form.category, "Culto/Missa");
        form.next_category();
        assert_eq!(form.category, "Batizado");
        for _ in 0..CATEGORIES.len() - 1 {
            form.next_category();
        }
        assert_eq!(form.category, "Culto/Missa");

        form.category = "Geral".to_string();
        form.next_category();
        assert_eq!(form.category, "Culto/Missa");
    }

    #[test]
    fn typing_goes_to_the_active_field() {
        let mut form = EventFormState::new(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        "Ensaio".chars().for_each(|c| form.input_char(c));
        form.active_field = form.active_field.next().next();
        form.backspace();
        form.input_char('5');

        assert_eq!(form.title, "Ensaio");
        assert_eq!(form.time, "19:05");
        let draft = form.to_draft("Matriz").unwrap();
        assert_eq!(draft.local, "Matriz");
    }
}
