use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, InputMode, ViewMode};
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = theme::current();
        let w = area.width as usize;

        let mode_str = match app.view_mode {
            ViewMode::Month => "[1]Month",
            ViewMode::Day => "[2]Day",
            ViewMode::Admin => "[3]Admin",
        };
        let focus_indicator = match app.input_mode {
            InputMode::Form => " [Form]",
            InputMode::ConfirmPurge => " [Confirm]",
            InputMode::Normal => "",
        };
        let left = format!(" {}{} ", mode_str, focus_indicator);

        // Status message wins, then the purge prompt, then the next-event banner
        let (right, style) = if let Some(ref msg) = app.status_message {
            (format!(" {} ", msg), theme.status)
        } else if app.input_mode == InputMode::ConfirmPurge {
            (" Delete ALL manual events? y/N ".to_string(), theme::ERROR_STYLE)
        } else {
            (banner(app, w.saturating_sub(left.len())), theme.banner)
        };

        let padding = " ".repeat(w.saturating_sub(left.chars().count() + right.chars().count()));
        let line = Line::from(vec![
            Span::styled(left, theme.status),
            Span::styled(padding, theme.status),
            Span::styled(right, style),
        ]);
        frame.render_widget(Paragraph::new(line).style(theme.status), area);
    }
}

/// "Next: <title> | dd/mm/yyyy at HH:MM", shortened to fit `room` columns.
fn banner(app: &App, room: usize) -> String {
    let Some(ev) = app.next_event.as_ref() else {
        return " No upcoming events ".to_string();
    };

    let when = format!("{} at {}", ev.date_display(), ev.time_display());
    let full = format!(" Next: {} | {} ", ev.title, when);
    if full.chars().count() <= room {
        return full;
    }
    let short = format!(" {} {} ", ev.start.format("%d/%m"), ev.title);
    short.chars().take(room).collect()
}
