use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use parish_calendar::CalendarEvent;

use crate::theme;

pub struct DayView;

impl DayView {
    pub fn render(frame: &mut Frame, area: Rect, date: NaiveDate, events: &[CalendarEvent], selected: usize) {
        let theme = theme::current();
        let w = area.width as usize;

        let title = if w >= 30 {
            format!(" {} ", date.format("%A, %d/%m/%Y"))
        } else {
            format!(" {} ", date.format("%d/%m"))
        };

        let count_str = match events.len() {
            0 => String::new(),
            1 => " 1 event ".to_string(),
            n => format!(" {n} events "),
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(count_str, theme.dim)))
            .borders(Borders::ALL)
            .border_style(theme.border);

        if events.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(Paragraph::new("No events").style(theme.dim), inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = events.iter().map(|ev| format_event(ev, inner_w)).collect();

        let list = List::new(items).block(block).highlight_style(theme.selected);
        let mut state = ListState::default().with_selected(Some(selected.min(events.len() - 1)));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn format_event(ev: &CalendarEvent, max_width: usize) -> ListItem<'static> {
    let color_indicator = Span::styled("  ", Style::default().bg(theme::event_color(&ev.color)));
    let time_str = format!(" {} ", ev.time_display());
    let time_span = Span::styled(time_str.clone(), Style::default().add_modifier(Modifier::DIM));

    let title_style = if ev.is_editable() {
        Style::default()
    } else {
        theme::current().liturgical
    };
    let title_span = Span::styled(ev.title.clone(), title_style);

    let mut spans = vec![color_indicator, time_span, title_span];

    // Only show location if there's room
    let used = 2 + time_str.len() + ev.title.chars().count();
    if used + 3 + ev.local.chars().count() <= max_width {
        spans.push(Span::styled(format!(" @ {}", ev.local), theme::DIM_STYLE));
    }

    ListItem::new(Line::from(spans))
}

/// Render an event detail popup overlay.
pub fn render_detail_popup(frame: &mut Frame, area: Rect, ev: &CalendarEvent) {
    let popup_w = area.width.clamp(30, 60);
    let popup_h = area.height.clamp(8, 14);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" {} ", ev.title))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let field = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, theme::DIM_STYLE),
            Span::styled(value, Style::default()),
        ])
    };

    let kind = if ev.is_editable() {
        "manual (e: edit, d: delete)"
    } else {
        "liturgical (read-only)"
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("  ", Style::default().bg(theme::event_color(&ev.color))),
            Span::styled(format!(" {}", ev.categoria), Style::default()),
        ]),
        Line::from(""),
        field("Date:     ", ev.start.format("%A, %d/%m/%Y").to_string()),
        field("Time:     ", ev.time_display()),
        field("Location: ", ev.local.clone()),
        field("Id:       ", ev.id.to_string()),
        field("Kind:     ", kind.to_string()),
        Line::from(""),
        Line::from(Span::styled("Press Esc to close", theme::DIM_STYLE)),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
