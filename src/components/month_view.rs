use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::theme;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Days of the displayed month that carry events, by kind.
#[derive(Debug, Clone, Default)]
pub struct MonthMarks {
    pub manual: HashSet<u32>,
    pub liturgical: HashSet<u32>,
}

pub struct MonthView;

impl MonthView {
    pub fn render(frame: &mut Frame, area: Rect, selected_date: NaiveDate, today: NaiveDate, marks: &MonthMarks) {
        let year = selected_date.year();
        let month = selected_date.month();
        let theme = theme::current();

        let block = Block::default()
            .title(format!(" {} {} ", month_name(month), year))
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(" *event \u{2020}feast ", theme.dim)))
            .borders(Borders::ALL)
            .border_style(theme.border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header = Line::from(
            DAY_NAMES
                .iter()
                .map(|d| Span::styled(format!("{:^5}", d), theme.header))
                .collect::<Vec<_>>(),
        );

        let Some(first_day) = NaiveDate::from_ymd_opt(year, month, 1) else {
            return;
        };
        let first_weekday = first_day.weekday().num_days_from_sunday() as i32;
        let last_day = days_in_month(year, month) as i32;

        let mut weeks: Vec<Line> = Vec::new();
        let mut current_day = 1 - first_weekday;

        while current_day <= last_day {
            let mut cells: Vec<Span> = Vec::new();
            for _ in 0..7 {
                if current_day < 1 || current_day > last_day {
                    cells.push(Span::raw("     "));
                } else {
                    let day = current_day as u32;
                    let date = first_day.with_day(day).unwrap_or(first_day);

                    let mark = if marks.liturgical.contains(&day) {
                        '\u{2020}'
                    } else if marks.manual.contains(&day) {
                        '*'
                    } else {
                        ' '
                    };

                    let style = if date == today && date == selected_date {
                        theme.today.add_modifier(Modifier::BOLD)
                    } else if date == selected_date {
                        theme.selected
                    } else if date == today {
                        theme.today
                    } else {
                        Style::default()
                    };

                    cells.push(Span::styled(format!(" {:>2}{} ", day, mark), style));
                }
                current_day += 1;
            }
            weeks.push(Line::from(cells));
        }

        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend(weeks.iter().map(|_| Constraint::Length(1)));
        constraints.push(Constraint::Min(0));

        let rows = Layout::vertical(constraints).split(inner);

        frame.render_widget(Paragraph::new(header), rows[0]);
        for (i, week) in weeks.into_iter().enumerate() {
            frame.render_widget(Paragraph::new(week), rows[i + 1]);
        }
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(next_year, next_month, 1),
    ) {
        (Some(first), Some(next)) => next.signed_duration_since(first).num_days() as u32,
        _ => 30,
    }
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "Unknown",
    }
}
