use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use parish_calendar::calendar::LoadReport;

use crate::theme;

/// Raw listing of the manual-event store, unparseable rows included.
pub struct AdminView;

/// Lines of the listing: a header, the events, then a titled block of
/// skipped rows after a blank line.
pub fn row_count(report: &LoadReport) -> usize {
    if report.events.is_empty() && report.skipped.is_empty() {
        return 0;
    }
    let skipped = match report.skipped.len() {
        0 => 0,
        n => n + 2,
    };
    1 + report.events.len() + skipped
}

impl AdminView {
    pub fn render(frame: &mut Frame, area: Rect, report: &LoadReport, scroll: usize) {
        let theme = theme::current();

        let block = Block::default()
            .title(" Manual events ")
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(
                format!(" {} | X: delete all ", report.summary()),
                theme.dim,
            )))
            .borders(Borders::ALL)
            .border_style(theme.border);

        if report.events.is_empty() && report.skipped.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(Paragraph::new("No manual events registered").style(theme.dim), inner);
            return;
        }

        let mut events: Vec<_> = report.events.iter().collect();
        events.sort_by_key(|e| e.id.manual());

        let mut items: Vec<ListItem> = vec![ListItem::new(Line::from(Span::styled(
            format!("{:>5}  {:<16}  {:<12}  {}", "id", "start", "category", "title"),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )))];

        for ev in events {
            items.push(ListItem::new(Line::from(vec![
                Span::raw(format!("{:>5}  ", ev.id.to_string())),
                Span::raw(format!("{:<16}  ", ev.start.format("%d/%m/%Y %H:%M").to_string())),
                Span::styled(
                    format!("{:<12}  ", ev.categoria),
                    Style::default().fg(theme::event_color(&ev.color)),
                ),
                Span::raw(ev.title.clone()),
                Span::styled(format!(" @ {}", ev.local), theme.dim),
            ])));
        }

        if !report.skipped.is_empty() {
            items.push(ListItem::new(Line::from("")));
            items.push(ListItem::new(Line::from(Span::styled(
                "Unreadable rows",
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ))));
            for skipped in &report.skipped {
                items.push(ListItem::new(Line::from(vec![
                    Span::styled(format!("line {:>3}  ", skipped.line), theme.dim),
                    Span::styled(skipped.reason.to_string(), theme::ERROR_STYLE),
                    Span::raw(format!("  {}", skipped.record.title)),
                ])));
            }
        }

        let visible: Vec<ListItem> = items.into_iter().skip(scroll).collect();
        frame.render_widget(List::new(visible).block(block), area);
    }
}

#[cfg(test)]
mod tests {
    use parish_calendar::calendar::{EventDraft, SkippedRecord, DEFAULT_LOCATION};
    use parish_calendar::error::RecordError;
    use parish_calendar::EventRecord;

    use super::*;

    #[test]
    fn row_count_matches_listing_sections() {
        let mut report = LoadReport::default();
        assert_eq!(row_count(&report), 0);

        let event = EventDraft::from_form("Terço", "07/10/2025", "19:00", "", "", DEFAULT_LOCATION)
            .unwrap()
            .into_event(1);
        report.events.push(event);
        assert_eq!(row_count(&report), 2);

        report.skipped.push(SkippedRecord {
            line: 3,
            record: EventRecord::default(),
            reason: RecordError::Start(String::new()),
        });
        assert_eq!(row_count(&report), 5);
    }
}
