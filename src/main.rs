mod app;
mod cli;
mod components;
mod theme;
mod tui;

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use app::{App, InputMode, ViewMode};
use clap::Parser;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use tracing_subscriber::EnvFilter;

use parish_calendar::calendar::CsvStore;
use parish_calendar::config::Settings;

#[derive(Debug, Parser)]
#[command(version, about = "Parish activity calendar with automatic liturgical dates")]
struct Args {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Event store CSV, overriding the configured one
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Run a single command instead of the interactive calendar
    #[command(subcommand)]
    command: Option<cli::Command>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(path) = args.store {
        settings.store.path = Some(path);
    }

    match args.command {
        Some(command) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter("warn"))
                .with_writer(std::io::stderr)
                .init();
            cli::run(command, &settings)
        }
        None => {
            init_file_logging(&settings);
            run_tui(&settings)
        }
    }
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// The terminal is in raw mode while the calendar runs, so logs go to a file.
fn init_file_logging(settings: &Settings) {
    let path = settings.log_path();
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&settings.log.level))
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
}

fn run_tui(settings: &Settings) -> Result<()> {
    let store = CsvStore::with_defaults(settings.store_path(), settings.record_defaults());
    tracing::info!(store = %store.path().display(), "starting parish calendar");
    let mut app = App::new(Box::new(store), settings)?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        app.tick();
        terminal.draw(|frame| {
            let area = frame.area();

            // Main layout: content + status bar
            let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
            let content_area = layout[0];

            match app.view_mode {
                ViewMode::Month => render_month_layout(frame, content_area, app),
                ViewMode::Day => components::DayView::render(
                    frame,
                    content_area,
                    app.selected_date,
                    &app.day_events,
                    app.day_selected,
                ),
                ViewMode::Admin => {
                    components::AdminView::render(frame, content_area, &app.stored, app.admin_scroll)
                }
            }

            if let Some(ref form) = app.form_state {
                components::EventForm::render(frame, area, form);
            }

            if app.show_detail {
                if let Some(ev) = app.selected_event() {
                    components::day_view::render_detail_popup(frame, area, ev);
                }
            }

            if app.show_help {
                render_help(frame, area);
            }

            components::StatusBar::render(frame, layout[1], app);
        })?;

        if let Some(key) = tui::next_key_event(Duration::from_millis(250))? {
            // Clear status message on any key
            app.status_message = None;

            if app.show_help {
                if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                    app.show_help = false;
                }
                continue;
            }

            if app.show_detail {
                if key.code == KeyCode::Esc {
                    app.close_detail();
                }
                continue;
            }

            match app.input_mode {
                InputMode::Form => handle_form_input(app, key.code),
                InputMode::ConfirmPurge => app.confirm_purge(matches!(key.code, KeyCode::Char('y' | 'Y'))),
                InputMode::Normal => handle_normal_input(app, key.code, key.modifiers),
            }
        }
    }

    Ok(())
}

fn handle_normal_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match (code, modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
        }
        (KeyCode::Char('1'), _) => app.view_mode = ViewMode::Month,
        (KeyCode::Char('2'), _) => app.view_mode = ViewMode::Day,
        (KeyCode::Char('3'), _) => app.view_mode = ViewMode::Admin,
        (KeyCode::Char('t'), _) => app.go_to_today(),
        (KeyCode::Char('r'), _) => {
            app.reload();
            app.status_message.get_or_insert_with(|| format!("Reloaded: {}", app.stored.summary()));
        }
        (KeyCode::Char('n'), _) => app.open_event_form(),
        (KeyCode::Char('e'), _) => app.open_edit_form(),
        (KeyCode::Char('d'), _) => app.delete_selected_event(),
        (KeyCode::Char('X'), _) => app.request_purge(),
        (KeyCode::Enter, _) => app.show_detail(),
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) => app.prev_day(),
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) => app.next_day(),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.select_up(),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.select_down(),
        (KeyCode::Char('['), _) => app.prev_month(),
        (KeyCode::Char(']'), _) => app.next_month(),
        (KeyCode::Char('?'), _) => app.show_help = true,
        _ => {}
    }
}

fn handle_form_input(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc => app.close_event_form(),
        KeyCode::Enter => app.submit_event_form(),
        KeyCode::Tab => app.form_tab(),
        KeyCode::BackTab => app.form_backtab(),
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Char(' ') => {
            // Space cycles the category, types a space elsewhere
            match app.form_state.as_mut() {
                Some(f) if f.active_field == components::event_form::FormField::Category => f.next_category(),
                _ => app.form_input_char(' '),
            }
        }
        KeyCode::Char(c) => app.form_input_char(c),
        _ => {}
    }
}

fn render_month_layout(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    if area.width < 60 {
        components::MonthView::render(frame, area, app.selected_date, app.today, &app.month_marks);
        return;
    }

    let month_w = if area.width >= 100 { 44 } else { 37 };
    let content = Layout::horizontal([Constraint::Length(month_w), Constraint::Min(20)]).split(area);

    components::MonthView::render(frame, content[0], app.selected_date, app.today, &app.month_marks);
    components::DayView::render(frame, content[1], app.selected_date, &app.day_events, app.day_selected);
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let popup_w = area.width.clamp(30, 52);
    let popup_h = area.height.clamp(12, 24);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let entry = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", keys), key_style),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Navigation", section_style)),
        entry("h/l", "Previous/next day"),
        entry("j/k", "Select event (scroll in admin)"),
        entry("[/]", "Previous/next month"),
        entry("t", "Jump to today"),
        Line::from(""),
        Line::from(Span::styled("Views", section_style)),
        entry("1/2/3", "Month / Day / Admin"),
        Line::from(""),
        Line::from(Span::styled("Actions", section_style)),
        entry("Enter", "Event details"),
        entry("n", "New event"),
        entry("e", "Edit selected event"),
        entry("d", "Delete selected event"),
        entry("X", "Delete ALL manual events"),
        entry("r", "Reload the event store"),
        Line::from(""),
        entry("q / Esc", "Quit / close popup"),
        Line::from(Span::styled("  Liturgical events are read-only", theme::DIM_STYLE)),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
