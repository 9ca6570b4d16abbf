use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use clap::Subcommand;
use color_eyre::eyre::{bail, WrapErr};
use color_eyre::Result;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use parish_calendar::bingo::{BingoEvent, BingoSheet, MAX_CARDS};
use parish_calendar::calendar::{events_in_month, merge_with, next_event, CsvStore, EventDraft, EventRepository};
use parish_calendar::config::Settings;
use parish_calendar::report::{month_label, MonthlyAgenda};
use parish_calendar::{CalendarEvent, EventRecord};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the next upcoming event
    Next,
    /// List events of a month, across the current and next year
    Month {
        #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
    },
    /// Print the merged calendar as JSON records
    Export,
    /// Printable agenda of one month
    Agenda {
        #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
        /// Defaults to the current year
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        json: bool,
    },
    /// Register a manual event
    Add {
        #[arg(long)]
        title: String,
        /// dd/mm/yyyy or yyyy-mm-dd
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "19:00")]
        time: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        location: String,
    },
    /// Edit a manual event; omitted fields keep their value
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        time: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        location: Option<String>,
    },
    /// Delete a manual event
    Delete { id: u64 },
    /// List stored manual events, unreadable rows included
    List,
    /// Delete every manual event. Cannot be undone
    Purge {
        #[arg(long)]
        yes: bool,
    },
    /// Draw bingo cards and print them as JSON
    Bingo {
        #[arg(long, default_value_t = 1)]
        cards: usize,
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        prize: String,
        /// Draw date, dd/mm/yyyy
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "15:00")]
        time: String,
        #[arg(long, default_value = "")]
        note: String,
        /// Fixed seed for reproducible cards
        #[arg(long)]
        seed: Option<u64>,
    },
}

pub fn run(command: Command, settings: &Settings) -> Result<()> {
    let mut store = CsvStore::with_defaults(settings.store_path(), settings.record_defaults());
    let now = Local::now().naive_local();
    let options = settings.liturgical_options();

    let merged = |store: &CsvStore| -> Result<Vec<CalendarEvent>> {
        let report = store.load()?;
        Ok(merge_with(&report.events, now, &options))
    };

    match command {
        Command::Next => match next_event(&merged(&store)?, now) {
            Some(ev) => println!("{} | {} at {} | {}", ev.title, ev.date_display(), ev.time_display(), ev.local),
            None => println!("No upcoming events"),
        },
        Command::Month { month } => {
            let events = merged(&store)?;
            let mut selected = events_in_month(&events, month);
            selected.sort_by_key(|e| e.start);
            for ev in selected {
                println!("{} {}  {:<6} {}", ev.date_display(), ev.time_display(), ev.id.to_string(), ev.title);
            }
        }
        Command::Export => {
            let records: Vec<EventRecord> = merged(&store)?.iter().map(CalendarEvent::to_record).collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Agenda { month, year, json } => {
            let year = year.unwrap_or(now.year());
            // liturgical entries for the requested year, whatever the current one
            let reference = NaiveDate::from_ymd_opt(year, 1, 1)
                .map(|d| d.and_time(NaiveTime::MIN))
                .unwrap_or(now);
            let report = store.load()?;
            let events = merge_with(&report.events, reference, &options);
            let selected = events_in_month(&events, month)
                .into_iter()
                .filter(|e| e.start.year() == year);
            let agenda = MonthlyAgenda::build(month_label(year, month), selected).with_parish(&settings.parish.name);
            if json {
                println!("{}", serde_json::to_string_pretty(&agenda)?);
            } else {
                print!("{}", agenda.to_text());
            }
        }
        Command::Add { title, date, time, category, location } => {
            let draft = EventDraft::from_form(&title, &date, &time, &category, &location, &options.location)?;
            let event = store.create(draft)?;
            println!("Created event {}: {}", event.id, event.title);
        }
        Command::Edit { id, title, date, time, category, location } => {
            let report = store.load()?;
            let Some(mut event) = report.events.into_iter().find(|e| e.id.manual() == Some(id)) else {
                bail!("no manual event with id {id}");
            };
            let draft = EventDraft::from_form(
                title.as_deref().unwrap_or(&event.title),
                date.as_deref().unwrap_or(&event.date_display()),
                time.as_deref().unwrap_or(&event.time_display()),
                category.as_deref().unwrap_or(&event.categoria),
                location.as_deref().unwrap_or(&event.local),
                &options.location,
            )?;
            draft.apply_to(&mut event);
            store.update(&event)?;
            println!("Updated event {}", event.id);
        }
        Command::Delete { id } => {
            store.remove(id)?;
            println!("Deleted event {id}");
        }
        Command::List => {
            let report = store.load()?;
            for ev in &report.events {
                println!(
                    "{:>5}  {} {}  {:<12} {} @ {}",
                    ev.id.to_string(),
                    ev.date_display(),
                    ev.time_display(),
                    ev.categoria,
                    ev.title,
                    ev.local
                );
            }
            for skipped in &report.skipped {
                println!("line {:>3}: {} ({:?})", skipped.line, skipped.reason, skipped.record.title);
            }
            eprintln!("{}", report.summary());
        }
        Command::Purge { yes } => {
            if !yes {
                bail!("refusing to delete all manual events without --yes");
            }
            store.clear()?;
            println!("All manual events deleted from {}", store.path().display());
        }
        Command::Bingo { cards, title, prize, date, time, note, seed } => {
            if cards == 0 || cards > MAX_CARDS {
                bail!("--cards must be between 1 and {MAX_CARDS}");
            }
            let event = BingoEvent {
                title,
                prize,
                draw_date: NaiveDate::parse_from_str(date.trim(), "%d/%m/%Y")
                    .wrap_err_with(|| format!("invalid draw date {date:?}"))?,
                draw_time: NaiveTime::parse_from_str(time.trim(), "%H:%M")
                    .wrap_err_with(|| format!("invalid draw time {time:?}"))?,
                note,
            };
            let mut rng: Box<dyn RngCore> = match seed {
                Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
                None => Box::new(rand::rng()),
            };
            let sheet = BingoSheet::generate(&mut *rng, event, cards)?;
            println!("{}", serde_json::to_string_pretty(&sheet)?);
        }
    }

    Ok(())
}
