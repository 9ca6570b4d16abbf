use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

use super::easter::compute_easter;
use crate::calendar::category::LITURGICAL_CATEGORY;
use crate::calendar::{CalendarEvent, EventId, DEFAULT_LOCATION};

/// The observances generated for every year, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feast {
    Christmas,
    ChristmasEve,
    Aparecida,
    Patroness,
    Epiphany,
    AshWednesday,
    GoodFriday,
    EasterSunday,
    CorpusChristi,
}

/// When a feast falls within its year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeastDate {
    Fixed { month: u32, day: u32 },
    /// Days relative to Easter Sunday.
    Moveable(i64),
}

impl Feast {
    pub const ALL: [Feast; 9] = [
        Feast::Christmas,
        Feast::ChristmasEve,
        Feast::Aparecida,
        Feast::Patroness,
        Feast::Epiphany,
        Feast::AshWednesday,
        Feast::GoodFriday,
        Feast::EasterSunday,
        Feast::CorpusChristi,
    ];

    /// Stable tag used in generated identifiers.
    pub fn code(self) -> &'static str {
        match self {
            Feast::Christmas => "natal",
            Feast::ChristmasEve => "vespera-natal",
            Feast::Aparecida => "aparecida",
            Feast::Patroness => "padroeira",
            Feast::Epiphany => "reis",
            Feast::AshWednesday => "cinzas",
            Feast::GoodFriday => "paixao",
            Feast::EasterSunday => "pascoa",
            Feast::CorpusChristi => "corpus-christi",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.code() == code)
    }

    pub fn title(self) -> &'static str {
        match self {
            Feast::Christmas => "⛪ Natal",
            Feast::ChristmasEve => "⛪ Véspera de Natal",
            Feast::Aparecida => "⛪ N. Sra. Aparecida",
            Feast::Patroness => "✨ N. Sra. das Dores (Padroeira)",
            Feast::Epiphany => "⛪ Dia de Reis",
            Feast::AshWednesday => "🟣 Quarta-feira de Cinzas",
            Feast::GoodFriday => "🔴 Sexta-feira da Paixão",
            Feast::EasterSunday => "⚪ Domingo de Páscoa",
            Feast::CorpusChristi => "⚪ Corpus Christi",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Feast::Christmas | Feast::ChristmasEve => "#B03A2E",
            Feast::Aparecida => "#2E86C1",
            Feast::Patroness => "#1A5276",
            Feast::Epiphany => "#7D3C98",
            Feast::AshWednesday => "#6C3483",
            Feast::GoodFriday => "#943126",
            Feast::EasterSunday | Feast::CorpusChristi => "#F1C40F",
        }
    }

    pub fn date_rule(self) -> FeastDate {
        match self {
            Feast::Christmas => FeastDate::Fixed { month: 12, day: 25 },
            Feast::ChristmasEve => FeastDate::Fixed { month: 12, day: 24 },
            Feast::Aparecida => FeastDate::Fixed { month: 10, day: 12 },
            Feast::Patroness => FeastDate::Fixed { month: 9, day: 15 },
            Feast::Epiphany => FeastDate::Fixed { month: 1, day: 6 },
            Feast::AshWednesday => FeastDate::Moveable(-46),
            Feast::GoodFriday => FeastDate::Moveable(-2),
            Feast::EasterSunday => FeastDate::Moveable(0),
            Feast::CorpusChristi => FeastDate::Moveable(60),
        }
    }

    /// Default start time. The patronal feast can be overridden through
    /// [`LiturgicalOptions::patronal_time`].
    pub fn time(self) -> NaiveTime {
        let (h, m) = match self {
            Feast::ChristmasEve => (19, 0),
            Feast::GoodFriday => (15, 0),
            Feast::AshWednesday | Feast::EasterSunday | Feast::CorpusChristi => (8, 0),
            Feast::Christmas | Feast::Aparecida | Feast::Patroness | Feast::Epiphany => (0, 0),
        };
        NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
    }

    pub fn date_in(self, year: i32, easter: NaiveDate) -> NaiveDate {
        debug_assert_eq!(easter.year(), year);
        match self.date_rule() {
            FeastDate::Fixed { month, day } => NaiveDate::from_ymd_opt(year, month, day)
                .expect("fixed feasts fall on days that exist every year"),
            FeastDate::Moveable(offset) => easter + Duration::days(offset),
        }
    }
}

/// Parish-specific knobs for the generated entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiturgicalOptions {
    pub location: String,
    pub patronal_time: NaiveTime,
}

impl Default for LiturgicalOptions {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION.to_string(),
            patronal_time: Feast::Patroness.time(),
        }
    }
}

/// Liturgical entries for `year` with default options.
pub fn generate_liturgical_events(year: i32) -> Vec<CalendarEvent> {
    generate_liturgical_events_with(year, &LiturgicalOptions::default())
}

pub fn generate_liturgical_events_with(year: i32, options: &LiturgicalOptions) -> Vec<CalendarEvent> {
    let easter = compute_easter(year);

    Feast::ALL
        .into_iter()
        .map(|feast| {
            let time = match feast {
                Feast::Patroness => options.patronal_time,
                _ => feast.time(),
            };
            let start = feast.date_in(year, easter).and_time(time);

            CalendarEvent {
                id: EventId::Liturgical { feast, year },
                title: feast.title().to_string(),
                start,
                end: start,
                color: feast.color().to_string(),
                categoria: LITURGICAL_CATEGORY.to_string(),
                local: options.location.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn start_of(events: &[CalendarEvent], feast: Feast) -> chrono::NaiveDateTime {
        events
            .iter()
            .find(|e| matches!(e.id, EventId::Liturgical { feast: f, .. } if f == feast))
            .map(|e| e.start)
            .unwrap()
    }

    #[test]
    fn same_feasts_every_year() {
        let reference: HashSet<Feast> = Feast::ALL.into_iter().collect();
        for year in 1900..=2100 {
            let events = generate_liturgical_events(year);
            assert_eq!(events.len(), Feast::ALL.len());
            let feasts: HashSet<Feast> = events
                .iter()
                .filter_map(|e| match e.id {
                    EventId::Liturgical { feast, year: y } if y == year => Some(feast),
                    _ => None,
                })
                .collect();
            assert_eq!(feasts, reference);
        }
    }

    #[test]
    fn moveable_feasts_follow_easter() {
        for year in 1900..=2100 {
            let easter = compute_easter(year);
            let events = generate_liturgical_events(year);
            assert_eq!(start_of(&events, Feast::AshWednesday).date(), easter - Duration::days(46));
            assert_eq!(start_of(&events, Feast::GoodFriday).date(), easter - Duration::days(2));
            assert_eq!(start_of(&events, Feast::EasterSunday).date(), easter);
            assert_eq!(start_of(&events, Feast::CorpusChristi).date(), easter + Duration::days(60));
        }
    }

    #[test]
    fn fixed_times_for_2025() {
        let events = generate_liturgical_events(2025);
        let fmt = |f| start_of(&events, f).format("%Y-%m-%dT%H:%M:%S").to_string();

        assert_eq!(fmt(Feast::Christmas), "2025-12-25T00:00:00");
        assert_eq!(fmt(Feast::ChristmasEve), "2025-12-24T19:00:00");
        assert_eq!(fmt(Feast::Aparecida), "2025-10-12T00:00:00");
        assert_eq!(fmt(Feast::Patroness), "2025-09-15T00:00:00");
        assert_eq!(fmt(Feast::Epiphany), "2025-01-06T00:00:00");
        assert_eq!(fmt(Feast::AshWednesday), "2025-03-05T08:00:00");
        assert_eq!(fmt(Feast::GoodFriday), "2025-04-18T15:00:00");
        assert_eq!(fmt(Feast::EasterSunday), "2025-04-20T08:00:00");
        assert_eq!(fmt(Feast::CorpusChristi), "2025-06-19T08:00:00");
    }

    #[test]
    fn generation_is_idempotent() {
        assert_eq!(generate_liturgical_events(2031), generate_liturgical_events(2031));
    }

    #[test]
    fn entries_are_instants_with_year_scoped_ids() {
        let a = generate_liturgical_events(2025);
        let b = generate_liturgical_events(2026);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.start, x.end);
            assert_ne!(x.id, y.id);
            assert!(!x.id.is_editable());
        }
    }

    #[test]
    fn patronal_time_is_configurable() {
        let options = LiturgicalOptions {
            location: "Matriz".to_string(),
            patronal_time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
        };
        let events = generate_liturgical_events_with(2025, &options);
        let patroness = start_of(&events, Feast::Patroness);
        assert_eq!(patroness.format("%m-%d %H:%M").to_string(), "09-15 19:00");
        assert!(events.iter().all(|e| e.local == "Matriz"));
    }

    #[test]
    fn codes_round_trip() {
        for feast in Feast::ALL {
            assert_eq!(Feast::from_code(feast.code()), Some(feast));
        }
        assert_eq!(Feast::from_code("carnaval"), None);
    }
}
