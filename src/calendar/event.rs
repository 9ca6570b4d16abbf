use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

use super::record::{EventRecord, DATETIME_FORMAT};
use crate::error::RecordError;
use crate::liturgy::Feast;

/// Canonical parish address used when an event has no location.
pub const DEFAULT_LOCATION: &str = "Paróquia Nossa Senhora das Dores";

/// Prefix reserved for generated liturgical identifiers.
pub const LITURGICAL_ID_PREFIX: &str = "auto-";

/// Identity of an event. Only manual events can be edited or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventId {
    Liturgical { feast: Feast, year: i32 },
    Manual(u64),
}

impl EventId {
    pub fn is_editable(&self) -> bool {
        matches!(self, EventId::Manual(_))
    }

    pub fn manual(&self) -> Option<u64> {
        match self {
            EventId::Manual(id) => Some(*id),
            EventId::Liturgical { .. } => None,
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Manual(id) => write!(f, "{id}"),
            EventId::Liturgical { feast, year } => {
                write!(f, "{LITURGICAL_ID_PREFIX}{}-{year}", feast.code())
            }
        }
    }
}

impl FromStr for EventId {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(rest) = s.strip_prefix(LITURGICAL_ID_PREFIX) {
            return rest
                .rsplit_once('-')
                .and_then(|(code, year)| Some((Feast::from_code(code)?, year.parse().ok()?)))
                .map(|(feast, year)| EventId::Liturgical { feast, year })
                .ok_or_else(|| RecordError::Id(s.to_string()));
        }

        // pandas writes integer columns containing blanks as floats ("3.0")
        let digits = s.strip_suffix(".0").unwrap_or(s);
        digits
            .parse()
            .map(EventId::Manual)
            .map_err(|_| RecordError::Id(s.to_string()))
    }
}

/// One occurrence on the schedule. Events are instants: `end == start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    pub id: EventId,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// `#RRGGBB`
    pub color: String,
    pub categoria: String,
    pub local: String,
}

impl CalendarEvent {
    pub fn is_editable(&self) -> bool {
        self.id.is_editable()
    }

    pub fn date_display(&self) -> String {
        self.start.format("%d/%m/%Y").to_string()
    }

    pub fn time_display(&self) -> String {
        self.start.format("%H:%M").to_string()
    }

    /// Record handed to rendering collaborators and written to the store.
    pub fn to_record(&self) -> EventRecord {
        EventRecord {
            id: Some(self.id.to_string()),
            title: self.title.clone(),
            start: self.start.format(DATETIME_FORMAT).to_string(),
            end: Some(self.end.format(DATETIME_FORMAT).to_string()),
            color: Some(self.color.clone()),
            categoria: Some(self.categoria.clone()),
            local: Some(self.local.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn liturgical_ids_round_trip() {
        let id = EventId::Liturgical { feast: Feast::CorpusChristi, year: 2025 };
        assert_eq!(id.to_string(), "auto-corpus-christi-2025");
        assert_eq!("auto-corpus-christi-2025".parse::<EventId>().unwrap(), id);
    }

    #[test]
    fn manual_ids_parse_as_integers() {
        assert_eq!("42".parse::<EventId>().unwrap(), EventId::Manual(42));
        assert_eq!("7.0".parse::<EventId>().unwrap(), EventId::Manual(7));
        assert!("auto-42".parse::<EventId>().is_err());
        assert!("abc".parse::<EventId>().is_err());
    }

    #[test]
    fn only_manual_events_are_editable() {
        assert!(EventId::Manual(1).is_editable());
        assert!(!EventId::Liturgical { feast: Feast::Christmas, year: 2025 }.is_editable());
        assert_eq!(EventId::Manual(3).manual(), Some(3));
    }
}
