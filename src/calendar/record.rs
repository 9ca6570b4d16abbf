//! Flat, string-typed form of an event as it appears in the store file and at
//! the rendering boundary.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::category::{self, DEFAULT_CATEGORY};
use super::event::{CalendarEvent, EventId, DEFAULT_LOCATION};
use crate::error::RecordError;

pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Column order of the store file.
pub const COLUMNS: [&str; 7] = ["id", "title", "start", "end", "color", "categoria", "local"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub categoria: Option<String>,
    #[serde(default)]
    pub local: Option<String>,
}

/// Values substituted for columns older store files lack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDefaults {
    pub location: String,
    pub category: String,
}

impl Default for RecordDefaults {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

impl EventRecord {
    /// Back-fill the optional columns. Never fails.
    pub fn fill_defaults(&mut self, defaults: &RecordDefaults) {
        if is_blank(&self.local) {
            self.local = Some(defaults.location.clone());
        }
        if is_blank(&self.categoria) {
            self.categoria = Some(defaults.category.clone());
        }
        if is_blank(&self.color) {
            let category = self.categoria.as_deref().unwrap_or(DEFAULT_CATEGORY);
            self.color = Some(category::color_for(category).to_string());
        }
        if is_blank(&self.end) {
            self.end = Some(self.start.clone());
        }
    }

    /// Convert a stored row into a manual event.
    pub fn to_manual_event(&self) -> Result<CalendarEvent, RecordError> {
        let raw_id = self.id.as_deref().unwrap_or_default();
        let id = match raw_id.parse()? {
            id @ EventId::Manual(_) => id,
            EventId::Liturgical { .. } => return Err(RecordError::Id(raw_id.to_string())),
        };

        let start = parse_timestamp(&self.start).ok_or_else(|| RecordError::Start(self.start.clone()))?;
        let end = self.end.as_deref().and_then(parse_timestamp).unwrap_or(start);
        let categoria = self
            .categoria
            .clone()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        let color = self
            .color
            .clone()
            .unwrap_or_else(|| category::color_for(&categoria).to_string());

        Ok(CalendarEvent {
            id,
            title: self.title.clone(),
            start,
            end,
            color,
            categoria,
            local: self.local.clone().unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
        })
    }
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |s| s.trim().is_empty())
}

/// Parse the combined date+time strings found in store files.
///
/// Accepts ISO-8601 with or without seconds/fractions, a space separator, and
/// bare dates (midnight).
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = s.parse::<NaiveDateTime>() {
        return Some(dt);
    }
    for fmt in ["%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, start: &str) -> EventRecord {
        EventRecord {
            id: Some(id.to_string()),
            title: "[Reunião] Conselho".to_string(),
            start: start.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn parses_common_timestamp_shapes() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(19, 30, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2025-03-01T19:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-01T19:30"), Some(expected));
        assert_eq!(parse_timestamp("2025-03-01 19:30:00"), Some(expected));
        assert_eq!(parse_timestamp(" 2025-03-01T19:30:00.000 "), Some(expected));
        assert_eq!(
            parse_timestamp("2025-03-01"),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_timestamp("01/03/2025"), None);
        assert_eq!(parse_timestamp(""), None);
    }

    #[test]
    fn defaults_fill_missing_columns() {
        let mut rec = record("1", "2025-03-01T19:30:00");
        rec.fill_defaults(&RecordDefaults::default());

        assert_eq!(rec.local.as_deref(), Some(DEFAULT_LOCATION));
        assert_eq!(rec.categoria.as_deref(), Some(DEFAULT_CATEGORY));
        assert_eq!(rec.color.as_deref(), Some(category::DEFAULT_COLOR));
        assert_eq!(rec.end.as_deref(), Some("2025-03-01T19:30:00"));
    }

    #[test]
    fn defaults_keep_present_values() {
        let mut rec = record("1", "2025-03-01T19:30:00");
        rec.local = Some("Salão paroquial".to_string());
        rec.categoria = Some("Reunião".to_string());
        rec.fill_defaults(&RecordDefaults::default());

        assert_eq!(rec.local.as_deref(), Some("Salão paroquial"));
        assert_eq!(rec.color.as_deref(), Some("#3D9DF3"));
    }

    #[test]
    fn bad_start_is_a_record_error() {
        let rec = record("1", "soon");
        assert_eq!(rec.to_manual_event(), Err(RecordError::Start("soon".to_string())));
    }

    #[test]
    fn liturgical_ids_are_not_stored_events() {
        let rec = record("auto-natal-2025", "2025-12-25T00:00:00");
        assert!(matches!(rec.to_manual_event(), Err(RecordError::Id(_))));
    }

    #[test]
    fn event_to_record_and_back() {
        let mut rec = record("9", "2025-05-10T09:00:00");
        rec.fill_defaults(&RecordDefaults::default());
        let event = rec.to_manual_event().unwrap();
        assert_eq!(event.to_record(), rec);
    }
}
