use std::fs;
use std::path::{Path, PathBuf};

use csv::{ByteRecord, StringRecord};

use super::draft::EventDraft;
use super::event::{CalendarEvent, EventId};
use super::record::{EventRecord, RecordDefaults, COLUMNS};
use crate::error::{RecordError, StoreError};

/// A stored row that could not be turned into an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// 1-based line in the store file, header included.
    pub line: usize,
    pub record: EventRecord,
    pub reason: RecordError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub events: Vec<CalendarEvent>,
    pub skipped: Vec<SkippedRecord>,
}

impl LoadReport {
    pub fn summary(&self) -> String {
        format!("loaded {}, skipped {}", self.events.len(), self.skipped.len())
    }
}

/// Storage for manual events. Liturgical events are never persisted.
pub trait EventRepository {
    fn load(&self) -> Result<LoadReport, StoreError>;

    /// Replace the whole store with `events`.
    fn save(&mut self, events: &[CalendarEvent]) -> Result<(), StoreError>;

    fn append(&mut self, event: CalendarEvent) -> Result<(), StoreError>;

    /// Replace the stored event carrying `event.id`.
    fn update(&mut self, event: &CalendarEvent) -> Result<(), StoreError>;

    fn remove(&mut self, id: u64) -> Result<(), StoreError>;

    /// Discard every manual event. Irreversible.
    fn clear(&mut self) -> Result<(), StoreError>;

    fn next_id(&self) -> Result<u64, StoreError>;

    /// Assign the next id to `draft` and persist it.
    fn create(&mut self, draft: EventDraft) -> Result<CalendarEvent, StoreError> {
        let event = draft.into_event(self.next_id()?);
        self.append(event.clone())?;
        Ok(event)
    }
}

fn manual_id(event: &CalendarEvent) -> Result<u64, StoreError> {
    event
        .id
        .manual()
        .ok_or_else(|| StoreError::ReadOnly(event.id.to_string()))
}

/// One data row of the store file, in `COLUMNS` order.
#[derive(Debug, Clone)]
enum Row {
    Parsed { line: u64, record: EventRecord },
    /// Fields that are not valid UTF-8. Written back byte for byte.
    Undecodable { line: u64, raw: ByteRecord },
}

impl Row {
    /// A row that is not on disk yet.
    fn from_event(event: &CalendarEvent) -> Self {
        Row::Parsed {
            line: 0,
            record: event.to_record(),
        }
    }

    fn id(&self) -> Option<u64> {
        match self {
            Row::Parsed { record, .. } => record_id(record),
            Row::Undecodable { raw, .. } => raw
                .get(0)
                .and_then(|id| std::str::from_utf8(id).ok())
                .and_then(|id| id.parse::<EventId>().ok())
                .and_then(|id| id.manual()),
        }
    }
}

/// Flat CSV file, read fully and rewritten fully on every mutation.
///
/// Rows that fail to parse are kept on disk untouched by `append`, `update`
/// and `remove`.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
    defaults: RecordDefaults,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_defaults(path, RecordDefaults::default())
    }

    pub fn with_defaults(path: impl Into<PathBuf>, defaults: RecordDefaults) -> Self {
        Self {
            path: path.into(),
            defaults,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_error(&self, source: csv::Error) -> StoreError {
        StoreError::Csv {
            path: self.path.clone(),
            source,
        }
    }

    /// All rows with missing columns back-filled.
    ///
    /// Columns are matched by header name, so older files with fewer or
    /// reordered columns still load.
    fn read_rows(&self) -> Result<Vec<Row>, StoreError> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "creating empty event store");
            self.write_rows(&[])?;
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| self.csv_error(e))?;

        let headers = reader.byte_headers().map_err(|e| self.csv_error(e))?.clone();
        let layout: Vec<Option<usize>> = COLUMNS
            .iter()
            .map(|column| headers.iter().position(|h| h == column.as_bytes()))
            .collect();
        let columns = ByteRecord::from(COLUMNS.to_vec());

        let mut rows = Vec::new();
        for result in reader.byte_records() {
            let raw = result.map_err(|e| self.csv_error(e))?;
            let line = raw.position().map_or(0, |p| p.line());
            let aligned: ByteRecord = layout
                .iter()
                .map(|index| index.and_then(|i| raw.get(i)).unwrap_or_default())
                .collect();

            match aligned.deserialize::<EventRecord>(Some(&columns)) {
                Ok(record) => rows.push(Row::Parsed { line, record }),
                Err(e) => {
                    tracing::warn!(line, error = %e, "undecodable row in event store");
                    rows.push(Row::Undecodable { line, raw: aligned });
                }
            }
        }

        backfill_ids(&mut rows);
        for row in &mut rows {
            if let Row::Parsed { record, .. } = row {
                record.fill_defaults(&self.defaults);
            }
        }
        Ok(rows)
    }

    fn write_rows(&self, rows: &[Row]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&self.path)
            .map_err(|e| self.csv_error(e))?;
        writer.write_record(COLUMNS).map_err(|e| self.csv_error(e))?;
        for row in rows {
            let written = match row {
                Row::Parsed { record, .. } => writer.serialize(record),
                Row::Undecodable { raw, .. } => writer.write_byte_record(raw),
            };
            written.map_err(|e| self.csv_error(e))?;
        }
        writer.flush().map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), rows = rows.len(), "event store written");
        Ok(())
    }

    fn position(rows: &[Row], id: u64) -> Option<usize> {
        rows.iter().position(|r| r.id() == Some(id))
    }
}

impl EventRepository for CsvStore {
    fn load(&self) -> Result<LoadReport, StoreError> {
        let mut report = LoadReport::default();

        for row in self.read_rows()? {
            let (line, record, reason) = match row {
                Row::Parsed { line, record } => match record.to_manual_event() {
                    Ok(event) => {
                        report.events.push(event);
                        continue;
                    }
                    Err(reason) => (line, record, reason),
                },
                Row::Undecodable { line, raw } => (
                    line,
                    lossy_record(&raw),
                    RecordError::Malformed("invalid UTF-8".to_string()),
                ),
            };
            tracing::warn!(line, %reason, "skipping stored event");
            report.skipped.push(SkippedRecord {
                line: line as usize,
                record,
                reason,
            });
        }

        tracing::debug!(path = %self.path.display(), "{}", report.summary());
        Ok(report)
    }

    fn save(&mut self, events: &[CalendarEvent]) -> Result<(), StoreError> {
        let rows: Vec<Row> = events.iter().map(Row::from_event).collect();
        self.write_rows(&rows)
    }

    fn append(&mut self, event: CalendarEvent) -> Result<(), StoreError> {
        manual_id(&event)?;
        let mut rows = self.read_rows()?;
        rows.push(Row::from_event(&event));
        self.write_rows(&rows)?;
        tracing::info!(id = %event.id, title = %event.title, "event created");
        Ok(())
    }

    fn update(&mut self, event: &CalendarEvent) -> Result<(), StoreError> {
        let id = manual_id(event)?;
        let mut rows = self.read_rows()?;
        let index = Self::position(&rows, id).ok_or(StoreError::NotFound(id))?;
        rows[index] = Row::from_event(event);
        self.write_rows(&rows)?;
        tracing::info!(id, "event updated");
        Ok(())
    }

    fn remove(&mut self, id: u64) -> Result<(), StoreError> {
        let mut rows = self.read_rows()?;
        let index = Self::position(&rows, id).ok_or(StoreError::NotFound(id))?;
        rows.remove(index);
        self.write_rows(&rows)?;
        tracing::info!(id, "event deleted");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::warn!(path = %self.path.display(), "all manual events deleted");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn next_id(&self) -> Result<u64, StoreError> {
        let rows = self.read_rows()?;
        Ok(rows.iter().filter_map(Row::id).max().unwrap_or(0) + 1)
    }
}

fn record_id(record: &EventRecord) -> Option<u64> {
    record
        .id
        .as_deref()
        .and_then(|id| id.parse::<EventId>().ok())
        .and_then(|id| id.manual())
}

/// Best-effort text view of an undecodable row, for reporting only.
fn lossy_record(raw: &ByteRecord) -> EventRecord {
    let fields: Vec<String> = raw
        .iter()
        .map(|field| String::from_utf8_lossy(field).into_owned())
        .collect();
    StringRecord::from(fields)
        .deserialize(Some(&StringRecord::from(COLUMNS.to_vec())))
        .unwrap_or_default()
}

/// Give parsed rows without an id sequential ids after the highest existing one.
fn backfill_ids(rows: &mut [Row]) {
    let mut next = rows.iter().filter_map(Row::id).max().unwrap_or(0) + 1;
    for row in rows.iter_mut() {
        if let Row::Parsed { record, .. } = row {
            if record.id.as_deref().map_or(true, |id| id.trim().is_empty()) {
                record.id = Some(next.to_string());
                next += 1;
            }
        }
    }
}

/// Volatile store, mostly useful in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    events: Vec<CalendarEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventRepository for MemoryStore {
    fn load(&self) -> Result<LoadReport, StoreError> {
        Ok(LoadReport {
            events: self.events.clone(),
            skipped: Vec::new(),
        })
    }

    fn save(&mut self, events: &[CalendarEvent]) -> Result<(), StoreError> {
        self.events = events.to_vec();
        Ok(())
    }

    fn append(&mut self, event: CalendarEvent) -> Result<(), StoreError> {
        manual_id(&event)?;
        self.events.push(event);
        Ok(())
    }

    fn update(&mut self, event: &CalendarEvent) -> Result<(), StoreError> {
        let id = manual_id(event)?;
        let slot = self
            .events
            .iter_mut()
            .find(|e| e.id == event.id)
            .ok_or(StoreError::NotFound(id))?;
        *slot = event.clone();
        Ok(())
    }

    fn remove(&mut self, id: u64) -> Result<(), StoreError> {
        let before = self.events.len();
        self.events.retain(|e| e.id != EventId::Manual(id));
        if self.events.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.events.clear();
        Ok(())
    }

    fn next_id(&self) -> Result<u64, StoreError> {
        Ok(self.events.iter().filter_map(|e| e.id.manual()).max().unwrap_or(0) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::DEFAULT_LOCATION;

    fn draft(title: &str) -> EventDraft {
        EventDraft::from_form(title, "01/03/2025", "19:00", "Ensaio", "", DEFAULT_LOCATION).unwrap()
    }

    fn parsed(id: Option<&str>) -> Row {
        Row::Parsed {
            line: 0,
            record: EventRecord { id: id.map(String::from), ..Default::default() },
        }
    }

    #[test]
    fn backfill_continues_after_highest_id() {
        let mut rows = vec![
            parsed(Some("5")),
            parsed(None),
            Row::Undecodable { line: 3, raw: ByteRecord::from(vec![&b"9"[..], &b"\xff"[..]]) },
            parsed(Some(" ")),
        ];
        backfill_ids(&mut rows);
        let ids: Vec<_> = rows.iter().map(|r| r.id().unwrap()).collect();
        assert_eq!(ids, [5, 10, 9, 11]);
    }

    #[test]
    fn memory_store_lifecycle() {
        let mut store = MemoryStore::new();
        let a = store.create(draft("Coral")).unwrap();
        let b = store.create(draft("Coral jovem")).unwrap();
        assert_eq!((a.id, b.id), (EventId::Manual(1), EventId::Manual(2)));

        let mut edited = a.clone();
        edited.title = "Coral adulto".into();
        store.update(&edited).unwrap();
        store.remove(2).unwrap();

        let report = store.load().unwrap();
        assert_eq!(report.events, vec![edited]);
        assert!(matches!(store.remove(2), Err(StoreError::NotFound(2))));
    }

    #[test]
    fn liturgical_events_are_read_only() {
        let mut store = MemoryStore::new();
        let feast = crate::liturgy::generate_liturgical_events(2025).remove(0);
        assert!(matches!(store.update(&feast), Err(StoreError::ReadOnly(_))));
        assert!(matches!(store.append(feast), Err(StoreError::ReadOnly(_))));
    }
}
