use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Bingo(#[from] BingoError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failures of the persisted event store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access event store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed event store {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("event {0} is liturgical and cannot be modified")]
    ReadOnly(String),

    #[error("no manual event with id {0}")]
    NotFound(u64),
}

/// Why a single stored row could not become an event.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("unparseable start {0:?}")]
    Start(String),

    #[error("unparseable id {0:?}")]
    Id(String),

    #[error("unreadable row: {0}")]
    Malformed(String),
}

/// Rejections at the form boundary. Nothing is persisted when one occurs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please give the event a name")]
    EmptyTitle,

    #[error("Invalid date {0:?} (use dd/mm/yyyy)")]
    Date(String),

    #[error("Invalid time {0:?} (use HH:MM)")]
    Time(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BingoError {
    #[error("card count must be between 1 and {max}, got {requested}")]
    CardCount { requested: usize, max: usize },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {field}: {value:?}")]
    Invalid { field: &'static str, value: String },
}
