//! Error types for eventsync storage.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while saving or loading events.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Cannot create storage file: {}", path.display())]
    FileCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required fields")]
    MissingFields,

    #[error("Invalid timestamp '{value}': {source}")]
    TimestampParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Invalid participant format: {0}")]
    InvalidParticipantFormat(String),

    #[error("Invalid participant data: {0}")]
    InvalidParticipantData(String),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    #[error("Invalid {field}: {value:?} (must not contain line breaks, control characters or '{delimiter}')")]
    InvalidField {
        field: &'static str,
        value: String,
        delimiter: &'static str,
    },

    #[error("Skipping corrupted line {line_number}: {line} | Error: {source}")]
    CorruptedLine {
        line_number: usize,
        line: String,
        #[source]
        source: Box<StorageError>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("User storage error: {0}")]
    UserStore(String),
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
