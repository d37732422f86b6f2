//! Line codec for the events file.
//!
//! Each event is stored on one line as seven fields separated by `" | "`:
//!
//! ```text
//! <name> | <start> | <end> | <location> | <description> | <PRIORITY> | <name>:<LEVEL>,...
//! ```
//!
//! Timestamps use `yyyy-MM-dd HH:mm`. Priority and participants are optional
//! when reading so that lines written before they existed still load.
//! Field values are not escaped: a value containing a delimiter will not
//! survive a round trip.

use chrono::NaiveDateTime;

use crate::constants::{
    ACCESS_LEVEL_DELIMITER, FIELD_DELIMITER, PARTICIPANT_DELIMITER, REQUIRED_FIELDS, TIME_FORMAT,
};
use crate::error::{StorageError, StorageResult};
use crate::event::Event;
use crate::participant::{AccessLevel, ParticipantDirectory};
use crate::priority::Priority;

/// The seven raw fields of a stored line, after defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventParts {
    pub name: String,
    pub start: String,
    pub end: String,
    pub location: String,
    pub description: String,
    pub priority: String,
    pub participants: String,
}

/// Encode an event and its priority as a single line (without newline).
pub fn encode_line(event: &Event, priority: Priority) -> String {
    let participants = event
        .participants()
        .iter()
        .map(|p| format!("{}{}{}", p.name, ACCESS_LEVEL_DELIMITER, p.access_level))
        .collect::<Vec<_>>()
        .join(PARTICIPANT_DELIMITER);

    [
        event.name.clone(),
        event.start.format(TIME_FORMAT).to_string(),
        event.end.format(TIME_FORMAT).to_string(),
        event.location.clone(),
        event.description.clone(),
        priority.to_string(),
        participants,
    ]
    .join(FIELD_DELIMITER)
}

/// Split a line into its seven fields.
///
/// Whitespace around `|` is ignored. Lines with fewer than five fields fail
/// with `MissingFields`; a missing or empty priority becomes `LOW` and missing
/// participants become an empty string.
pub fn split_line(line: &str) -> StorageResult<EventParts> {
    let tokens: Vec<String> = line.trim().split('|').map(|t| t.trim().to_string()).collect();
    if tokens.len() < REQUIRED_FIELDS {
        return Err(StorageError::MissingFields);
    }

    let mut tokens = tokens.into_iter();
    let mut next = || tokens.next().unwrap_or_default();

    let name = next();
    let start = next();
    let end = next();
    let location = next();
    let description = next();
    let priority = Some(next())
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| Priority::default().to_string());
    let participants = next();

    Ok(EventParts {
        name,
        start,
        end,
        location,
        description,
        priority,
        participants,
    })
}

/// Build an event from split fields, resolving participants in `directory`.
///
/// Participants are attached in the order they are listed, using the
/// directory's record for each name.
pub fn decode_event(
    parts: &EventParts,
    directory: &ParticipantDirectory,
) -> StorageResult<(Event, Priority)> {
    if parts.name.is_empty() || parts.start.is_empty() || parts.end.is_empty() {
        return Err(StorageError::MissingFields);
    }

    let start = parse_timestamp(&parts.start)?;
    let end = parse_timestamp(&parts.end)?;
    let priority: Priority = parts.priority.parse()?;

    let mut event = Event::new(
        parts.name.as_str(),
        start,
        end,
        parts.location.as_str(),
        parts.description.as_str(),
    );

    if !parts.participants.is_empty() {
        for entry in split_trimmed(&parts.participants, PARTICIPANT_DELIMITER) {
            let fields = split_trimmed(entry, ACCESS_LEVEL_DELIMITER);
            let [name, level] = fields.as_slice() else {
                return Err(StorageError::InvalidParticipantFormat(entry.to_string()));
            };

            level
                .parse::<AccessLevel>()
                .map_err(|_| StorageError::InvalidParticipantData(entry.to_string()))?;

            let participant = directory.resolve(name)?;
            event.add_participant(participant.clone());
        }
    }

    Ok((event, priority))
}

/// Split and decode one stored line.
pub fn decode_line(
    line: &str,
    directory: &ParticipantDirectory,
) -> StorageResult<(Event, Priority)> {
    let parts = split_line(line)?;
    decode_event(&parts, directory)
}

/// Check that a text field can be stored on one line and split back out.
///
/// Rejects control characters (including line breaks) and the field delimiter.
pub fn validate_text_field(field: &'static str, value: &str) -> StorageResult<()> {
    if value.chars().any(char::is_control) || value.contains('|') {
        return Err(StorageError::InvalidField {
            field,
            value: value.to_string(),
            delimiter: "|",
        });
    }
    Ok(())
}

/// Like `validate_text_field`, also rejecting the participant separators.
pub fn validate_participant_name(name: &str) -> StorageResult<()> {
    let invalid = name.trim().is_empty()
        || name.chars().any(char::is_control)
        || name.contains(['|', ',', ':']);
    if invalid {
        return Err(StorageError::InvalidField {
            field: "participant name",
            value: name.to_string(),
            delimiter: "|', ',' or ':",
        });
    }
    Ok(())
}

/// Parse a `yyyy-MM-dd HH:mm` timestamp.
pub fn parse_timestamp(value: &str) -> StorageResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIME_FORMAT).map_err(|source| {
        StorageError::TimestampParse {
            value: value.to_string(),
            source,
        }
    })
}

/// Split on `delimiter`, trimming each piece and dropping trailing empty pieces.
fn split_trimmed<'a>(value: &'a str, delimiter: &str) -> Vec<&'a str> {
    let mut pieces: Vec<&str> = value.split(delimiter).map(str::trim).collect();
    while pieces.last().is_some_and(|p| p.is_empty()) {
        pieces.pop();
    }
    pieces
}
