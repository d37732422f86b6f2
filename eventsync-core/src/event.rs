//! Calendar events.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::TIME_FORMAT;
use crate::participant::Participant;

/// A calendar entry with its time range and attached participants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub location: String,
    pub description: String,
    participants: Vec<Participant>,
}

impl Event {
    pub fn new(
        name: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
        location: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Event {
            name: name.into(),
            start,
            end,
            location: location.into(),
            description: description.into(),
            participants: Vec::new(),
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Attach a participant. Returns false if one with the same name is already attached.
    pub fn add_participant(&mut self, participant: Participant) -> bool {
        if self.has_participant(&participant.name) {
            return false;
        }
        self.participants.push(participant);
        true
    }

    /// Detach the participant with this name (case-insensitive).
    pub fn remove_participant(&mut self, name: &str) -> Option<Participant> {
        let index = self.participants.iter().position(|p| p.has_name(name))?;
        Some(self.participants.remove(index))
    }

    pub fn has_participant(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p.has_name(name))
    }

    /// Case-insensitive keyword match on the text fields and participant names.
    pub fn matches_keyword(&self, keyword: &str) -> bool {
        let keyword = keyword.to_lowercase();
        [&self.name, &self.location, &self.description]
            .into_iter()
            .any(|field| field.to_lowercase().contains(&keyword))
            || self
                .participants
                .iter()
                .any(|p| p.name.to_lowercase().contains(&keyword))
    }

    /// Render the time range, e.g. "2024-01-01 09:00 → 2024-01-01 10:00"
    pub fn render_time_range(&self) -> String {
        format!(
            "{} → {}",
            self.start.format(TIME_FORMAT),
            self.end.format(TIME_FORMAT)
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
