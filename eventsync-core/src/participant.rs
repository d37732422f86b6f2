//! Participants and the directory events are resolved against.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};

/// Access level granted to a participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccessLevel {
    Admin,
    Member,
}

impl AccessLevel {
    pub const ALL: [AccessLevel; 2] = [AccessLevel::Admin, AccessLevel::Member];

    /// Canonical uppercase form written to storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Admin => "ADMIN",
            AccessLevel::Member => "MEMBER",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = StorageError;

    /// Case-insensitive match against the canonical names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        AccessLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| StorageError::InvalidParticipantData(s.to_string()))
    }
}

/// A named user that events can reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub access_level: AccessLevel,
}

impl Participant {
    pub fn new(name: impl Into<String>, access_level: AccessLevel) -> Self {
        Participant {
            name: name.into(),
            access_level,
        }
    }

    /// Names identify participants regardless of case.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.access_level)
    }
}

/// Anything that can supply the full list of known participants.
pub trait UserSource {
    fn load_users(&self) -> StorageResult<Vec<Participant>>;
}

impl UserSource for Vec<Participant> {
    fn load_users(&self) -> StorageResult<Vec<Participant>> {
        Ok(self.clone())
    }
}

/// Known participants, looked up by name.
#[derive(Debug, Clone, Default)]
pub struct ParticipantDirectory {
    participants: Vec<Participant>,
}

impl ParticipantDirectory {
    pub fn new(participants: Vec<Participant>) -> Self {
        ParticipantDirectory { participants }
    }

    pub fn from_source(source: &dyn UserSource) -> StorageResult<Self> {
        Ok(Self::new(source.load_users()?))
    }

    /// First participant whose name matches, ignoring case.
    pub fn find(&self, name: &str) -> Option<&Participant> {
        self.participants.iter().find(|p| p.has_name(name))
    }

    /// Like `find`, but a miss is a `ParticipantNotFound` error.
    pub fn resolve(&self, name: &str) -> StorageResult<&Participant> {
        self.find(name)
            .ok_or_else(|| StorageError::ParticipantNotFound(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

impl UserSource for ParticipantDirectory {
    fn load_users(&self) -> StorageResult<Vec<Participant>> {
        Ok(self.participants.clone())
    }
}
