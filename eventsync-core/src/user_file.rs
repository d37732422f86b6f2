//! Participants stored in a TOML file.
//!
//! ```toml
//! [[participant]]
//! name = "alice"
//! access_level = "ADMIN"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::validate_participant_name;
use crate::error::{StorageError, StorageResult};
use crate::participant::{AccessLevel, Participant, UserSource};

#[derive(Debug, Default, Serialize, Deserialize)]
struct UserFileContents {
    #[serde(default, rename = "participant")]
    participants: Vec<UserRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct UserRecord {
    name: String,
    access_level: String,
}

/// A participants file on disk.
#[derive(Debug, Clone)]
pub struct UserFile {
    path: PathBuf,
}

impl UserFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        UserFile { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add a participant and rewrite the file.
    ///
    /// Names are written into the events file, so they must not contain line
    /// breaks or any of the storage delimiters.
    pub fn add(&self, participant: Participant) -> StorageResult<()> {
        validate_participant_name(&participant.name)?;

        let mut participants = self.load_users()?;

        if participants.iter().any(|p| p.has_name(&participant.name)) {
            return Err(StorageError::UserStore(format!(
                "Participant '{}' already exists",
                participant.name
            )));
        }

        participants.push(participant);
        self.save(&participants)
    }

    pub fn save(&self, participants: &[Participant]) -> StorageResult<()> {
        let contents = UserFileContents {
            participants: participants
                .iter()
                .map(|p| UserRecord {
                    name: p.name.clone(),
                    access_level: p.access_level.to_string(),
                })
                .collect(),
        };

        let content = toml::to_string_pretty(&contents)
            .map_err(|e| StorageError::UserStore(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, content)?;

        Ok(())
    }
}

impl UserSource for UserFile {
    /// A missing file is an empty directory.
    fn load_users(&self) -> StorageResult<Vec<Participant>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no participants file, using empty directory");
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let contents: UserFileContents = toml::from_str(&content).map_err(|e| {
            StorageError::UserStore(format!("{}: {}", self.path.display(), e))
        })?;

        contents
            .participants
            .into_iter()
            .map(|record| {
                let access_level: AccessLevel = record.access_level.parse().map_err(|_| {
                    StorageError::UserStore(format!(
                        "Unknown access level '{}' for participant '{}'",
                        record.access_level, record.name
                    ))
                })?;
                Ok(Participant::new(record.name, access_level))
            })
            .collect()
    }
}
