//! The events file and participants file a command operates on.

use std::path::Path;

use anyhow::{Context, Result};
use eventsync_core::settings::Settings;
use eventsync_core::user_file::UserFile;
use eventsync_core::{Event, EventStore, LoadPolicy, LoadedEvents, ParticipantDirectory, Priority};
use tracing::debug;

pub struct Session {
    store: EventStore,
    users: UserFile,
}

impl Session {
    /// Build from settings, with command-line overrides taking precedence.
    pub fn new(
        settings: &Settings,
        data: Option<&Path>,
        users: Option<&Path>,
        skip_corrupted: bool,
    ) -> Result<Self> {
        let data_path = data.map(Path::to_path_buf).unwrap_or_else(|| settings.data_path());
        let users_path = users
            .map(Path::to_path_buf)
            .unwrap_or_else(|| settings.users_path());

        let policy = if skip_corrupted {
            LoadPolicy::SkipAndCollect
        } else {
            settings.on_corrupted_line
        };

        debug!(
            data = %data_path.display(),
            users = %users_path.display(),
            ?policy,
            "opening session"
        );

        let users = UserFile::new(users_path);
        let store = EventStore::open(&data_path, Box::new(users.clone()), policy)
            .with_context(|| format!("Failed to open {}", data_path.display()))?;

        Ok(Session { store, users })
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn users(&self) -> &UserFile {
        &self.users
    }

    pub fn directory(&self) -> Result<ParticipantDirectory> {
        Ok(self.store.directory()?)
    }

    pub fn load(&self) -> Result<LoadedEvents> {
        let loaded = self
            .store
            .load()
            .with_context(|| format!("Error reading {}", self.store.path().display()))?;
        Ok(loaded)
    }

    /// Load with a policy other than the configured one.
    pub fn load_with_policy(&self, policy: LoadPolicy) -> Result<LoadedEvents> {
        let loaded = self
            .store
            .load_with_policy(policy)
            .with_context(|| format!("Error reading {}", self.store.path().display()))?;
        Ok(loaded)
    }

    /// Load entries that are about to be modified and saved back.
    ///
    /// Saving rewrites the whole file, so any line a skipping load dropped
    /// would be lost. Loads for update always abort on a corrupted line.
    pub fn load_for_update(&self) -> Result<Vec<(Event, Priority)>> {
        let loaded = self
            .store
            .load_with_policy(LoadPolicy::Abort)
            .with_context(|| {
                format!(
                    "Refusing to modify {} while it has corrupted lines. \
                     Run `eventsync check` and repair the file first",
                    self.store.path().display()
                )
            })?;
        Ok(loaded.entries)
    }

    pub fn save(&self, entries: &[(Event, Priority)]) -> Result<()> {
        self.store
            .save_entries(entries)
            .with_context(|| format!("Error saving {}", self.store.path().display()))
    }
}
