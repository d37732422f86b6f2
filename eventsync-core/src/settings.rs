//! Global eventsync settings.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{StorageError, StorageResult};
use crate::store::LoadPolicy;

static DEFAULT_DATA_FILE: &str = "~/.eventsync/events.txt";
static DEFAULT_USERS_FILE: &str = "~/.eventsync/users.toml";

fn default_data_file() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

fn default_users_file() -> PathBuf {
    PathBuf::from(DEFAULT_USERS_FILE)
}

/// Settings at ~/.config/eventsync/config.toml, overridable with
/// `EVENTSYNC_*` environment variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    #[serde(default = "default_users_file")]
    pub users_file: PathBuf,

    #[serde(default)]
    pub on_corrupted_line: LoadPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_file: default_data_file(),
            users_file: default_users_file(),
            on_corrupted_line: LoadPolicy::default(),
        }
    }
}

impl Settings {
    pub fn config_path() -> StorageResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| StorageError::Config("Could not determine config directory".into()))?
            .join("eventsync");

        Ok(config_dir.join("config.toml"))
    }

    /// Load settings from the default location, creating a commented config
    /// file on first run.
    pub fn load() -> StorageResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> StorageResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("EVENTSYNC"))
            .build()
            .map_err(|e| StorageError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| StorageError::Config(e.to_string()))
    }

    /// Events file with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        expand(&self.data_file)
    }

    /// Participants file with `~` expanded.
    pub fn users_path(&self) -> PathBuf {
        expand(&self.users_file)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> StorageResult<()> {
        let contents = format!(
            "\
# eventsync configuration

# Where events are stored:
# data_file = \"{}\"

# Where known participants are stored:
# users_file = \"{}\"

# What to do with a corrupted line when loading: \"abort\" or \"skip\"
# on_corrupted_line = \"abort\"
",
            DEFAULT_DATA_FILE, DEFAULT_USERS_FILE
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StorageError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| StorageError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}
