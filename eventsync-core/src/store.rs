//! Whole-file persistence of events.
//!
//! The store rewrites the file on every save and reads it back line by line on
//! load, resolving participants against a directory fetched once per load. The
//! file is held under an exclusive lock for the duration of each operation.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::codec::{decode_line, encode_line};
use crate::error::{StorageError, StorageResult};
use crate::event::Event;
use crate::participant::{ParticipantDirectory, UserSource};
use crate::priority::{Priority, PriorityRegistry};

/// What a load does when a line cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadPolicy {
    /// Fail the whole load on the first corrupted line.
    #[default]
    #[serde(rename = "abort")]
    Abort,
    /// Drop corrupted lines (event and priority together) and report them.
    #[serde(rename = "skip")]
    SkipAndCollect,
}

/// A line dropped under `LoadPolicy::SkipAndCollect`.
#[derive(Debug)]
pub struct SkippedLine {
    /// 1-based line number in the file.
    pub line_number: usize,
    pub line: String,
    pub error: StorageError,
}

/// Result of a load: decoded events paired with their priorities.
#[derive(Debug, Default)]
pub struct LoadedEvents {
    pub entries: Vec<(Event, Priority)>,
    pub skipped: Vec<SkippedLine>,
}

impl LoadedEvents {
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.entries.iter().map(|(event, _)| event)
    }

    /// Priorities in event order.
    pub fn priorities(&self) -> PriorityRegistry {
        self.entries.iter().map(|(_, priority)| *priority).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Events file plus the collaborators needed to read it back.
pub struct EventStore {
    path: PathBuf,
    users: Box<dyn UserSource>,
    policy: LoadPolicy,
}

impl EventStore {
    /// Open the store, creating the file (and its parent directories) if missing.
    pub fn open(
        path: impl Into<PathBuf>,
        users: Box<dyn UserSource>,
        policy: LoadPolicy,
    ) -> StorageResult<Self> {
        let store = EventStore {
            path: path.into(),
            users,
            policy,
        };
        store.ensure_file_exists()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The participant directory as the user source currently reports it.
    pub fn directory(&self) -> StorageResult<ParticipantDirectory> {
        ParticipantDirectory::from_source(self.users.as_ref())
    }

    /// Rewrite the file with one line per event.
    ///
    /// Event `i` is saved with `priorities[i]`, or `LOW` when `priorities` is shorter.
    pub fn save_events(&self, events: &[Event], priorities: &[Priority]) -> StorageResult<()> {
        let lines = events.iter().enumerate().map(|(i, event)| {
            let priority = priorities.get(i).copied().unwrap_or_default();
            encode_line(event, priority)
        });
        self.write_lines(lines, events.len())
    }

    /// Rewrite the file from already-paired events and priorities.
    pub fn save_entries(&self, entries: &[(Event, Priority)]) -> StorageResult<()> {
        let lines = entries
            .iter()
            .map(|(event, priority)| encode_line(event, *priority));
        self.write_lines(lines, entries.len())
    }

    /// Read every event back from the file.
    ///
    /// Blank (or whitespace-only) lines are ignored and never count as
    /// corrupted. How corrupted lines are handled depends on the store's
    /// `LoadPolicy`; under `Abort` no partial result is returned.
    pub fn load(&self) -> StorageResult<LoadedEvents> {
        self.load_with_policy(self.policy)
    }

    /// Like `load`, with `policy` in place of the store's own.
    pub fn load_with_policy(&self, policy: LoadPolicy) -> StorageResult<LoadedEvents> {
        self.ensure_file_exists()?;
        let directory = self.directory()?;

        let file = File::open(&self.path)?;
        file.lock_exclusive()?;

        let mut loaded = LoadedEvents::default();

        for (index, line) in BufReader::new(&file).lines().enumerate() {
            let line_number = index + 1;
            let raw = line?;
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                continue;
            }

            match decode_line(trimmed, &directory) {
                Ok((event, priority)) => {
                    debug!(line_number, event = %event, %priority, "decoded event");
                    loaded.entries.push((event, priority));
                }
                Err(error) => match policy {
                    LoadPolicy::Abort => {
                        return Err(StorageError::CorruptedLine {
                            line_number,
                            line: raw,
                            source: Box::new(error),
                        });
                    }
                    LoadPolicy::SkipAndCollect => {
                        warn!(line_number, line = %raw, %error, "skipping corrupted line");
                        loaded.skipped.push(SkippedLine {
                            line_number,
                            line: raw,
                            error,
                        });
                    }
                },
            }
        }

        info!(
            path = %self.path.display(),
            events = loaded.entries.len(),
            skipped = loaded.skipped.len(),
            "loaded events"
        );

        Ok(loaded)
    }

    fn write_lines(&self, lines: impl Iterator<Item = String>, count: usize) -> StorageResult<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.path)?;
        file.lock_exclusive()?;
        file.set_len(0)?;

        let mut writer = BufWriter::new(&file);
        for line in lines {
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        info!(path = %self.path.display(), events = count, "saved events");
        Ok(())
    }

    fn ensure_file_exists(&self) -> StorageResult<()> {
        if self.path.exists() {
            return Ok(());
        }

        let file_creation = |source: std::io::Error| StorageError::FileCreation {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(file_creation)?;
        }
        File::create(&self.path).map_err(file_creation)?;

        debug!(path = %self.path.display(), "created empty events file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participant::{AccessLevel, Participant};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn users() -> Vec<Participant> {
        vec![
            Participant::new("alice", AccessLevel::Admin),
            Participant::new("bob", AccessLevel::Member),
        ]
    }

    fn open_store(dir: &tempfile::TempDir, policy: LoadPolicy) -> EventStore {
        EventStore::open(dir.path().join("data/events.txt"), Box::new(users()), policy).unwrap()
    }

    #[test]
    fn test_open_creates_missing_file_and_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, LoadPolicy::Abort);

        assert!(store.path().exists());
        assert_eq!(std::fs::read_to_string(store.path()).unwrap(), "");
    }

    #[test]
    fn test_load_empty_file_returns_no_events() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, LoadPolicy::Abort);

        let loaded = store.load().unwrap();
        assert!(loaded.is_empty());
        assert!(loaded.skipped.is_empty());
        assert!(loaded.priorities().is_empty());
    }

    #[test]
    fn test_load_recreates_deleted_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, LoadPolicy::Abort);
        std::fs::remove_file(store.path()).unwrap();

        assert!(store.load().unwrap().is_empty());
        assert!(store.path().exists());
    }

    #[test]
    fn test_open_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let result = EventStore::open(
            blocker.join("events.txt"),
            Box::new(users()),
            LoadPolicy::Abort,
        );
        assert!(matches!(result, Err(StorageError::FileCreation { .. })));
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, LoadPolicy::Abort);

        let mut sync = Event::new("Team Sync", at(1, 9), at(1, 10), "Room1", "Weekly sync");
        sync.add_participant(Participant::new("bob", AccessLevel::Member));
        sync.add_participant(Participant::new("alice", AccessLevel::Admin));
        let lunch = Event::new("Lunch", at(2, 12), at(2, 13), "", "");

        store
            .save_events(&[sync.clone(), lunch.clone()], &[Priority::High, Priority::Medium])
            .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(
            loaded.entries,
            vec![(sync, Priority::High), (lunch, Priority::Medium)]
        );
    }

    #[test]
    fn test_save_pads_short_priorities_with_low() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, LoadPolicy::Abort);

        let events = vec![
            Event::new("First", at(1, 9), at(1, 10), "", ""),
            Event::new("Second", at(2, 9), at(2, 10), "", ""),
            Event::new("Third", at(3, 9), at(3, 10), "", ""),
        ];
        store.save_events(&events, &[Priority::High]).unwrap();

        let priorities = store.load().unwrap().priorities();
        assert_eq!(
            priorities.as_slice(),
            &[Priority::High, Priority::Low, Priority::Low]
        );
    }

    #[test]
    fn test_save_truncates_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, LoadPolicy::Abort);

        let events = vec![
            Event::new("First", at(1, 9), at(1, 10), "", ""),
            Event::new("Second", at(2, 9), at(2, 10), "", ""),
        ];
        store.save_events(&events, &[]).unwrap();
        store.save_events(&events[..1], &[]).unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_load_team_sync_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, LoadPolicy::Abort);
        std::fs::write(
            store.path(),
            "Team Sync | 2024-01-01 09:00 | 2024-01-01 10:00 | Room1 | Weekly sync | HIGH | bob:MEMBER\n",
        )
        .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);

        let (event, priority) = &loaded.entries[0];
        assert_eq!(event.name, "Team Sync");
        assert_eq!(*priority, Priority::High);
        assert_eq!(
            event.participants(),
            &[Participant::new("bob", AccessLevel::Member)]
        );
    }

    #[test]
    fn test_load_old_format_lines() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, LoadPolicy::Abort);
        std::fs::write(
            store.path(),
            "Retro | 2024-01-05 16:00 | 2024-01-05 17:00 | Room2 | Sprint retro\n\
             Demo | 2024-01-06 16:00 | 2024-01-06 17:00 | Room3 | Sprint demo | MEDIUM\n",
        )
        .unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.priorities().as_slice(), &[Priority::Low, Priority::Medium]);
        assert!(loaded.events().all(|e| e.participants().is_empty()));
    }

    #[test]
    fn test_load_ignores_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, LoadPolicy::Abort);
        std::fs::write(
            store.path(),
            "\nRetro | 2024-01-05 16:00 | 2024-01-05 17:00 | Room2 | Sprint retro\n   \n",
        )
        .unwrap();

        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_abort_policy_fails_whole_load_with_line() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, LoadPolicy::Abort);
        std::fs::write(
            store.path(),
            "Retro | 2024-01-05 16:00 | 2024-01-05 17:00 | Room2 | Sprint retro\n\
             broken line\n",
        )
        .unwrap();

        match store.load() {
            Err(StorageError::CorruptedLine {
                line_number,
                line,
                source,
            }) => {
                assert_eq!(line_number, 2);
                assert_eq!(line, "broken line");
                assert!(matches!(*source, StorageError::MissingFields));
            }
            other => panic!("Expected CorruptedLine, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupted_line_message_includes_raw_line() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, LoadPolicy::Abort);
        std::fs::write(
            store.path(),
            "Sync | 2024-01-01 09:00 | 2024-01-01 10:00 | | | LOW | carol:MEMBER\n",
        )
        .unwrap();

        let message = store.load().unwrap_err().to_string();
        assert!(message.contains("carol:MEMBER"));
        assert!(message.contains("Participant not found: carol"));
    }

    #[test]
    fn test_skip_policy_drops_event_and_priority_together() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, LoadPolicy::SkipAndCollect);
        std::fs::write(
            store.path(),
            "First | 2024-01-01 09:00 | 2024-01-01 10:00 | | | HIGH\n\
             Second | not a time | 2024-01-02 10:00 | | | MEDIUM\n\
             Third | 2024-01-03 09:00 | 2024-01-03 10:00 | | | LOW | alice:SUPERUSER\n\
             Fourth | 2024-01-04 09:00 | 2024-01-04 10:00 | | | MEDIUM | Alice:admin\n",
        )
        .unwrap();

        let loaded = store.load().unwrap();

        let names: Vec<&str> = loaded.events().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Fourth"]);
        assert_eq!(loaded.priorities().as_slice(), &[Priority::High, Priority::Medium]);

        let skipped: Vec<usize> = loaded.skipped.iter().map(|s| s.line_number).collect();
        assert_eq!(skipped, vec![2, 3]);
        assert!(matches!(
            loaded.skipped[0].error,
            StorageError::TimestampParse { .. }
        ));
        assert!(matches!(
            loaded.skipped[1].error,
            StorageError::InvalidParticipantData(_)
        ));
    }

    #[test]
    fn test_load_with_policy_overrides_store_policy() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, LoadPolicy::Abort);
        std::fs::write(
            store.path(),
            "broken\nRetro | 2024-01-05 16:00 | 2024-01-05 17:00 | Room2 | Sprint retro\n",
        )
        .unwrap();

        assert!(store.load().is_err());

        let loaded = store.load_with_policy(LoadPolicy::SkipAndCollect).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.skipped[0].line_number, 1);
    }

    #[test]
    fn test_directory_is_fetched_once_per_load() {
        use std::cell::Cell;
        use std::rc::Rc;

        struct CountingUsers {
            calls: Rc<Cell<usize>>,
        }

        impl UserSource for CountingUsers {
            fn load_users(&self) -> StorageResult<Vec<Participant>> {
                self.calls.set(self.calls.get() + 1);
                Ok(vec![Participant::new("bob", AccessLevel::Member)])
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let calls = Rc::new(Cell::new(0));
        let store = EventStore::open(
            dir.path().join("events.txt"),
            Box::new(CountingUsers {
                calls: Rc::clone(&calls),
            }),
            LoadPolicy::Abort,
        )
        .unwrap();
        std::fs::write(
            store.path(),
            "A | 2024-01-01 09:00 | 2024-01-01 10:00 | | | LOW | bob:MEMBER\n\
             B | 2024-01-02 09:00 | 2024-01-02 10:00 | | | LOW | bob:MEMBER\n",
        )
        .unwrap();

        assert_eq!(store.load().unwrap().len(), 2);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_save_entries_keeps_alignment() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, LoadPolicy::Abort);
        let entries = vec![
            (Event::new("A", at(1, 9), at(1, 10), "", ""), Priority::Medium),
            (Event::new("B", at(2, 9), at(2, 10), "", ""), Priority::High),
        ];
        store.save_entries(&entries).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.entries, entries);
        assert_eq!(
            loaded.priorities().as_slice(),
            &[Priority::Medium, Priority::High]
        );
    }

    #[test]
    fn test_save_io_failure_surfaces_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir, LoadPolicy::Abort);
        std::fs::remove_file(store.path()).unwrap();
        std::fs::create_dir(store.path()).unwrap();

        let events = vec![Event::new("A", at(1, 9), at(1, 10), "", "")];
        let result = store.save_events(&events, &[Priority::High]);

        assert!(matches!(result, Err(StorageError::Io(_))));
        assert!(store.path().is_dir());
    }
}
