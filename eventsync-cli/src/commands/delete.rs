use anyhow::Result;
use owo_colors::OwoColorize;

use super::entry_position;
use crate::session::Session;

pub fn run(session: &Session, index: usize) -> Result<()> {
    let mut entries = session.load_for_update()?;
    let position = entry_position(index, entries.len())?;

    let (event, _) = entries.remove(position);
    session.save(&entries)?;

    println!("{} {}", "Deleted".red(), event.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::{CORRUPTED_FILE, session_with};

    #[test]
    fn test_delete_under_skip_policy_keeps_corrupted_lines() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_with(&dir, CORRUPTED_FILE, true);

        assert!(run(&session, 2).is_err());

        let content = std::fs::read_to_string(session.store().path()).unwrap();
        assert_eq!(content, CORRUPTED_FILE);
    }

    #[test]
    fn test_delete_removes_entry_from_clean_file() {
        let dir = tempfile::tempdir().unwrap();
        let clean = "\
A | 2024-01-01 09:00 | 2024-01-01 10:00 | | | HIGH
C | 2024-01-03 09:00 | 2024-01-03 10:00 | | | MEDIUM
";
        let session = session_with(&dir, clean, true);

        run(&session, 1).unwrap();

        let names: Vec<String> = session
            .load()
            .unwrap()
            .events()
            .map(|e| e.name.clone())
            .collect();
        assert_eq!(names, vec!["C"]);
    }
}
