use anyhow::{Context, Result};
use eventsync_core::codec::{parse_timestamp, validate_text_field};
use eventsync_core::{Event, ParticipantDirectory, Priority};
use owo_colors::OwoColorize;

use crate::render::Render;
use crate::session::Session;

/// Raw command-line input for a new event.
pub struct NewEvent {
    pub name: String,
    pub start: String,
    pub end: String,
    pub location: String,
    pub description: String,
    pub priority: String,
    pub participants: Vec<String>,
}

pub fn run(session: &Session, new_event: NewEvent) -> Result<()> {
    let directory = session.directory()?;
    let entry = build_entry(new_event, &directory)?;

    let mut entries = session.load_for_update()?;
    let position = insert_chronological(&mut entries, entry);
    session.save(&entries)?;

    println!(
        "{} #{} {}",
        "Added".green(),
        position + 1,
        entries[position].render()
    );
    Ok(())
}

/// Validate input and resolve participants against the directory.
pub fn build_entry(
    new_event: NewEvent,
    directory: &ParticipantDirectory,
) -> Result<(Event, Priority)> {
    let name = new_event.name.trim();
    if name.is_empty() {
        anyhow::bail!("Event name cannot be empty");
    }
    validate_text_field("name", name)?;
    validate_text_field("location", &new_event.location)?;
    validate_text_field("description", &new_event.description)?;

    let start = parse_timestamp(&new_event.start)
        .context("Invalid --start (expected YYYY-MM-DD HH:MM)")?;
    let end =
        parse_timestamp(&new_event.end).context("Invalid --end (expected YYYY-MM-DD HH:MM)")?;
    if end < start {
        anyhow::bail!("Event cannot end before it starts");
    }

    let priority: Priority = new_event.priority.parse()?;

    let mut event = Event::new(
        name,
        start,
        end,
        new_event.location.trim(),
        new_event.description.trim(),
    );
    for participant in &new_event.participants {
        event.add_participant(directory.resolve(participant)?.clone());
    }

    Ok((event, priority))
}

/// Insert after every entry starting at or before the new one. Returns its position.
pub fn insert_chronological(
    entries: &mut Vec<(Event, Priority)>,
    entry: (Event, Priority),
) -> usize {
    let position = entries
        .iter()
        .position(|(existing, _)| existing.start > entry.0.start)
        .unwrap_or(entries.len());
    entries.insert(position, entry);
    position
}
