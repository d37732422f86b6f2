use anyhow::Result;
use eventsync_core::Priority;

use super::entry_position;
use crate::render::Render;
use crate::session::Session;

pub fn run(session: &Session, index: usize, level: &str) -> Result<()> {
    let priority: Priority = level.parse()?;

    let mut entries = session.load_for_update()?;
    let position = entry_position(index, entries.len())?;
    entries[position].1 = priority;
    session.save(&entries)?;

    println!("{} {}", entries[position].0.name, priority.render());
    Ok(())
}
