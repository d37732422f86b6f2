use anyhow::Result;
use owo_colors::OwoColorize;

use super::entry_position;
use crate::session::Session;

pub fn run(session: &Session, index: usize, name: &str) -> Result<()> {
    let directory = session.directory()?;
    let participant = directory.resolve(name)?.clone();

    let mut entries = session.load_for_update()?;
    let position = entry_position(index, entries.len())?;
    let event = &mut entries[position].0;

    if !event.add_participant(participant.clone()) {
        anyhow::bail!("{} is already attending {}", participant.name, event.name);
    }
    let event_name = event.name.clone();
    session.save(&entries)?;

    println!("{} {} to {}", "Invited".green(), participant.name, event_name);
    Ok(())
}

pub fn run_uninvite(session: &Session, index: usize, name: &str) -> Result<()> {
    let mut entries = session.load_for_update()?;
    let position = entry_position(index, entries.len())?;
    let event = &mut entries[position].0;

    let Some(removed) = event.remove_participant(name) else {
        anyhow::bail!("{} is not attending {}", name, event.name);
    };
    let event_name = event.name.clone();
    session.save(&entries)?;

    println!("{} {} from {}", "Removed".red(), removed.name, event_name);
    Ok(())
}
