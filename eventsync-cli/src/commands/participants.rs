use anyhow::Result;
use eventsync_core::{AccessLevel, Participant};
use owo_colors::OwoColorize;

use crate::render::Render;
use crate::session::Session;

pub fn list(session: &Session) -> Result<()> {
    let directory = session.directory()?;

    if directory.is_empty() {
        println!(
            "{}",
            format!("No participants in {}", session.users().path().display()).dimmed()
        );
        return Ok(());
    }

    for participant in directory.iter() {
        println!("  {}", participant.render());
    }
    Ok(())
}

pub fn add(session: &Session, name: &str, level: &str) -> Result<()> {
    let name = name.trim();
    let access_level: AccessLevel = level.parse()?;
    session.users().add(Participant::new(name, access_level))?;

    println!("{} {} ({})", "Added".green(), name, access_level);
    Ok(())
}
