use anyhow::Result;
use eventsync_core::{Event, Priority};
use owo_colors::OwoColorize;

use crate::render::render_entries;
use crate::session::Session;

pub fn run(session: &Session, keyword: &str) -> Result<()> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        anyhow::bail!("Search keyword cannot be empty");
    }

    let loaded = session.load()?;
    let matches = matching(&loaded.entries, keyword);

    if matches.is_empty() {
        println!("{}", format!("No events matching '{}'", keyword).dimmed());
    } else {
        println!("{}", render_entries(matches.into_iter()));
    }
    Ok(())
}

/// Entries whose event matches `keyword`, with their positions in `entries`.
pub fn matching<'a>(
    entries: &'a [(Event, Priority)],
    keyword: &str,
) -> Vec<(usize, &'a (Event, Priority))> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, (event, _))| event.matches_keyword(keyword))
        .collect()
}
