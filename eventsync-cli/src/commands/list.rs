use anyhow::Result;
use eventsync_core::{Priority, PriorityRegistry};
use owo_colors::OwoColorize;

use crate::render::render_entries;
use crate::session::Session;

pub fn run(session: &Session) -> Result<()> {
    let loaded = session.load()?;

    if loaded.is_empty() {
        println!("{}", "No events found".dimmed());
    } else {
        println!("{}", render_entries(loaded.entries.iter().enumerate()));
        println!();
        println!("{}", summary(&loaded.priorities()).dimmed());
    }

    super::check::print_skipped(&loaded.skipped);
    Ok(())
}

/// e.g. "3 events (1 high, 1 medium, 1 low)"
fn summary(priorities: &PriorityRegistry) -> String {
    let count = |level: Priority| priorities.as_slice().iter().filter(|p| **p == level).count();
    let noun = if priorities.len() == 1 { "event" } else { "events" };

    format!(
        "{} {} ({} high, {} medium, {} low)",
        priorities.len(),
        noun,
        count(Priority::High),
        count(Priority::Medium),
        count(Priority::Low)
    )
}
