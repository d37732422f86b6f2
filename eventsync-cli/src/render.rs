//! TUI rendering traits for eventsync types.
//!
//! Extension traits that add colored terminal rendering to eventsync-core
//! types using owo_colors.

use eventsync_core::{AccessLevel, Event, Participant, Priority};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Priority {
    fn render(&self) -> String {
        let label = format!("[{}]", self);
        match self {
            Priority::Low => label.dimmed().to_string(),
            Priority::Medium => label.yellow().to_string(),
            Priority::High => label.red().bold().to_string(),
        }
    }
}

impl Render for Participant {
    fn render(&self) -> String {
        match self.access_level {
            AccessLevel::Admin => format!("{} {}", self.name, "(admin)".cyan()),
            AccessLevel::Member => self.name.clone(),
        }
    }
}

impl Render for (Event, Priority) {
    fn render(&self) -> String {
        let (event, priority) = self;
        let mut lines = vec![format!(
            "{} {} {}",
            priority.render(),
            event.name.bold(),
            event.render_time_range().dimmed()
        )];

        if !event.location.is_empty() {
            lines.push(format!("    @ {}", event.location));
        }
        if !event.description.is_empty() {
            lines.push(format!("    {}", event.description.dimmed()));
        }
        if !event.participants().is_empty() {
            let names: Vec<String> = event.participants().iter().map(|p| p.render()).collect();
            lines.push(format!("    with {}", names.join(", ")));
        }

        lines.join("\n")
    }
}

/// Render numbered entries, one block per event.
pub fn render_entries<'a>(entries: impl Iterator<Item = (usize, &'a (Event, Priority))>) -> String {
    entries
        .map(|(index, entry)| format!("{:>3}. {}", index + 1, entry.render()))
        .collect::<Vec<_>>()
        .join("\n")
}
