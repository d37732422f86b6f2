use anyhow::Result;
use eventsync_core::{LoadPolicy, SkippedLine};
use owo_colors::OwoColorize;

use crate::session::Session;

/// Load with corrupted lines skipped and report each one.
pub fn run(session: &Session) -> Result<()> {
    let mut loaded = session.load_with_policy(LoadPolicy::SkipAndCollect)?;
    let skipped = std::mem::take(&mut loaded.skipped);

    println!(
        "{} {} valid {}",
        session.store().path().display(),
        loaded.len(),
        if loaded.len() == 1 { "event" } else { "events" }
    );

    if skipped.is_empty() {
        println!("{}", "No corrupted lines".green());
        return Ok(());
    }

    print_skipped(&skipped);
    let noun = if skipped.len() == 1 { "line" } else { "lines" };
    anyhow::bail!("{} corrupted {}", skipped.len(), noun)
}

/// Print warnings for lines dropped during a load.
pub fn print_skipped(skipped: &[SkippedLine]) {
    for line in skipped {
        eprintln!(
            "{} line {}: {}",
            "skipped".yellow(),
            line.line_number,
            line.error
        );
        eprintln!("    {}", line.line.dimmed());
    }
}
