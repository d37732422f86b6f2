pub mod add;
pub mod check;
pub mod delete;
pub mod find;
pub mod invite;
pub mod list;
pub mod participants;
pub mod priority;

use anyhow::Result;

/// Convert a 1-based index shown by `list` into a position in `len` entries.
pub fn entry_position(index: usize, len: usize) -> Result<usize> {
    if index == 0 || index > len {
        anyhow::bail!(
            "No event #{}. Run `eventsync list` to see event numbers (1-{}).",
            index,
            len
        );
    }
    Ok(index - 1)
}
