/// Separator between the seven top-level fields of a stored line.
pub const FIELD_DELIMITER: &str = " | ";

/// Separator between participant entries in the participants field.
pub const PARTICIPANT_DELIMITER: &str = ",";

/// Separator between a participant's name and access level.
pub const ACCESS_LEVEL_DELIMITER: &str = ":";

/// Timestamp pattern used on disk (`yyyy-MM-dd HH:mm`).
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Fields every line must carry: name, start, end, location, description.
pub const REQUIRED_FIELDS: usize = 5;
