//! Event priorities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| StorageError::InvalidPriority(s.to_string()))
    }
}

/// Priorities of a loaded file, in event order.
///
/// Returned from a load and handed to whoever needs priority state, instead of
/// being written into process-wide storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriorityRegistry {
    priorities: Vec<Priority>,
}

impl PriorityRegistry {
    pub fn new(priorities: Vec<Priority>) -> Self {
        PriorityRegistry { priorities }
    }

    pub fn len(&self) -> usize {
        self.priorities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.priorities.is_empty()
    }

    pub fn as_slice(&self) -> &[Priority] {
        &self.priorities
    }
}

impl FromIterator<Priority> for PriorityRegistry {
    fn from_iter<I: IntoIterator<Item = Priority>>(iter: I) -> Self {
        PriorityRegistry::new(iter.into_iter().collect())
    }
}
