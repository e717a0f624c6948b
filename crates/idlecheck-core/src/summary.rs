use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub idle_secs: u64,
    pub survived: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "secs", rename_all = "snake_case")]
pub enum Recommendation {
    Seconds(u64),
    /// Nothing survived long enough to leave a positive lifetime after the margin.
    Unavailable,
}

impl Recommendation {
    pub fn from_best(best_idle_secs: u64, margin_secs: u64) -> Self {
        match best_idle_secs.checked_sub(margin_secs) {
            Some(secs) if secs > 0 => Self::Seconds(secs),
            _ => Self::Unavailable,
        }
    }

    pub fn seconds(&self) -> Option<u64> {
        match self {
            Self::Seconds(secs) => Some(*secs),
            Self::Unavailable => None,
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seconds(secs) => write!(f, "{secs} seconds or lesser"),
            Self::Unavailable => f.write_str("unavailable (no idle duration survived)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub attempts: Vec<ProbeResult>,
    pub best_idle_secs: u64,
    pub margin_secs: u64,
    pub recommended: Recommendation,
    /// True when a probe failed before the schedule was exhausted.
    pub stopped_early: bool,
}
