use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SCHEDULE: [u64; 14] = [
    30, 60, 90, 120, 180, 240, 300, 600, 900, 1200, 1800, 2400, 2700, 3010,
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("schedule is empty")]
    Empty,
    #[error("idle durations must be positive")]
    ZeroDuration,
    #[error("schedule must be strictly ascending ({prev} is followed by {next})")]
    NotAscending { prev: u64, next: u64 },
    #[error("invalid idle duration {0:?}")]
    Parse(String),
}

/// Idle durations in seconds, strictly ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdleSchedule(Vec<u64>);

impl IdleSchedule {
    pub fn new(durations: Vec<u64>) -> Result<Self, ScheduleError> {
        if durations.is_empty() {
            return Err(ScheduleError::Empty);
        }
        if durations.contains(&0) {
            return Err(ScheduleError::ZeroDuration);
        }
        if let Some(pair) = durations.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(ScheduleError::NotAscending {
                prev: pair[0],
                next: pair[1],
            });
        }
        Ok(Self(durations))
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.0
    }
}

impl Default for IdleSchedule {
    fn default() -> Self {
        Self(DEFAULT_SCHEDULE.to_vec())
    }
}

impl FromStr for IdleSchedule {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let durations = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| ScheduleError::Parse(part.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(durations)
    }
}

impl fmt::Display for IdleSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        f.write_str(&joined)
    }
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    pub schedule: IdleSchedule,
    pub margin_secs: u64,
    pub database: String,
    /// Idle durations above this are slept in `chunk` increments.
    pub chunk_threshold: Duration,
    pub chunk: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            schedule: IdleSchedule::default(),
            margin_secs: 10,
            database: "neo4j".to_string(),
            chunk_threshold: Duration::from_secs(120),
            chunk: Duration::from_secs(60),
        }
    }
}
