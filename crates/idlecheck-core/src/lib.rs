pub mod config;
pub mod credentials;
pub mod driver;
pub mod probe;
pub mod runner;
pub mod sink;
pub mod summary;
pub mod target;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod credentials_tests;

pub use config::{IdleSchedule, RunConfig, ScheduleError, DEFAULT_SCHEDULE};
pub use credentials::{collect, CredentialError, CredentialProvider, Preset};
pub use driver::{BoltConnector, BoltSession, Neo4jConnector, ProbeError};
pub use probe::{probe, sleep_plan, ProbeOutcome, SleepPlan};
pub use runner::{RunError, ScheduleRunner};
pub use sink::{EventSink, Tone};
pub use summary::{ProbeResult, Recommendation, RunSummary};
pub use target::{normalize_uri, ConnectionParameters, Secret};
