use thiserror::Error;
use tracing::info;

use crate::config::RunConfig;
use crate::driver::{BoltConnector, ProbeError};
use crate::probe::{probe, ProbeOutcome};
use crate::sink::EventSink;
use crate::summary::{ProbeResult, Recommendation, RunSummary};
use crate::target::ConnectionParameters;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("probe at {idle_secs}s idle hit an unexpected error: {source}")]
    Aborted {
        idle_secs: u64,
        /// Longest idle duration confirmed before the abort.
        best_idle_secs: u64,
        #[source]
        source: ProbeError,
    },
}

pub struct ScheduleRunner<C: BoltConnector> {
    connector: C,
    config: RunConfig,
}

impl<C: BoltConnector> ScheduleRunner<C> {
    pub fn new(connector: C, config: RunConfig) -> Self {
        Self { connector, config }
    }

    /// Probes each scheduled idle duration in order, stopping at the first
    /// failure. Larger durations are assumed to fail once a smaller one has.
    pub async fn run<S>(
        &self,
        params: &ConnectionParameters,
        sink: &mut S,
    ) -> Result<RunSummary, RunError>
    where
        S: EventSink + ?Sized,
    {
        let mut attempts = Vec::new();
        let mut best = 0_u64;
        let mut stopped_early = false;
        let schedule = self.config.schedule.as_slice();

        for (idx, &idle_secs) in schedule.iter().enumerate() {
            sink.info(&format!("Checking connection lifetime of {idle_secs} seconds"));

            match probe(&self.connector, params, idle_secs, &self.config, sink).await {
                ProbeOutcome::Survived => {
                    sink.success(&format!(
                        "The connection was valid after {idle_secs} seconds of idle time..."
                    ));
                    attempts.push(ProbeResult {
                        idle_secs,
                        survived: true,
                    });
                    best = best.max(idle_secs);
                    info!(idle_secs, best, "probe survived");
                }
                ProbeOutcome::Expired(err) => {
                    sink.failure(&format!(
                        "Session Expired for connection with idle time of {idle_secs} seconds"
                    ));
                    sink.failure(&format!(
                        "The connection FAILED after {idle_secs} seconds of idle time..."
                    ));
                    attempts.push(ProbeResult {
                        idle_secs,
                        survived: false,
                    });
                    info!(idle_secs, error = %err, "probe expired");
                    stopped_early = idx + 1 < schedule.len();
                    break;
                }
                ProbeOutcome::Fatal(err) => {
                    sink.failure(&format!(
                        "Different Error encountered. Exiting\nError: {err}"
                    ));
                    return Err(RunError::Aborted {
                        idle_secs,
                        best_idle_secs: best,
                        source: err,
                    });
                }
            }
            sink.blank();
        }

        let summary = RunSummary {
            attempts,
            best_idle_secs: best,
            margin_secs: self.config.margin_secs,
            recommended: Recommendation::from_best(best, self.config.margin_secs),
            stopped_early,
        };
        report(&summary, sink);
        Ok(summary)
    }
}

fn report<S: EventSink + ?Sized>(summary: &RunSummary, sink: &mut S) {
    match summary.recommended {
        Recommendation::Seconds(_) => {
            sink.success(&format!(
                "Recommended Connection lifetime : {}",
                summary.recommended
            ));
            sink.success(&format!(
                "The longest running valid connection was {} seconds old.",
                summary.best_idle_secs
            ));
            sink.success(&format!(
                "The recommended value is {} seconds lesser than this",
                summary.margin_secs
            ));
        }
        Recommendation::Unavailable => {
            sink.failure(&format!(
                "Recommended Connection lifetime : {}",
                summary.recommended
            ));
            if summary.best_idle_secs > 0 {
                sink.failure(&format!(
                    "The longest running valid connection was {} seconds old, which does not leave a {} second margin.",
                    summary.best_idle_secs, summary.margin_secs
                ));
            } else {
                sink.failure("No connection stayed valid for the shortest idle duration tested.");
            }
        }
    }
}
