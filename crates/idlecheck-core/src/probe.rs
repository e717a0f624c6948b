use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::RunConfig;
use crate::driver::{BoltConnector, BoltSession, ProbeError};
use crate::sink::{EventSink, Tone};
use crate::target::ConnectionParameters;

#[derive(Debug)]
pub enum ProbeOutcome {
    Survived,
    Expired(ProbeError),
    Fatal(ProbeError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepPlan {
    Single(Duration),
    Chunked {
        chunks: u64,
        chunk: Duration,
        remainder: Duration,
    },
}

impl SleepPlan {
    pub fn total(&self) -> Duration {
        match *self {
            Self::Single(d) => d,
            Self::Chunked {
                chunks,
                chunk,
                remainder,
            } => Duration::from_secs(chunks * chunk.as_secs()) + remainder,
        }
    }
}

pub fn sleep_plan(idle_secs: u64, config: &RunConfig) -> SleepPlan {
    let idle = Duration::from_secs(idle_secs);
    let chunk_secs = config.chunk.as_secs();
    if idle <= config.chunk_threshold || chunk_secs == 0 {
        return SleepPlan::Single(idle);
    }
    SleepPlan::Chunked {
        chunks: idle_secs / chunk_secs,
        chunk: config.chunk,
        remainder: Duration::from_secs(idle_secs % chunk_secs),
    }
}

/// One open, ping, idle, ping, close cycle.
pub async fn probe<C, S>(
    connector: &C,
    params: &ConnectionParameters,
    idle_secs: u64,
    config: &RunConfig,
    sink: &mut S,
) -> ProbeOutcome
where
    C: BoltConnector + ?Sized,
    S: EventSink + ?Sized,
{
    let mut session = match connector.open(params, &config.database).await {
        Ok(session) => session,
        Err(err) => return classify_failure(err),
    };

    let outcome = match idle_then_ping(&mut *session, idle_secs, config, sink).await {
        Ok(()) => ProbeOutcome::Survived,
        Err(err) => classify_failure(err),
    };

    if let Err(err) = session.close().await {
        debug!(error = %err, idle_secs, "session close reported an error");
    }

    outcome
}

async fn idle_then_ping<S>(
    session: &mut dyn BoltSession,
    idle_secs: u64,
    config: &RunConfig,
    sink: &mut S,
) -> Result<(), ProbeError>
where
    S: EventSink + ?Sized,
{
    session.ping().await?;

    match sleep_plan(idle_secs, config) {
        SleepPlan::Single(idle) => {
            sink.log(
                Tone::Success,
                &format!("Initial connection Successful. Sleeping for {idle_secs} seconds ..."),
                true,
            );
            sleep(idle).await;
        }
        SleepPlan::Chunked {
            chunks,
            chunk,
            remainder,
        } => {
            sink.log(
                Tone::Success,
                &format!("Initial connection Successful. Sleeping for {chunks} minutes ..."),
                true,
            );
            let mut left = chunks;
            while left > 0 {
                sleep(chunk).await;
                left -= 1;
                if left > 0 {
                    sink.progress(&format!(
                        "Still running. Sleeping for {left} more minute(s) ..."
                    ));
                }
            }
            sleep(remainder).await;
        }
    }

    sink.info("Awake now. Checking the connection ...");
    session.ping().await
}

fn classify_failure(err: ProbeError) -> ProbeOutcome {
    if err.is_session_expired() {
        ProbeOutcome::Expired(err)
    } else {
        warn!(error = %err, "unexpected probe failure");
        ProbeOutcome::Fatal(err)
    }
}
