use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::driver::{BoltConnector, BoltSession, ProbeError};
use crate::sink::{EventSink, Tone};
use crate::target::{ConnectionParameters, Secret};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    Ok,
    Expired,
    AuthFailure,
}

impl Reply {
    fn into_result(self) -> Result<(), ProbeError> {
        match self {
            Reply::Ok => Ok(()),
            Reply::Expired => Err(ProbeError::SessionExpired("connection reset".to_string())),
            Reply::AuthFailure => Err(ProbeError::Authentication("bad credentials".to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SessionScript {
    pub open: Reply,
    pub first: Reply,
    pub second: Reply,
}

impl SessionScript {
    pub fn survives() -> Self {
        Self {
            open: Reply::Ok,
            first: Reply::Ok,
            second: Reply::Ok,
        }
    }

    pub fn expires() -> Self {
        Self {
            second: Reply::Expired,
            ..Self::survives()
        }
    }
}

/// Hands out scripted sessions in order and records every call.
pub struct ScriptedConnector {
    scripts: Mutex<VecDeque<SessionScript>>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedConnector {
    pub fn new(scripts: impl IntoIterator<Item = SessionScript>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into_iter().collect()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }
}

#[async_trait]
impl BoltConnector for ScriptedConnector {
    async fn open(
        &self,
        _params: &ConnectionParameters,
        database: &str,
    ) -> Result<Box<dyn BoltSession>, ProbeError> {
        let script = self
            .scripts
            .lock()
            .expect("scripts lock")
            .pop_front()
            .expect("connector opened more sessions than scripted");
        self.calls
            .lock()
            .expect("calls lock")
            .push(format!("open:{database}"));
        script.open.into_result()?;
        Ok(Box::new(ScriptedSession {
            replies: VecDeque::from([script.first, script.second]),
            calls: Arc::clone(&self.calls),
        }))
    }
}

struct ScriptedSession {
    replies: VecDeque<Reply>,
    calls: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl BoltSession for ScriptedSession {
    async fn ping(&mut self) -> Result<(), ProbeError> {
        self.calls.lock().expect("calls lock").push("ping".to_string());
        self.replies.pop_front().unwrap_or(Reply::Ok).into_result()
    }

    async fn close(self: Box<Self>) -> Result<(), ProbeError> {
        self.calls.lock().expect("calls lock").push("close".to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub tone: Tone,
    pub message: String,
    pub echo: bool,
}

#[derive(Debug, Default)]
pub struct MemorySink {
    pub entries: Vec<Entry>,
    pub progress: Vec<String>,
    pub blanks: usize,
}

impl MemorySink {
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|e| e.message.contains(needle))
    }
}

impl EventSink for MemorySink {
    fn log(&mut self, tone: Tone, message: &str, echo: bool) {
        self.entries.push(Entry {
            tone,
            message: message.to_string(),
            echo,
        });
    }

    fn progress(&mut self, message: &str) {
        self.progress.push(message.to_string());
    }

    fn blank(&mut self) {
        self.blanks += 1;
    }
}

pub fn params() -> ConnectionParameters {
    ConnectionParameters::new("a1b2c3d4.databases.neo4j.io", "neo4j", Secret::new("secret"))
}
