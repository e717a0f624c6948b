use async_trait::async_trait;
use neo4rs::{
    query, ConfigBuilder, Graph, Neo4jClientErrorKind, Neo4jError, Neo4jErrorKind, Txn,
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::target::ConnectionParameters;

const PING: &str = "RETURN 1 AS n";

/// Server status codes for a transaction killed while the client sat idle.
const TERMINATION_CODES: [&str; 2] = [
    "Neo.ClientError.Transaction.Terminated",
    "Neo.ClientError.Transaction.TransactionTimedOut",
];

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("session expired: {0}")]
    SessionExpired(String),
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("server unreachable: {0}")]
    Unreachable(String),
    #[error("invalid connection URI: {0}")]
    InvalidUri(String),
    #[error("driver error: {0}")]
    Other(String),
}

impl ProbeError {
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired(_))
    }
}

/// Opens one session per probe. Implementations must not reuse connections
/// across calls.
#[async_trait]
pub trait BoltConnector: Send + Sync {
    async fn open(
        &self,
        params: &ConnectionParameters,
        database: &str,
    ) -> Result<Box<dyn BoltSession>, ProbeError>;
}

/// A single transaction held open on a dedicated connection.
#[async_trait]
pub trait BoltSession: Send {
    /// Runs `RETURN 1 AS n` inside the open transaction.
    async fn ping(&mut self) -> Result<(), ProbeError>;
    /// Releases the transaction, the connection and its pool.
    async fn close(self: Box<Self>) -> Result<(), ProbeError>;
}

#[derive(Debug, Clone, Default)]
pub struct Neo4jConnector;

impl Neo4jConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BoltConnector for Neo4jConnector {
    async fn open(
        &self,
        params: &ConnectionParameters,
        database: &str,
    ) -> Result<Box<dyn BoltSession>, ProbeError> {
        let config = ConfigBuilder::default()
            .uri(params.uri.as_str())
            .user(params.user.as_str())
            .password(params.password.expose())
            .db(database)
            .max_connections(1)
            .build()
            .map_err(|err| classify(err, false))?;

        debug!(uri = %params.uri, database, "opening bolt connection");
        let graph = Graph::connect(config)
            .await
            .map_err(|err| classify(err, false))?;
        let txn = graph
            .start_txn()
            .await
            .map_err(|err| classify(err, false))?;

        Ok(Box::new(Neo4jSession {
            _graph: graph,
            txn: Some(txn),
            verified: false,
        }))
    }
}

pub struct Neo4jSession {
    // Owns the single-connection pool; dropped after the transaction.
    _graph: Graph,
    txn: Option<Txn>,
    verified: bool,
}

#[async_trait]
impl BoltSession for Neo4jSession {
    async fn ping(&mut self) -> Result<(), ProbeError> {
        let Some(txn) = self.txn.as_mut() else {
            return Err(ProbeError::Other("transaction already closed".to_string()));
        };

        match txn.run(query(PING)).await {
            Ok(()) => {
                self.verified = true;
                debug!("ping ok");
                Ok(())
            }
            Err(err) => Err(classify(err, self.verified)),
        }
    }

    async fn close(self: Box<Self>) -> Result<(), ProbeError> {
        let Neo4jSession {
            _graph: graph,
            txn,
            verified,
        } = *self;

        let result = match txn {
            Some(txn) => txn.rollback().await.map_err(|err| {
                warn!(error = %err, "rollback failed while closing session");
                classify(err, verified)
            }),
            None => Ok(()),
        };
        drop(graph);
        debug!("bolt connection released");
        result
    }
}

/// Transport failures on a connection that already answered a ping mean the
/// connection died while idle. So do server replies that terminate the open
/// transaction. Security and authentication failures stay fatal.
pub(crate) fn classify(err: neo4rs::Error, verified: bool) -> ProbeError {
    match err {
        neo4rs::Error::IOError { detail } if verified => {
            ProbeError::SessionExpired(detail.to_string())
        }
        neo4rs::Error::ConnectionError if verified => {
            ProbeError::SessionExpired("connection closed by peer".to_string())
        }
        neo4rs::Error::Neo4j(err) if verified && is_idle_termination(&err) => {
            ProbeError::SessionExpired(neo4rs::Error::Neo4j(err).to_string())
        }
        neo4rs::Error::UnexpectedMessage(msg) if verified && terminated_by_server(&msg) => {
            ProbeError::SessionExpired(msg)
        }
        neo4rs::Error::IOError { detail } => ProbeError::Unreachable(detail.to_string()),
        neo4rs::Error::ConnectionError => {
            ProbeError::Unreachable("could not establish connection".to_string())
        }
        neo4rs::Error::AuthenticationError(msg) => ProbeError::Authentication(msg),
        neo4rs::Error::UrlParseError(err) => ProbeError::InvalidUri(err.to_string()),
        neo4rs::Error::UnsupportedScheme(scheme) => ProbeError::InvalidUri(scheme),
        other => ProbeError::Other(other.to_string()),
    }
}

fn is_idle_termination(err: &Neo4jError) -> bool {
    matches!(
        err.kind(),
        Neo4jErrorKind::Client(
            Neo4jClientErrorKind::SessionExpired | Neo4jClientErrorKind::TransactionTerminated
        )
    ) || terminated_by_server(err.code())
}

fn terminated_by_server(text: &str) -> bool {
    TERMINATION_CODES.iter().any(|code| text.contains(code))
}
