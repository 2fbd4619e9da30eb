//! Remote session store client.
//!
//! Sessions are persisted as documents under a fixed root collection in a
//! Firebase-style realtime database, keyed by session id. Every upload is a
//! full overwrite of the session's document; the store always holds the
//! latest complete snapshot.

use crate::core::session::{SessionId, SessionSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Default root collection holding all session documents.
pub const DEFAULT_ROOT_COLLECTION: &str = "All_User_Data";

/// Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the realtime database.
    pub base_url: String,
    /// Root collection the session documents live under.
    pub root: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl StoreConfig {
    /// Create a new store configuration with the default root collection.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            root: DEFAULT_ROOT_COLLECTION.to_string(),
            timeout_secs: 10,
        }
    }

    /// URL of one session's document.
    pub fn session_url(&self, session_id: SessionId) -> String {
        format!(
            "{}/{}/{}.json",
            self.base_url.trim_end_matches('/'),
            self.root,
            session_id
        )
    }

    /// URL returning the root collection's keys only.
    pub fn collection_keys_url(&self) -> String {
        format!(
            "{}/{}.json?shallow=true",
            self.base_url.trim_end_matches('/'),
            self.root
        )
    }
}

/// Store client error types.
#[derive(Debug)]
pub enum StoreError {
    /// Configuration error
    Config(String),
    /// Network/HTTP error
    Network(String),
    /// Server returned an error response
    Server { status: u16, message: String },
    /// JSON serialization error
    Serialization(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Config(msg) => write!(f, "Store config error: {msg}"),
            StoreError::Network(msg) => write!(f, "Store network error: {msg}"),
            StoreError::Server { status, message } => {
                write!(f, "Store server error ({status}): {message}")
            }
            StoreError::Serialization(msg) => write!(f, "Store serialization error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Persisted form of a session snapshot.
///
/// Field names are the stable schema shared with the review tooling; do not
/// rename them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionDocument {
    /// Chronological pressure magnitudes.
    #[serde(rename = "Pressure Values", default)]
    pub pressure_values: Vec<f32>,
    /// Chronological lateral-acceleration magnitudes.
    #[serde(rename = "Acceleration Values", default)]
    pub acceleration_values: Vec<f32>,
    /// Chronological angular-rate magnitudes.
    #[serde(rename = "Gyroscope Values", default)]
    pub gyroscope_values: Vec<f32>,
    /// Count of erroneous pressure samples.
    #[serde(rename = "Duration of Erroneous Pressure Application")]
    pub erroneous_pressure_duration: u32,
    /// Count of erroneous timing samples.
    #[serde(rename = "Duration of Erroneous Timing")]
    pub erroneous_timing_duration: u32,
}

impl From<SessionSnapshot> for SessionDocument {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            pressure_values: snapshot.pressure_values,
            acceleration_values: snapshot.acceleration_values,
            gyroscope_values: snapshot.gyroscope_values,
            erroneous_pressure_duration: snapshot.erroneous_pressure_duration,
            erroneous_timing_duration: snapshot.erroneous_timing_duration,
        }
    }
}

/// Document key-value interface of the remote session store.
///
/// Implementations are blocking; the publisher calls them from its own
/// worker thread so the sample pipeline never waits on the network.
pub trait SessionStore: Send + Sync {
    /// Overwrite the document stored under a session id.
    fn put_session(&self, session_id: SessionId, document: &SessionDocument)
        -> Result<(), StoreError>;

    /// Fetch the document stored under a session id, if any.
    fn fetch_session(&self, session_id: SessionId) -> Result<Option<SessionDocument>, StoreError>;

    /// Number of session documents under the root collection.
    fn session_count(&self) -> Result<u64, StoreError>;
}

/// Async REST client for the realtime database.
pub struct RestSessionStore {
    config: StoreConfig,
    client: reqwest::Client,
}

impl RestSessionStore {
    /// Create a new REST store client.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| StoreError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Overwrite the document stored under a session id.
    pub async fn put_session(
        &self,
        session_id: SessionId,
        document: &SessionDocument,
    ) -> Result<(), StoreError> {
        let response = self
            .client
            .put(self.config.session_url(session_id))
            .json(document)
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        check_status(response).await.map(|_| ())
    }

    /// Fetch the document stored under a session id, if any.
    pub async fn fetch_session(
        &self,
        session_id: SessionId,
    ) -> Result<Option<SessionDocument>, StoreError> {
        let response = self
            .client
            .get(self.config.session_url(session_id))
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let response = check_status(response).await?;

        // A missing document comes back as JSON null.
        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        if value.is_null() {
            return Ok(None);
        }
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Number of session documents under the root collection.
    pub async fn session_count(&self) -> Result<u64, StoreError> {
        let response = self
            .client
            .get(self.config.collection_keys_url())
            .send()
            .await
            .map_err(|e| StoreError::Network(e.to_string()))?;

        let response = check_status(response).await?;

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        match value {
            serde_json::Value::Null => Ok(0),
            serde_json::Value::Object(map) => Ok(map.len() as u64),
            other => Err(StoreError::Serialization(format!(
                "Unexpected shallow listing shape: {other}"
            ))),
        }
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(StoreError::Server {
        status: status.as_u16(),
        message,
    })
}

/// Blocking store client for use in synchronous contexts.
pub struct BlockingSessionStore {
    inner: RestSessionStore,
    runtime: tokio::runtime::Runtime,
}

impl BlockingSessionStore {
    /// Create a new blocking store client.
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StoreError::Config(format!("Failed to create runtime: {e}")))?;

        Ok(Self {
            inner: RestSessionStore::new(config)?,
            runtime,
        })
    }
}

impl SessionStore for BlockingSessionStore {
    fn put_session(
        &self,
        session_id: SessionId,
        document: &SessionDocument,
    ) -> Result<(), StoreError> {
        self.runtime
            .block_on(self.inner.put_session(session_id, document))
    }

    fn fetch_session(&self, session_id: SessionId) -> Result<Option<SessionDocument>, StoreError> {
        self.runtime.block_on(self.inner.fetch_session(session_id))
    }

    fn session_count(&self) -> Result<u64, StoreError> {
        self.runtime.block_on(self.inner.session_count())
    }
}

/// In-memory store for tests and offline runs.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    documents: Mutex<BTreeMap<SessionId, SessionDocument>>,
}

impl MemorySessionStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn put_session(
        &self,
        session_id: SessionId,
        document: &SessionDocument,
    ) -> Result<(), StoreError> {
        self.documents
            .lock()
            .map_err(|e| StoreError::Config(format!("Store mutex poisoned: {e}")))?
            .insert(session_id, document.clone());
        Ok(())
    }

    fn fetch_session(&self, session_id: SessionId) -> Result<Option<SessionDocument>, StoreError> {
        Ok(self
            .documents
            .lock()
            .map_err(|e| StoreError::Config(format!("Store mutex poisoned: {e}")))?
            .get(&session_id)
            .cloned())
    }

    fn session_count(&self) -> Result<u64, StoreError> {
        Ok(self
            .documents
            .lock()
            .map_err(|e| StoreError::Config(format!("Store mutex poisoned: {e}")))?
            .len() as u64)
    }
}
