//! Persisted launch counter for session-id assignment.
//!
//! Session ids are zero-based and assigned once, before any sample is
//! processed, from a local monotonically incrementing counter that survives
//! restarts. One read-and-increment per session start.

use crate::core::session::SessionId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the counter state under the data path.
pub const COUNTER_FILE: &str = "session_counter.json";

/// Counter errors.
#[derive(Debug)]
pub enum CounterError {
    IoError(String),
    ParseError(String),
}

impl std::fmt::Display for CounterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CounterError::IoError(e) => write!(f, "IO error: {e}"),
            CounterError::ParseError(e) => write!(f, "Parse error: {e}"),
        }
    }
}

impl std::error::Error for CounterError {}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CounterState {
    #[serde(rename = "launchCount")]
    launch_count: SessionId,
}

/// Persisted session counter.
pub struct SessionCounter {
    path: PathBuf,
}

impl SessionCounter {
    /// Counter backed by the state file under the given data directory.
    pub fn new(data_path: &Path) -> Self {
        Self {
            path: data_path.join(COUNTER_FILE),
        }
    }

    /// Sessions started so far, without claiming an id.
    pub fn current(&self) -> Result<SessionId, CounterError> {
        Ok(self.load()?.launch_count)
    }

    /// Claim the next session id.
    ///
    /// Returns the zero-based id for the session that is starting and
    /// persists the incremented count before any sample is processed.
    pub fn next_session_id(&self) -> Result<SessionId, CounterError> {
        let mut state = self.load()?;
        let session_id = state.launch_count;
        state.launch_count += 1;
        self.save(&state)?;
        Ok(session_id)
    }

    fn load(&self) -> Result<CounterState, CounterError> {
        if !self.path.exists() {
            return Ok(CounterState::default());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| CounterError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| CounterError::ParseError(e.to_string()))
    }

    fn save(&self, state: &CounterState) -> Result<(), CounterError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CounterError::IoError(e.to_string()))?;
        }
        let content = serde_json::to_string_pretty(state)
            .map_err(|e| CounterError::ParseError(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| CounterError::IoError(e.to_string()))
    }
}
