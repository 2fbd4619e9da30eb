//! Replay of recorded sensor sessions.
//!
//! Pairing with the physical sensor lives outside this crate, so demos and
//! tests drive the pipeline from a recording instead: one JSON object per
//! line, `{"channel": "pressure", "value": 0.5}`. Values are re-encoded to
//! wire payloads so the replayed stream exercises the decoder too.

use crate::transport::link::{NotificationSender, TransportError};
use crate::transport::types::{Channel, Notification};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::thread::JoinHandle;
use std::time::Duration;

/// One recorded sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayRecord {
    /// Channel the sample was observed on.
    pub channel: Channel,
    /// Raw (signed) sensor value.
    pub value: f32,
}

/// Replay errors.
#[derive(Debug)]
pub enum ReplayError {
    /// The recording could not be read.
    Io(PathBuf, String),
    /// A line of the recording is not a valid record.
    Parse { line: usize, message: String },
    /// The link rejected a notification.
    Transport(TransportError),
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplayError::Io(path, e) => write!(f, "Failed to read recording {path:?}: {e}"),
            ReplayError::Parse { line, message } => {
                write!(f, "Invalid record on line {line}: {message}")
            }
            ReplayError::Transport(e) => write!(f, "Replay delivery failed: {e}"),
        }
    }
}

impl std::error::Error for ReplayError {}

impl From<TransportError> for ReplayError {
    fn from(e: TransportError) -> Self {
        ReplayError::Transport(e)
    }
}

/// A loaded recording ready to feed through a sensor link.
#[derive(Debug)]
pub struct ReplaySource {
    records: Vec<ReplayRecord>,
}

impl ReplaySource {
    /// Load a JSONL recording from disk.
    ///
    /// Blank lines are skipped so hand-edited recordings stay valid.
    pub fn from_path(path: &Path) -> Result<Self, ReplayError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ReplayError::Io(path.to_path_buf(), e.to_string()))?;
        Self::from_jsonl(&content)
    }

    /// Parse a JSONL recording from a string.
    pub fn from_jsonl(content: &str) -> Result<Self, ReplayError> {
        let mut records = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record: ReplayRecord =
                serde_json::from_str(line).map_err(|e| ReplayError::Parse {
                    line: idx + 1,
                    message: e.to_string(),
                })?;
            records.push(record);
        }
        Ok(Self { records })
    }

    /// Build a source directly from records.
    pub fn from_records(records: Vec<ReplayRecord>) -> Self {
        Self { records }
    }

    /// The recorded samples in playback order.
    pub fn records(&self) -> &[ReplayRecord] {
        &self.records
    }

    /// Feed every record through the sender at a fixed cadence.
    ///
    /// Runs on the calling thread; stops early if the consuming side of the
    /// link goes away.
    pub fn play(&self, sender: &NotificationSender, interval: Duration) -> Result<(), ReplayError> {
        for record in &self.records {
            sender.send(Notification::from_value(record.channel, record.value))?;
            if !interval.is_zero() {
                std::thread::sleep(interval);
            }
        }
        Ok(())
    }

    /// Feed the recording from a background thread.
    pub fn spawn(
        self,
        sender: NotificationSender,
        interval: Duration,
    ) -> JoinHandle<Result<(), ReplayError>> {
        std::thread::Builder::new()
            .name("sensor-replay".to_string())
            .spawn(move || self.play(&sender, interval))
            .expect("Failed to spawn replay thread")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::link::SensorLink;

    const RECORDING: &str = r#"
{"channel": "pressure", "value": 0.5}
{"channel": "lateral_acceleration", "value": -0.3}
{"channel": "angular_rate", "value": 160.0}
"#;

    #[test]
    fn test_parse_recording() {
        let source = ReplaySource::from_jsonl(RECORDING).unwrap();
        assert_eq!(source.records().len(), 3);
        assert_eq!(source.records()[0].channel, Channel::Pressure);
        assert_eq!(source.records()[1].value, -0.3);
        assert_eq!(source.records()[2].channel, Channel::AngularRate);
    }

    #[test]
    fn test_parse_reports_line_number() {
        let err = ReplaySource::from_jsonl("{\"channel\": \"pressure\", \"value\": 0.5}\nnot json")
            .unwrap_err();
        match err {
            ReplayError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("Unexpected error: {other}"),
        }
    }

    #[test]
    fn test_play_delivers_in_order() {
        let source = ReplaySource::from_jsonl(RECORDING).unwrap();
        let link = SensorLink::new();
        source.play(&link.sender(), Duration::ZERO).unwrap();

        let channels: Vec<Channel> = link.receiver().try_iter().map(|n| n.channel).collect();
        assert_eq!(
            channels,
            vec![
                Channel::Pressure,
                Channel::LateralAcceleration,
                Channel::AngularRate
            ]
        );
    }
}
