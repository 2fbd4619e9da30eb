//! Per-session sample pipeline.
//!
//! Wires the core stages together for one session: decode the payload,
//! calibrate it for its channel, classify against the technique thresholds,
//! fold it into the session aggregate, and queue the resulting snapshot for
//! upload. Samples are handled strictly one at a time in arrival order; the
//! only asynchronous step is the fire-and-forget upload.

use crate::core::calibrate::{calibrate, pressure_display};
use crate::core::classify::{classify_pressure, classify_timing, Verdict};
use crate::core::decode::{decode_sample, DecodeError};
use crate::core::session::{SampleVerdicts, SessionAggregator, SessionId};
use crate::publisher::{PublishError, PublishHandle};
use crate::transport::types::{Channel, Notification};
use tracing::debug;

/// Pipeline error types.
#[derive(Debug)]
pub enum PipelineError {
    /// The payload could not be decoded; the sample was dropped.
    Decode(DecodeError),
    /// The publish worker is gone; the sample was aggregated but not queued.
    Publish(PublishError),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Decode(e) => write!(f, "Sample dropped: {e}"),
            PipelineError::Publish(e) => write!(f, "Snapshot not queued: {e}"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<DecodeError> for PipelineError {
    fn from(e: DecodeError) -> Self {
        PipelineError::Decode(e)
    }
}

impl From<PublishError> for PipelineError {
    fn from(e: PublishError) -> Self {
        PipelineError::Publish(e)
    }
}

/// Current state of the display surface after a sample event.
///
/// Fields stay `None` until their channel's first sample arrives, matching
/// how the on-screen readouts default before first update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DisplayUpdate {
    /// Applied-force readout (exponential calibration curve).
    pub pressure: Option<f32>,
    /// Lateral-acceleration readout.
    pub acceleration: Option<f32>,
    /// Angular-rate readout.
    pub gyroscope: Option<f32>,
    /// Whether the pressure readout should colour as ok (true) or error.
    pub pressure_ok: bool,
    /// Whether the timing readouts should colour as ok (true) or error.
    pub timing_ok: bool,
}

/// Owns the processing state for one active session.
pub struct SessionPipeline {
    session_id: SessionId,
    aggregator: SessionAggregator,
    publisher: PublishHandle,
    // Most recently observed per-channel values; timing classification reuses
    // them across events, and the display re-colours from them.
    latest_pressure_raw: Option<f32>,
    latest_acceleration: Option<f32>,
    latest_angular_rate: Option<f32>,
}

impl SessionPipeline {
    /// Create a pipeline for a freshly assigned session id.
    pub fn new(session_id: SessionId, publisher: PublishHandle) -> Self {
        Self {
            session_id,
            aggregator: SessionAggregator::new(),
            publisher,
            latest_pressure_raw: None,
            latest_acceleration: None,
            latest_angular_rate: None,
        }
    }

    /// The id this pipeline aggregates under.
    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// Total samples aggregated so far.
    pub fn sample_count(&self) -> usize {
        self.aggregator.sample_count()
    }

    /// The current session aggregate.
    pub fn snapshot(&self) -> &crate::core::session::SessionSnapshot {
        self.aggregator.snapshot()
    }

    /// Process one raw notification end to end.
    ///
    /// A decode failure drops the sample without touching any state. After a
    /// successful decode the sample is aggregated unconditionally; a publish
    /// failure is reported but the in-memory aggregate stays authoritative.
    pub fn handle_notification(
        &mut self,
        notification: &Notification,
    ) -> Result<DisplayUpdate, PipelineError> {
        let raw = decode_sample(&notification.payload)?;
        let sample = calibrate(notification.channel, raw);

        match sample.channel {
            Channel::Pressure => self.latest_pressure_raw = Some(sample.magnitude),
            Channel::LateralAcceleration => self.latest_acceleration = Some(sample.magnitude),
            Channel::AngularRate => self.latest_angular_rate = Some(sample.magnitude),
        }

        // The pressure counter only advances on pressure samples; the timing
        // verdict is re-evaluated on every event from the latest values.
        let verdicts = SampleVerdicts {
            pressure: match sample.channel {
                Channel::Pressure => classify_pressure(sample.magnitude),
                _ => Verdict::Ok,
            },
            timing: classify_timing(
                self.latest_acceleration.unwrap_or(0.0),
                self.latest_angular_rate,
            ),
        };

        debug!(
            channel = %sample.channel,
            magnitude = sample.magnitude,
            pressure_error = verdicts.pressure.is_error(),
            timing_error = verdicts.timing.is_error(),
            "Sample processed"
        );

        let snapshot =
            self.aggregator
                .record_sample(sample.channel, sample.magnitude, verdicts);
        let update = self.display_update(verdicts.timing);

        self.publisher.submit(self.session_id, snapshot)?;
        Ok(update)
    }

    fn display_update(&self, timing: Verdict) -> DisplayUpdate {
        // The pressure readout re-colours from the latest pressure sample on
        // every event, independent of the counter policy above.
        let pressure_ok = self
            .latest_pressure_raw
            .map(|raw| !classify_pressure(raw).is_error())
            .unwrap_or(true);

        DisplayUpdate {
            pressure: self.latest_pressure_raw.map(pressure_display),
            acceleration: self.latest_acceleration,
            gyroscope: self.latest_angular_rate,
            pressure_ok,
            timing_ok: !timing.is_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::publisher::SessionPublisher;
    use crate::store::{MemorySessionStore, SessionStore};
    use std::sync::Arc;

    fn pipeline(store: Arc<MemorySessionStore>) -> (SessionPipeline, SessionPublisher) {
        let publisher = SessionPublisher::new(store);
        let pipeline = SessionPipeline::new(0, publisher.handle());
        (pipeline, publisher)
    }

    #[test]
    fn test_decode_failure_drops_sample() {
        let store = Arc::new(MemorySessionStore::new());
        let (mut pipeline, mut publisher) = pipeline(store.clone());

        let err = pipeline
            .handle_notification(&Notification::new(Channel::Pressure, vec![1, 2]))
            .unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));
        assert_eq!(pipeline.sample_count(), 0);

        publisher.shutdown();
        assert!(store.fetch_session(0).unwrap().is_none());
    }

    #[test]
    fn test_display_defaults_before_first_update() {
        let store = Arc::new(MemorySessionStore::new());
        let (mut pipeline, mut publisher) = pipeline(store);

        let update = pipeline
            .handle_notification(&Notification::from_value(Channel::LateralAcceleration, 0.3))
            .unwrap();
        assert_eq!(update.pressure, None);
        assert_eq!(update.acceleration, Some(0.3));
        assert_eq!(update.gyroscope, None);
        assert!(update.pressure_ok);
        // No angular-rate sample yet, so no timing error despite weak drive.
        assert!(update.timing_ok);

        publisher.shutdown();
    }

    #[test]
    fn test_pressure_display_uses_curve() {
        let store = Arc::new(MemorySessionStore::new());
        let (mut pipeline, mut publisher) = pipeline(store);

        let update = pipeline
            .handle_notification(&Notification::from_value(Channel::Pressure, -0.5))
            .unwrap();
        assert_eq!(update.pressure, Some(pressure_display(0.5)));
        assert!(update.pressure_ok);

        let update = pipeline
            .handle_notification(&Notification::from_value(Channel::Pressure, 2.0))
            .unwrap();
        assert!(!update.pressure_ok);

        publisher.shutdown();
    }

    #[test]
    fn test_stale_pressure_not_recounted() {
        let store = Arc::new(MemorySessionStore::new());
        let (mut pipeline, mut publisher) = pipeline(store.clone());

        pipeline
            .handle_notification(&Notification::from_value(Channel::Pressure, 2.0))
            .unwrap();
        // Motion samples keep the pressure readout red but must not advance
        // the pressure counter again.
        let update = pipeline
            .handle_notification(&Notification::from_value(Channel::LateralAcceleration, 1.0))
            .unwrap();
        assert!(!update.pressure_ok);

        publisher.shutdown();
        let doc = store.fetch_session(0).unwrap().unwrap();
        assert_eq!(doc.erroneous_pressure_duration, 1);
    }
}
