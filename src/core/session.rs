//! Session-scoped aggregation of calibrated samples and error counters.
//!
//! One aggregator lives for exactly one session. Histories and counters only
//! ever grow; every `record_sample` call returns the full current snapshot
//! so the publisher can overwrite the remote document.

use crate::core::classify::Verdict;
use crate::transport::types::Channel;

/// Zero-based identifier of a session, assigned once at session start.
pub type SessionId = u32;

/// Per-channel verdicts for a single sample event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleVerdicts {
    /// Pressure-application verdict for this event.
    pub pressure: Verdict,
    /// Combined acceleration/angular-rate timing verdict for this event.
    pub timing: Verdict,
}

impl SampleVerdicts {
    /// Verdicts for a sample with nothing out of limits.
    pub fn ok() -> Self {
        Self {
            pressure: Verdict::Ok,
            timing: Verdict::Ok,
        }
    }
}

/// Full aggregated state of a session at one moment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSnapshot {
    /// Chronological pressure magnitudes.
    pub pressure_values: Vec<f32>,
    /// Chronological lateral-acceleration magnitudes.
    pub acceleration_values: Vec<f32>,
    /// Chronological angular-rate magnitudes.
    pub gyroscope_values: Vec<f32>,
    /// Count of samples whose pressure verdict was Error.
    pub erroneous_pressure_duration: u32,
    /// Count of samples whose timing verdict was Error.
    pub erroneous_timing_duration: u32,
}

/// Stateful accumulator for the active session.
#[derive(Debug, Default)]
pub struct SessionAggregator {
    snapshot: SessionSnapshot,
}

impl SessionAggregator {
    /// Create an empty aggregator for a new session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one calibrated sample and its verdicts.
    ///
    /// Appends the value to its channel's history, bumps the error counters
    /// the verdicts call for, and returns the resulting snapshot for
    /// publishing. Arrival order is preserved; nothing is ever dropped or
    /// decremented.
    pub fn record_sample(
        &mut self,
        channel: Channel,
        magnitude: f32,
        verdicts: SampleVerdicts,
    ) -> SessionSnapshot {
        match channel {
            Channel::Pressure => self.snapshot.pressure_values.push(magnitude),
            Channel::LateralAcceleration => self.snapshot.acceleration_values.push(magnitude),
            Channel::AngularRate => self.snapshot.gyroscope_values.push(magnitude),
        }

        if verdicts.pressure.is_error() {
            self.snapshot.erroneous_pressure_duration += 1;
        }
        if verdicts.timing.is_error() {
            self.snapshot.erroneous_timing_duration += 1;
        }

        self.snapshot.clone()
    }

    /// The current snapshot without recording anything.
    pub fn snapshot(&self) -> &SessionSnapshot {
        &self.snapshot
    }

    /// Total number of samples recorded across all channels.
    pub fn sample_count(&self) -> usize {
        self.snapshot.pressure_values.len()
            + self.snapshot.acceleration_values.len()
            + self.snapshot.gyroscope_values.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn err(pressure: bool, timing: bool) -> SampleVerdicts {
        SampleVerdicts {
            pressure: if pressure { Verdict::Error } else { Verdict::Ok },
            timing: if timing { Verdict::Error } else { Verdict::Ok },
        }
    }

    #[test]
    fn test_histories_grow_per_channel() {
        let mut agg = SessionAggregator::new();
        agg.record_sample(Channel::Pressure, 0.5, SampleVerdicts::ok());
        agg.record_sample(Channel::LateralAcceleration, 0.3, SampleVerdicts::ok());
        let snap = agg.record_sample(Channel::Pressure, 0.7, SampleVerdicts::ok());

        assert_eq!(snap.pressure_values, vec![0.5, 0.7]);
        assert_eq!(snap.acceleration_values, vec![0.3]);
        assert!(snap.gyroscope_values.is_empty());
        assert_eq!(agg.sample_count(), 3);
    }

    #[test]
    fn test_counters_match_error_verdicts() {
        let mut agg = SessionAggregator::new();
        agg.record_sample(Channel::Pressure, 2.0, err(true, false));
        agg.record_sample(Channel::AngularRate, 160.0, err(false, true));
        let snap = agg.record_sample(Channel::AngularRate, 155.0, err(false, true));

        assert_eq!(snap.erroneous_pressure_duration, 1);
        assert_eq!(snap.erroneous_timing_duration, 2);
    }

    #[test]
    fn test_value_appended_even_on_error() {
        let mut agg = SessionAggregator::new();
        let snap = agg.record_sample(Channel::Pressure, 2.0, err(true, false));
        assert_eq!(snap.pressure_values, vec![2.0]);
    }

    #[test]
    fn test_counters_monotonic() {
        let mut agg = SessionAggregator::new();
        let mut last_pressure = 0;
        let mut last_timing = 0;
        for i in 0..50u32 {
            let snap = agg.record_sample(
                Channel::Pressure,
                i as f32,
                err(i % 3 == 0, i % 7 == 0),
            );
            assert!(snap.erroneous_pressure_duration >= last_pressure);
            assert!(snap.erroneous_timing_duration >= last_timing);
            last_pressure = snap.erroneous_pressure_duration;
            last_timing = snap.erroneous_timing_duration;
            assert_eq!(snap.pressure_values.len(), (i + 1) as usize);
        }
    }
}
