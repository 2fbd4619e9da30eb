//! Stateless technique-error predicates.
//!
//! Thresholds are fixed physiological/technique limits determined during
//! on-water trials with the sensor hardware. The pressure predicate works on
//! the unrounded raw magnitude; the combined timing predicate works on the
//! rounded motion values, reusing the most recently observed reading per
//! channel.

/// Raw pressure magnitude above which force application is erroneous.
pub const PRESSURE_ERROR_LIMIT: f32 = 1.6;

/// Lateral acceleration below which the stroke lacks drive.
pub const ACCELERATION_FLOOR: f32 = 0.6;

/// Angular rate above which the recovery is rushed.
pub const ANGULAR_RATE_CEILING: f32 = 150.0;

/// Ok/Error classification of a channel on a given sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Within technique limits.
    Ok,
    /// Outside technique limits.
    Error,
}

impl Verdict {
    /// Whether this verdict signals an error.
    pub fn is_error(&self) -> bool {
        matches!(self, Verdict::Error)
    }
}

/// Classify pressure application from the unrounded raw magnitude.
pub fn classify_pressure(raw_magnitude: f32) -> Verdict {
    if raw_magnitude > PRESSURE_ERROR_LIMIT {
        Verdict::Error
    } else {
        Verdict::Ok
    }
}

/// Classify stroke timing from the latest motion readings.
///
/// A timing error is a weak drive combined with a rushed recovery. Before
/// the first acceleration sample the value reads as `0.0`; before the first
/// angular-rate sample no error can be signalled at all, mirroring how the
/// display fields default.
pub fn classify_timing(acceleration: f32, angular_rate: Option<f32>) -> Verdict {
    match angular_rate {
        Some(rate) if acceleration < ACCELERATION_FLOOR && rate > ANGULAR_RATE_CEILING => {
            Verdict::Error
        }
        _ => Verdict::Ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressure_boundary() {
        assert_eq!(classify_pressure(1.61), Verdict::Error);
        assert_eq!(classify_pressure(1.6), Verdict::Ok);
        assert_eq!(classify_pressure(0.0), Verdict::Ok);
    }

    #[test]
    fn test_timing_boundary() {
        assert_eq!(classify_timing(0.59, Some(150.01)), Verdict::Error);
        assert_eq!(classify_timing(0.6, Some(150.01)), Verdict::Ok);
        assert_eq!(classify_timing(0.59, Some(150.0)), Verdict::Ok);
    }

    #[test]
    fn test_timing_missing_angular_rate() {
        // Default acceleration of 0.0 is below the floor, but no angular-rate
        // sample has arrived so no error can be signalled.
        assert_eq!(classify_timing(0.0, None), Verdict::Ok);
    }

    #[test]
    fn test_timing_default_acceleration() {
        assert_eq!(classify_timing(0.0, Some(160.0)), Verdict::Error);
    }
}
