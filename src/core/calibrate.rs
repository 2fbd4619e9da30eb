//! Per-channel calibration of decoded raw values.
//!
//! Direction is not meaningful to the technique analysis, so every channel
//! works on the absolute value of the raw reading. Pressure additionally has
//! a display-only exponential calibration curve fitted against the force
//! sensor; the stored and classified pressure magnitude stays unrounded.

use crate::transport::types::Channel;

/// Scale constant of the fitted pressure calibration curve.
pub const PRESSURE_CURVE_SCALE: f32 = 5.1581;

/// Exponent constant of the fitted pressure calibration curve.
pub const PRESSURE_CURVE_EXPONENT: f32 = 1.7726;

/// Round to two decimal places, the display precision of every channel.
pub fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// Applied-force display value for a raw pressure magnitude.
pub fn pressure_display(raw_magnitude: f32) -> f32 {
    round2(PRESSURE_CURVE_SCALE * (PRESSURE_CURVE_EXPONENT * raw_magnitude).exp())
}

/// A calibrated sample ready for classification and aggregation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibratedSample {
    /// Channel the sample belongs to.
    pub channel: Channel,
    /// Magnitude stored in the session history and fed to the classifier.
    ///
    /// Unrounded `|raw|` for pressure; `round2(|raw|)` for the motion
    /// channels.
    pub magnitude: f32,
    /// Value shown on the display surface.
    pub display: f32,
}

/// Calibrate a decoded raw reading for its channel.
pub fn calibrate(channel: Channel, raw: f32) -> CalibratedSample {
    let magnitude = raw.abs();
    match channel {
        Channel::Pressure => CalibratedSample {
            channel,
            magnitude,
            display: pressure_display(magnitude),
        },
        Channel::LateralAcceleration | Channel::AngularRate => {
            let rounded = round2(magnitude);
            CalibratedSample {
                channel,
                magnitude: rounded,
                display: rounded,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.014), 1.01);
        assert_eq!(round2(1.016), 1.02);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(150.004), 150.0);
    }

    #[test]
    fn test_pressure_display_formula() {
        for raw in [0.0f32, 0.5, 1.0, 1.6, 2.0] {
            let expected = round2(5.1581 * (1.7726 * raw).exp());
            assert_eq!(pressure_display(raw), expected);
        }
        // Zero force reads as the curve's intercept.
        assert_eq!(pressure_display(0.0), 5.16);
    }

    #[test]
    fn test_pressure_magnitude_unrounded() {
        let sample = calibrate(Channel::Pressure, -1.23456);
        assert_eq!(sample.magnitude, 1.23456);
        assert_eq!(sample.display, pressure_display(1.23456));
    }

    #[test]
    fn test_motion_channels_rounded() {
        let accel = calibrate(Channel::LateralAcceleration, -0.596);
        assert_eq!(accel.magnitude, 0.6);
        assert_eq!(accel.display, 0.6);

        let gyro = calibrate(Channel::AngularRate, 150.009);
        assert_eq!(gyro.magnitude, 150.01);
        assert_eq!(gyro.display, 150.01);
    }

    #[test]
    fn test_sign_discarded() {
        let a = calibrate(Channel::AngularRate, -160.0);
        let b = calibrate(Channel::AngularRate, 160.0);
        assert_eq!(a, b);
    }
}
