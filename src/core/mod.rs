//! Core sample-processing pipeline stages.
//!
//! This module contains:
//! - Payload decoding into raw floats
//! - Per-channel calibration
//! - Technique-error classification
//! - Session-scoped aggregation

pub mod calibrate;
pub mod classify;
pub mod decode;
pub mod session;

// Re-export commonly used types
pub use calibrate::{calibrate, pressure_display, round2, CalibratedSample};
pub use classify::{classify_pressure, classify_timing, Verdict};
pub use decode::{decode_sample, DecodeError, SAMPLE_WIDTH};
pub use session::{SampleVerdicts, SessionAggregator, SessionId, SessionSnapshot};
