//! Carbon Rowing Agent - active-feedback technique analysis for rowing.
//!
//! This library ingests the three live streams of a wireless rowing sensor
//! (oar pressure, lateral acceleration, angular rate), classifies every
//! sample against fixed technique thresholds, accumulates per-session error
//! statistics, and uploads the session record to a remote store after every
//! sample.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Carbon Rowing Agent                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────┐   ┌───────────┐   ┌─────────┐ │
//! │  │ Transport │──▶│  Decode/ │──▶│ Classify  │──▶│ Session │ │
//! │  │  (BLE /   │   │ Calibrate│   │ (fixed    │   │Aggregate│ │
//! │  │  replay)  │   │          │   │thresholds)│   │         │ │
//! │  └───────────┘   └──────────┘   └───────────┘   └────┬────┘ │
//! │                                                      │      │
//! │                                                      ▼      │
//! │                                               ┌───────────┐ │
//! │                                               │ Publisher │ │
//! │                                               │ (overwrite│ │
//! │                                               │  upload)  │ │
//! │                                               └───────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use carbon_rowing_agent::{
//!     pipeline::SessionPipeline,
//!     publisher::SessionPublisher,
//!     store::MemorySessionStore,
//!     transport::{Channel, Notification},
//! };
//!
//! let store = Arc::new(MemorySessionStore::new());
//! let publisher = SessionPublisher::new(store);
//! let mut pipeline = SessionPipeline::new(0, publisher.handle());
//!
//! let update = pipeline
//!     .handle_notification(&Notification::from_value(Channel::Pressure, 0.5))
//!     .expect("sample processed");
//! assert!(update.pressure_ok);
//! ```

pub mod config;
pub mod core;
pub mod counter;
pub mod pipeline;
pub mod publisher;
pub mod store;
pub mod transport;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError};
pub use crate::core::{
    calibrate, classify_pressure, classify_timing, decode_sample, CalibratedSample, DecodeError,
    SampleVerdicts, SessionAggregator, SessionId, SessionSnapshot, Verdict,
};
pub use counter::SessionCounter;
pub use pipeline::{DisplayUpdate, PipelineError, SessionPipeline};
pub use publisher::{PublishHandle, SessionPublisher};
pub use store::{
    BlockingSessionStore, MemorySessionStore, RestSessionStore, SessionDocument, SessionStore,
    StoreConfig, StoreError,
};
pub use transport::{Channel, Notification, SensorLink};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
