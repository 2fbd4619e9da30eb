//! Sensor notification transport.
//!
//! Device discovery and pairing live outside this crate; whatever owns the
//! BLE connection pushes tagged raw notifications into a [`SensorLink`].
//! A [`ReplaySource`](replay::ReplaySource) can stand in for the device by
//! feeding recorded samples through the same link.

pub mod link;
pub mod replay;
pub mod types;

// Re-export commonly used types
pub use link::{NotificationSender, SensorLink, TransportError};
pub use replay::{ReplayError, ReplaySource};
pub use types::{Channel, Notification, SENSOR_SERVICE_UUID};
