//! Wire-level types for the sensor notification stream.
//!
//! The rowing sensor streams three characteristics over BLE. The transport
//! collaborator (BLE central, replay file, test harness) tags each raw
//! notification payload with the channel it belongs to and feeds it into a
//! [`SensorLink`](crate::transport::SensorLink).

use serde::{Deserialize, Serialize};

/// GATT service UUID advertised by the rowing sensor.
pub const SENSOR_SERVICE_UUID: &str = "5CBF9D99-46B2-4255-9F44-73B76D5353B8";

/// Characteristic UUID for the oar-handle pressure stream.
pub const PRESSURE_CHARACTERISTIC_UUID: &str = "FA571202-D0A0-4477-B71B-4A5E70D3477C";

/// Characteristic UUID for the lateral (Y-axis) acceleration stream.
pub const ACCELERATION_CHARACTERISTIC_UUID: &str = "78211F0E-B738-4F17-BBB7-1EB3BAAD02D4";

/// Characteristic UUID for the angular-rate (X-axis gyroscope) stream.
pub const ANGULAR_RATE_CHARACTERISTIC_UUID: &str = "23B0357D-0FBD-4032-BD07-55445E471E38";

/// One of the three physical quantities streamed from the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Force applied to the oar handle.
    Pressure,
    /// Lateral acceleration of the boat.
    LateralAcceleration,
    /// Angular rate around the boat's long axis.
    AngularRate,
}

impl Channel {
    /// All channels the agent subscribes to at connection time.
    pub const ALL: [Channel; 3] = [
        Channel::Pressure,
        Channel::LateralAcceleration,
        Channel::AngularRate,
    ];

    /// The BLE characteristic UUID carrying this channel.
    pub fn characteristic_uuid(&self) -> &'static str {
        match self {
            Channel::Pressure => PRESSURE_CHARACTERISTIC_UUID,
            Channel::LateralAcceleration => ACCELERATION_CHARACTERISTIC_UUID,
            Channel::AngularRate => ANGULAR_RATE_CHARACTERISTIC_UUID,
        }
    }

    /// Map a characteristic UUID back to its channel.
    ///
    /// Comparison is case-insensitive since BLE stacks disagree on casing.
    pub fn from_characteristic_uuid(uuid: &str) -> Option<Channel> {
        Channel::ALL
            .into_iter()
            .find(|c| c.characteristic_uuid().eq_ignore_ascii_case(uuid))
    }

    /// Human-readable channel name for logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            Channel::Pressure => "pressure",
            Channel::LateralAcceleration => "acceleration",
            Channel::AngularRate => "gyroscope",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A raw characteristic notification as delivered by the transport layer.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Which characteristic produced the payload.
    pub channel: Channel,
    /// Raw payload bytes; the first four are a little-endian f32.
    pub payload: Vec<u8>,
}

impl Notification {
    /// Create a notification from a channel tag and raw payload.
    pub fn new(channel: Channel, payload: Vec<u8>) -> Self {
        Self { channel, payload }
    }

    /// Encode a physical value the way the sensor firmware does.
    ///
    /// Used by the replay source and tests to synthesize payloads.
    pub fn from_value(channel: Channel, value: f32) -> Self {
        Self {
            channel,
            payload: value.to_le_bytes().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_round_trip() {
        for channel in Channel::ALL {
            let uuid = channel.characteristic_uuid();
            assert_eq!(Channel::from_characteristic_uuid(uuid), Some(channel));
            assert_eq!(
                Channel::from_characteristic_uuid(&uuid.to_lowercase()),
                Some(channel)
            );
        }
    }

    #[test]
    fn test_unknown_uuid() {
        assert_eq!(
            Channel::from_characteristic_uuid("00000000-0000-0000-0000-000000000000"),
            None
        );
    }

    #[test]
    fn test_notification_from_value() {
        let n = Notification::from_value(Channel::Pressure, 1.5);
        assert_eq!(n.payload, 1.5f32.to_le_bytes().to_vec());
    }
}
