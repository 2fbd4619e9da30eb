//! Channel-backed delivery of sensor notifications.
//!
//! The BLE stack (or a replay source) pushes raw notifications into a
//! [`NotificationSender`]; the session pipeline consumes them one at a time
//! from the link's receiver. One link per connected session.

use crate::transport::types::Notification;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Default capacity of the notification queue.
///
/// The sensor notifies at a few tens of hertz, so this buys minutes of
/// slack before the producer sees backpressure.
const LINK_CAPACITY: usize = 10_000;

/// Errors surfaced by the transport link.
#[derive(Debug)]
pub enum TransportError {
    /// The consuming side of the link has gone away.
    Disconnected,
    /// The notification queue is full; the sample was dropped.
    QueueFull,
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Disconnected => write!(f, "Transport link is disconnected"),
            TransportError::QueueFull => write!(f, "Transport queue is full"),
        }
    }
}

impl std::error::Error for TransportError {}

/// Producer handle held by the transport collaborator.
#[derive(Clone)]
pub struct NotificationSender {
    sender: Sender<Notification>,
}

impl NotificationSender {
    /// Deliver one notification, failing rather than blocking the producer.
    pub fn send(&self, notification: Notification) -> Result<(), TransportError> {
        match self.sender.try_send(notification) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(TransportError::QueueFull),
            Err(TrySendError::Disconnected(_)) => Err(TransportError::Disconnected),
        }
    }
}

/// The consuming end of a connected sensor session.
pub struct SensorLink {
    sender: Sender<Notification>,
    receiver: Receiver<Notification>,
}

impl SensorLink {
    /// Create a new link with the default queue capacity.
    pub fn new() -> Self {
        Self::with_capacity(LINK_CAPACITY)
    }

    /// Create a new link with an explicit queue capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Get a producer handle for the transport collaborator.
    pub fn sender(&self) -> NotificationSender {
        NotificationSender {
            sender: self.sender.clone(),
        }
    }

    /// Get the receiver the pipeline consumes from.
    pub fn receiver(&self) -> &Receiver<Notification> {
        &self.receiver
    }
}

impl Default for SensorLink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::types::Channel;

    #[test]
    fn test_send_and_receive_in_order() {
        let link = SensorLink::new();
        let sender = link.sender();

        sender
            .send(Notification::from_value(Channel::Pressure, 0.5))
            .unwrap();
        sender
            .send(Notification::from_value(Channel::AngularRate, 160.0))
            .unwrap();

        let first = link.receiver().recv().unwrap();
        let second = link.receiver().recv().unwrap();
        assert_eq!(first.channel, Channel::Pressure);
        assert_eq!(second.channel, Channel::AngularRate);
    }

    #[test]
    fn test_queue_full() {
        let link = SensorLink::with_capacity(1);
        let sender = link.sender();

        sender
            .send(Notification::from_value(Channel::Pressure, 0.1))
            .unwrap();
        let err = sender
            .send(Notification::from_value(Channel::Pressure, 0.2))
            .unwrap_err();
        assert!(matches!(err, TransportError::QueueFull));
    }
}
