//! Fire-and-forget session publishing.
//!
//! The pipeline hands every post-sample snapshot to a dedicated worker
//! thread and never waits on the network. The worker uploads snapshots in
//! arrival order, so a slow upload can never be overtaken by a later one and
//! the stored document never regresses to a shorter snapshot. A failed
//! upload is logged and dropped; the next snapshot supersedes it.

use crate::core::session::{SessionId, SessionSnapshot};
use crate::store::{SessionDocument, SessionStore};
use crossbeam_channel::{unbounded, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, warn};

/// Errors surfaced by the publisher front end.
#[derive(Debug)]
pub enum PublishError {
    /// The worker thread has shut down.
    WorkerGone,
}

impl std::fmt::Display for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PublishError::WorkerGone => write!(f, "Publisher worker has shut down"),
        }
    }
}

impl std::error::Error for PublishError {}

struct PublishRequest {
    session_id: SessionId,
    snapshot: SessionSnapshot,
}

/// Handle for submitting snapshots to the publish worker.
#[derive(Clone)]
pub struct PublishHandle {
    sender: Sender<PublishRequest>,
}

impl PublishHandle {
    /// Queue a snapshot for upload without blocking.
    pub fn submit(
        &self,
        session_id: SessionId,
        snapshot: SessionSnapshot,
    ) -> Result<(), PublishError> {
        self.sender
            .send(PublishRequest {
                session_id,
                snapshot,
            })
            .map_err(|_| PublishError::WorkerGone)
    }
}

/// Owns the publish worker thread for one session's lifetime.
pub struct SessionPublisher {
    sender: Option<Sender<PublishRequest>>,
    worker: Option<JoinHandle<()>>,
}

impl SessionPublisher {
    /// Spawn a publisher uploading through the given store.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        let (sender, receiver) = unbounded::<PublishRequest>();

        let worker = std::thread::Builder::new()
            .name("session-publisher".to_string())
            .spawn(move || {
                for request in receiver {
                    let document = SessionDocument::from(request.snapshot);
                    match store.put_session(request.session_id, &document) {
                        Ok(()) => debug!(
                            session_id = request.session_id,
                            samples = document.pressure_values.len()
                                + document.acceleration_values.len()
                                + document.gyroscope_values.len(),
                            "Session snapshot uploaded"
                        ),
                        // Not retried; the next snapshot carries the full
                        // state and supersedes this one.
                        Err(e) => warn!(
                            session_id = request.session_id,
                            error = %e,
                            "Session upload failed"
                        ),
                    }
                }
            })
            .expect("Failed to spawn publisher thread");

        Self {
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    /// Get a submission handle for the pipeline.
    pub fn handle(&self) -> PublishHandle {
        PublishHandle {
            sender: self
                .sender
                .clone()
                .expect("Publisher already shut down"),
        }
    }

    /// Drain the queue and stop the worker.
    ///
    /// Returns once every snapshot submitted before the call has been
    /// attempted against the store.
    pub fn shutdown(&mut self) {
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl Drop for SessionPublisher {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySessionStore;

    fn snapshot_with_pressure(values: Vec<f32>) -> SessionSnapshot {
        SessionSnapshot {
            pressure_values: values,
            ..SessionSnapshot::default()
        }
    }

    #[test]
    fn test_last_submission_wins() {
        let store = Arc::new(MemorySessionStore::new());
        let mut publisher = SessionPublisher::new(store.clone());
        let handle = publisher.handle();

        handle.submit(0, snapshot_with_pressure(vec![0.5])).unwrap();
        handle
            .submit(0, snapshot_with_pressure(vec![0.5, 2.0]))
            .unwrap();
        publisher.shutdown();

        let stored = store.fetch_session(0).unwrap().unwrap();
        assert_eq!(stored.pressure_values, vec![0.5, 2.0]);
    }

    #[test]
    fn test_submit_after_shutdown_fails() {
        let store = Arc::new(MemorySessionStore::new());
        let mut publisher = SessionPublisher::new(store);
        let handle = publisher.handle();
        publisher.shutdown();

        let err = handle
            .submit(0, SessionSnapshot::default())
            .unwrap_err();
        assert!(matches!(err, PublishError::WorkerGone));
    }

    #[test]
    fn test_distinct_sessions_keep_distinct_documents() {
        let store = Arc::new(MemorySessionStore::new());
        let mut publisher = SessionPublisher::new(store.clone());
        let handle = publisher.handle();

        handle.submit(0, snapshot_with_pressure(vec![1.0])).unwrap();
        handle.submit(1, snapshot_with_pressure(vec![2.0])).unwrap();
        publisher.shutdown();

        assert_eq!(store.session_count().unwrap(), 2);
    }
}
