//! Test doubles shared by unit and integration tests.

use std::sync::{Arc, Mutex, PoisonError};

use actix_web::http::StatusCode;

use crate::observe::FailureObserver;

/// One event captured by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedFailure {
    /// Handler that rendered the failure.
    pub handler: &'static str,
    /// Status of the rendered response.
    pub status: StatusCode,
    /// Failure message.
    pub message: String,
}

/// Observer that keeps every event in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ObservedFailure>>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<ObservedFailure> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FailureObserver for RecordingObserver {
    fn handled(&self, handler: &'static str, status: StatusCode, message: &str) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ObservedFailure {
                handler,
                status,
                message: message.to_owned(),
            });
    }
}
