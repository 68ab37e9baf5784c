//! Observability port for rendered failures.
//!
//! The dispatcher reports every rendered failure exactly once through a
//! [`FailureObserver`]. Keeping the sink injectable leaves the mapping itself
//! free of global state.

use actix_web::http::StatusCode;
use tracing::info;

/// Receives one event per handled failure.
pub trait FailureObserver: Send + Sync {
    /// Record that `handler` rendered a failure with `status`.
    fn handled(&self, handler: &'static str, status: StatusCode, message: &str);
}

/// Observer emitting one `tracing` event per handled failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl FailureObserver for TracingObserver {
    fn handled(&self, handler: &'static str, status: StatusCode, message: &str) {
        info!(
            handler,
            status = %status,
            error_message = message,
            "failure rendered as error response"
        );
    }
}

/// Observer that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpObserver;

impl FailureObserver for NoOpObserver {
    fn handled(&self, _handler: &'static str, _status: StatusCode, _message: &str) {}
}
