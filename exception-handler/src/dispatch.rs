//! Selection of the rendering rule for a failure.
//!
//! The match is explicit and ordered most specific first: relayed upstream
//! responses, then multi-field constraint failures, then the single-cause
//! kinds, and the generic runtime failure last.

use std::sync::Arc;

use actix_web::error::JsonPayloadError;
use actix_web::{HttpResponse, http::StatusCode};

use crate::observe::{FailureObserver, TracingObserver};
use crate::response::{FailureResponse, IncorrectData, ValidationErrorsResponse, Violation};
use crate::signal::FailureSignal;
use crate::taxonomy::{ErrorKind, status_for, status_text};

/// Seam for anything able to turn an Actix error into a response.
///
/// Hosts that already own an equivalent handler register their own
/// implementation; [`Dispatcher`] is the default.
pub trait FailureDispatcher: Send + Sync {
    /// Render `error` as a complete HTTP response.
    fn render(&self, error: &actix_web::Error) -> HttpResponse;
}

/// Default dispatcher mapping failures through the status table.
///
/// # Examples
/// ```
/// use actix_web::http::StatusCode;
/// use exception_handler::{Dispatcher, FailureSignal, NoOpObserver};
/// use std::sync::Arc;
///
/// let dispatcher = Dispatcher::new(Arc::new(NoOpObserver));
/// let response = dispatcher.dispatch(&FailureSignal::access_denied("role=GUEST"));
/// assert_eq!(response.status(), StatusCode::FORBIDDEN);
/// ```
#[derive(Clone)]
pub struct Dispatcher {
    observer: Arc<dyn FailureObserver>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Arc::new(TracingObserver))
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Create a dispatcher reporting to `observer`.
    #[must_use]
    pub fn new(observer: Arc<dyn FailureObserver>) -> Self {
        Self { observer }
    }

    /// Render a typed failure.
    #[must_use]
    pub fn dispatch(&self, signal: &FailureSignal) -> FailureResponse {
        let response = match signal {
            FailureSignal::UpstreamRelay(relay) => {
                FailureResponse::single(relay.status(), relay.body().clone())
            }
            FailureSignal::ConstraintViolation { violations, .. } => {
                constraint_response(violations)
            }
            other => single_cause_response(other),
        };
        self.observer.handled(
            signal.kind().handler(),
            response.status(),
            &signal.to_string(),
        );
        response
    }

    /// Render any Actix error, classifying errors that are not typed
    /// failures.
    #[must_use]
    pub fn dispatch_error(&self, error: &actix_web::Error) -> FailureResponse {
        if let Some(signal) = error.as_error::<FailureSignal>() {
            return self.dispatch(signal);
        }
        let signal = classify(error);
        self.dispatch(&signal)
    }
}

impl FailureDispatcher for Dispatcher {
    fn render(&self, error: &actix_web::Error) -> HttpResponse {
        self.dispatch_error(error).to_http_response()
    }
}

/// Map an untyped Actix error onto the taxonomy.
fn classify(error: &actix_web::Error) -> FailureSignal {
    if let Some(payload) = error.as_error::<JsonPayloadError>() {
        return FailureSignal::json_parse(payload.to_string());
    }
    FailureSignal::runtime(error.to_string())
}

fn constraint_response(violations: &[Violation]) -> FailureResponse {
    let status = status_for(ErrorKind::ConstraintViolation);
    FailureResponse::violations(
        status,
        ValidationErrorsResponse::new(status_text(status), violations.to_vec()),
    )
}

fn single_cause_response(signal: &FailureSignal) -> FailureResponse {
    let status: StatusCode = status_for(signal.kind());
    FailureResponse::single(
        status,
        IncorrectData::new(signal.label(), signal.to_string(), status_text(status)),
    )
}
