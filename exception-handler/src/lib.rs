//! Opt-in translation of request-handling failures into JSON error responses.
//!
//! Handlers raise a [`FailureSignal`] (or let any Actix error propagate). When
//! exception handling is enabled, the [`ExceptionHandling`] middleware hands
//! the failure to a [`Dispatcher`], which picks the most specific rendering
//! rule, maps the failure kind to an HTTP status with [`status_for`], and
//! returns either an [`IncorrectData`] or a [`ValidationErrorsResponse`] body.
//! Failures relayed from dependent services ([`UpstreamRelayFailure`]) keep
//! their original status and body.
//!
//! # Example
//!
//! ```
//! use actix_web::{App, HttpResponse, web};
//! use exception_handler::{
//!     ExceptionHandlingSettings, FailureSignal, HandlerRegistry, Registration, configure,
//! };
//!
//! async fn show_user() -> Result<HttpResponse, FailureSignal> {
//!     Err(FailureSignal::not_found("User with id=7 not found"))
//! }
//!
//! let mut registry = HandlerRegistry::new();
//! let outcome = configure(&ExceptionHandlingSettings { enabled: true }, &mut registry);
//! assert_eq!(outcome, Registration::Registered);
//!
//! let _app = App::new()
//!     .wrap(registry.middleware())
//!     .route("/users/7", web::get().to(show_user));
//! ```

mod activation;
mod config;
mod dispatch;
mod doc;
mod middleware;
mod observe;
mod relay;
mod response;
mod signal;
mod taxonomy;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use activation::{HandlerRegistry, Registration, configure, configure_with};
pub use config::ExceptionHandlingSettings;
pub use dispatch::{Dispatcher, FailureDispatcher};
pub use doc::ErrorSchemas;
pub use middleware::{ExceptionHandling, ExceptionHandlingMiddleware};
pub use observe::{FailureObserver, NoOpObserver, TracingObserver};
pub use relay::UpstreamRelayFailure;
pub use response::{
    FailureBody, FailureResponse, IncorrectData, ValidationErrorsResponse, Violation,
};
pub use signal::FailureSignal;
pub use taxonomy::{ErrorKind, status_for, status_text};
