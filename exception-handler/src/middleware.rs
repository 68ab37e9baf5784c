//! Middleware intercepting failed requests.
//!
//! Wrapping an `App` with [`ExceptionHandling`] routes every error carried by
//! a response, and every error returned by the wrapped service, through the
//! registered [`FailureDispatcher`]. Errors returned by the wrapped service
//! stay errors, carrying the rendered response for the server to send.
//! Without a registered dispatcher the middleware is inert and responses pass
//! through untouched.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::error::InternalError;
use actix_web::body::{BoxBody, EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::dispatch::FailureDispatcher;

/// Interception middleware produced by
/// [`HandlerRegistry::middleware`](crate::HandlerRegistry::middleware).
///
/// # Examples
/// ```
/// use actix_web::App;
/// use exception_handler::{ExceptionHandlingSettings, HandlerRegistry, Registration, configure};
///
/// let settings = ExceptionHandlingSettings { enabled: true };
/// let mut registry = HandlerRegistry::new();
/// assert_eq!(configure(&settings, &mut registry), Registration::Registered);
///
/// let _app = App::new().wrap(registry.middleware());
/// ```
#[derive(Clone, Default)]
pub struct ExceptionHandling {
    dispatcher: Option<Arc<dyn FailureDispatcher>>,
}

impl ExceptionHandling {
    /// Middleware routing failures through `dispatcher`.
    #[must_use]
    pub fn new(dispatcher: Arc<dyn FailureDispatcher>) -> Self {
        Self {
            dispatcher: Some(dispatcher),
        }
    }

    /// Middleware that intercepts nothing.
    #[must_use]
    pub fn inert() -> Self {
        Self::default()
    }

    /// Whether failures will be intercepted.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.dispatcher.is_some()
    }
}

impl std::fmt::Debug for ExceptionHandling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExceptionHandling")
            .field("active", &self.is_active())
            .finish()
    }
}

impl<S, B> Transform<S, ServiceRequest> for ExceptionHandling
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = ExceptionHandlingMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ExceptionHandlingMiddleware {
            service,
            dispatcher: self.dispatcher.clone(),
        }))
    }
}

/// Service wrapper produced by [`ExceptionHandling`].
///
/// Applications should not use this type directly.
pub struct ExceptionHandlingMiddleware<S> {
    service: S,
    dispatcher: Option<Arc<dyn FailureDispatcher>>,
}

impl<S, B> Service<ServiceRequest> for ExceptionHandlingMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(dispatcher) = self.dispatcher.clone() else {
            let fut = self.service.call(req);
            return Box::pin(async move { Ok(fut.await?.map_into_left_body()) });
        };

        // The request must not be cloned here: routing needs sole ownership.
        let fut = self.service.call(req);
        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    let rendered = res.response().error().map(|err| dispatcher.render(err));
                    match rendered {
                        Some(response) => Ok(res.into_response(response).map_into_right_body()),
                        None => Ok(res.map_into_left_body()),
                    }
                }
                Err(err) => {
                    let response = dispatcher.render(&err);
                    Err(InternalError::from_response(err, response).into())
                }
            }
        })
    }
}
