//! Pass-through of error responses rendered by dependent services.
//!
//! A client calling another service that answers with an error wraps the
//! remote status and body in an [`UpstreamRelayFailure`]. The dispatcher
//! relays both unchanged instead of consulting the status table.

use actix_web::http::StatusCode;

use crate::response::IncorrectData;
use crate::signal::FailureSignal;
use crate::taxonomy::status_text;

/// Pre-rendered failure received from a dependent service.
///
/// # Examples
/// ```
/// use actix_web::http::StatusCode;
/// use exception_handler::{IncorrectData, UpstreamRelayFailure};
///
/// let body = IncorrectData::new("EntityNotFoundException", "no such news", "404 NOT_FOUND");
/// let relay = UpstreamRelayFailure::new(StatusCode::NOT_FOUND, body.clone());
/// assert_eq!(relay.status(), StatusCode::NOT_FOUND);
/// assert_eq!(relay.body(), &body);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRelayFailure {
    status: StatusCode,
    body: IncorrectData,
}

impl UpstreamRelayFailure {
    /// Wrap an already rendered status and body.
    #[must_use]
    pub const fn new(status: StatusCode, body: IncorrectData) -> Self {
        Self { status, body }
    }

    /// Build the body from the remote failure's label and raw status code.
    ///
    /// # Errors
    /// Returns [`FailureSignal::InvalidArgument`] when `status_code` is not a
    /// valid HTTP status.
    pub fn from_remote(
        status_code: u16,
        exception: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, FailureSignal> {
        let status = parse_status(status_code)?;
        Ok(Self::new(
            status,
            IncorrectData::new(exception, message, status_text(status)),
        ))
    }

    /// Decode a dependent service's error body.
    ///
    /// # Errors
    /// Returns [`FailureSignal::JsonParseFailure`] when the body is not an
    /// [`IncorrectData`] document and [`FailureSignal::InvalidArgument`] when
    /// `status_code` is not a valid HTTP status.
    ///
    /// # Examples
    /// ```
    /// use exception_handler::{ErrorKind, UpstreamRelayFailure};
    ///
    /// let err = UpstreamRelayFailure::decode(502, b"<html>bad gateway</html>")
    ///     .expect_err("HTML is not an error document");
    /// assert_eq!(err.kind(), ErrorKind::JsonParseFailure);
    /// ```
    pub fn decode(status_code: u16, raw: &[u8]) -> Result<Self, FailureSignal> {
        let status = parse_status(status_code)?;
        let body: IncorrectData = serde_json::from_slice(raw)?;
        Ok(Self::new(status, body))
    }

    /// Status returned to the client.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Body returned to the client.
    #[must_use]
    pub const fn body(&self) -> &IncorrectData {
        &self.body
    }
}

impl std::fmt::Display for UpstreamRelayFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "upstream responded {}: {}",
            self.status,
            self.body.error_message()
        )
    }
}

fn parse_status(status_code: u16) -> Result<StatusCode, FailureSignal> {
    StatusCode::from_u16(status_code).map_err(|_| {
        FailureSignal::invalid_argument(format!("{status_code} is not a valid HTTP status"))
    })
}
