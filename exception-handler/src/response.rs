//! JSON payloads returned to clients.
//!
//! Field names are fixed lower snake case on the wire regardless of the
//! host's own serialisation conventions.

use actix_web::{HttpResponse, http::StatusCode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Single-error response body.
///
/// # Examples
/// ```
/// use exception_handler::IncorrectData;
///
/// let body = IncorrectData::new("EntityNotFoundException", "missing", "404 NOT_FOUND");
/// let json = serde_json::to_value(&body).expect("serialises");
/// assert_eq!(json["error_message"], "missing");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub struct IncorrectData {
    #[schema(example = "EntityNotFoundException")]
    exception: String,
    #[schema(example = "User with id=7 not found")]
    error_message: String,
    #[schema(example = "404 NOT_FOUND")]
    error_code: String,
}

impl IncorrectData {
    /// Build a body from its three fields.
    pub fn new(
        exception: impl Into<String>,
        error_message: impl Into<String>,
        error_code: impl Into<String>,
    ) -> Self {
        Self {
            exception: exception.into(),
            error_message: error_message.into(),
            error_code: error_code.into(),
        }
    }

    /// Label of the failure that produced this body.
    #[must_use]
    pub fn exception(&self) -> &str {
        self.exception.as_str()
    }

    /// Human-readable message.
    #[must_use]
    pub fn error_message(&self) -> &str {
        self.error_message.as_str()
    }

    /// Textual HTTP status.
    #[must_use]
    pub fn error_code(&self) -> &str {
        self.error_code.as_str()
    }
}

/// One field-level constraint failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub struct Violation {
    #[schema(example = "email")]
    field_name: String,
    #[schema(example = "must be a well-formed email address")]
    error_message: String,
}

impl Violation {
    /// Build a violation for `field_name`.
    pub fn new(field_name: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            error_message: error_message.into(),
        }
    }

    /// Property path of the offending field.
    #[must_use]
    pub fn field_name(&self) -> &str {
        self.field_name.as_str()
    }

    /// Constraint message.
    #[must_use]
    pub fn error_message(&self) -> &str {
        self.error_message.as_str()
    }
}

/// Multi-violation response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub struct ValidationErrorsResponse {
    #[schema(example = "409 CONFLICT")]
    error_code: String,
    violations: Vec<Violation>,
}

impl ValidationErrorsResponse {
    /// Build a body from a status text and the violations in engine order.
    pub fn new(error_code: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            error_code: error_code.into(),
            violations,
        }
    }

    /// Textual HTTP status.
    #[must_use]
    pub fn error_code(&self) -> &str {
        self.error_code.as_str()
    }

    /// Violations in the order the validation engine reported them.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

/// Either of the two body shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FailureBody {
    /// Multi-violation body. Listed first so deserialisation prefers it.
    Violations(ValidationErrorsResponse),
    /// Single-error body.
    Single(IncorrectData),
}

impl FailureBody {
    /// Textual HTTP status carried by either shape.
    #[must_use]
    pub fn error_code(&self) -> &str {
        match self {
            Self::Violations(body) => body.error_code(),
            Self::Single(body) => body.error_code(),
        }
    }
}

/// Status and body produced for one handled failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureResponse {
    status: StatusCode,
    body: FailureBody,
}

impl FailureResponse {
    /// Pair a status with a single-error body.
    #[must_use]
    pub const fn single(status: StatusCode, body: IncorrectData) -> Self {
        Self {
            status,
            body: FailureBody::Single(body),
        }
    }

    /// Pair a status with a multi-violation body.
    #[must_use]
    pub const fn violations(status: StatusCode, body: ValidationErrorsResponse) -> Self {
        Self {
            status,
            body: FailureBody::Violations(body),
        }
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &FailureBody {
        &self.body
    }

    /// Render as an Actix response with a JSON body.
    #[must_use]
    pub fn to_http_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(&self.body)
    }
}
