//! Failure taxonomy and the status mapping table.
//!
//! The set of kinds is closed. Every kind has a fixed HTTP status, a stable
//! `exception` label written into response bodies, and the name of the
//! handler reported to the observer when a failure of that kind is rendered.

use actix_web::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Category of a raised failure.
///
/// # Examples
/// ```
/// use actix_web::http::StatusCode;
/// use exception_handler::{ErrorKind, status_for};
///
/// assert_eq!(status_for(ErrorKind::EntityNotFound), StatusCode::NOT_FOUND);
/// assert_eq!(ErrorKind::EntityNotFound.label(), "EntityNotFoundException");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The caller is authenticated but lacks permission.
    AccessDenied,
    /// An argument supplied by the caller is invalid.
    InvalidArgument,
    /// The requested entity does not exist.
    EntityNotFound,
    /// No valid authorization accompanied the request.
    Unauthorized,
    /// One or more field-level constraints failed together.
    ConstraintViolation,
    /// A uniqueness constraint rejected the write.
    UniqueConstraintViolation,
    /// A JSON document could not be parsed.
    JsonParseFailure,
    /// A dependent service already rendered the response.
    UpstreamRelay,
    /// Any other runtime failure.
    Unclassified,
}

impl ErrorKind {
    /// Every kind, in dispatch precedence order.
    pub const ALL: [Self; 9] = [
        Self::UpstreamRelay,
        Self::ConstraintViolation,
        Self::AccessDenied,
        Self::InvalidArgument,
        Self::EntityNotFound,
        Self::Unauthorized,
        Self::UniqueConstraintViolation,
        Self::JsonParseFailure,
        Self::Unclassified,
    ];

    /// Label written into the `exception` field of single-error bodies.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AccessDenied => "AccessDeniedException",
            Self::InvalidArgument => "IllegalArgumentException",
            Self::EntityNotFound => "EntityNotFoundException",
            Self::Unauthorized => "NoAuthorizationException",
            Self::ConstraintViolation => "ConstraintViolationException",
            Self::UniqueConstraintViolation => "UniqueConstraintViolationException",
            Self::JsonParseFailure => "ParsJsonException",
            Self::UpstreamRelay => "MicroserviceResponseException",
            Self::Unclassified => "RuntimeException",
        }
    }

    /// Handler name reported when a failure of this kind is rendered.
    #[must_use]
    pub const fn handler(self) -> &'static str {
        match self {
            Self::AccessDenied => "access_denied",
            Self::InvalidArgument => "invalid_argument",
            Self::EntityNotFound => "entity_not_found",
            Self::Unauthorized => "unauthorized",
            Self::ConstraintViolation => "constraint_violation",
            Self::UniqueConstraintViolation => "unique_constraint_violation",
            Self::JsonParseFailure => "json_parse_failure",
            Self::UpstreamRelay => "upstream_relay",
            Self::Unclassified => "runtime_failure",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// HTTP status for a failure kind.
///
/// Relayed failures carry their own status; the value returned for
/// [`ErrorKind::UpstreamRelay`] is only the nominal fallback and is never
/// consulted by the dispatcher.
#[must_use]
pub const fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::AccessDenied => StatusCode::FORBIDDEN,
        ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
        ErrorKind::EntityNotFound => StatusCode::NOT_FOUND,
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::ConstraintViolation => StatusCode::CONFLICT,
        ErrorKind::UniqueConstraintViolation => StatusCode::NOT_ACCEPTABLE,
        ErrorKind::JsonParseFailure | ErrorKind::UpstreamRelay | ErrorKind::Unclassified => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Render a status as the textual `error_code`, e.g. `404 NOT_FOUND`.
///
/// The name is the conventional constant for the status: the reason phrase
/// upper-cased with spaces and hyphens replaced by underscores, except where
/// the constant differs from the phrase, as in `418 I_AM_A_TEAPOT`.
/// Statuses with no known name render as the bare code.
///
/// # Examples
/// ```
/// use actix_web::http::StatusCode;
/// use exception_handler::status_text;
///
/// assert_eq!(status_text(StatusCode::NOT_ACCEPTABLE), "406 NOT_ACCEPTABLE");
/// assert_eq!(status_text(StatusCode::IM_A_TEAPOT), "418 I_AM_A_TEAPOT");
/// ```
#[must_use]
pub fn status_text(status: StatusCode) -> String {
    let code = status.as_u16();
    conventional_name(code)
        .map(str::to_owned)
        .or_else(|| status.canonical_reason().map(constant_case))
        .map_or_else(|| code.to_string(), |name| format!("{code} {name}"))
}

/// Constant names that do not follow from the canonical reason phrase.
const fn conventional_name(code: u16) -> Option<&'static str> {
    match code {
        103 => Some("EARLY_HINTS"),
        416 => Some("REQUESTED_RANGE_NOT_SATISFIABLE"),
        418 => Some("I_AM_A_TEAPOT"),
        425 => Some("TOO_EARLY"),
        509 => Some("BANDWIDTH_LIMIT_EXCEEDED"),
        _ => None,
    }
}

fn constant_case(reason: &str) -> String {
    reason
        .chars()
        .filter_map(|ch| match ch {
            ' ' | '-' => Some('_'),
            other if other.is_ascii_alphanumeric() => Some(other.to_ascii_uppercase()),
            _ => None,
        })
        .collect()
}
