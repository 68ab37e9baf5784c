//! Typed failures raised by request handlers.
//!
//! Handlers return `Result<T, FailureSignal>`. With exception handling
//! enabled the [`ExceptionHandling`](crate::ExceptionHandling) middleware
//! renders the failure as a JSON body; otherwise Actix falls back to the
//! default [`ResponseError`] rendering (500, plain text).

use actix_web::ResponseError;
use thiserror::Error;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::relay::UpstreamRelayFailure;
use crate::response::Violation;
use crate::taxonomy::ErrorKind;

/// A failure raised while handling one request.
///
/// # Examples
/// ```
/// use exception_handler::{ErrorKind, FailureSignal};
///
/// let signal = FailureSignal::not_found("User with id=7 not found");
/// assert_eq!(signal.kind(), ErrorKind::EntityNotFound);
/// assert_eq!(signal.to_string(), "User with id=7 not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureSignal {
    /// Authenticated caller lacks permission.
    #[error("{0}")]
    AccessDenied(String),
    /// Caller supplied an invalid argument.
    #[error("{0}")]
    InvalidArgument(String),
    /// Requested entity does not exist.
    #[error("{0}")]
    EntityNotFound(String),
    /// Request carried no valid authorization.
    #[error("{0}")]
    Unauthorized(String),
    /// Several field constraints failed together.
    #[error("{message}")]
    ConstraintViolation {
        /// Summary of the failed constraints.
        message: String,
        /// Individual failures in validation-engine order.
        violations: Vec<Violation>,
    },
    /// A uniqueness constraint rejected the write.
    #[error("{0}")]
    UniqueConstraintViolation(String),
    /// A JSON document could not be parsed.
    #[error("{0}")]
    JsonParseFailure(String),
    /// A dependent service already rendered the response.
    #[error("{0}")]
    UpstreamRelay(UpstreamRelayFailure),
    /// Any other runtime failure.
    #[error("{message}")]
    Unclassified {
        /// Host-specific label replacing `RuntimeException` in the body.
        label: Option<String>,
        /// Failure description.
        message: String,
    },
}

impl FailureSignal {
    /// Failure category used for status mapping.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AccessDenied(_) => ErrorKind::AccessDenied,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::EntityNotFound(_) => ErrorKind::EntityNotFound,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::ConstraintViolation { .. } => ErrorKind::ConstraintViolation,
            Self::UniqueConstraintViolation(_) => ErrorKind::UniqueConstraintViolation,
            Self::JsonParseFailure(_) => ErrorKind::JsonParseFailure,
            Self::UpstreamRelay(_) => ErrorKind::UpstreamRelay,
            Self::Unclassified { .. } => ErrorKind::Unclassified,
        }
    }

    /// Label written into the `exception` field.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Unclassified {
                label: Some(label), ..
            } => label.as_str(),
            Self::UpstreamRelay(relay) => relay.body().exception(),
            other => other.kind().label(),
        }
    }

    /// Convenience constructor for [`ErrorKind::AccessDenied`].
    pub fn access_denied(message: impl Into<String>) -> Self {
        Self::AccessDenied(message.into())
    }

    /// Convenience constructor for [`ErrorKind::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Convenience constructor for [`ErrorKind::EntityNotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::EntityNotFound(message.into())
    }

    /// Not-found failure naming the entity type and the lookup key.
    ///
    /// # Examples
    /// ```
    /// use exception_handler::FailureSignal;
    ///
    /// struct User;
    ///
    /// let signal = FailureSignal::entity_not_found::<User>("id=7");
    /// assert_eq!(signal.to_string(), "User with id=7 not found");
    /// ```
    pub fn entity_not_found<T: ?Sized>(key: impl std::fmt::Display) -> Self {
        let short = short_type_name(std::any::type_name::<T>());
        Self::EntityNotFound(format!("{short} with {key} not found"))
    }

    /// Convenience constructor for [`ErrorKind::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Constraint failure carrying each violation.
    #[must_use]
    pub fn constraint_violation(violations: Vec<Violation>) -> Self {
        let message = violations
            .iter()
            .map(|violation| format!("{}: {}", violation.field_name(), violation.error_message()))
            .collect::<Vec<_>>()
            .join(", ");
        Self::ConstraintViolation {
            message,
            violations,
        }
    }

    /// Convenience constructor for [`ErrorKind::UniqueConstraintViolation`].
    pub fn unique_constraint(message: impl Into<String>) -> Self {
        Self::UniqueConstraintViolation(message.into())
    }

    /// Convenience constructor for [`ErrorKind::JsonParseFailure`].
    pub fn json_parse(message: impl Into<String>) -> Self {
        Self::JsonParseFailure(message.into())
    }

    /// Generic runtime failure labelled `RuntimeException`.
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Unclassified {
            label: None,
            message: message.into(),
        }
    }

    /// Generic runtime failure with a host-specific label.
    pub fn runtime_labelled(label: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unclassified {
            label: Some(label.into()),
            message: message.into(),
        }
    }
}

impl From<UpstreamRelayFailure> for FailureSignal {
    fn from(value: UpstreamRelayFailure) -> Self {
        Self::UpstreamRelay(value)
    }
}

impl From<serde_json::Error> for FailureSignal {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParseFailure(err.to_string())
    }
}

impl From<ValidationErrors> for FailureSignal {
    fn from(errors: ValidationErrors) -> Self {
        let mut violations = Vec::new();
        collect_violations(None, &errors, &mut violations);
        Self::constraint_violation(violations)
    }
}

/// Strip module paths from every segment of a type name, so
/// `alloc::vec::Vec<app::User>` becomes `Vec<User>`.
fn short_type_name(full: &str) -> String {
    full.split_inclusive(['<', '>', ',', ' ', '(', ')', '[', ']', ';', '&'])
        .map(|part| part.rsplit("::").next().unwrap_or(part))
        .collect()
}

/// Flatten nested validation errors into dotted property paths.
fn collect_violations(prefix: Option<&str>, errors: &ValidationErrors, out: &mut Vec<Violation>) {
    for (field, kind) in errors.errors() {
        let path = match prefix {
            Some(parent) => format!("{parent}.{field}"),
            None => (*field).to_owned(),
        };
        match kind {
            ValidationErrorsKind::Field(failures) => {
                out.extend(failures.iter().map(|failure| {
                    let message = failure
                        .message
                        .as_ref()
                        .map_or_else(|| failure.code.to_string(), ToString::to_string);
                    Violation::new(path.clone(), message)
                }));
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_violations(Some(&path), nested, out);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_violations(Some(&format!("{path}[{index}]")), nested, out);
                }
            }
        }
    }
}

impl ResponseError for FailureSignal {}
