//! OpenAPI components for the error payloads.
//!
//! Hosts merge [`ErrorSchemas`] into their own document so the error bodies
//! appear alongside their endpoints.

use utoipa::OpenApi;

use crate::response::{IncorrectData, ValidationErrorsResponse, Violation};
use crate::taxonomy::ErrorKind;

/// OpenAPI document carrying only the error payload schemas.
///
/// # Examples
/// ```
/// use exception_handler::ErrorSchemas;
/// use utoipa::OpenApi;
///
/// let doc = ErrorSchemas::openapi();
/// let schemas = doc.components.expect("components present").schemas;
/// assert!(schemas.contains_key("IncorrectData"));
/// ```
#[derive(OpenApi)]
#[openapi(components(schemas(IncorrectData, Violation, ValidationErrorsResponse, ErrorKind)))]
pub struct ErrorSchemas;
