//! Error types shared by every classifieds crate.
//!
//! Each variant knows the HTTP status it is reported with, so handlers can
//! propagate errors with `?` and let the router turn them into responses.

use hyper::StatusCode;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name to list of messages, in the shape DRF-style clients expect.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Errors produced while handling a request.
#[derive(Debug, Error)]
pub enum Error {
	/// The requested object does not exist.
	#[error("Not found: {0}")]
	NotFound(String),

	/// The principal is not allowed to perform the action.
	#[error("Permission denied: {0}")]
	PermissionDenied(String),

	/// Credentials were supplied but could not be verified.
	#[error("Authentication failed: {0}")]
	AuthenticationFailed(String),

	/// Input data failed validation.
	#[error("Validation error: {}", format_field_errors(.0))]
	Validation(FieldErrors),

	/// The request could not be understood.
	#[error("Bad request: {0}")]
	BadRequest(String),

	/// The HTTP method is not mapped to any action.
	#[error("Method not allowed: {0}")]
	MethodNotAllowed(String),

	/// JSON serialization/deserialization error.
	#[error("JSON error: {0}")]
	Serialization(#[from] serde_json::Error),

	/// Settings could not be loaded or are inconsistent.
	#[error("Configuration error: {0}")]
	Config(String),

	/// I/O operation failed.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// Anything else.
	#[error("Internal error: {0}")]
	Internal(String),
}

/// Result type alias used across the workspace.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
	/// Build a validation error for a single field.
	///
	/// # Examples
	///
	/// ```
	/// use classifieds_core::Error;
	///
	/// let err = Error::field("title", "This field is required.");
	/// assert_eq!(err.to_string(), "Validation error: title: This field is required.");
	/// ```
	pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
		let mut errors = FieldErrors::new();
		errors.insert(name.into(), vec![message.into()]);
		Error::Validation(errors)
	}

	/// HTTP status used when this error reaches the client.
	pub fn status_code(&self) -> StatusCode {
		match self {
			Error::NotFound(_) => StatusCode::NOT_FOUND,
			Error::PermissionDenied(_) => StatusCode::FORBIDDEN,
			Error::AuthenticationFailed(_) => StatusCode::UNAUTHORIZED,
			Error::Validation(_) | Error::BadRequest(_) | Error::Serialization(_) => {
				StatusCode::BAD_REQUEST
			}
			Error::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
			Error::Config(_) | Error::Io(_) | Error::Internal(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}

	/// JSON body rendered for this error.
	pub fn to_json(&self) -> serde_json::Value {
		match self {
			Error::Validation(errors) => serde_json::json!(errors),
			Error::NotFound(detail)
			| Error::PermissionDenied(detail)
			| Error::AuthenticationFailed(detail)
			| Error::BadRequest(detail)
			| Error::MethodNotAllowed(detail) => serde_json::json!({ "detail": detail }),
			Error::Serialization(err) => serde_json::json!({ "detail": err.to_string() }),
			// Server-side failures do not leak their cause.
			Error::Config(_) | Error::Io(_) | Error::Internal(_) => {
				serde_json::json!({ "detail": "A server error occurred." })
			}
		}
	}
}

fn format_field_errors(errors: &FieldErrors) -> String {
	errors
		.iter()
		.map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
		.collect::<Vec<_>>()
		.join("; ")
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Error::NotFound("x".into()), StatusCode::NOT_FOUND)]
	#[case(Error::PermissionDenied("x".into()), StatusCode::FORBIDDEN)]
	#[case(Error::AuthenticationFailed("x".into()), StatusCode::UNAUTHORIZED)]
	#[case(Error::field("name", "bad"), StatusCode::BAD_REQUEST)]
	#[case(Error::BadRequest("x".into()), StatusCode::BAD_REQUEST)]
	#[case(Error::MethodNotAllowed("TRACE".into()), StatusCode::METHOD_NOT_ALLOWED)]
	#[case(Error::Config("x".into()), StatusCode::INTERNAL_SERVER_ERROR)]
	fn test_status_code_mapping(#[case] error: Error, #[case] expected: StatusCode) {
		assert_eq!(error.status_code(), expected);
	}

	#[rstest]
	fn test_validation_error_renders_field_map() {
		let mut errors = FieldErrors::new();
		errors.insert("name".to_string(), vec!["This field is required.".to_string()]);
		errors.insert("students".to_string(), vec!["Too many.".to_string()]);
		let error = Error::Validation(errors);

		assert_eq!(
			error.to_string(),
			"Validation error: name: This field is required.; students: Too many."
		);
		assert_eq!(error.to_json()["name"][0], "This field is required.");
	}

	#[rstest]
	fn test_internal_errors_hide_detail() {
		let error = Error::Internal("database exploded".to_string());
		assert_eq!(error.to_json()["detail"], "A server error occurred.");
	}

	#[rstest]
	fn test_json_error_from() {
		let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
		let error: Error = json_error.into();
		assert!(matches!(error, Error::Serialization(_)));
	}
}
