//! Model serializers.
//!
//! A serializer owns the mapping between a model and its JSON form,
//! including validation of incoming data.

use classifieds_auth::Principal;
use classifieds_core::{Action, Error, FieldErrors, Result};
use classifieds_db::Model;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Request data available to a serializer.
#[derive(Debug, Clone, Copy)]
pub struct SerializerContext<'a> {
	pub principal: &'a Principal,
	pub action: &'a Action,
}

/// Converts one model to and from JSON.
pub trait ModelSerializer: Send + Sync {
	type Model: Model;

	/// Output representation of a saved instance.
	fn to_representation(&self, instance: &Self::Model) -> Result<Value>;

	/// Validate `data` and build a new, unsaved instance.
	fn create(&self, data: &Value, context: &SerializerContext<'_>) -> Result<Self::Model>;

	/// Validate `data` and apply it to `instance`.
	///
	/// With `partial` set, absent fields keep their current value.
	fn update(
		&self,
		instance: &Self::Model,
		data: &Value,
		partial: bool,
		context: &SerializerContext<'_>,
	) -> Result<Self::Model>;
}

/// Deserialize the request payload into a typed input struct.
///
/// Type mismatches become field-level validation errors instead of a bare
/// JSON error.
pub fn parse_input<T: DeserializeOwned>(data: &Value) -> Result<T> {
	if !data.is_object() {
		return Err(Error::field(
			"non_field_errors",
			"Invalid data. Expected a dictionary.",
		));
	}
	serde_json::from_value(data.clone()).map_err(|e| Error::field("non_field_errors", e.to_string()))
}

/// Collects field errors while a serializer validates its input.
#[derive(Debug, Default)]
pub struct Validator {
	errors: FieldErrors,
}

impl Validator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, field: &str, message: impl Into<String>) {
		self.errors
			.entry(field.to_string())
			.or_default()
			.push(message.into());
	}

	/// Require a non-blank string for a full write.
	pub fn required_text(&mut self, field: &str, value: Option<&str>) {
		match value {
			None => self.add(field, "This field is required."),
			Some(text) if text.trim().is_empty() => self.add(field, "This field may not be blank."),
			Some(_) => {}
		}
	}

	/// Reject a blank string if one was supplied.
	pub fn not_blank(&mut self, field: &str, value: Option<&str>) {
		if value.is_some_and(|text| text.trim().is_empty()) {
			self.add(field, "This field may not be blank.");
		}
	}

	pub fn max_length(&mut self, field: &str, value: Option<&str>, max: usize) {
		if value.is_some_and(|text| text.chars().count() > max) {
			self.add(
				field,
				format!("Ensure this field has no more than {} characters.", max),
			);
		}
	}

	pub fn is_valid(&self) -> bool {
		self.errors.is_empty()
	}

	/// `Ok(())` when no error was recorded.
	pub fn finish(self) -> Result<()> {
		if self.errors.is_empty() {
			Ok(())
		} else {
			Err(Error::Validation(self.errors))
		}
	}
}
