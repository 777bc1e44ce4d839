use super::models::{Advertisement, AdvertisementStatus, Creator};
use chrono::Utc;
use classifieds_auth::NOT_AUTHENTICATED;
use classifieds_core::{Error, Result};
use classifieds_views::{ModelSerializer, SerializerContext, Validator, parse_input};
use serde::Deserialize;
use serde_json::Value;

const TITLE_MAX_LENGTH: usize = 200;

/// Writable fields. `creator`, `created_at` and `updated_at` are read-only
/// and ignored when sent.
#[derive(Debug, Deserialize)]
struct AdvertisementInput {
	title: Option<String>,
	description: Option<String>,
	status: Option<AdvertisementStatus>,
}

impl AdvertisementInput {
	fn validate(&self, partial: bool) -> Result<()> {
		let mut validator = Validator::new();
		if partial {
			validator.not_blank("title", self.title.as_deref());
		} else {
			validator.required_text("title", self.title.as_deref());
		}
		validator.max_length("title", self.title.as_deref(), TITLE_MAX_LENGTH);
		validator.finish()
	}
}

/// Serializer for advertisements
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvertisementSerializer;

impl ModelSerializer for AdvertisementSerializer {
	type Model = Advertisement;

	fn to_representation(&self, instance: &Advertisement) -> Result<Value> {
		Ok(serde_json::to_value(instance)?)
	}

	fn create(&self, data: &Value, context: &SerializerContext<'_>) -> Result<Advertisement> {
		let input: AdvertisementInput = parse_input(data)?;
		input.validate(false)?;

		let user = context
			.principal
			.user()
			.ok_or_else(|| Error::PermissionDenied(NOT_AUTHENTICATED.to_string()))?;

		let mut advertisement = Advertisement::new(
			input.title.unwrap_or_default(),
			input.description.unwrap_or_default(),
			Creator::from(user),
		);
		if let Some(status) = input.status {
			advertisement.status = status;
		}
		Ok(advertisement)
	}

	fn update(
		&self,
		instance: &Advertisement,
		data: &Value,
		partial: bool,
		_context: &SerializerContext<'_>,
	) -> Result<Advertisement> {
		let input: AdvertisementInput = parse_input(data)?;
		input.validate(partial)?;

		let mut advertisement = instance.clone();
		if let Some(title) = input.title {
			advertisement.title = title;
		}
		match input.description {
			Some(description) => advertisement.description = description,
			None if !partial => advertisement.description.clear(),
			None => {}
		}
		match input.status {
			Some(status) => advertisement.status = status,
			None if !partial => advertisement.status = AdvertisementStatus::default(),
			None => {}
		}
		advertisement.updated_at = Utc::now();
		Ok(advertisement)
	}
}
