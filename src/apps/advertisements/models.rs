use chrono::{DateTime, Utc};
use classifieds_auth::{Owned, User, UserId};
use classifieds_db::Model;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Advertisement status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdvertisementStatus {
	#[default]
	Open,
	Closed,
}

impl fmt::Display for AdvertisementStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Open => write!(f, "OPEN"),
			Self::Closed => write!(f, "CLOSED"),
		}
	}
}

impl FromStr for AdvertisementStatus {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"OPEN" => Ok(Self::Open),
			"CLOSED" => Ok(Self::Closed),
			other => Err(format!("\"{}\" is not a valid choice.", other)),
		}
	}
}

/// The user who posted an advertisement, as shown in responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
	pub id: UserId,
	pub username: String,
}

impl From<&User> for Creator {
	fn from(user: &User) -> Self {
		Self {
			id: user.id,
			username: user.username.clone(),
		}
	}
}

/// Advertisement model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advertisement {
	pub id: Option<i64>,
	pub title: String,
	pub description: String,
	pub status: AdvertisementStatus,
	/// Set once on creation.
	pub creator: Creator,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl Advertisement {
	pub fn new(title: impl Into<String>, description: impl Into<String>, creator: Creator) -> Self {
		let now = Utc::now();
		Self {
			id: None,
			title: title.into(),
			description: description.into(),
			status: AdvertisementStatus::default(),
			creator,
			created_at: now,
			updated_at: now,
		}
	}

	pub fn is_open(&self) -> bool {
		self.status == AdvertisementStatus::Open
	}
}

impl Model for Advertisement {
	fn table_name() -> &'static str {
		"advertisements_advertisement"
	}

	fn primary_key(&self) -> Option<i64> {
		self.id
	}

	fn set_primary_key(&mut self, value: i64) {
		self.id = Some(value);
	}
}

impl Owned for Advertisement {
	fn owner_id(&self) -> Option<&UserId> {
		Some(&self.creator.id)
	}
}
