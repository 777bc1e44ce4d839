//! Users and the principal acting on a request.

use classifieds_core::Request;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	pub id: UserId,
	pub username: String,
	#[serde(default)]
	pub is_staff: bool,
}

impl User {
	pub fn new(id: i64, username: impl Into<String>) -> Self {
		Self {
			id: UserId(id),
			username: username.into(),
			is_staff: false,
		}
	}

	pub fn staff(mut self) -> Self {
		self.is_staff = true;
		self
	}
}

/// The actor issuing a request.
///
/// `Anonymous` has no identity, so it can never match a resource owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Principal {
	#[default]
	Anonymous,
	User(User),
}

impl Principal {
	pub fn id(&self) -> Option<&UserId> {
		match self {
			Principal::Anonymous => None,
			Principal::User(user) => Some(&user.id),
		}
	}

	pub fn user(&self) -> Option<&User> {
		match self {
			Principal::Anonymous => None,
			Principal::User(user) => Some(user),
		}
	}

	pub fn is_authenticated(&self) -> bool {
		matches!(self, Principal::User(_))
	}

	pub fn is_staff(&self) -> bool {
		self.user().is_some_and(|user| user.is_staff)
	}

	/// Principal stored on the request by authentication, or anonymous.
	pub fn from_request(request: &Request) -> Self {
		request
			.extensions
			.get::<Principal>()
			.cloned()
			.unwrap_or_default()
	}
}

impl From<User> for Principal {
	fn from(user: User) -> Self {
		Principal::User(user)
	}
}

impl fmt::Display for Principal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Principal::Anonymous => f.write_str("anonymous"),
			Principal::User(user) => write!(f, "{}#{}", user.username, user.id),
		}
	}
}
