//! Request authentication.
//!
//! [`TokenAuthentication`] reads `Authorization: Token <key>` headers and
//! resolves the key against an in-memory token table.

use crate::principal::User;
use classifieds_core::{Error, Request, Result};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Resolve the user behind a request.
pub trait Authentication: Send + Sync {
	/// `Ok(None)` means the request carries no credentials for this scheme
	/// and the principal stays anonymous. Credentials that are present but
	/// wrong are an `Error::AuthenticationFailed`.
	fn authenticate(&self, request: &Request) -> Result<Option<User>>;
}

/// Token authentication
///
/// # Examples
///
/// ```
/// use classifieds_auth::{Authentication, TokenAuthentication, User};
/// use classifieds_core::Request;
/// use hyper::header::{AUTHORIZATION, HeaderValue};
///
/// let auth = TokenAuthentication::new();
/// let key = auth.issue_token(User::new(1, "alice"));
///
/// let request = Request::builder()
///     .header(AUTHORIZATION, HeaderValue::from_str(&format!("Token {}", key)).unwrap())
///     .build()
///     .unwrap();
/// let user = auth.authenticate(&request).unwrap().unwrap();
/// assert_eq!(user.username, "alice");
/// ```
#[derive(Debug)]
pub struct TokenAuthentication {
	keyword: String,
	tokens: RwLock<HashMap<String, User>>,
}

impl Default for TokenAuthentication {
	fn default() -> Self {
		Self::new()
	}
}

impl TokenAuthentication {
	pub fn new() -> Self {
		Self::with_keyword("Token")
	}

	/// Use a different header keyword, e.g. `Bearer`.
	pub fn with_keyword(keyword: impl Into<String>) -> Self {
		Self {
			keyword: keyword.into(),
			tokens: RwLock::new(HashMap::new()),
		}
	}

	/// Generate a fresh key for `user` and store it.
	pub fn issue_token(&self, user: User) -> String {
		let key = uuid::Uuid::new_v4().simple().to_string();
		self.register_token(key.clone(), user);
		key
	}

	/// Store a known key, replacing any previous owner of that key.
	pub fn register_token(&self, key: impl Into<String>, user: User) {
		let key = key.into();
		tracing::debug!(username = %user.username, "token registered");
		self.tokens.write().insert(key, user);
	}

	/// Forget a key. Returns whether it existed.
	pub fn revoke_token(&self, key: &str) -> bool {
		self.tokens.write().remove(key).is_some()
	}

	pub fn user_for(&self, key: &str) -> Option<User> {
		self.tokens.read().get(key).cloned()
	}

	pub fn len(&self) -> usize {
		self.tokens.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.read().is_empty()
	}
}

impl Authentication for TokenAuthentication {
	fn authenticate(&self, request: &Request) -> Result<Option<User>> {
		let Some(raw) = request.headers.get(hyper::header::AUTHORIZATION) else {
			return Ok(None);
		};
		let header = raw
			.to_str()
			.map_err(|_| Error::AuthenticationFailed("Invalid token header. Token string should not contain invalid characters.".to_string()))?;

		let parts: Vec<&str> = header.split_whitespace().collect();
		match parts.as_slice() {
			[] => Ok(None),
			[scheme, ..] if !scheme.eq_ignore_ascii_case(&self.keyword) => Ok(None),
			[_] => Err(Error::AuthenticationFailed(
				"Invalid token header. No credentials provided.".to_string(),
			)),
			[_, key] => match self.user_for(key) {
				Some(user) => Ok(Some(user)),
				None => {
					tracing::warn!("rejected unknown token");
					Err(Error::AuthenticationFailed("Invalid token.".to_string()))
				}
			},
			_ => Err(Error::AuthenticationFailed(
				"Invalid token header. Token string should not contain spaces.".to_string(),
			)),
		}
	}
}
