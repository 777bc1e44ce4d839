//! Viewset actions.
//!
//! An [`Action`] is derived from the HTTP method and URL shape of every
//! request and is what permission classes reason about.

use hyper::Method;
use std::fmt;

/// Action type for viewset operations
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionType {
	List,
	Retrieve,
	Create,
	Update,
	PartialUpdate,
	Destroy,
	Custom(String),
}

/// Action metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Action {
	pub action_type: ActionType,
	/// Whether this action operates on a single object
	pub detail: bool,
}

impl Action {
	pub fn list() -> Self {
		Self {
			action_type: ActionType::List,
			detail: false,
		}
	}

	pub fn retrieve() -> Self {
		Self {
			action_type: ActionType::Retrieve,
			detail: true,
		}
	}

	pub fn create() -> Self {
		Self {
			action_type: ActionType::Create,
			detail: false,
		}
	}

	pub fn update() -> Self {
		Self {
			action_type: ActionType::Update,
			detail: true,
		}
	}

	pub fn partial_update() -> Self {
		Self {
			action_type: ActionType::PartialUpdate,
			detail: true,
		}
	}

	pub fn destroy() -> Self {
		Self {
			action_type: ActionType::Destroy,
			detail: true,
		}
	}

	pub fn custom(name: impl Into<String>, detail: bool) -> Self {
		Self {
			action_type: ActionType::Custom(name.into()),
			detail,
		}
	}

	/// Create an Action from its conventional name.
	///
	/// Unknown names become list-like custom actions.
	///
	/// # Examples
	///
	/// ```
	/// use classifieds_core::action::{Action, ActionType};
	///
	/// let action = Action::from_name("partial_update");
	/// assert_eq!(action.action_type, ActionType::PartialUpdate);
	/// assert!(action.detail);
	///
	/// let custom = Action::from_name("close");
	/// assert_eq!(custom.action_type, ActionType::Custom("close".to_string()));
	/// assert!(!custom.detail);
	/// ```
	pub fn from_name(name: &str) -> Self {
		match name {
			"list" => Self::list(),
			"retrieve" => Self::retrieve(),
			"create" => Self::create(),
			"update" => Self::update(),
			"partial_update" => Self::partial_update(),
			"destroy" => Self::destroy(),
			custom_name => Self::custom(custom_name, false),
		}
	}

	/// Map an HTTP method on a list or detail URL to an action.
	///
	/// Returns `None` for combinations no standard action handles.
	pub fn from_method(method: &Method, detail: bool) -> Option<Self> {
		match (method, detail) {
			(&Method::GET, false) => Some(Self::list()),
			(&Method::GET, true) => Some(Self::retrieve()),
			(&Method::POST, false) => Some(Self::create()),
			(&Method::PUT, true) => Some(Self::update()),
			(&Method::PATCH, true) => Some(Self::partial_update()),
			(&Method::DELETE, true) => Some(Self::destroy()),
			_ => None,
		}
	}

	/// Conventional name of the action.
	pub fn name(&self) -> &str {
		match &self.action_type {
			ActionType::List => "list",
			ActionType::Retrieve => "retrieve",
			ActionType::Create => "create",
			ActionType::Update => "update",
			ActionType::PartialUpdate => "partial_update",
			ActionType::Destroy => "destroy",
			ActionType::Custom(name) => name,
		}
	}

	/// Whether the action writes data that requires a known author.
	///
	/// Destroy is not included: deleting is gated by ownership alone.
	pub fn requires_authentication(&self) -> bool {
		matches!(
			self.action_type,
			ActionType::Create | ActionType::Update | ActionType::PartialUpdate
		)
	}

	/// Whether the action only reads data.
	pub fn is_read(&self) -> bool {
		matches!(self.action_type, ActionType::List | ActionType::Retrieve)
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}
