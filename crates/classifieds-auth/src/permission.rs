//! Permission classes.
//!
//! A permission is asked twice per request: once at view level
//! ([`Permission::has_permission`]) before any object is loaded, and once per
//! object ([`Permission::has_object_permission`]) for detail actions. Either
//! answer being `false` denies the request.

use crate::principal::{Principal, UserId};
use classifieds_core::{Action, Error, Result};
use std::sync::Arc;

/// Message used when a permission does not provide its own.
pub const PERMISSION_DENIED: &str = "You do not have permission to perform this action.";

/// Message used when an anonymous principal hits an authenticated-only action.
pub const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";

/// Objects a permission can inspect.
pub trait Owned {
	/// Owner of the object, `None` for models without an owner.
	fn owner_id(&self) -> Option<&UserId>;
}

/// What a permission is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct PermissionContext<'a> {
	pub principal: &'a Principal,
	pub action: &'a Action,
}

impl<'a> PermissionContext<'a> {
	pub fn new(principal: &'a Principal, action: &'a Action) -> Self {
		Self { principal, action }
	}
}

/// A single permission check.
pub trait Permission: Send + Sync {
	/// View-level check, run before any object is loaded.
	fn has_permission(&self, context: &PermissionContext<'_>) -> bool;

	/// Object-level check, run for detail actions once the object is loaded.
	fn has_object_permission(&self, _context: &PermissionContext<'_>, _object: &dyn Owned) -> bool {
		true
	}

	/// Detail reported to the client on denial.
	fn message(&self, _context: &PermissionContext<'_>) -> &'static str {
		PERMISSION_DENIED
	}
}

/// The permission list a viewset applies to one action.
pub type PermissionClasses = Vec<Arc<dyn Permission>>;

/// Allow all access
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAny;

impl Permission for AllowAny {
	fn has_permission(&self, _context: &PermissionContext<'_>) -> bool {
		true
	}
}

/// Allow only authenticated principals
#[derive(Debug, Clone, Copy, Default)]
pub struct IsAuthenticated;

impl Permission for IsAuthenticated {
	fn has_permission(&self, context: &PermissionContext<'_>) -> bool {
		context.principal.is_authenticated()
	}

	fn message(&self, context: &PermissionContext<'_>) -> &'static str {
		if context.principal.is_authenticated() {
			PERMISSION_DENIED
		} else {
			NOT_AUTHENTICATED
		}
	}
}

/// Allow only staff users
#[derive(Debug, Clone, Copy, Default)]
pub struct IsAdminUser;

impl Permission for IsAdminUser {
	fn has_permission(&self, context: &PermissionContext<'_>) -> bool {
		context.principal.is_staff()
	}
}

/// Allow only the owner of an object.
///
/// Passes at view level, so list-style access (no object) is open. At object
/// level the principal's identity must equal the owner's; anonymous
/// principals and owner-less objects never match.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsOwner;

impl Permission for IsOwner {
	fn has_permission(&self, _context: &PermissionContext<'_>) -> bool {
		true
	}

	fn has_object_permission(&self, context: &PermissionContext<'_>, object: &dyn Owned) -> bool {
		match (context.principal.id(), object.owner_id()) {
			(Some(principal), Some(owner)) => principal == owner,
			_ => false,
		}
	}
}

/// Run the view-level check of every permission, failing on the first refusal.
pub fn check_permissions(permissions: &[Arc<dyn Permission>], context: &PermissionContext<'_>) -> Result<()> {
	for permission in permissions {
		if !permission.has_permission(context) {
			tracing::warn!(
				principal = %context.principal,
				action = %context.action,
				"permission denied"
			);
			return Err(Error::PermissionDenied(permission.message(context).to_string()));
		}
	}
	Ok(())
}

/// Run the object-level check of every permission, failing on the first refusal.
pub fn check_object_permissions(
	permissions: &[Arc<dyn Permission>],
	context: &PermissionContext<'_>,
	object: &dyn Owned,
) -> Result<()> {
	for permission in permissions {
		if !permission.has_object_permission(context, object) {
			tracing::warn!(
				principal = %context.principal,
				action = %context.action,
				owner = ?object.owner_id(),
				"object permission denied"
			);
			return Err(Error::PermissionDenied(permission.message(context).to_string()));
		}
	}
	Ok(())
}
