//! Ownership-based access policy for owned resources.
//!
//! Create, update and partial update require an authenticated principal.
//! Every action on a specific object additionally requires the principal
//! to be the object's owner; list-style access without an object is open.
//! Authentication is checked before ownership and failing either denies.

use crate::permission::{
	IsAuthenticated, IsOwner, Owned, PermissionClasses, PermissionContext,
	check_object_permissions, check_permissions,
};
use crate::principal::Principal;
use classifieds_core::{Action, Result};
use std::sync::Arc;

/// Permission list applied to `action` on an owned resource.
pub fn owner_permissions(action: &Action) -> PermissionClasses {
	if action.requires_authentication() {
		vec![Arc::new(IsAuthenticated), Arc::new(IsOwner)]
	} else {
		vec![Arc::new(IsOwner)]
	}
}

/// Decide whether `principal` may perform `action`, optionally on `instance`.
///
/// Returns `Error::PermissionDenied` on denial. Pure: nothing is mutated.
///
/// # Examples
///
/// ```
/// use classifieds_auth::{Owned, Principal, User, UserId, authorize};
/// use classifieds_core::Action;
///
/// struct Ad { creator: UserId }
///
/// impl Owned for Ad {
///     fn owner_id(&self) -> Option<&UserId> { Some(&self.creator) }
/// }
///
/// let alice = Principal::from(User::new(1, "alice"));
/// let bob = Principal::from(User::new(2, "bob"));
/// let ad = Ad { creator: UserId(1) };
///
/// assert!(authorize(&alice, &Action::update(), Some(&ad)).is_ok());
/// assert!(authorize(&bob, &Action::update(), Some(&ad)).is_err());
/// assert!(authorize(&Principal::Anonymous, &Action::list(), None).is_ok());
/// ```
pub fn authorize(principal: &Principal, action: &Action, instance: Option<&dyn Owned>) -> Result<()> {
	let permissions = owner_permissions(action);
	let context = PermissionContext::new(principal, action);

	check_permissions(&permissions, &context)?;
	if let Some(object) = instance {
		check_object_permissions(&permissions, &context, object)?;
	}

	tracing::debug!(%principal, %action, "access granted");
	Ok(())
}
