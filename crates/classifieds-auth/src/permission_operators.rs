//! Permission Operators
//!
//! Logical AND, OR and NOT over permissions. Both the view-level and the
//! object-level checks are combined.

use crate::permission::{Owned, Permission, PermissionContext};

/// AND permission operator
///
/// Both permissions must be satisfied.
///
/// # Examples
///
/// ```
/// use classifieds_auth::permission_operators::AndPermission;
/// use classifieds_auth::{IsAuthenticated, IsOwner, Permission, PermissionContext, Principal};
/// use classifieds_core::Action;
///
/// let permission = AndPermission::new(IsAuthenticated, IsOwner);
/// let action = Action::update();
/// let context = PermissionContext::new(&Principal::Anonymous, &action);
/// assert!(!permission.has_permission(&context));
/// ```
pub struct AndPermission<A, B> {
	left: A,
	right: B,
}

impl<A, B> AndPermission<A, B> {
	pub fn new(left: A, right: B) -> Self {
		Self { left, right }
	}
}

impl<A, B> Permission for AndPermission<A, B>
where
	A: Permission,
	B: Permission,
{
	fn has_permission(&self, context: &PermissionContext<'_>) -> bool {
		self.left.has_permission(context) && self.right.has_permission(context)
	}

	fn has_object_permission(&self, context: &PermissionContext<'_>, object: &dyn Owned) -> bool {
		self.left.has_object_permission(context, object)
			&& self.right.has_object_permission(context, object)
	}

	fn message(&self, context: &PermissionContext<'_>) -> &'static str {
		if self.left.has_permission(context) {
			self.right.message(context)
		} else {
			self.left.message(context)
		}
	}
}

/// OR permission operator
///
/// Either permission can be satisfied.
pub struct OrPermission<A, B> {
	left: A,
	right: B,
}

impl<A, B> OrPermission<A, B> {
	pub fn new(left: A, right: B) -> Self {
		Self { left, right }
	}
}

impl<A, B> Permission for OrPermission<A, B>
where
	A: Permission,
	B: Permission,
{
	fn has_permission(&self, context: &PermissionContext<'_>) -> bool {
		self.left.has_permission(context) || self.right.has_permission(context)
	}

	fn has_object_permission(&self, context: &PermissionContext<'_>, object: &dyn Owned) -> bool {
		self.left.has_object_permission(context, object)
			|| self.right.has_object_permission(context, object)
	}
}

/// NOT permission operator
pub struct NotPermission<P> {
	inner: P,
}

impl<P> NotPermission<P> {
	pub fn new(inner: P) -> Self {
		Self { inner }
	}
}

impl<P: Permission> Permission for NotPermission<P> {
	fn has_permission(&self, context: &PermissionContext<'_>) -> bool {
		!self.inner.has_permission(context)
	}

	fn has_object_permission(&self, context: &PermissionContext<'_>, object: &dyn Owned) -> bool {
		!self.inner.has_object_permission(context, object)
	}
}
