//! # Classifieds Auth
//!
//! Authentication and authorization for the classifieds backend.
//!
//! - [`principal`]: [`User`], [`UserId`] and the request [`Principal`]
//! - [`authentication`]: the [`Authentication`] trait and [`TokenAuthentication`]
//! - [`permission`]: permission classes checked by viewsets
//! - [`permission_operators`]: AND / OR / NOT composition
//! - [`policy`]: the ownership policy for owned resources
//!
//! ## Quick Start
//!
//! ```rust
//! use classifieds_auth::{Principal, authorize};
//! use classifieds_core::Action;
//!
//! // Listing never needs an owner match.
//! assert!(authorize(&Principal::Anonymous, &Action::list(), None).is_ok());
//! // Creating needs a known author.
//! assert!(authorize(&Principal::Anonymous, &Action::create(), None).is_err());
//! ```

pub mod authentication;
pub mod permission;
pub mod permission_operators;
pub mod policy;
pub mod principal;

pub use authentication::{Authentication, TokenAuthentication};
pub use permission::{
	AllowAny, IsAdminUser, IsAuthenticated, IsOwner, NOT_AUTHENTICATED, Owned, PERMISSION_DENIED,
	Permission, PermissionClasses, PermissionContext, check_object_permissions, check_permissions,
};
pub use permission_operators::{AndPermission, NotPermission, OrPermission};
pub use policy::{authorize, owner_permissions};
pub use principal::{Principal, User, UserId};
