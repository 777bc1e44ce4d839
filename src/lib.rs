//! # Classifieds
//!
//! A REST backend for classified advertisements, plus a courses resource
//! and a read-only school directory.
//!
//! Advertisements are owned by the user who posted them: anyone may list
//! them, only authenticated users may post or edit, and every action on an
//! existing advertisement is limited to its creator.
//!
//! ```rust
//! use classifieds::config::Site;
//! use classifieds_core::Settings;
//!
//! let site = Site::new(&Settings::default()).unwrap();
//! assert_eq!(
//!     site.router.reverse("advertisements-list").unwrap(),
//!     "/api/v1/advertisements/"
//! );
//! ```

pub mod apps;
pub mod config;

pub use config::{Site, Tables};
