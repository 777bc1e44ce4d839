//! Installed applications.

pub mod advertisements;
pub mod courses;
pub mod school;
