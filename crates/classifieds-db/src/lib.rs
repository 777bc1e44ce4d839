//! # Classifieds DB
//!
//! The [`Model`] trait and the in-memory [`Manager`] that stores model rows.

pub mod manager;
pub mod model;

pub use manager::Manager;
pub use model::Model;
