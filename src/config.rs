//! Project configuration.

pub mod fixtures;
pub mod urls;

pub use fixtures::{FixtureRecord, LoadResult};
pub use urls::{Site, Tables};
