//! Classified advertisements owned by the user who posted them.

pub mod filters;
pub mod models;
pub mod serializers;
pub mod views;

pub use filters::AdvertisementFilter;
pub use models::{Advertisement, AdvertisementStatus, Creator};
pub use serializers::AdvertisementSerializer;
pub use views::{AdvertisementViewSet, advertisement_viewset};
