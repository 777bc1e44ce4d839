//! Courses and the students enrolled in them.

pub mod filters;
pub mod models;
pub mod serializers;
pub mod views;

pub use filters::CourseFilter;
pub use models::{Course, Student};
pub use serializers::CourseSerializer;
pub use views::{CourseViewSet, course_viewset};
