//! Teachers and students linked many-to-many.

pub mod models;
pub mod serializers;
pub mod views;

pub use models::{Student, Teacher, students_of};
pub use serializers::{StudentSerializer, TeacherSerializer};
pub use views::{StudentViewSet, TeacherViewSet, student_viewset, teacher_viewset};
