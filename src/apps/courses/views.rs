use super::filters::CourseFilter;
use super::models::{Course, Student};
use super::serializers::CourseSerializer;
use classifieds_db::Manager;
use classifieds_views::ModelViewSet;

pub type CourseViewSet = ModelViewSet<CourseSerializer, CourseFilter>;

/// ViewSet for courses, open to anyone.
pub fn course_viewset(
	courses: Manager<Course>,
	students: Manager<Student>,
	max_students: usize,
) -> CourseViewSet {
	ModelViewSet::new(
		"courses",
		courses,
		CourseSerializer::new(students, max_students),
	)
	.with_filterset(CourseFilter)
}
