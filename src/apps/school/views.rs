use super::models::{Student, Teacher};
use super::serializers::{StudentSerializer, TeacherSerializer};
use classifieds_db::Manager;
use classifieds_views::ModelViewSet;

pub type StudentViewSet = ModelViewSet<StudentSerializer>;
pub type TeacherViewSet = ModelViewSet<TeacherSerializer>;

/// Read-only listing of students.
pub fn student_viewset(students: Manager<Student>) -> StudentViewSet {
	ModelViewSet::new("school-students", students, StudentSerializer).read_only()
}

/// Read-only listing of teachers.
pub fn teacher_viewset(teachers: Manager<Teacher>, students: Manager<Student>) -> TeacherViewSet {
	ModelViewSet::new("school-teachers", teachers, TeacherSerializer::new(students)).read_only()
}
