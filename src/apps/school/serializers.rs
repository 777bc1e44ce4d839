use super::models::{Student, Teacher, students_of};
use classifieds_core::{Error, Result};
use classifieds_db::Manager;
use classifieds_views::{ModelSerializer, SerializerContext};
use serde_json::{Value, json};

fn read_only<T>() -> Result<T> {
	Err(Error::MethodNotAllowed(
		"This resource is read-only.".to_string(),
	))
}

/// Students with the ids of their teachers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StudentSerializer;

impl ModelSerializer for StudentSerializer {
	type Model = Student;

	fn to_representation(&self, instance: &Student) -> Result<Value> {
		Ok(serde_json::to_value(instance)?)
	}

	fn create(&self, _data: &Value, _context: &SerializerContext<'_>) -> Result<Student> {
		read_only()
	}

	fn update(
		&self,
		_instance: &Student,
		_data: &Value,
		_partial: bool,
		_context: &SerializerContext<'_>,
	) -> Result<Student> {
		read_only()
	}
}

/// Teachers with the ids of the students they teach.
#[derive(Clone)]
pub struct TeacherSerializer {
	students: Manager<Student>,
}

impl TeacherSerializer {
	pub fn new(students: Manager<Student>) -> Self {
		Self { students }
	}
}

impl ModelSerializer for TeacherSerializer {
	type Model = Teacher;

	fn to_representation(&self, instance: &Teacher) -> Result<Value> {
		let students: Vec<i64> = match instance.id {
			Some(id) => students_of(&self.students, id)
				.into_iter()
				.filter_map(|student| student.id)
				.collect(),
			None => Vec::new(),
		};
		Ok(json!({
			"id": instance.id,
			"name": instance.name,
			"subject": instance.subject,
			"students": students,
		}))
	}

	fn create(&self, _data: &Value, _context: &SerializerContext<'_>) -> Result<Teacher> {
		read_only()
	}

	fn update(
		&self,
		_instance: &Teacher,
		_data: &Value,
		_partial: bool,
		_context: &SerializerContext<'_>,
	) -> Result<Teacher> {
		read_only()
	}
}
