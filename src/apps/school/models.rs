use classifieds_auth::{Owned, UserId};
use classifieds_db::{Manager, Model};
use serde::{Deserialize, Serialize};

/// Teacher model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
	pub id: Option<i64>,
	pub name: String,
	pub subject: String,
}

impl Teacher {
	pub fn new(name: impl Into<String>, subject: impl Into<String>) -> Self {
		Self {
			id: None,
			name: name.into(),
			subject: subject.into(),
		}
	}
}

impl Model for Teacher {
	fn table_name() -> &'static str {
		"school_teacher"
	}

	fn primary_key(&self) -> Option<i64> {
		self.id
	}

	fn set_primary_key(&mut self, value: i64) {
		self.id = Some(value);
	}
}

impl Owned for Teacher {
	fn owner_id(&self) -> Option<&UserId> {
		None
	}
}

/// Student model. A student can have many teachers and a teacher many
/// students; the reverse side is [`students_of`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
	pub id: Option<i64>,
	pub name: String,
	pub group: String,
	/// Teacher ids, exposed as `teacher` like the database column.
	#[serde(rename = "teacher", default)]
	pub teachers: Vec<i64>,
}

impl Student {
	pub fn new(name: impl Into<String>, group: impl Into<String>) -> Self {
		Self {
			id: None,
			name: name.into(),
			group: group.into(),
			teachers: Vec::new(),
		}
	}

	/// Link a teacher. Linking twice has no effect.
	pub fn add_teacher(&mut self, teacher: &Teacher) {
		if let Some(id) = teacher.id
			&& !self.teachers.contains(&id)
		{
			self.teachers.push(id);
		}
	}

	pub fn remove_teacher(&mut self, teacher: &Teacher) {
		self.teachers.retain(|id| Some(*id) != teacher.id);
	}
}

impl Model for Student {
	fn table_name() -> &'static str {
		"school_student"
	}

	fn primary_key(&self) -> Option<i64> {
		self.id
	}

	fn set_primary_key(&mut self, value: i64) {
		self.id = Some(value);
	}
}

impl Owned for Student {
	fn owner_id(&self) -> Option<&UserId> {
		None
	}
}

/// Students taught by `teacher_id`, in id order.
pub fn students_of(students: &Manager<Student>, teacher_id: i64) -> Vec<Student> {
	students.filter(|student| student.teachers.contains(&teacher_id))
}
