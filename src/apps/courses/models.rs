use chrono::NaiveDate;
use classifieds_auth::{Owned, UserId};
use classifieds_db::Model;
use serde::{Deserialize, Serialize};

/// Student model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
	pub id: Option<i64>,
	pub name: String,
	pub birth_date: Option<NaiveDate>,
}

impl Student {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			id: None,
			name: name.into(),
			birth_date: None,
		}
	}
}

impl Model for Student {
	fn table_name() -> &'static str {
		"students_student"
	}

	fn primary_key(&self) -> Option<i64> {
		self.id
	}

	fn set_primary_key(&mut self, value: i64) {
		self.id = Some(value);
	}
}

/// Course model. `students` holds student ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
	pub id: Option<i64>,
	pub name: String,
	#[serde(default)]
	pub students: Vec<i64>,
}

impl Course {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			id: None,
			name: name.into(),
			students: Vec::new(),
		}
	}
}

impl Model for Course {
	fn table_name() -> &'static str {
		"students_course"
	}

	fn primary_key(&self) -> Option<i64> {
		self.id
	}

	fn set_primary_key(&mut self, value: i64) {
		self.id = Some(value);
	}
}

// Courses have no owner.
impl Owned for Course {
	fn owner_id(&self) -> Option<&UserId> {
		None
	}
}
