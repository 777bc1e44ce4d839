use super::models::{Course, Student};
use classifieds_core::Result;
use classifieds_db::Manager;
use classifieds_views::{ModelSerializer, SerializerContext, Validator, parse_input};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct CourseInput {
	name: Option<String>,
	students: Option<Vec<i64>>,
}

/// Serializer for courses.
///
/// Student ids must refer to existing students, and a course holds at most
/// `max_students` of them.
#[derive(Clone)]
pub struct CourseSerializer {
	students: Manager<Student>,
	max_students: usize,
}

impl CourseSerializer {
	pub fn new(students: Manager<Student>, max_students: usize) -> Self {
		Self {
			students,
			max_students,
		}
	}

	fn validate(&self, input: &CourseInput, partial: bool) -> Result<Option<Vec<i64>>> {
		let mut validator = Validator::new();
		if partial {
			validator.not_blank("name", input.name.as_deref());
		} else {
			validator.required_text("name", input.name.as_deref());
		}

		let students = input.students.as_ref().map(|ids| {
			let mut unique: Vec<i64> = Vec::with_capacity(ids.len());
			for id in ids {
				if !unique.contains(id) {
					unique.push(*id);
				}
			}
			unique
		});
		if let Some(ids) = &students {
			for id in ids {
				if !self.students.exists(*id) {
					validator.add(
						"students",
						format!("Invalid pk \"{}\" - object does not exist.", id),
					);
				}
			}
			if ids.len() > self.max_students {
				validator.add(
					"students",
					format!(
						"A course can have at most {} students.",
						self.max_students
					),
				);
			}
		}

		validator.finish()?;
		Ok(students)
	}
}

impl ModelSerializer for CourseSerializer {
	type Model = Course;

	fn to_representation(&self, instance: &Course) -> Result<Value> {
		Ok(serde_json::to_value(instance)?)
	}

	fn create(&self, data: &Value, _context: &SerializerContext<'_>) -> Result<Course> {
		let input: CourseInput = parse_input(data)?;
		let students = self.validate(&input, false)?;

		let mut course = Course::new(input.name.unwrap_or_default());
		course.students = students.unwrap_or_default();
		Ok(course)
	}

	fn update(
		&self,
		instance: &Course,
		data: &Value,
		partial: bool,
		_context: &SerializerContext<'_>,
	) -> Result<Course> {
		let input: CourseInput = parse_input(data)?;
		let students = self.validate(&input, partial)?;

		let mut course = instance.clone();
		if let Some(name) = input.name {
			course.name = name;
		}
		match students {
			Some(students) => course.students = students,
			None if !partial => course.students.clear(),
			None => {}
		}
		Ok(course)
	}
}
