//! Fixture loading.
//!
//! Fixtures use Django's `dumpdata` JSON layout: an array (or a single
//! object) of records naming the model by `app.model` label.
//!
//! ```json
//! [
//!   {"model": "school.teacher", "pk": 1, "fields": {"name": "Ivanov", "subject": "math"}},
//!   {"model": "school.student", "pk": 1, "fields": {"name": "Ann", "group": "7A", "teacher": [1]}},
//!   {"model": "students.student", "pk": 1, "fields": {"name": "Kate", "birth_date": "2004-05-01"}},
//!   {"model": "students.course", "fields": {"name": "Rust", "students": [1]}}
//! ]
//! ```
//!
//! Records without `pk` get the next free id. Many-to-many ids are checked
//! once every record of a batch is inserted, so a fixture may list a course
//! before its students.

use super::urls::Tables;
use classifieds_core::{Error, Result};
use classifieds_db::{Manager, Model};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

/// One fixture entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRecord {
	/// Model label, e.g. `school.teacher`.
	pub model: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub pk: Option<i64>,
	#[serde(default)]
	pub fields: Map<String, Value>,
}

/// Outcome of a load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadResult {
	pub records_loaded: usize,
	/// Records per model label.
	pub per_model: BTreeMap<String, usize>,
}

impl LoadResult {
	fn merge(&mut self, other: LoadResult) {
		self.records_loaded += other.records_loaded;
		for (model, count) in other.per_model {
			*self.per_model.entry(model).or_default() += count;
		}
	}
}

/// Parse fixture JSON. Accepts an array of records or a single record.
pub fn parse_fixture(content: &str) -> Result<Vec<FixtureRecord>> {
	let value: Value = serde_json::from_str(content)?;
	let records = match value {
		Value::Array(_) => serde_json::from_value(value)?,
		Value::Object(_) => vec![serde_json::from_value(value)?],
		_ => {
			return Err(Error::Config(
				"fixture must be a JSON array or object".to_string(),
			));
		}
	};
	Ok(records)
}

/// Load every file in `paths`, in order.
pub fn load_files<P: AsRef<Path>>(tables: &Tables, paths: &[P]) -> Result<LoadResult> {
	let mut result = LoadResult::default();
	for path in paths {
		result.merge(load_file(tables, path.as_ref())?);
	}
	Ok(result)
}

pub fn load_file(tables: &Tables, path: &Path) -> Result<LoadResult> {
	let content = std::fs::read_to_string(path).map_err(|e| {
		Error::Config(format!("Cannot read fixture {}: {}", path.display(), e))
	})?;
	let records = parse_fixture(&content)
		.map_err(|e| Error::Config(format!("Problem installing fixture {}: {}", path.display(), e)))?;
	let result = load_records(tables, records)
		.map_err(|e| Error::Config(format!("Problem installing fixture {}: {}", path.display(), e)))?;
	tracing::info!(
		fixture = %path.display(),
		records = result.records_loaded,
		"fixture installed"
	);
	Ok(result)
}

/// Insert `records` into `tables`, then check many-to-many references.
pub fn load_records(tables: &Tables, records: Vec<FixtureRecord>) -> Result<LoadResult> {
	let mut result = LoadResult::default();
	for record in records {
		let label = record.model.to_ascii_lowercase();
		match label.as_str() {
			"students.student" => insert(&tables.course_students, record)?,
			"students.course" => insert(&tables.courses, record)?,
			"school.teacher" => insert(&tables.teachers, record)?,
			"school.student" => insert(&tables.school_students, record)?,
			_ => {
				return Err(Error::Config(format!(
					"Invalid model identifier: '{}'",
					record.model
				)));
			}
		}
		result.records_loaded += 1;
		*result.per_model.entry(label).or_default() += 1;
	}
	check_references(tables)?;
	Ok(result)
}

fn insert<M>(manager: &Manager<M>, record: FixtureRecord) -> Result<()>
where
	M: Model + DeserializeOwned,
{
	let mut fields = record.fields;
	fields.insert("id".to_string(), record.pk.map_or(Value::Null, Value::from));
	let object: M = serde_json::from_value(Value::Object(fields)).map_err(|e| {
		Error::Config(format!("{}: {}", record.model, e))
	})?;
	manager.create(object)?;
	Ok(())
}

fn check_references(tables: &Tables) -> Result<()> {
	for course in tables.courses.all() {
		if let Some(missing) = course
			.students
			.iter()
			.find(|id| !tables.course_students.exists(**id))
		{
			return Err(dangling("students.course", course.id, "students", *missing));
		}
	}
	for student in tables.school_students.all() {
		if let Some(missing) = student
			.teachers
			.iter()
			.find(|id| !tables.teachers.exists(**id))
		{
			return Err(dangling("school.student", student.id, "teacher", *missing));
		}
	}
	Ok(())
}

fn dangling(model: &str, pk: Option<i64>, field: &str, missing: i64) -> Error {
	Error::Config(format!(
		"{} {} has {} {} which does not exist",
		model,
		pk.unwrap_or_default(),
		field,
		missing
	))
}
