use super::models::Course;
use classifieds_core::Result;
use classifieds_views::{FilterSet, QueryParams, parse_param};

/// Exact-match filtering on `id` and `name`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CourseFilter;

impl FilterSet<Course> for CourseFilter {
	fn filter(&self, rows: Vec<Course>, params: &QueryParams) -> Result<Vec<Course>> {
		let id = parse_param::<i64>(params, "id")?;
		let name = parse_param::<String>(params, "name")?;

		Ok(rows
			.into_iter()
			.filter(|course| id.is_none_or(|id| course.id == Some(id)))
			.filter(|course| name.as_ref().is_none_or(|name| &course.name == name))
			.collect())
	}
}
