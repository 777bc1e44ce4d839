//! URL configuration.
//!
//! ```text
//! /{prefix}/                          API root
//! /{prefix}/advertisements/[{id}/]    advertisements
//! /{prefix}/courses/[{id}/]           courses
//! /{prefix}/school/students/[{id}/]   school students (read-only)
//! /{prefix}/school/teachers/[{id}/]   school teachers (read-only)
//! ```

use crate::apps::advertisements::{Advertisement, advertisement_viewset};
use crate::apps::courses::{self, Course, course_viewset};
use crate::apps::school::{self, Teacher, student_viewset, teacher_viewset};
use super::fixtures::{self, LoadResult};
use classifieds_auth::{TokenAuthentication, User};
use classifieds_core::{Handler, Result, Settings};
use classifieds_db::Manager;
use classifieds_views::DefaultRouter;
use std::path::Path;
use std::sync::Arc;

/// Storage shared by the viewsets.
#[derive(Clone, Default)]
pub struct Tables {
	pub advertisements: Manager<Advertisement>,
	pub courses: Manager<Course>,
	pub course_students: Manager<courses::Student>,
	pub teachers: Manager<Teacher>,
	pub school_students: Manager<school::Student>,
}

/// The assembled application: router, token store and tables.
#[derive(Clone)]
pub struct Site {
	pub router: Arc<DefaultRouter>,
	pub tokens: Arc<TokenAuthentication>,
	pub tables: Tables,
}

impl Site {
	/// Build the site with fresh tables filled from `settings.fixtures`.
	pub fn new(settings: &Settings) -> Result<Self> {
		Self::with_tables(settings, Tables::default())
	}

	pub fn with_tables(settings: &Settings, tables: Tables) -> Result<Self> {
		settings.validate()?;

		let tokens = Arc::new(TokenAuthentication::new());
		for (index, seed) in settings.users.iter().enumerate() {
			let mut user = User::new(index as i64 + 1, seed.username.as_str());
			if seed.is_staff {
				user = user.staff();
			}
			tokens.register_token(seed.token.as_str(), user);
		}
		tracing::debug!(users = tokens.len(), "tokens registered");

		let router = build_router(settings, &tables, tokens.clone());
		let site = Self {
			router: Arc::new(router),
			tokens,
			tables,
		};
		site.load_fixtures(&settings.fixtures)?;
		Ok(site)
	}

	/// Install fixture files into the site's tables.
	pub fn load_fixtures<P: AsRef<Path>>(&self, paths: &[P]) -> Result<LoadResult> {
		fixtures::load_files(&self.tables, paths)
	}

	/// The router as a request handler.
	pub fn handler(&self) -> Arc<dyn Handler> {
		self.router.clone()
	}
}

fn build_router(settings: &Settings, tables: &Tables, tokens: Arc<TokenAuthentication>) -> DefaultRouter {
	let mut router = DefaultRouter::new(&settings.api.prefix).with_authentication(tokens);
	router
		.register(
			"advertisements",
			Arc::new(advertisement_viewset(tables.advertisements.clone())),
		)
		.register(
			"courses",
			Arc::new(course_viewset(
				tables.courses.clone(),
				tables.course_students.clone(),
				settings.courses.max_students_per_course,
			)),
		)
		.register(
			"school/students",
			Arc::new(student_viewset(tables.school_students.clone())),
		)
		.register(
			"school/teachers",
			Arc::new(teacher_viewset(
				tables.teachers.clone(),
				tables.school_students.clone(),
			)),
		);
	router
}
