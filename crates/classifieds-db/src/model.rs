//! The model trait.

/// A persisted record with an auto-incrementing `i64` primary key.
///
/// # Examples
///
/// ```
/// use classifieds_db::Model;
///
/// #[derive(Debug, Clone)]
/// struct Teacher {
///     id: Option<i64>,
///     name: String,
/// }
///
/// impl Model for Teacher {
///     fn table_name() -> &'static str { "school_teacher" }
///     fn primary_key(&self) -> Option<i64> { self.id }
///     fn set_primary_key(&mut self, value: i64) { self.id = Some(value); }
/// }
///
/// let mut teacher = Teacher { id: None, name: "Ms. Smith".into() };
/// teacher.set_primary_key(3);
/// assert_eq!(teacher.primary_key(), Some(3));
/// ```
pub trait Model: Clone + Send + Sync + 'static {
	fn table_name() -> &'static str;

	/// `None` until the record has been saved.
	fn primary_key(&self) -> Option<i64>;

	fn set_primary_key(&mut self, value: i64);
}
