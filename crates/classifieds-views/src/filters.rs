//! Query-string filtering for list actions.

use classifieds_core::{Error, Result};
use std::collections::HashMap;
use std::str::FromStr;

/// Decoded query parameters.
pub type QueryParams = HashMap<String, String>;

/// Narrows the rows returned by a list action.
pub trait FilterSet<M>: Send + Sync {
	fn filter(&self, rows: Vec<M>, params: &QueryParams) -> Result<Vec<M>>;
}

/// Filter set that returns every row.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFilter;

impl<M> FilterSet<M> for NoFilter {
	fn filter(&self, rows: Vec<M>, _params: &QueryParams) -> Result<Vec<M>> {
		Ok(rows)
	}
}

/// Parse an optional query parameter.
///
/// Empty values count as absent. Unparseable values are reported as a
/// validation error on that parameter.
///
/// # Examples
///
/// ```
/// use classifieds_views::filters::{QueryParams, parse_param};
///
/// let mut params = QueryParams::new();
/// params.insert("id".to_string(), "7".to_string());
/// params.insert("name".to_string(), "".to_string());
///
/// assert_eq!(parse_param::<i64>(&params, "id").unwrap(), Some(7));
/// assert_eq!(parse_param::<String>(&params, "name").unwrap(), None);
/// assert!(parse_param::<i64>(&params, "missing").unwrap().is_none());
/// ```
pub fn parse_param<T: FromStr>(params: &QueryParams, name: &str) -> Result<Option<T>> {
	match params.get(name).map(|value| value.trim()) {
		None | Some("") => Ok(None),
		Some(value) => value
			.parse()
			.map(Some)
			.map_err(|_| Error::field(name, format!("Enter a valid value, got '{}'.", value))),
	}
}
