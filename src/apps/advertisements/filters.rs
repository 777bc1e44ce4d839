use super::models::{Advertisement, AdvertisementStatus};
use chrono::NaiveDate;
use classifieds_core::Result;
use classifieds_views::{FilterSet, QueryParams, parse_param};

/// Filters advertisements by `status`, `creator` and an inclusive
/// `created_at_after` / `created_at_before` date range (`YYYY-MM-DD`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvertisementFilter;

impl FilterSet<Advertisement> for AdvertisementFilter {
	fn filter(&self, rows: Vec<Advertisement>, params: &QueryParams) -> Result<Vec<Advertisement>> {
		let status = parse_param::<AdvertisementStatus>(params, "status")?;
		let creator = parse_param::<i64>(params, "creator")?;
		let after = parse_param::<NaiveDate>(params, "created_at_after")?;
		let before = parse_param::<NaiveDate>(params, "created_at_before")?;

		Ok(rows
			.into_iter()
			.filter(|ad| status.is_none_or(|status| ad.status == status))
			.filter(|ad| creator.is_none_or(|id| ad.creator.id.0 == id))
			.filter(|ad| after.is_none_or(|date| ad.created_at.date_naive() >= date))
			.filter(|ad| before.is_none_or(|date| ad.created_at.date_naive() <= date))
			.collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::apps::advertisements::models::Creator;
	use chrono::{TimeZone, Utc};
	use classifieds_auth::User;
	use classifieds_core::Error;
	use rstest::{fixture, rstest};

	fn ad(id: i64, owner: i64, status: AdvertisementStatus, day: u32) -> Advertisement {
		let mut ad = Advertisement::new(
			format!("ad {}", id),
			"",
			Creator::from(&User::new(owner, "user")),
		);
		ad.id = Some(id);
		ad.status = status;
		ad.created_at = Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap();
		ad
	}

	#[fixture]
	fn rows() -> Vec<Advertisement> {
		vec![
			ad(1, 1, AdvertisementStatus::Open, 1),
			ad(2, 1, AdvertisementStatus::Closed, 5),
			ad(3, 2, AdvertisementStatus::Open, 10),
			ad(4, 2, AdvertisementStatus::Open, 20),
		]
	}

	fn ids(rows: Vec<Advertisement>) -> Vec<i64> {
		rows.into_iter().filter_map(|ad| ad.id).collect()
	}

	fn params(pairs: &[(&str, &str)]) -> QueryParams {
		pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect()
	}

	#[rstest]
	#[case(&[], vec![1, 2, 3, 4])]
	#[case(&[("status", "OPEN")], vec![1, 3, 4])]
	#[case(&[("status", "CLOSED")], vec![2])]
	#[case(&[("creator", "2")], vec![3, 4])]
	#[case(&[("created_at_after", "2024-03-05")], vec![2, 3, 4])]
	#[case(&[("created_at_before", "2024-03-10")], vec![1, 2, 3])]
	#[case(&[("created_at_after", "2024-03-05"), ("created_at_before", "2024-03-10")], vec![2, 3])]
	#[case(&[("status", "OPEN"), ("creator", "1")], vec![1])]
	#[case(&[("status", "")], vec![1, 2, 3, 4])]
	fn test_filters(rows: Vec<Advertisement>, #[case] query: &[(&str, &str)], #[case] expected: Vec<i64>) {
		let filtered = AdvertisementFilter.filter(rows, &params(query)).unwrap();
		assert_eq!(ids(filtered), expected);
	}

	#[rstest]
	#[case("status", "SOLD")]
	#[case("creator", "alice")]
	#[case("created_at_after", "05/03/2024")]
	fn test_invalid_values_rejected(rows: Vec<Advertisement>, #[case] name: &str, #[case] value: &str) {
		match AdvertisementFilter.filter(rows, &params(&[(name, value)])) {
			Err(Error::Validation(errors)) => assert!(errors.contains_key(name)),
			other => panic!("expected validation error, got {:?}", other),
		}
	}
}
