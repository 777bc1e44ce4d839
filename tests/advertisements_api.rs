//! Advertisement endpoint tests.
//!
//! Requests go through the real router in-process: token or forced
//! authentication, permission checks, object lookup and filtering.

use classifieds::Site;
use classifieds::apps::advertisements::{Advertisement, AdvertisementStatus, Creator};
use classifieds_auth::User;
use classifieds_core::Settings;
use classifieds_core::settings::SeedUser;
use classifieds_test::APIClient;
use hyper::StatusCode;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const ALICE_TOKEN: &str = "alice-token";
const BOB_TOKEN: &str = "bob-token";

fn alice() -> User {
	User::new(1, "alice")
}

fn bob() -> User {
	User::new(2, "bob")
}

#[fixture]
fn site() -> Site {
	let settings = Settings {
		users: vec![
			SeedUser {
				username: "alice".to_string(),
				token: ALICE_TOKEN.to_string(),
				is_staff: false,
			},
			SeedUser {
				username: "bob".to_string(),
				token: BOB_TOKEN.to_string(),
				is_staff: false,
			},
		],
		..Settings::default()
	};
	Site::new(&settings).unwrap()
}

#[fixture]
fn client(site: Site) -> (Site, APIClient) {
	let client = APIClient::new(site.handler());
	(site, client)
}

fn list_url(site: &Site) -> String {
	site.router.reverse("advertisements-list").unwrap()
}

fn detail_url(site: &Site, id: i64) -> String {
	site.router.reverse_with("advertisements-detail", &[id]).unwrap()
}

fn seed(site: &Site, title: &str, owner: &User) -> Advertisement {
	site.tables
		.advertisements
		.create(Advertisement::new(title, "", Creator::from(owner)))
		.unwrap()
}

#[rstest]
#[tokio::test]
async fn test_owner_update_scenario(client: (Site, APIClient)) {
	let (site, client) = client;

	// A creates R.
	client.credentials(ALICE_TOKEN).await.unwrap();
	let response = client
		.post(&list_url(&site), &json!({ "title": "Bike", "description": "red" }))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::CREATED);
	let created: Value = response.json().unwrap();
	assert_eq!(created["creator"]["id"], 1);
	assert_eq!(created["creator"]["username"], "alice");
	assert_eq!(created["status"], "OPEN");
	let id = created["id"].as_i64().unwrap();

	// B updates R: denied, R unchanged.
	client.credentials(BOB_TOKEN).await.unwrap();
	let response = client
		.patch(&detail_url(&site, id), &json!({ "title": "Stolen" }))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
	assert_eq!(
		response.json_value().unwrap()["detail"],
		"You do not have permission to perform this action."
	);
	assert_eq!(site.tables.advertisements.get(id).unwrap().title, "Bike");

	// A updates R: allowed.
	client.credentials(ALICE_TOKEN).await.unwrap();
	let response = client
		.patch(&detail_url(&site, id), &json!({ "status": "CLOSED" }))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::OK);
	let updated: Value = response.json().unwrap();
	assert_eq!(updated["status"], "CLOSED");
	assert_eq!(updated["title"], "Bike");
}

#[rstest]
#[tokio::test]
async fn test_anonymous_can_list(client: (Site, APIClient)) {
	let (site, client) = client;
	seed(&site, "Bike", &alice());
	seed(&site, "Lamp", &bob());

	let response = client.get(&list_url(&site)).await.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let data: Vec<Value> = response.json().unwrap();
	assert_eq!(data.len(), 2);
}

#[rstest]
#[tokio::test]
async fn test_anonymous_create_forbidden(client: (Site, APIClient)) {
	let (site, client) = client;

	let response = client
		.post(&list_url(&site), &json!({ "title": "Bike" }))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::FORBIDDEN);
	assert_eq!(
		response.json_value().unwrap()["detail"],
		"Authentication credentials were not provided."
	);
	assert_eq!(site.tables.advertisements.count(), 0);
}

#[rstest]
#[tokio::test]
async fn test_anonymous_delete_forbidden(client: (Site, APIClient)) {
	let (site, client) = client;
	let ad = seed(&site, "Bike", &alice());

	let response = client.delete(&detail_url(&site, ad.id.unwrap())).await.unwrap();

	assert_eq!(response.status(), StatusCode::FORBIDDEN);
	assert_eq!(site.tables.advertisements.count(), 1);
}

#[rstest]
#[case(None, StatusCode::FORBIDDEN)]
#[case(Some(bob()), StatusCode::FORBIDDEN)]
#[case(Some(alice()), StatusCode::OK)]
#[tokio::test]
async fn test_retrieve_limited_to_owner(
	client: (Site, APIClient),
	#[case] user: Option<User>,
	#[case] expected: StatusCode,
) {
	let (site, client) = client;
	let ad = seed(&site, "Bike", &alice());
	client.force_authenticate(user).await;

	let response = client.get(&detail_url(&site, ad.id.unwrap())).await.unwrap();

	assert_eq!(response.status(), expected);
}

#[rstest]
#[tokio::test]
async fn test_owner_delete(client: (Site, APIClient)) {
	let (site, client) = client;
	let ad = seed(&site, "Bike", &alice());
	client.force_authenticate(Some(alice())).await;

	let response = client.delete(&detail_url(&site, ad.id.unwrap())).await.unwrap();
	assert_eq!(response.status(), StatusCode::NO_CONTENT);

	let response = client.get(&detail_url(&site, ad.id.unwrap())).await.unwrap();
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test]
async fn test_missing_advertisement_is_not_found(client: (Site, APIClient)) {
	let (site, client) = client;
	client.force_authenticate(Some(bob())).await;

	let response = client.delete(&detail_url(&site, 404)).await.unwrap();

	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[tokio::test]
async fn test_creator_cannot_be_changed(client: (Site, APIClient)) {
	let (site, client) = client;
	let ad = seed(&site, "Bike", &alice());
	client.force_authenticate(Some(alice())).await;

	let response = client
		.put(
			&detail_url(&site, ad.id.unwrap()),
			&json!({ "title": "Bike", "creator": { "id": 2, "username": "bob" } }),
		)
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let stored = site.tables.advertisements.get(ad.id.unwrap()).unwrap();
	assert_eq!(stored.creator, Creator::from(&alice()));
}

#[rstest]
#[tokio::test]
async fn test_blank_title_rejected(client: (Site, APIClient)) {
	let (site, client) = client;
	client.force_authenticate(Some(alice())).await;

	let response = client
		.post(&list_url(&site), &json!({ "title": "" }))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	let errors: Value = response.json().unwrap();
	assert_eq!(errors["title"][0], "This field may not be blank.");
}

#[rstest]
#[case(&[("status", "CLOSED")], vec!["Lamp"])]
#[case(&[("creator", "1")], vec!["Bike", "Lamp"])]
#[case(&[("status", "OPEN"), ("creator", "2")], vec!["Desk"])]
#[tokio::test]
async fn test_list_filters(
	client: (Site, APIClient),
	#[case] query: &[(&str, &str)],
	#[case] expected: Vec<&str>,
) {
	let (site, client) = client;
	seed(&site, "Bike", &alice());
	let mut lamp = seed(&site, "Lamp", &alice());
	lamp.status = AdvertisementStatus::Closed;
	site.tables.advertisements.update(lamp).unwrap();
	seed(&site, "Desk", &bob());

	let response = client.get_with_query(&list_url(&site), query).await.unwrap();

	assert_eq!(response.status(), StatusCode::OK);
	let data: Vec<Value> = response.json().unwrap();
	let titles: Vec<_> = data.iter().filter_map(|ad| ad["title"].as_str()).collect();
	assert_eq!(titles, expected);
}

#[rstest]
#[tokio::test]
async fn test_date_range_filter(client: (Site, APIClient)) {
	let (site, client) = client;
	let ad = seed(&site, "Bike", &alice());
	let today = ad.created_at.date_naive().to_string();

	let response = client
		.get_with_query(
			&list_url(&site),
			&[("created_at_after", today.as_str()), ("created_at_before", today.as_str())][..],
		)
		.await
		.unwrap();
	let data: Vec<Value> = response.json().unwrap();
	assert_eq!(data.len(), 1);

	let response = client
		.get_with_query(&list_url(&site), &[("created_at_before", "2000-01-01")][..])
		.await
		.unwrap();
	let data: Vec<Value> = response.json().unwrap();
	assert!(data.is_empty());
}

#[rstest]
#[tokio::test]
async fn test_invalid_filter_is_bad_request(client: (Site, APIClient)) {
	let (site, client) = client;

	let response = client
		.get_with_query(&list_url(&site), &[("status", "SOLD")][..])
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[case("Token unknown")]
#[case("Token")]
#[case("Token a b")]
#[tokio::test]
async fn test_bad_token_is_unauthorized(client: (Site, APIClient), #[case] header: &str) {
	let (site, client) = client;
	client
		.set_header(hyper::header::AUTHORIZATION, header)
		.await
		.unwrap();

	let response = client.get(&list_url(&site)).await.unwrap();

	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[tokio::test]
async fn test_other_auth_scheme_is_anonymous(client: (Site, APIClient)) {
	let (site, client) = client;
	client
		.set_header(hyper::header::AUTHORIZATION, "Basic YWxpY2U6cHc=")
		.await
		.unwrap();

	let response = client.get(&list_url(&site)).await.unwrap();
	assert_eq!(response.status(), StatusCode::OK);

	let response = client
		.post(&list_url(&site), &json!({ "title": "Bike" }))
		.await
		.unwrap();
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[rstest]
#[tokio::test]
async fn test_bad_token_wins_over_unmapped_method(client: (Site, APIClient)) {
	let (site, client) = client;
	client.credentials("unknown").await.unwrap();

	let response = client
		.put(&list_url(&site), &json!({ "title": "Bike" }))
		.await
		.unwrap();

	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
