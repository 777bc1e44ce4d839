//! ViewSets
//!
//! A [`ViewSet`] receives a request together with the [`Action`] the router
//! derived for it. [`ModelViewSet`] implements the standard CRUD actions over
//! a [`Manager`] with DRF-style permission checks:
//!
//! 1. view-level permissions for every action,
//! 2. object lookup for detail actions (404 when missing),
//! 3. object-level permissions on the loaded object,
//! 4. the action itself.

use crate::filters::{FilterSet, NoFilter};
use crate::serializers::{ModelSerializer, SerializerContext};
use async_trait::async_trait;
use classifieds_auth::{
	AllowAny, Owned, PermissionClasses, PermissionContext, Principal, check_object_permissions,
	check_permissions,
};
use classifieds_core::{Action, ActionType, Error, Request, Response, Result};
use classifieds_db::{Manager, Model};
use std::sync::Arc;

/// Chooses the permission list for an action, like DRF's `get_permissions`.
pub type PermissionFactory = Arc<dyn Fn(&Action) -> PermissionClasses + Send + Sync>;

fn allow_any(_action: &Action) -> PermissionClasses {
	vec![Arc::new(AllowAny)]
}

/// ViewSet trait - similar to Django REST Framework's ViewSet
#[async_trait]
pub trait ViewSet: Send + Sync {
	/// Get the basename for URL routing
	fn get_basename(&self) -> &str;

	/// Dispatch request to appropriate action
	async fn dispatch(&self, request: Request, action: Action) -> Result<Response>;
}

/// ModelViewSet - list, retrieve, create, update, partial update and destroy
/// for one model.
pub struct ModelViewSet<S, F = NoFilter>
where
	S: ModelSerializer,
{
	basename: String,
	manager: Manager<S::Model>,
	serializer: S,
	filterset: F,
	permissions: PermissionFactory,
	read_only: bool,
}

impl<S> ModelViewSet<S, NoFilter>
where
	S: ModelSerializer,
	S::Model: Owned,
{
	/// Creates a viewset open to anyone and without filtering.
	pub fn new(basename: impl Into<String>, manager: Manager<S::Model>, serializer: S) -> Self {
		Self {
			basename: basename.into(),
			manager,
			serializer,
			filterset: NoFilter,
			permissions: Arc::new(allow_any),
			read_only: false,
		}
	}
}

impl<S, F> ModelViewSet<S, F>
where
	S: ModelSerializer,
	S::Model: Owned,
	F: FilterSet<S::Model>,
{
	/// Replace the filter set applied to list actions.
	pub fn with_filterset<G: FilterSet<S::Model>>(self, filterset: G) -> ModelViewSet<S, G> {
		ModelViewSet {
			basename: self.basename,
			manager: self.manager,
			serializer: self.serializer,
			filterset,
			permissions: self.permissions,
			read_only: self.read_only,
		}
	}

	/// Choose permissions per action.
	pub fn with_permissions<P>(mut self, permissions: P) -> Self
	where
		P: Fn(&Action) -> PermissionClasses + Send + Sync + 'static,
	{
		self.permissions = Arc::new(permissions);
		self
	}

	/// Only allow list and retrieve.
	pub fn read_only(mut self) -> Self {
		self.read_only = true;
		self
	}

	pub fn manager(&self) -> &Manager<S::Model> {
		&self.manager
	}

	fn lookup_id(request: &Request) -> Result<i64> {
		request
			.path_params
			.get("id")
			.and_then(|id| id.parse().ok())
			.ok_or_else(|| Error::NotFound("Not found.".to_string()))
	}

	fn list(&self, request: &Request) -> Result<Response> {
		let params = request.query_params()?;
		let rows = self.filterset.filter(self.manager.all(), &params)?;
		let data = rows
			.iter()
			.map(|row| self.serializer.to_representation(row))
			.collect::<Result<Vec<_>>>()?;
		Response::ok().with_json(&data)
	}

	fn create(&self, request: &Request, context: &SerializerContext<'_>) -> Result<Response> {
		let data = request.json_value()?;
		let instance = self.serializer.create(&data, context)?;
		let saved = self.manager.create(instance)?;
		tracing::info!(
			table = <S::Model as Model>::table_name(),
			id = ?saved.primary_key(),
			principal = %context.principal,
			"object created"
		);
		Response::created().with_json(&self.serializer.to_representation(&saved)?)
	}

	fn update(
		&self,
		request: &Request,
		id: i64,
		partial: bool,
		context: &SerializerContext<'_>,
	) -> Result<Response> {
		let data = request.json_value()?;
		let saved = self.manager.update_with(id, |row| {
			*row = self.serializer.update(row, &data, partial, context)?;
			Ok(())
		})?;
		Response::ok().with_json(&self.serializer.to_representation(&saved)?)
	}
}

#[async_trait]
impl<S, F> ViewSet for ModelViewSet<S, F>
where
	S: ModelSerializer,
	S::Model: Owned,
	F: FilterSet<S::Model>,
{
	fn get_basename(&self) -> &str {
		&self.basename
	}

	async fn dispatch(&self, request: Request, action: Action) -> Result<Response> {
		if self.read_only && !action.is_read() {
			return Err(Error::MethodNotAllowed(format!(
				"Method \"{}\" not allowed.",
				request.method
			)));
		}

		let principal = Principal::from_request(&request);
		let permissions = (self.permissions)(&action);
		let context = PermissionContext::new(&principal, &action);
		check_permissions(&permissions, &context)?;

		let serializer_context = SerializerContext {
			principal: &principal,
			action: &action,
		};

		match &action.action_type {
			ActionType::List => self.list(&request),
			ActionType::Create => self.create(&request, &serializer_context),
			ActionType::Retrieve
			| ActionType::Update
			| ActionType::PartialUpdate
			| ActionType::Destroy => {
				let id = Self::lookup_id(&request)?;
				let instance = self.manager.get(id)?;
				check_object_permissions(&permissions, &context, &instance)?;

				match action.action_type {
					ActionType::Retrieve => {
						Response::ok().with_json(&self.serializer.to_representation(&instance)?)
					}
					ActionType::Update => self.update(&request, id, false, &serializer_context),
					ActionType::PartialUpdate => {
						self.update(&request, id, true, &serializer_context)
					}
					_ => {
						self.manager.delete(id)?;
						tracing::info!(
							table = <S::Model as Model>::table_name(),
							id,
							principal = %principal,
							"object deleted"
						);
						Ok(Response::no_content())
					}
				}
			}
			ActionType::Custom(name) => Err(Error::MethodNotAllowed(format!(
				"Action \"{}\" is not supported.",
				name
			))),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::serializers::parse_input;
	use classifieds_auth::{IsAuthenticated, IsOwner, User, UserId, owner_permissions};
	use hyper::{Method, StatusCode};
	use rstest::{fixture, rstest};
	use serde::Deserialize;
	use serde_json::{Value, json};

	#[derive(Debug, Clone)]
	struct Note {
		id: Option<i64>,
		text: String,
		author: UserId,
	}

	impl Model for Note {
		fn table_name() -> &'static str {
			"notes"
		}

		fn primary_key(&self) -> Option<i64> {
			self.id
		}

		fn set_primary_key(&mut self, value: i64) {
			self.id = Some(value);
		}
	}

	impl Owned for Note {
		fn owner_id(&self) -> Option<&UserId> {
			Some(&self.author)
		}
	}

	#[derive(Deserialize)]
	struct NoteInput {
		text: Option<String>,
	}

	struct NoteSerializer;

	impl ModelSerializer for NoteSerializer {
		type Model = Note;

		fn to_representation(&self, instance: &Note) -> Result<Value> {
			Ok(json!({ "id": instance.id, "text": instance.text, "author": instance.author }))
		}

		fn create(&self, data: &Value, context: &SerializerContext<'_>) -> Result<Note> {
			let input: NoteInput = parse_input(data)?;
			let author = context
				.principal
				.id()
				.copied()
				.ok_or_else(|| Error::PermissionDenied("anonymous".to_string()))?;
			Ok(Note {
				id: None,
				text: input.text.ok_or_else(|| Error::field("text", "This field is required."))?,
				author,
			})
		}

		fn update(
			&self,
			instance: &Note,
			data: &Value,
			_partial: bool,
			_context: &SerializerContext<'_>,
		) -> Result<Note> {
			let input: NoteInput = parse_input(data)?;
			let mut note = instance.clone();
			if let Some(text) = input.text {
				note.text = text;
			}
			Ok(note)
		}
	}

	fn authenticated_owner(_action: &Action) -> PermissionClasses {
		vec![Arc::new(IsAuthenticated), Arc::new(IsOwner)]
	}

	#[fixture]
	fn viewset() -> ModelViewSet<NoteSerializer> {
		let manager = Manager::new();
		manager
			.create(Note {
				id: None,
				text: "first".to_string(),
				author: UserId(1),
			})
			.unwrap();
		ModelViewSet::new("notes", manager, NoteSerializer).with_permissions(owner_permissions)
	}

	fn request(method: Method, id: Option<i64>, body: Value, user: Option<User>) -> Request {
		let mut request = Request::builder()
			.method(method)
			.uri("/notes/")
			.json(&body)
			.unwrap()
			.build()
			.unwrap();
		if let Some(id) = id {
			request.path_params.insert("id".to_string(), id.to_string());
		}
		if let Some(user) = user {
			request.extensions.insert(Principal::from(user));
		}
		request
	}

	#[rstest]
	#[tokio::test]
	async fn test_list_is_open(viewset: ModelViewSet<NoteSerializer>) {
		let response = viewset
			.dispatch(request(Method::GET, None, json!({}), None), Action::list())
			.await
			.unwrap();
		assert_eq!(response.status, StatusCode::OK);
		let body: Vec<Value> = response.json().unwrap();
		assert_eq!(body.len(), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_create_sets_author(viewset: ModelViewSet<NoteSerializer>) {
		let response = viewset
			.dispatch(
				request(Method::POST, None, json!({ "text": "hi" }), Some(User::new(5, "eve"))),
				Action::create(),
			)
			.await
			.unwrap();
		assert_eq!(response.status, StatusCode::CREATED);
		let body: Value = response.json().unwrap();
		assert_eq!(body["author"], 5);
		assert_eq!(viewset.manager().count(), 2);
	}

	#[rstest]
	#[tokio::test]
	async fn test_anonymous_create_denied(viewset: ModelViewSet<NoteSerializer>) {
		let result = viewset
			.dispatch(request(Method::POST, None, json!({ "text": "hi" }), None), Action::create())
			.await;
		assert!(matches!(result, Err(Error::PermissionDenied(_))));
		assert_eq!(viewset.manager().count(), 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_missing_object_is_not_found_before_permission(
		viewset: ModelViewSet<NoteSerializer>,
	) {
		let result = viewset
			.dispatch(
				request(Method::DELETE, Some(99), json!({}), Some(User::new(2, "bob"))),
				Action::destroy(),
			)
			.await;
		assert!(matches!(result, Err(Error::NotFound(_))));
	}

	#[rstest]
	#[tokio::test]
	async fn test_non_owner_update_denied_and_row_unchanged(viewset: ModelViewSet<NoteSerializer>) {
		let result = viewset
			.dispatch(
				request(Method::PATCH, Some(1), json!({ "text": "hacked" }), Some(User::new(2, "bob"))),
				Action::partial_update(),
			)
			.await;
		assert!(matches!(result, Err(Error::PermissionDenied(_))));
		assert_eq!(viewset.manager().get(1).unwrap().text, "first");
	}

	#[rstest]
	#[tokio::test]
	async fn test_owner_destroy(viewset: ModelViewSet<NoteSerializer>) {
		let response = viewset
			.dispatch(
				request(Method::DELETE, Some(1), json!({}), Some(User::new(1, "alice"))),
				Action::destroy(),
			)
			.await
			.unwrap();
		assert_eq!(response.status, StatusCode::NO_CONTENT);
		assert_eq!(viewset.manager().count(), 0);
	}

	#[rstest]
	#[tokio::test]
	async fn test_read_only_rejects_writes(viewset: ModelViewSet<NoteSerializer>) {
		let viewset = viewset.read_only();
		let result = viewset
			.dispatch(
				request(Method::POST, None, json!({ "text": "x" }), Some(User::new(1, "alice"))),
				Action::create(),
			)
			.await;
		assert!(matches!(result, Err(Error::MethodNotAllowed(_))));
	}

	#[rstest]
	#[tokio::test]
	async fn test_custom_permission_list(viewset: ModelViewSet<NoteSerializer>) {
		let viewset = viewset.with_permissions(authenticated_owner);
		let result = viewset
			.dispatch(request(Method::GET, None, json!({}), None), Action::list())
			.await;
		assert!(matches!(result, Err(Error::PermissionDenied(_))));
	}
}
