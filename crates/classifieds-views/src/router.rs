//! URL routing for viewsets.
//!
//! [`DefaultRouter`] maps `/{prefix}/{resource}/` to list and create and
//! `/{prefix}/{resource}/{id}/` to the detail actions of a registered
//! [`ViewSet`], in the manner of DRF's `DefaultRouter`. Routes are named
//! `<basename>-list` and `<basename>-detail` and can be reversed.

use crate::viewset::ViewSet;
use async_trait::async_trait;
use classifieds_auth::{Authentication, Principal};
use classifieds_core::{Action, Error, Handler, Request, Response, Result};
use hyper::Method;
use serde_json::{Map, Value};
use std::sync::Arc;

/// A named URL pattern produced by the router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
	pub name: String,
	pub path: String,
}

struct Registration {
	prefix: String,
	viewset: Arc<dyn ViewSet>,
}

enum Resolved<'a> {
	Root,
	List(&'a Registration),
	Detail(&'a Registration, String),
}

/// Default router implementation
/// Similar to Django REST Framework's DefaultRouter
pub struct DefaultRouter {
	prefix: String,
	registry: Vec<Registration>,
	authentication: Vec<Arc<dyn Authentication>>,
}

impl DefaultRouter {
	/// Create a router mounted under `prefix`, e.g. `api/v1`.
	///
	/// # Examples
	///
	/// ```
	/// use classifieds_views::DefaultRouter;
	///
	/// let router = DefaultRouter::new("/api/v1/");
	/// assert_eq!(router.root_path(), "/api/v1/");
	/// assert!(router.routes().is_empty());
	/// ```
	pub fn new(prefix: &str) -> Self {
		Self {
			prefix: prefix.trim_matches('/').to_string(),
			registry: Vec::new(),
			authentication: Vec::new(),
		}
	}

	/// Register a viewset under `prefix`, relative to the router prefix.
	pub fn register(&mut self, prefix: &str, viewset: Arc<dyn ViewSet>) -> &mut Self {
		let prefix = prefix.trim_matches('/').to_string();
		tracing::debug!(prefix = %prefix, basename = viewset.get_basename(), "viewset registered");
		self.registry.push(Registration { prefix, viewset });
		// Longest prefix first so nested resources win over their parents.
		self.registry
			.sort_by(|a, b| b.prefix.len().cmp(&a.prefix.len()));
		self
	}

	/// Add an authentication backend. Backends are tried in order and the
	/// first one that recognizes the request wins.
	pub fn with_authentication(mut self, authentication: Arc<dyn Authentication>) -> Self {
		self.authentication.push(authentication);
		self
	}

	/// Path of the API root view.
	pub fn root_path(&self) -> String {
		if self.prefix.is_empty() {
			"/".to_string()
		} else {
			format!("/{}/", self.prefix)
		}
	}

	fn list_path(&self, registration: &Registration) -> String {
		format!("{}{}/", self.root_path(), registration.prefix)
	}

	/// Every named route, list route before detail route per viewset.
	pub fn routes(&self) -> Vec<Route> {
		let mut routes: Vec<Route> = self
			.registry
			.iter()
			.flat_map(|registration| {
				let basename = registration.viewset.get_basename();
				let list_path = self.list_path(registration);
				[
					Route {
						name: format!("{}-list", basename),
						path: list_path.clone(),
					},
					Route {
						name: format!("{}-detail", basename),
						path: format!("{}{{id}}/", list_path),
					},
				]
			})
			.collect();
		routes.sort_by(|a, b| a.path.cmp(&b.path));
		routes
	}

	/// Reverse a route name that takes no arguments.
	///
	/// # Examples
	///
	/// ```
	/// use classifieds_views::DefaultRouter;
	///
	/// let router = DefaultRouter::new("api/v1");
	/// assert!(router.reverse("courses-list").is_err());
	/// ```
	pub fn reverse(&self, name: &str) -> Result<String> {
		self.reverse_with::<String>(name, &[])
	}

	/// Reverse a route name with positional arguments.
	///
	/// `<basename>-list` takes none, `<basename>-detail` takes the id.
	pub fn reverse_with<S: ToString>(&self, name: &str, args: &[S]) -> Result<String> {
		let no_match = || Error::NotFound(format!("Reverse for '{}' not found.", name));

		let (basename, kind) = name.rsplit_once('-').ok_or_else(no_match)?;
		let registration = self
			.registry
			.iter()
			.find(|registration| registration.viewset.get_basename() == basename)
			.ok_or_else(no_match)?;
		let list_path = self.list_path(registration);

		match (kind, args) {
			("list", []) => Ok(list_path),
			("detail", [id]) => Ok(format!("{}{}/", list_path, id.to_string())),
			("list" | "detail", _) => Err(Error::NotFound(format!(
				"Reverse for '{}' with {} arguments not found.",
				name,
				args.len()
			))),
			_ => Err(no_match()),
		}
	}

	fn resolve(&self, path: &str) -> Option<Resolved<'_>> {
		let rest = if self.prefix.is_empty() {
			path.trim_start_matches('/')
		} else {
			path.trim_start_matches('/').strip_prefix(self.prefix.as_str())?
		};
		if !(rest.is_empty() || rest.starts_with('/')) {
			return None;
		}
		let rest = rest.trim_matches('/');
		if rest.is_empty() {
			return Some(Resolved::Root);
		}

		self.registry.iter().find_map(|registration| {
			let tail = rest.strip_prefix(registration.prefix.as_str())?;
			if tail.is_empty() {
				return Some(Resolved::List(registration));
			}
			let id = tail.strip_prefix('/')?;
			if id.is_empty() || id.contains('/') {
				return None;
			}
			Some(Resolved::Detail(registration, id.to_string()))
		})
	}

	fn authenticate(&self, request: &mut Request) -> Result<()> {
		if request.extensions.get::<Principal>().is_some() {
			return Ok(());
		}
		for backend in &self.authentication {
			if let Some(user) = backend.authenticate(request)? {
				tracing::debug!(user = %user.username, "request authenticated");
				request.extensions.insert(Principal::from(user));
				break;
			}
		}
		Ok(())
	}

	fn api_root(&self, request: &Request) -> Result<Response> {
		if request.method != Method::GET {
			return Err(method_not_allowed(&request.method));
		}
		let mut links = Map::new();
		for registration in &self.registry {
			links.insert(
				registration.prefix.clone(),
				Value::String(self.list_path(registration)),
			);
		}
		Response::ok().with_json(&Value::Object(links))
	}

	/// Resolve the request, authenticate it and dispatch to the viewset.
	pub async fn route(&self, mut request: Request) -> Result<Response> {
		let path = request.path().to_string();
		let (registration, id) = match self.resolve(&path) {
			Some(Resolved::Root) => return self.api_root(&request),
			Some(Resolved::List(registration)) => (registration, None),
			Some(Resolved::Detail(registration, id)) => (registration, Some(id)),
			None => return Err(Error::NotFound("Not found.".to_string())),
		};

		self.authenticate(&mut request)?;
		let action = Action::from_method(&request.method, id.is_some())
			.ok_or_else(|| method_not_allowed(&request.method))?;
		if let Some(id) = id {
			request.path_params.insert("id".to_string(), id);
		}

		tracing::debug!(
			method = %request.method,
			path = %path,
			basename = registration.viewset.get_basename(),
			action = %action,
			"dispatching"
		);
		registration.viewset.dispatch(request, action).await
	}
}

fn method_not_allowed(method: &Method) -> Error {
	Error::MethodNotAllowed(format!("Method \"{}\" not allowed.", method))
}

#[async_trait]
impl Handler for DefaultRouter {
	async fn handle(&self, request: Request) -> Result<Response> {
		self.route(request).await
	}
}
