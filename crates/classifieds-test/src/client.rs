//! In-process API client.
//!
//! [`APIClient`] builds [`Request`]s and hands them straight to a
//! [`Handler`], usually the application router, without opening a socket.
//! Handler errors are rendered the same way the server renders them.

use crate::response::TestResponse;
use bytes::Bytes;
use classifieds_auth::{Principal, User};
use classifieds_core::{Error, Handler, Request, Response, Result};
use hyper::header::{AUTHORIZATION, CONTENT_TYPE, HeaderName, HeaderValue};
use hyper::{HeaderMap, Method};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

pub type ClientResult<T> = Result<T>;

/// Test client similar to DRF's `APIClient`.
pub struct APIClient {
	handler: Arc<dyn Handler>,
	default_headers: RwLock<HeaderMap>,
	user: RwLock<Option<User>>,
}

impl APIClient {
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			handler,
			default_headers: RwLock::new(HeaderMap::new()),
			user: RwLock::new(None),
		}
	}

	/// Send every following request as `user`, bypassing authentication.
	/// `None` goes back to anonymous requests.
	pub async fn force_authenticate(&self, user: Option<User>) {
		*self.user.write().await = user;
	}

	/// Send `Authorization: Token <key>` with every following request.
	pub async fn credentials(&self, token: &str) -> ClientResult<()> {
		self.set_header(AUTHORIZATION, &format!("Token {}", token))
			.await
	}

	pub async fn set_header(&self, name: HeaderName, value: &str) -> ClientResult<()> {
		let value = HeaderValue::from_str(value)
			.map_err(|e| Error::BadRequest(format!("Invalid header value: {}", e)))?;
		self.default_headers.write().await.insert(name, value);
		Ok(())
	}

	/// Drop forced authentication and default headers.
	pub async fn clear_auth(&self) {
		self.force_authenticate(None).await;
		self.default_headers.write().await.clear();
	}

	pub async fn get(&self, path: &str) -> ClientResult<TestResponse> {
		self.request(Method::GET, path.to_string(), None).await
	}

	/// GET with `query` encoded as the query string.
	pub async fn get_with_query<Q: Serialize + ?Sized>(
		&self,
		path: &str,
		query: &Q,
	) -> ClientResult<TestResponse> {
		let query = serde_urlencoded::to_string(query)
			.map_err(|e| Error::BadRequest(format!("Invalid query: {}", e)))?;
		let uri = if query.is_empty() {
			path.to_string()
		} else {
			format!("{}?{}", path, query)
		};
		self.request(Method::GET, uri, None).await
	}

	pub async fn post<T: Serialize + ?Sized>(&self, path: &str, data: &T) -> ClientResult<TestResponse> {
		let body = serde_json::to_vec(data)?;
		self.request(Method::POST, path.to_string(), Some(body.into()))
			.await
	}

	pub async fn put<T: Serialize + ?Sized>(&self, path: &str, data: &T) -> ClientResult<TestResponse> {
		let body = serde_json::to_vec(data)?;
		self.request(Method::PUT, path.to_string(), Some(body.into()))
			.await
	}

	pub async fn patch<T: Serialize + ?Sized>(&self, path: &str, data: &T) -> ClientResult<TestResponse> {
		let body = serde_json::to_vec(data)?;
		self.request(Method::PATCH, path.to_string(), Some(body.into()))
			.await
	}

	pub async fn delete(&self, path: &str) -> ClientResult<TestResponse> {
		self.request(Method::DELETE, path.to_string(), None).await
	}

	async fn request(&self, method: Method, uri: String, body: Option<Bytes>) -> ClientResult<TestResponse> {
		let mut builder = Request::builder()
			.method(method)
			.uri(uri)
			.headers(self.default_headers.read().await.clone());
		if let Some(body) = body {
			builder = builder
				.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
				.body(body);
		}
		let mut request = builder.build()?;
		if let Some(user) = self.user.read().await.clone() {
			request.extensions.insert(Principal::from(user));
		}

		tracing::debug!(method = %request.method, uri = %request.uri, "test request");
		let response = match self.handler.handle(request).await {
			Ok(response) => response,
			Err(err) => Response::from_error(&err),
		};
		Ok(response.into())
	}
}
