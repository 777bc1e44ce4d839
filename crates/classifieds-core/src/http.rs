//! Request and response types passed between the server, the router and
//! the viewsets.

use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use http::Extensions;
use hyper::header::{CONTENT_TYPE, HeaderName, HeaderValue};
use hyper::{HeaderMap, Method, StatusCode, Uri, Version};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::net::SocketAddr;

/// An incoming HTTP request with its body fully read.
#[derive(Debug)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Parameters captured from the URL path, e.g. `id`.
	pub path_params: HashMap<String, String>,
	pub remote_addr: Option<SocketAddr>,
	/// Typed per-request data such as the authenticated principal.
	pub extensions: Extensions,
}

impl Request {
	/// Create a request from already-parsed parts.
	pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Bytes) -> Self {
		Self {
			method,
			uri,
			version,
			headers,
			body,
			path_params: HashMap::new(),
			remote_addr: None,
			extensions: Extensions::new(),
		}
	}

	/// Start building a request.
	///
	/// # Examples
	///
	/// ```
	/// use classifieds_core::http::Request;
	/// use hyper::Method;
	///
	/// let request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/api/v1/courses/?name=rust")
	///     .build()
	///     .unwrap();
	/// assert_eq!(request.path(), "/api/v1/courses/");
	/// assert_eq!(request.query_params().unwrap()["name"], "rust");
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// Decode the query string into a flat map. Repeated keys keep the last value.
	pub fn query_params(&self) -> Result<HashMap<String, String>> {
		let query = self.uri.query().unwrap_or("");
		serde_urlencoded::from_str(query)
			.map_err(|e| Error::BadRequest(format!("Malformed query string: {}", e)))
	}

	/// Parse the body as JSON. An empty body parses as an empty object.
	pub fn json_value(&self) -> Result<serde_json::Value> {
		if self.body.iter().all(u8::is_ascii_whitespace) {
			return Ok(serde_json::Value::Object(serde_json::Map::new()));
		}
		Ok(serde_json::from_slice(&self.body)?)
	}

	/// Parse the body as JSON into `T`.
	pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
		Ok(serde_json::from_value(self.json_value()?)?)
	}

	/// Value of a header, if present and valid UTF-8.
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}
}

/// Builder for [`Request`], mostly used by tests and the in-process client.
#[derive(Debug)]
pub struct RequestBuilder {
	method: Method,
	uri: String,
	version: Version,
	headers: HeaderMap,
	body: Bytes,
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self {
			method: Method::GET,
			uri: "/".to_string(),
			version: Version::HTTP_11,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = uri.into();
		self
	}

	pub fn version(mut self, version: Version) -> Self {
		self.version = version;
		self
	}

	pub fn headers(mut self, headers: HeaderMap) -> Self {
		self.headers = headers;
		self
	}

	pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Serialize `value` as the JSON body and set the content type.
	pub fn json<T: Serialize>(mut self, value: &T) -> Result<Self> {
		self.body = Bytes::from(serde_json::to_vec(value)?);
		self.headers
			.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		Ok(self)
	}

	pub fn build(self) -> Result<Request> {
		let uri: Uri = self
			.uri
			.parse()
			.map_err(|e| Error::BadRequest(format!("Invalid URI '{}': {}", self.uri, e)))?;
		Ok(Request::new(
			self.method,
			uri,
			self.version,
			self.headers,
			self.body,
		))
	}
}

/// An outgoing HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn created() -> Self {
		Self::new(StatusCode::CREATED)
	}

	pub fn no_content() -> Self {
		Self::new(StatusCode::NO_CONTENT)
	}

	pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);
		self
	}

	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Serialize `value` into the body as JSON.
	pub fn with_json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
		let body = serde_json::to_vec(value)?;
		Ok(self
			.with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
			.with_body(body))
	}

	/// Render an error as a JSON response with the matching status.
	pub fn from_error(error: &Error) -> Self {
		let body = serde_json::to_vec(&error.to_json()).unwrap_or_default();
		Self::new(error.status_code())
			.with_header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
			.with_body(body)
	}

	/// Parse the body as JSON.
	pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
		Ok(serde_json::from_slice(&self.body)?)
	}
}

/// Anything that turns a request into a response.
#[async_trait]
pub trait Handler: Send + Sync {
	async fn handle(&self, request: Request) -> Result<Response>;
}
