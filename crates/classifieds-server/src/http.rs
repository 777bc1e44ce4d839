use bytes::Bytes;
use classifieds_core::{Handler, Request, Response, Result};
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio::task::JoinSet;

use crate::shutdown::ShutdownCoordinator;

/// HTTP/1.1 server that hands every request to one [`Handler`].
pub struct HttpServer {
	pub handler: Arc<dyn Handler>,
}

impl HttpServer {
	/// Create a new server with the given handler
	///
	/// # Examples
	///
	/// ```
	/// use classifieds_server::HttpServer;
	/// use classifieds_core::{Handler, Request, Response, Result};
	/// use std::sync::Arc;
	///
	/// struct Hello;
	///
	/// #[async_trait::async_trait]
	/// impl Handler for Hello {
	///     async fn handle(&self, _request: Request) -> Result<Response> {
	///         Ok(Response::ok().with_body("hello"))
	///     }
	/// }
	///
	/// let server = HttpServer::new(Arc::new(Hello));
	/// ```
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self { handler }
	}

	/// Serve on `addr` until Ctrl+C.
	pub async fn listen(self, addr: SocketAddr) -> Result<()> {
		let coordinator = ShutdownCoordinator::default();
		coordinator.shutdown_on_ctrl_c();
		self.listen_with_shutdown(addr, coordinator).await
	}

	/// Serve on `addr` until `coordinator` signals shutdown.
	pub async fn listen_with_shutdown(
		self,
		addr: SocketAddr,
		coordinator: ShutdownCoordinator,
	) -> Result<()> {
		let listener = TcpListener::bind(addr).await?;
		self.serve(listener, coordinator).await
	}

	/// Accept connections from an already bound listener.
	///
	/// On shutdown the server stops accepting and gives open connections
	/// up to the coordinator's timeout to finish.
	pub async fn serve(self, listener: TcpListener, coordinator: ShutdownCoordinator) -> Result<()> {
		tracing::info!(address = %listener.local_addr()?, "server listening");

		let mut shutdown_rx = coordinator.subscribe();
		let mut connections = JoinSet::new();

		loop {
			tokio::select! {
				result = listener.accept() => {
					let (stream, socket_addr) = match result {
						Ok(accepted) => accepted,
						Err(e) => {
							tracing::warn!(error = %e, "failed to accept connection");
							continue;
						}
					};
					let handler = self.handler.clone();
					let conn_shutdown = coordinator.subscribe();
					connections.spawn(async move {
						if let Err(err) = Self::handle_connection(stream, socket_addr, handler, conn_shutdown).await {
							tracing::debug!(remote = %socket_addr, error = %err, "connection closed with error");
						}
					});
				}
				_ = shutdown_rx.recv() => {
					tracing::info!("shutdown signal received, stopping server");
					break;
				}
				// Reap finished connections so the set does not grow unbounded.
				Some(_) = connections.join_next(), if !connections.is_empty() => {}
			}
		}

		let drain = async { while connections.join_next().await.is_some() {} };
		if tokio::time::timeout(coordinator.timeout(), drain).await.is_err() {
			tracing::warn!(
				remaining = connections.len(),
				"shutdown timeout elapsed, aborting open connections"
			);
			connections.abort_all();
		}

		tracing::info!("server stopped");
		Ok(())
	}

	/// Handle a single TCP connection
	///
	/// When `shutdown` fires the connection finishes its in-flight request
	/// and then closes instead of waiting for the next keep-alive request.
	pub async fn handle_connection(
		stream: TcpStream,
		socket_addr: SocketAddr,
		handler: Arc<dyn Handler>,
		mut shutdown: broadcast::Receiver<()>,
	) -> std::result::Result<(), hyper::Error> {
		let io = TokioIo::new(stream);
		let service = RequestService {
			handler,
			remote_addr: socket_addr,
		};

		let conn = http1::Builder::new().serve_connection(io, service);
		tokio::pin!(conn);

		tokio::select! {
			result = conn.as_mut() => result,
			_ = shutdown.recv() => {
				conn.as_mut().graceful_shutdown();
				conn.await
			}
		}
	}
}

/// Adapts a [`Handler`] to hyper's `Service`.
struct RequestService {
	handler: Arc<dyn Handler>,
	remote_addr: SocketAddr,
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = Box<dyn std::error::Error + Send + Sync>;
	type Future = Pin<Box<dyn Future<Output = std::result::Result<Self::Response, Self::Error>> + Send + 'static>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let handler = self.handler.clone();
		let remote_addr = self.remote_addr;

		Box::pin(async move {
			let started = Instant::now();
			let (parts, body) = req.into_parts();
			let body_bytes = body.collect().await?.to_bytes();

			let mut request = Request::new(
				parts.method,
				parts.uri,
				parts.version,
				parts.headers,
				body_bytes,
			);
			request.remote_addr = Some(remote_addr);
			let method = request.method.clone();
			let path = request.path().to_string();

			let response = match handler.handle(request).await {
				Ok(response) => response,
				Err(err) => {
					if err.status_code().is_server_error() {
						tracing::error!(error = %err, method = %method, path = %path, "request failed");
					}
					Response::from_error(&err)
				}
			};

			tracing::info!(
				method = %method,
				path = %path,
				status = response.status.as_u16(),
				remote = %remote_addr,
				elapsed_ms = started.elapsed().as_millis() as u64,
				"request handled"
			);

			let mut hyper_response = hyper::Response::builder().status(response.status);
			for (key, value) in response.headers.iter() {
				hyper_response = hyper_response.header(key, value);
			}

			Ok(hyper_response.body(Full::new(response.body))?)
		})
	}
}

/// Serve `handler` on `addr` until Ctrl+C.
pub async fn serve(addr: SocketAddr, handler: Arc<dyn Handler>) -> Result<()> {
	HttpServer::new(handler).listen(addr).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use classifieds_core::Error;
	use rstest::rstest;
	use std::time::Duration;
	use tokio::io::{AsyncReadExt, AsyncWriteExt};

	struct PathHandler;

	#[async_trait]
	impl Handler for PathHandler {
		async fn handle(&self, request: Request) -> Result<Response> {
			match request.path() {
				"/missing/" => Err(Error::NotFound("Not found.".to_string())),
				path => Ok(Response::ok().with_body(format!("path={}", path))),
			}
		}
	}

	async fn roundtrip(addr: SocketAddr, path: &str) -> String {
		let mut stream = TcpStream::connect(addr).await.unwrap();
		let request = format!(
			"GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
			path
		);
		stream.write_all(request.as_bytes()).await.unwrap();
		let mut response = String::new();
		stream.read_to_string(&mut response).await.unwrap();
		response
	}

	#[rstest]
	#[tokio::test]
	async fn test_serves_and_shuts_down() {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		let coordinator = ShutdownCoordinator::new(Duration::from_secs(1));
		let server = HttpServer::new(Arc::new(PathHandler));
		let task = tokio::spawn(server.serve(listener, coordinator.clone()));

		let ok = roundtrip(addr, "/hello/").await;
		assert!(ok.starts_with("HTTP/1.1 200 OK"));
		assert!(ok.ends_with("path=/hello/"));

		let missing = roundtrip(addr, "/missing/").await;
		assert!(missing.starts_with("HTTP/1.1 404 Not Found"));
		assert!(missing.contains(r#"{"detail":"Not found."}"#));

		coordinator.shutdown();
		let result = tokio::time::timeout(Duration::from_secs(5), task)
			.await
			.unwrap()
			.unwrap();
		assert!(result.is_ok());
	}
}
