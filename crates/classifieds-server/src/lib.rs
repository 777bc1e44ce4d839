//! # Classifieds Server
//!
//! A small hyper-based HTTP/1.1 server. Each request body is read in full,
//! passed to a [`Handler`](classifieds_core::Handler), and handler errors are
//! rendered as JSON error responses.

pub mod http;
pub mod shutdown;

pub use http::{HttpServer, serve};
pub use shutdown::ShutdownCoordinator;
