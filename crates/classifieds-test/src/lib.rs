//! # Classifieds Test
//!
//! Testing utilities: an in-process [`APIClient`] and its [`TestResponse`].
//!
//! ```rust,no_run
//! use classifieds_test::APIClient;
//! # use classifieds_core::Handler;
//! # use std::sync::Arc;
//! # async fn example(router: Arc<dyn Handler>) {
//! let client = APIClient::new(router);
//! let response = client.get("/api/v1/courses/").await.unwrap();
//! assert!(response.is_success());
//! # }
//! ```

pub mod client;
pub mod response;

pub use client::{APIClient, ClientResult};
pub use response::TestResponse;
