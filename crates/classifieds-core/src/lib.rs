//! # Classifieds Core
//!
//! Types shared by every crate of the classifieds backend:
//!
//! - [`error`]: the workspace [`Error`] enum and its HTTP status mapping
//! - [`action`]: viewset [`Action`]s derived from each request
//! - [`http`]: [`Request`], [`Response`] and the [`Handler`] trait
//! - [`settings`]: TOML + environment configuration
//! - [`logging`]: tracing subscriber installation

pub mod action;
pub mod error;
pub mod http;
pub mod logging;
pub mod settings;

pub use action::{Action, ActionType};
pub use error::{Error, FieldErrors, Result};
pub use http::{Handler, Request, RequestBuilder, Response};
pub use settings::Settings;
