//! # Classifieds Views
//!
//! Model viewsets, serializers, filter sets and the URL router.
//!
//! A [`ModelViewSet`] wires a [`Manager`](classifieds_db::Manager), a
//! [`ModelSerializer`] and an optional [`FilterSet`] together and runs the
//! permission classes chosen for each action. A [`DefaultRouter`] exposes
//! registered viewsets under `/{prefix}/{resource}/` and
//! `/{prefix}/{resource}/{id}/`.

pub mod filters;
pub mod router;
pub mod serializers;
pub mod viewset;

pub use filters::{FilterSet, NoFilter, QueryParams, parse_param};
pub use router::{DefaultRouter, Route};
pub use serializers::{ModelSerializer, SerializerContext, Validator, parse_input};
pub use viewset::{ModelViewSet, PermissionFactory, ViewSet};
