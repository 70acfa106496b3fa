//! usergate user-management service library crate.
//!
//! # Purpose
//! Exposes the HTTP API, the access-control wiring, configuration, the user
//! service and its storage backends for use by the binary and tests.
//!
//! # Notes
//! Every routed request passes the request gate in [`auth::middleware`]
//! before a handler in [`api`] runs.
pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod model;
pub mod observability;
pub mod service;
pub mod store;
