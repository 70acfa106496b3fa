//! Access control wiring for the user API.
//!
//! # Purpose
//! `policy` declares which roles may call which routes; `middleware` runs the
//! ACL gate in front of every gated handler.
pub mod middleware;
pub mod policy;
