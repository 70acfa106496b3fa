//! User data model.
//!
//! # Purpose
//! Re-exports the stored user record and the payloads the store accepts.
mod user;

pub use user::{NewUser, User, UserPatch, UserProfile};
