//! User service layer.
//!
//! # Purpose
//! Holds the business rules handlers call once a request has passed the
//! gate: field validation, password hashing, ownership of `:userId` edits and
//! credential checks for token issuance.
//!
//! # Key invariants
//! - Passwords reach the store only as argon2 hashes.
//! - Every user created here gets the `user` role; callers cannot pick one.
//! - A user may only edit their own record.
use crate::store::StoreError;
use thiserror::Error;

pub mod password;
mod users;

pub use users::{ProfileChanges, Registration, UserService};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("invalid email or password")]
    Credentials,
    #[error("user store failure")]
    Store(#[source] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ServiceError::NotFound(format!("{what} not found")),
            StoreError::Conflict(message) => ServiceError::Conflict(message),
            StoreError::Unexpected(err) => ServiceError::Store(err),
        }
    }
}
