//! User persistence boundary.
//!
//! # Purpose
//! Defines the repository trait the user service depends on and the errors it
//! reports. The in-memory backend is the reference implementation.
use crate::model::{NewUser, User, UserPatch};
use async_trait::async_trait;
use thiserror::Error;

pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: u64) -> StoreResult<User>;
    async fn find_by_email(&self, email: &str) -> StoreResult<User>;
    /// Insert a user and assign its id. Emails are unique, compared
    /// case-insensitively.
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;
    async fn update_user(&self, id: u64, patch: UserPatch) -> StoreResult<User>;
    async fn delete_user(&self, id: u64) -> StoreResult<()>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}
