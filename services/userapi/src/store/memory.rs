//! In-memory implementation of the user store.
//!
//! # Purpose
//! Implements [`UserStore`] with a `HashMap` guarded by a `tokio::sync::RwLock`.
//! It backs local development, tests and deployments that do not need
//! durability.
//!
//! # Durability and consistency
//! - **Not durable**: all users are lost on restart.
//! - Ids are assigned from a counter starting at 1 and are never reused.
//! - Email uniqueness is checked and the insert performed under the same write
//!   lock, so concurrent registrations cannot both claim one address.
//!
//! # Metrics
//! Keeps the `usergate_users_total` gauge in step with the map size.
use super::{StoreError, StoreResult, UserStore};
use crate::model::{NewUser, User, UserPatch};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug)]
struct UserTable {
    next_id: u64,
    users: HashMap<u64, User>,
}

impl UserTable {
    fn email_taken(&self, email: &str, except: Option<u64>) -> bool {
        self.users
            .values()
            .any(|user| Some(user.id) != except && user.email.eq_ignore_ascii_case(email))
    }
}

#[derive(Clone)]
pub struct InMemoryStore {
    table: Arc<RwLock<UserTable>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(UserTable {
                next_id: 1,
                users: HashMap::new(),
            })),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn get_user(&self, id: u64) -> StoreResult<User> {
        self.table
            .read()
            .await
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<User> {
        self.table
            .read()
            .await
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned()
            .ok_or_else(|| StoreError::NotFound("user".into()))
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut table = self.table.write().await;
        if table.email_taken(&user.email, None) {
            return Err(StoreError::Conflict("email already registered".into()));
        }
        let id = table.next_id;
        table.next_id += 1;
        let now = Utc::now();
        let record = User {
            id,
            name: user.name,
            email: user.email,
            password: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        table.users.insert(id, record.clone());
        metrics::gauge!("usergate_users_total").set(table.users.len() as f64);
        Ok(record)
    }

    async fn update_user(&self, id: u64, patch: UserPatch) -> StoreResult<User> {
        let mut table = self.table.write().await;
        if let Some(email) = patch.email.as_deref()
            && table.email_taken(email, Some(id))
        {
            return Err(StoreError::Conflict("email already registered".into()));
        }
        let user = table
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))?;
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(password_hash) = patch.password_hash {
            user.password = password_hash;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_user(&self, id: u64) -> StoreResult<()> {
        let mut table = self.table.write().await;
        if table.users.remove(&id).is_none() {
            return Err(StoreError::NotFound(format!("user {id}")));
        }
        metrics::gauge!("usergate_users_total").set(table.users.len() as f64);
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usergate_acl::Role;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "John Connor".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$stub".to_string(),
            role: Role::user(),
        }
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids_from_one() {
        let store = InMemoryStore::new();
        let first = store.create_user(new_user("a@x.io")).await.expect("first");
        let second = store.create_user(new_user("b@x.io")).await.expect("second");
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.get_user(2).await.expect("get").email, "b@x.io");
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email_ignoring_case() {
        let store = InMemoryStore::new();
        store.create_user(new_user("john@connor.net")).await.expect("create");
        let err = store
            .create_user(new_user("John@Connor.net"))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn update_patches_only_given_fields() {
        let store = InMemoryStore::new();
        let created = store.create_user(new_user("a@x.io")).await.expect("create");
        let updated = store
            .update_user(
                created.id,
                UserPatch {
                    name: Some("Sarah Connor".to_string()),
                    ..UserPatch::default()
                },
            )
            .await
            .expect("update");
        assert_eq!(updated.name, "Sarah Connor");
        assert_eq!(updated.email, "a@x.io");
        assert_eq!(updated.password, created.password);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn update_rejects_email_owned_by_someone_else() {
        let store = InMemoryStore::new();
        store.create_user(new_user("a@x.io")).await.expect("a");
        let b = store.create_user(new_user("b@x.io")).await.expect("b");
        let err = store
            .update_user(
                b.id,
                UserPatch {
                    email: Some("A@x.io".to_string()),
                    ..UserPatch::default()
                },
            )
            .await
            .expect_err("conflict");
        assert!(matches!(err, StoreError::Conflict(_)));

        let same = store
            .update_user(
                b.id,
                UserPatch {
                    email: Some("b@x.io".to_string()),
                    ..UserPatch::default()
                },
            )
            .await;
        assert!(same.is_ok());
    }

    #[tokio::test]
    async fn missing_users_report_not_found() {
        let store = InMemoryStore::new();
        assert!(matches!(
            store.get_user(9).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.update_user(9, UserPatch::default()).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_user(9).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.find_by_email("nobody@x.io").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_user_and_ids_are_not_reused() {
        let store = InMemoryStore::new();
        let created = store.create_user(new_user("a@x.io")).await.expect("create");
        store.delete_user(created.id).await.expect("delete");
        assert!(store.get_user(created.id).await.is_err());
        let next = store.create_user(new_user("a@x.io")).await.expect("recreate");
        assert_eq!(next.id, 2);
    }
}
