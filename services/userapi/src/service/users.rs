use super::password::{hash_password, verify_password};
use super::{ServiceError, ServiceResult};
use crate::model::{NewUser, User, UserPatch, UserProfile};
use crate::store::{StoreError, UserStore};
use std::sync::Arc;
use usergate_acl::{Identity, Role};

/// Input for a new account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Fields a user may change on their own record. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    pub async fn find_by_id(&self, id: u64) -> ServiceResult<User> {
        Ok(self.store.get_user(id).await?)
    }

    pub async fn create(&self, registration: Registration) -> ServiceResult<User> {
        let name = validate_name(&registration.name)?;
        let email = validate_email(&registration.email)?;
        validate_password(&registration.password)?;
        let password_hash = hash_password(&registration.password).map_err(ServiceError::Store)?;
        let user = self
            .store
            .create_user(NewUser {
                name,
                email,
                password_hash,
                role: Role::user(),
            })
            .await?;
        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }

    /// Apply `changes` to user `id` on behalf of `acting`.
    ///
    /// # Errors
    /// - `Forbidden` when `acting` is not user `id`.
    /// - `Validation` for a blank name, malformed email or empty password.
    /// - `NotFound` / `Conflict` from the store.
    pub async fn edit(
        &self,
        id: u64,
        changes: ProfileChanges,
        acting: &Identity,
    ) -> ServiceResult<UserProfile> {
        if acting.user_id != Some(id) {
            tracing::info!(
                acting = ?acting.user_id,
                target = id,
                "edit of another user's record refused"
            );
            return Err(ServiceError::Forbidden(
                "users may only edit their own record".to_string(),
            ));
        }
        let patch = UserPatch {
            name: changes.name.as_deref().map(validate_name).transpose()?,
            email: changes.email.as_deref().map(validate_email).transpose()?,
            password_hash: match changes.password.as_deref() {
                Some(password) => {
                    validate_password(password)?;
                    Some(hash_password(password).map_err(ServiceError::Store)?)
                }
                None => None,
            },
        };
        let user = if patch.is_empty() {
            self.store.get_user(id).await?
        } else {
            self.store.update_user(id, patch).await?
        };
        Ok(user.into())
    }

    pub async fn destroy(&self, id: u64) -> ServiceResult<()> {
        self.store.delete_user(id).await?;
        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }

    /// Check an email/password pair. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<User> {
        let user = match self.store.find_by_email(email.trim()).await {
            Ok(user) => user,
            Err(StoreError::NotFound(_)) => return Err(ServiceError::Credentials),
            Err(err) => return Err(err.into()),
        };
        if verify_password(password, &user.password) {
            Ok(user)
        } else {
            Err(ServiceError::Credentials)
        }
    }
}

fn validate_name(name: &str) -> ServiceResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::Validation("name must not be empty".to_string()));
    }
    Ok(name.to_string())
}

fn validate_email(email: &str) -> ServiceResult<String> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(email.to_string())
        }
        _ => Err(ServiceError::Validation(format!("invalid email: {email}"))),
    }
}

fn validate_password(password: &str) -> ServiceResult<()> {
    if password.is_empty() {
        return Err(ServiceError::Validation(
            "password must not be empty".to_string(),
        ));
    }
    Ok(())
}
