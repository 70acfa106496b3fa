//! Role and identity types shared by the permission table and the gate.
//!
//! # Purpose
//! Wraps role names so they cannot be confused with resource patterns or user
//! identifiers, and defines the per-request [`Identity`].
//!
//! # Key invariants
//! - Role names are compared exactly; there is no role hierarchy or wildcard.
//! - The guest pseudo-role is an ordinary role. It only reaches resources the
//!   permission table grants to it explicitly.
//!
//! # Examples
//! ```rust
//! use usergate_acl::{Identity, Role};
//!
//! let guest = Identity::guest();
//! assert_eq!(guest.role, Role::guest());
//! assert!(guest.user_id.is_none());
//! ```
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;

pub const GUEST_ROLE: &str = "guest";
pub const USER_ROLE: &str = "user";

/// Role name used as the access-control key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Pseudo-role assigned to requests that carry no credentials.
    pub fn guest() -> Self {
        Self::new(GUEST_ROLE)
    }

    /// Role assigned to every registered account.
    pub fn user() -> Self {
        Self::new(USER_ROLE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_guest(&self) -> bool {
        self.0 == GUEST_ROLE
    }
}

impl Borrow<str> for Role {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Authenticated caller for the lifetime of a single request.
///
/// Produced by the token verifier, or defaulted to [`Identity::guest`] when a
/// request has no credentials. `user_id` is `None` only for guests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: Option<u64>,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: u64, role: Role) -> Self {
        Self {
            user_id: Some(user_id),
            role,
        }
    }

    pub fn guest() -> Self {
        Self {
            user_id: None,
            role: Role::guest(),
        }
    }

    pub fn is_guest(&self) -> bool {
        self.user_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn role_constructors_and_display() {
        assert_eq!(Role::guest().as_str(), "guest");
        assert_eq!(Role::user().to_string(), "user");
        assert!(Role::guest().is_guest());
        assert!(!Role::from("admin").is_guest());
    }

    #[test]
    fn role_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(Role::user(), 1);
        assert_eq!(map.get("user"), Some(&1));
        assert_eq!(map.get("guest"), None);
    }

    #[test]
    fn identity_guest_has_no_user_id() {
        let guest = Identity::guest();
        assert!(guest.is_guest());
        let user = Identity::new(7, Role::user());
        assert!(!user.is_guest());
        assert_eq!(user.user_id, Some(7));
    }

    #[test]
    fn role_serializes_as_plain_string() {
        let json = serde_json::to_string(&Role::user()).expect("serialize");
        assert_eq!(json, "\"user\"");
    }
}
