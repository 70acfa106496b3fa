//! Declarative permission rules.
//!
//! # Purpose
//! A [`PermissionRule`] grants a set of verbs on one canonical route pattern
//! to one or more roles. Rules are plain data; they only take effect once
//! registered with a [`crate::PermissionTableBuilder`].
//!
//! # Key invariants
//! - `resource` is the route template exactly as the router declares it,
//!   placeholders included (`/api/v1/users/:userId`), never a concrete path.
//! - A rule naming several roles is shorthand for one rule per role.
//!
//! # Examples
//! ```rust
//! use usergate_acl::{PermissionRule, Verb};
//!
//! let rule = PermissionRule::new(["user"], "/api/v1/users/me", [Verb::Get, Verb::Delete]);
//! assert_eq!(rule.roles.len(), 1);
//! assert!(rule.permissions.contains(&Verb::Delete));
//! ```
use crate::{AclError, AclResult, Role, Verb};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRule {
    pub roles: BTreeSet<Role>,
    pub resource: String,
    pub permissions: BTreeSet<Verb>,
}

impl PermissionRule {
    pub fn new<R, V>(roles: R, resource: impl Into<String>, permissions: V) -> Self
    where
        R: IntoIterator,
        R::Item: Into<Role>,
        V: IntoIterator<Item = Verb>,
    {
        Self {
            roles: roles.into_iter().map(Into::into).collect(),
            resource: resource.into(),
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Check the rule is well formed before it enters a table.
    ///
    /// # Errors
    /// - [`AclError::InvalidPattern`] if the resource is not an absolute path
    ///   or contains a query string.
    /// - [`AclError::EmptyRoles`] if the rule names no roles.
    /// - [`AclError::InvalidRole`] if a role name is blank.
    pub fn validate(&self) -> AclResult<()> {
        if !self.resource.starts_with('/') || self.resource.contains('?') {
            return Err(AclError::InvalidPattern(self.resource.clone()));
        }
        if self.roles.is_empty() {
            return Err(AclError::EmptyRoles(self.resource.clone()));
        }
        if self.roles.iter().any(|role| role.as_str().trim().is_empty()) {
            return Err(AclError::InvalidRole(self.resource.clone()));
        }
        Ok(())
    }
}

impl std::fmt::Display for PermissionRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let roles: Vec<&str> = self.roles.iter().map(Role::as_str).collect();
        let verbs: Vec<&str> = self.permissions.iter().map(|verb| verb.as_str()).collect();
        write!(
            f,
            "[{}] {} ({})",
            roles.join(","),
            self.resource,
            verbs.join(",")
        )
    }
}
