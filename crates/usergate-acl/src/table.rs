//! Permission table and access decisions.
//!
//! # Purpose
//! Holds the multi-map `(role, resource pattern) -> verbs` assembled from
//! [`PermissionRule`] registrations and answers [`PermissionTable::is_allowed`].
//!
//! # How it fits
//! The service builds one table at startup with [`PermissionTableBuilder`],
//! wraps it in the request gate and shares it read-only across every request.
//!
//! # Key invariants
//! - Registrations are additive: allowing the same `(role, pattern)` twice
//!   unions the verb sets, it never replaces them.
//! - Lookups are exact on the declared pattern. A placeholder like `:userId`
//!   is matched because the caller passes the template, not the concrete path.
//! - Default deny. An absent entry and an absent verb both mean "not allowed";
//!   there is no deny rule.
//! - A built table has no mutation API.
//!
//! # Examples
//! ```rust
//! use usergate_acl::{PermissionRule, PermissionTable, Verb};
//!
//! let table = PermissionTable::builder()
//!     .allow([PermissionRule::new(["guest"], "/api/v1/users", [Verb::Post])])
//!     .build()
//!     .expect("table");
//! assert!(table.is_allowed("guest", "/api/v1/users", Verb::Post));
//! assert!(!table.is_allowed("guest", "/api/v1/users", Verb::Get));
//! ```
use crate::{AclResult, PermissionRule, Role, Verb};
use std::collections::{BTreeSet, HashMap};

/// Collects rules during startup composition.
#[derive(Debug, Default)]
pub struct PermissionTableBuilder {
    rules: Vec<PermissionRule>,
}

impl PermissionTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register rules. Validation is deferred to [`Self::build`].
    pub fn allow(mut self, rules: impl IntoIterator<Item = PermissionRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Validate every registered rule and freeze the table.
    ///
    /// # Errors
    /// - The first [`crate::AclError`] reported by [`PermissionRule::validate`].
    pub fn build(self) -> AclResult<PermissionTable> {
        let mut entries: HashMap<Role, HashMap<String, BTreeSet<Verb>>> = HashMap::new();
        for rule in &self.rules {
            rule.validate()?;
            for role in &rule.roles {
                entries
                    .entry(role.clone())
                    .or_default()
                    .entry(rule.resource.clone())
                    .or_default()
                    .extend(rule.permissions.iter().copied());
            }
        }
        tracing::debug!(
            rules = self.rules.len(),
            roles = entries.len(),
            "permission table built"
        );
        Ok(PermissionTable { entries })
    }
}

#[derive(Debug, Clone, Default)]
pub struct PermissionTable {
    entries: HashMap<Role, HashMap<String, BTreeSet<Verb>>>,
}

impl PermissionTable {
    pub fn builder() -> PermissionTableBuilder {
        PermissionTableBuilder::new()
    }

    /// Decide whether `role` may use `verb` on the declared route `resource`.
    pub fn is_allowed(&self, role: &str, resource: &str, verb: Verb) -> bool {
        self.entries
            .get(role)
            .and_then(|patterns| patterns.get(resource))
            .is_some_and(|verbs| verbs.contains(&verb))
    }

    /// Verbs granted to `role` on `resource`, empty when nothing is granted.
    pub fn permissions(&self, role: &str, resource: &str) -> BTreeSet<Verb> {
        self.entries
            .get(role)
            .and_then(|patterns| patterns.get(resource))
            .cloned()
            .unwrap_or_default()
    }

    /// Roles that may use `verb` on `resource`, sorted.
    pub fn roles_allowed(&self, resource: &str, verb: Verb) -> Vec<&Role> {
        let mut roles: Vec<&Role> = self
            .entries
            .iter()
            .filter(|(_, patterns)| {
                patterns
                    .get(resource)
                    .is_some_and(|verbs| verbs.contains(&verb))
            })
            .map(|(role, _)| role)
            .collect();
        roles.sort();
        roles
    }

    /// Routes no role can reach.
    ///
    /// Used at startup to report declared routes that would be permanently
    /// rejected by the gate.
    pub fn uncovered<'a>(&self, routes: &[(&'a str, Verb)]) -> Vec<(&'a str, Verb)> {
        routes
            .iter()
            .filter(|(resource, verb)| self.roles_allowed(resource, *verb).is_empty())
            .copied()
            .collect()
    }

    /// Number of `(role, pattern)` entries.
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
