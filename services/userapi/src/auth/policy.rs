//! Route permission declarations.
//!
//! # Purpose
//! Collects every `(roles, route, verbs)` rule of the service in one place and
//! builds the immutable [`PermissionTable`] the gate evaluates. Route patterns
//! are shared with the router so a rule and its route cannot drift apart.
//!
//! # Key invariants
//! - Patterns are the exact axum route strings, `:userId` included.
//! - Every gated route has at least one rule; [`GATED_ROUTES`] lists them for
//!   the startup coverage check.
use usergate_acl::{AclResult, GUEST_ROLE, PermissionRule, PermissionTable, USER_ROLE, Verb};

pub const USERS: &str = "/api/v1/users";
pub const USERS_ME: &str = "/api/v1/users/me";
pub const USER_BY_ID: &str = "/api/v1/users/:userId";
pub const TOKEN: &str = "/api/v1/token";
pub const SYSTEM_HEALTH: &str = "/api/v1/system/health";

/// Every `(pattern, verb)` pair mounted behind the gate.
pub const GATED_ROUTES: &[(&str, Verb)] = &[
    (USERS_ME, Verb::Get),
    (USERS_ME, Verb::Delete),
    (USERS, Verb::Post),
    (USER_BY_ID, Verb::Put),
    (TOKEN, Verb::Post),
    (SYSTEM_HEALTH, Verb::Get),
];

/// Build the service's permission table.
///
/// With `registration_enabled == false` the guest rule for `POST /api/v1/users`
/// is left out, so registration is denied with 403 like any unlisted route.
pub fn permission_table(registration_enabled: bool) -> AclResult<PermissionTable> {
    let mut builder = PermissionTable::builder()
        .allow([
            PermissionRule::new([USER_ROLE], USERS_ME, [Verb::Get, Verb::Delete]),
            PermissionRule::new([USER_ROLE], USER_BY_ID, [Verb::Put]),
        ])
        .allow([
            PermissionRule::new([GUEST_ROLE], TOKEN, [Verb::Post]),
            PermissionRule::new([GUEST_ROLE, USER_ROLE], SYSTEM_HEALTH, [Verb::Get]),
        ]);
    if registration_enabled {
        builder = builder.allow([PermissionRule::new([GUEST_ROLE], USERS, [Verb::Post])]);
    }
    builder.build()
}
