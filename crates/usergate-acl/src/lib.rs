//! Access-control primitives for the usergate service.
//!
//! # Purpose
//! Provides the declarative permission table, the access decision, identity
//! tokens and the typed request gate that composes them.
//!
//! # How it fits
//! The service builds a [`PermissionTable`] once at startup, pairs it with a
//! [`TokenVerifier`] in a [`RequestGate`] and runs every routed request
//! through the gate before the handler sees it.
//!
//! # Key invariants
//! - Rules are `(roles, route pattern, verbs)`; registrations are additive.
//! - Decisions are default-deny and never fail with an error.
//! - Tokens are HS256 with a process-wide secret.
//!
//! # Examples
//! ```rust
//! use usergate_acl::{PermissionRule, PermissionTable, Verb};
//!
//! let table = PermissionTable::builder()
//!     .allow([PermissionRule::new(["user"], "/api/v1/users/me", [Verb::Get])])
//!     .build()
//!     .expect("table");
//! assert!(table.is_allowed("user", "/api/v1/users/me", Verb::Get));
//! assert!(!table.is_allowed("user", "/api/v1/users/me", Verb::Put));
//! ```

mod errors;
mod gate;
mod rule;
mod table;
mod token;
mod types;
mod verb;

pub use errors::{AclError, AclResult, AuthError};
pub use gate::{Authenticated, Authorized, Rejection, RequestGate, Unauthenticated};
pub use rule::PermissionRule;
pub use table::{PermissionTable, PermissionTableBuilder};
pub use token::{
    AUTH_SCHEMES, IdentityClaims, MAX_TOKEN_TTL, TokenIssuer, TokenVerifier, bearer_token,
};
pub use types::{GUEST_ROLE, Identity, Role, USER_ROLE};
pub use verb::Verb;
