//! Per-request authentication and authorization pipeline.
//!
//! # Purpose
//! Models the gate as three typed states so a handler can only be reached
//! with an [`Authorized`] value:
//!
//! ```text
//! Unauthenticated --authenticate--> Authenticated --authorize--> Authorized
//!        |                                |
//!        +-------------> Rejection <------+
//! ```
//!
//! # Key invariants
//! - Missing credentials authenticate as the guest pseudo-identity.
//! - Credentials that fail verification are rejected before any permission
//!   lookup, whatever the table says about the resource.
//! - Authorization consults the permission table only; resource ownership
//!   (for example `:userId` matching the caller) is the handler's concern.
//!
//! # Examples
//! ```rust
//! use usergate_acl::{PermissionRule, PermissionTable, RequestGate, TokenVerifier, Verb};
//!
//! let table = PermissionTable::builder()
//!     .allow([PermissionRule::new(["guest"], "/api/v1/users", [Verb::Post])])
//!     .build()
//!     .expect("table");
//! let gate = RequestGate::new(TokenVerifier::new(b"secret", "usergate", 0), table);
//! let authorized = gate.evaluate(None, "/api/v1/users", Verb::Post).expect("guest may register");
//! assert!(authorized.identity().is_guest());
//! ```
use crate::{AuthError, Identity, PermissionTable, Role, TokenVerifier, Verb};
use thiserror::Error;

/// Why a request was stopped at the gate.
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("authentication failed: {0}")]
    Unauthenticated(#[source] AuthError),
    #[error("role {role} may not {verb} {resource}")]
    Forbidden {
        role: Role,
        resource: String,
        verb: Verb,
    },
}

impl Rejection {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            Rejection::Unauthenticated(_) => "unauthenticated",
            Rejection::Forbidden { .. } => "forbidden",
        }
    }
}

/// Request as it arrives: only the raw `Authorization` header is known.
#[derive(Debug, Clone, Copy)]
pub struct Unauthenticated<'a> {
    authorization: Option<&'a str>,
}

impl<'a> Unauthenticated<'a> {
    pub fn new(authorization: Option<&'a str>) -> Self {
        Self { authorization }
    }

    pub fn authenticate(self, verifier: &TokenVerifier) -> Result<Authenticated, Rejection> {
        match verifier.verify_header(self.authorization) {
            Ok(identity) => Ok(Authenticated { identity }),
            Err(AuthError::Missing) => Ok(Authenticated {
                identity: Identity::guest(),
            }),
            Err(err) => Err(Rejection::Unauthenticated(err)),
        }
    }
}

/// Caller identity is known (possibly guest); permissions not yet checked.
#[derive(Debug, Clone)]
pub struct Authenticated {
    identity: Identity,
}

impl Authenticated {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn authorize(
        self,
        table: &PermissionTable,
        resource: &str,
        verb: Verb,
    ) -> Result<Authorized, Rejection> {
        if table.is_allowed(self.identity.role.as_str(), resource, verb) {
            Ok(Authorized {
                identity: self.identity,
            })
        } else {
            Err(Rejection::Forbidden {
                role: self.identity.role,
                resource: resource.to_string(),
                verb,
            })
        }
    }

    /// Reject without a table lookup, for requests whose verb or route the
    /// gate cannot name.
    pub fn deny(self, resource: &str, verb: Verb) -> Rejection {
        Rejection::Forbidden {
            role: self.identity.role,
            resource: resource.to_string(),
            verb,
        }
    }
}

/// Terminal success: the handler may run with this identity.
#[derive(Debug, Clone)]
pub struct Authorized {
    identity: Identity,
}

impl Authorized {
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn into_identity(self) -> Identity {
        self.identity
    }
}

/// The immutable pieces every request is checked against.
pub struct RequestGate {
    verifier: TokenVerifier,
    table: PermissionTable,
}

impl RequestGate {
    pub fn new(verifier: TokenVerifier, table: PermissionTable) -> Self {
        Self { verifier, table }
    }

    pub fn table(&self) -> &PermissionTable {
        &self.table
    }

    pub fn authenticate(&self, authorization: Option<&str>) -> Result<Authenticated, Rejection> {
        Unauthenticated::new(authorization).authenticate(&self.verifier)
    }

    pub fn authorize(
        &self,
        authenticated: Authenticated,
        resource: &str,
        verb: Verb,
    ) -> Result<Authorized, Rejection> {
        authenticated.authorize(&self.table, resource, verb)
    }

    /// Run the whole pipeline for one request.
    pub fn evaluate(
        &self,
        authorization: Option<&str>,
        resource: &str,
        verb: Verb,
    ) -> Result<Authorized, Rejection> {
        let authenticated = self.authenticate(authorization)?;
        self.authorize(authenticated, resource, verb)
    }
}
