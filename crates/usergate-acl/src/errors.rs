use thiserror::Error;

#[derive(Debug, Error)]
pub enum AclError {
    #[error("invalid resource pattern: {0}")]
    InvalidPattern(String),
    #[error("rule for {0} names no roles")]
    EmptyRoles(String),
    #[error("invalid role name for {0}")]
    InvalidRole(String),
    #[error("token lifetime of {0}s is out of range")]
    TokenLifetime(u64),
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

pub type AclResult<T> = Result<T, AclError>;

/// Credential verification failure.
///
/// `Missing` covers absent credentials and headers that are not in the
/// `<scheme> <token>` shape; the gate treats it as a guest request. `Invalid`
/// covers everything that looked like a token but did not verify.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing credentials")]
    Missing,
    #[error("invalid token: {0}")]
    Invalid(#[from] jsonwebtoken::errors::Error),
}
