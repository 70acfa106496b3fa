//! Identity tokens: minting and verification.
//!
//! # Purpose
//! Signs and verifies the HS256 JWTs that carry a caller's `{ id, role }`,
//! and parses the `Authorization: <scheme> <token>` header.
//!
//! # Key invariants
//! - Only HS256 is accepted; tokens signed with any other algorithm are invalid.
//! - `exp` and `iss` are mandatory and validated with a configurable leeway.
//! - Verification is a pure function of the token and the process-wide secret.
//!
//! # Security
//! - Never log raw tokens or the secret.
use crate::{AclError, AclResult, AuthError, Identity, Role};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Schemes accepted in the `Authorization` header, matched case-insensitively.
pub const AUTH_SCHEMES: [&str; 2] = ["JWT", "Bearer"];

/// Longest token lifetime, and largest verification leeway, the crate
/// accepts: ten years.
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub iss: String,
    pub id: u64,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

pub struct TokenIssuer {
    issuer: String,
    ttl: Duration,
    encoding_key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], issuer: impl Into<String>, ttl: Duration) -> Self {
        Self {
            issuer: issuer.into(),
            ttl,
            encoding_key: EncodingKey::from_secret(secret),
        }
    }

    pub fn mint(&self, user_id: u64, role: &Role) -> AclResult<String> {
        let now = now_epoch_seconds();
        let exp = i64::try_from(self.ttl.as_secs())
            .ok()
            .filter(|_| self.ttl <= MAX_TOKEN_TTL)
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or(AclError::TokenLifetime(self.ttl.as_secs()))?;
        let claims = IdentityClaims {
            iss: self.issuer.clone(),
            id: user_id,
            role: role.clone(),
            iat: now,
            exp,
        };
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

pub struct TokenVerifier {
    issuer: String,
    leeway: u64,
    decoding_key: DecodingKey,
}

impl TokenVerifier {
    /// `leeway` is capped at [`MAX_TOKEN_TTL`] seconds.
    pub fn new(secret: &[u8], issuer: impl Into<String>, leeway: u64) -> Self {
        Self {
            issuer: issuer.into(),
            leeway: leeway.min(MAX_TOKEN_TTL.as_secs()),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Verify a raw token and return the identity it carries.
    ///
    /// # Errors
    /// - [`AuthError::Missing`] for an empty token.
    /// - [`AuthError::Invalid`] for bad signatures, expired or malformed
    ///   tokens, a foreign issuer or a non-HS256 algorithm.
    pub fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Missing);
        }
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.leeway = self.leeway;
        let data = jsonwebtoken::decode::<IdentityClaims>(token, &self.decoding_key, &validation)?;
        Ok(Identity::new(data.claims.id, data.claims.role))
    }

    /// Verify the value of an `Authorization` header.
    ///
    /// An absent header, a header without a recognised scheme or a header with
    /// no token is [`AuthError::Missing`].
    pub fn verify_header(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        let token = header.and_then(bearer_token).ok_or(AuthError::Missing)?;
        self.verify(token)
    }
}

/// Extract the token from `<scheme> <token>`.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !AUTH_SCHEMES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(scheme))
    {
        return None;
    }
    let token = token.trim();
    if token.is_empty() { None } else { Some(token) }
}

fn now_epoch_seconds() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_else(|_| Duration::from_secs(0))
        .as_secs() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-test-secret-test-sec";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, "usergate", Duration::from_secs(600))
    }

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(SECRET, "usergate", 0)
    }

    fn encode(claims: &IdentityClaims, alg: Algorithm, secret: &[u8]) -> String {
        jsonwebtoken::encode(&Header::new(alg), claims, &EncodingKey::from_secret(secret))
            .expect("encode token")
    }

    #[test]
    fn mint_and_verify_carries_identity() {
        let token = issuer().mint(1, &Role::user()).expect("mint");
        let identity = verifier().verify(&token).expect("verify");
        assert_eq!(identity, Identity::new(1, Role::user()));
    }

    #[test]
    fn verify_header_accepts_known_schemes() {
        let token = issuer().mint(3, &Role::user()).expect("mint");
        for scheme in ["JWT", "Bearer", "bearer", "jwt"] {
            let header = format!("{scheme} {token}");
            let identity = verifier().verify_header(Some(&header)).expect("verify");
            assert_eq!(identity.user_id, Some(3));
        }
    }

    #[test]
    fn verify_header_missing_or_malformed_is_missing() {
        let token = issuer().mint(3, &Role::user()).expect("mint");
        let cases = [
            None,
            Some(""),
            Some("Bearer"),
            Some("Bearer   "),
            Some(token.as_str()),
        ];
        for header in cases {
            let err = verifier().verify_header(header).expect_err("missing");
            assert!(matches!(err, AuthError::Missing), "{header:?}");
        }
        let basic = format!("Basic {token}");
        assert!(matches!(
            verifier().verify_header(Some(&basic)),
            Err(AuthError::Missing)
        ));
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let other = TokenIssuer::new(b"another-secret", "usergate", Duration::from_secs(600));
        let token = other.mint(1, &Role::user()).expect("mint");
        assert!(matches!(verifier().verify(&token), Err(AuthError::Invalid(_))));
    }

    #[test]
    fn verify_rejects_expired_token() {
        let now = now_epoch_seconds();
        let claims = IdentityClaims {
            iss: "usergate".to_string(),
            id: 1,
            role: Role::user(),
            iat: now - 120,
            exp: now - 60,
        };
        let token = encode(&claims, Algorithm::HS256, SECRET);
        assert!(matches!(verifier().verify(&token), Err(AuthError::Invalid(_))));
    }

    #[test]
    fn verify_leeway_tolerates_small_skew() {
        let now = now_epoch_seconds();
        let claims = IdentityClaims {
            iss: "usergate".to_string(),
            id: 1,
            role: Role::user(),
            iat: now - 120,
            exp: now - 2,
        };
        let token = encode(&claims, Algorithm::HS256, SECRET);
        let lenient = TokenVerifier::new(SECRET, "usergate", 60);
        assert!(lenient.verify(&token).is_ok());
    }

    #[test]
    fn verify_rejects_foreign_issuer_and_algorithm() {
        let now = now_epoch_seconds();
        let claims = IdentityClaims {
            iss: "someone-else".to_string(),
            id: 1,
            role: Role::user(),
            iat: now,
            exp: now + 600,
        };
        let token = encode(&claims, Algorithm::HS256, SECRET);
        assert!(matches!(verifier().verify(&token), Err(AuthError::Invalid(_))));

        let claims = IdentityClaims {
            iss: "usergate".to_string(),
            ..claims
        };
        let token = encode(&claims, Algorithm::HS512, SECRET);
        assert!(matches!(verifier().verify(&token), Err(AuthError::Invalid(_))));
    }

    #[test]
    fn mint_rejects_lifetimes_beyond_the_maximum() {
        for ttl in [
            MAX_TOKEN_TTL + Duration::from_secs(1),
            Duration::from_secs(i64::MAX as u64),
            Duration::from_secs(u64::MAX),
        ] {
            let err = TokenIssuer::new(SECRET, "usergate", ttl)
                .mint(1, &Role::user())
                .expect_err("ttl out of range");
            assert!(matches!(err, AclError::TokenLifetime(_)));
        }
        let token = TokenIssuer::new(SECRET, "usergate", MAX_TOKEN_TTL)
            .mint(1, &Role::user())
            .expect("mint");
        assert!(verifier().verify(&token).is_ok());
    }

    #[test]
    fn huge_leeway_is_capped() {
        let token = issuer().mint(4, &Role::user()).expect("mint");
        let lenient = TokenVerifier::new(SECRET, "usergate", u64::MAX);
        assert_eq!(lenient.leeway, MAX_TOKEN_TTL.as_secs());
        assert_eq!(lenient.verify(&token).expect("verify").user_id, Some(4));
    }

    #[test]
    fn verify_rejects_garbage() {
        assert!(matches!(
            verifier().verify("xyz.abc.123"),
            Err(AuthError::Invalid(_))
        ));
        assert!(matches!(verifier().verify(""), Err(AuthError::Missing)));
    }
}
