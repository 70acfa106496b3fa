//! Service configuration.
//!
//! Values come from `USERGATE_*` environment variables with defaults, and may
//! be overridden by a YAML file named in `USERGATE_CONFIG`.
use anyhow::{Context, Result};
use rand::RngCore;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::net::SocketAddr;
use std::time::Duration;
use usergate_acl::MAX_TOKEN_TTL;

pub const DEFAULT_ISSUER: &str = "usergate";

#[derive(Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub token_ttl: Duration,
    /// Clock skew tolerated when checking `exp`, in seconds.
    pub token_leeway_secs: u64,
    pub registration_enabled: bool,
}

// Keeps the signing secret out of logs.
impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("bind_addr", &self.bind_addr)
            .field("metrics_bind", &self.metrics_bind)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_issuer", &self.jwt_issuer)
            .field("token_ttl", &self.token_ttl)
            .field("token_leeway_secs", &self.token_leeway_secs)
            .field("registration_enabled", &self.registration_enabled)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ServiceConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    jwt_secret: Option<String>,
    jwt_issuer: Option<String>,
    token_ttl_secs: Option<u64>,
    token_leeway_secs: Option<u64>,
    registration_enabled: Option<bool>,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("USERGATE_BIND")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .with_context(|| "parse USERGATE_BIND")?;
        let metrics_bind = std::env::var("USERGATE_METRICS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:9090".to_string())
            .parse()
            .with_context(|| "parse USERGATE_METRICS_BIND")?;
        let jwt_secret = match std::env::var("USERGATE_JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!(
                    "USERGATE_JWT_SECRET not set; using a random secret, tokens will not survive a restart"
                );
                random_secret()
            }
        };
        let jwt_issuer =
            std::env::var("USERGATE_JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string());
        let token_ttl_secs = std::env::var("USERGATE_TOKEN_TTL_SECS")
            .unwrap_or_else(|_| "86400".to_string())
            .parse::<u64>()
            .with_context(|| "parse USERGATE_TOKEN_TTL_SECS")?;
        let token_leeway_secs = std::env::var("USERGATE_TOKEN_LEEWAY_SECS")
            .unwrap_or_else(|_| "5".to_string())
            .parse()
            .with_context(|| "parse USERGATE_TOKEN_LEEWAY_SECS")?;
        let registration_enabled = std::env::var("USERGATE_REGISTRATION_ENABLED")
            .map(|value| parse_bool(&value))
            .unwrap_or(Ok(true))
            .with_context(|| "parse USERGATE_REGISTRATION_ENABLED")?;
        let config = Self {
            bind_addr,
            metrics_bind,
            jwt_secret,
            jwt_issuer,
            token_ttl: Duration::from_secs(token_ttl_secs),
            token_leeway_secs,
            registration_enabled,
        };
        config
            .check_token_bounds()
            .with_context(|| "check USERGATE_TOKEN_TTL_SECS / USERGATE_TOKEN_LEEWAY_SECS")?;
        Ok(config)
    }

    /// TTL must lie in `1..=MAX_TOKEN_TTL` and the leeway may not exceed it.
    pub fn check_token_bounds(&self) -> Result<()> {
        let ttl = self.token_ttl.as_secs();
        anyhow::ensure!(
            (1..=MAX_TOKEN_TTL.as_secs()).contains(&ttl),
            "token ttl of {ttl}s is outside 1..={}s",
            MAX_TOKEN_TTL.as_secs()
        );
        anyhow::ensure!(
            self.token_leeway_secs <= ttl,
            "token leeway of {}s exceeds the token ttl of {ttl}s",
            self.token_leeway_secs
        );
        Ok(())
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("USERGATE_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read USERGATE_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        Ok(config)
    }

    fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: ServiceConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse usergate config yaml")?;
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = override_cfg.jwt_secret {
            self.jwt_secret = value;
        }
        if let Some(value) = override_cfg.jwt_issuer {
            self.jwt_issuer = value;
        }
        if let Some(value) = override_cfg.token_ttl_secs {
            self.token_ttl = Duration::from_secs(value);
        }
        if let Some(value) = override_cfg.token_leeway_secs {
            self.token_leeway_secs = value;
        }
        if let Some(value) = override_cfg.registration_enabled {
            self.registration_enabled = value;
        }
        self.check_token_bounds()
            .with_context(|| "check token_ttl_secs / token_leeway_secs")
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got {other:?}"),
    }
}

fn random_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
