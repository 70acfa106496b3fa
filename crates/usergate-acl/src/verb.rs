//! HTTP verbs as permission-table entries.
//!
//! # Purpose
//! Names the methods a [`crate::PermissionRule`] can grant, so rules and
//! lookups compare a closed enum rather than method strings.
//!
//! # Key invariants
//! - Parsing is case-insensitive; display is always uppercase.
//! - [`Verb::ALL`] lists every variant once.
use serde::{Deserialize, Serialize};

/// HTTP verb a permission rule grants.
///
/// Verbs parse case-insensitively so declarations can use either `get` or
/// `GET`; they always render upper-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verb {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Connect,
    Trace,
}

impl Verb {
    pub const ALL: [Verb; 9] = [
        Verb::Get,
        Verb::Head,
        Verb::Post,
        Verb::Put,
        Verb::Patch,
        Verb::Delete,
        Verb::Options,
        Verb::Connect,
        Verb::Trace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Head => "HEAD",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
            Verb::Options => "OPTIONS",
            Verb::Connect => "CONNECT",
            Verb::Trace => "TRACE",
        }
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Verb {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Verb::ALL
            .into_iter()
            .find(|verb| verb.as_str().eq_ignore_ascii_case(value))
            .ok_or(())
    }
}
