//! Bearer credential value type.

use serde::{Deserialize, Serialize};

/// An explicit bearer credential for hosted inference.
///
/// The remote generator checks for the *presence* of a token at its
/// boundary; a `None` or blank token short-circuits to a user-facing
/// warning instead of a request. Whether a present token is actually
/// accepted is decided by the backend.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A whitespace-only token counts as absent.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for BearerToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for BearerToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

// Never print the secret.
impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BearerToken(****)")
    }
}
