//! Peer identity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::message::MAX_DATAGRAM_LEN;
use crate::error::{CoreError, Result};

/// Longest identity that still fits behind the `READY ` tag in one datagram.
const MAX_IDENTITY_LEN: usize = MAX_DATAGRAM_LEN - "READY ".len();

/// Identity of a barrier participant, usually its hostname.
///
/// Identities compare by exact string match. No case folding or trailing-dot
/// normalization is applied, so `node-a` and `NODE-A.` are different peers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeerId(String);

impl PeerId {
    /// Validate and wrap an identity.
    ///
    /// Identities must be non-empty, free of whitespace (the wire format is
    /// whitespace separated) and short enough to fit in a single datagram.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(CoreError::EmptyIdentity);
        }
        if id.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidIdentity(id));
        }
        if id.len() > MAX_IDENTITY_LEN {
            return Err(CoreError::IdentityTooLong {
                len: id.len(),
                max: MAX_IDENTITY_LEN,
            });
        }
        Ok(Self(id))
    }

    /// The identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PeerId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for PeerId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<PeerId> for String {
    fn from(id: PeerId) -> Self {
        id.0
    }
}

impl AsRef<str> for PeerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
