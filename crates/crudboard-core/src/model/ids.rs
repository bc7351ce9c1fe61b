// ── Identity types ──
//
// `RecordId` is the server-assigned identity. `LocalKey` names a row the
// server has not confirmed yet. `RecordKey` unifies both so rows, edits,
// and in-flight operations can be keyed uniformly.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── RecordId ────────────────────────────────────────────────────────

/// Server-assigned entity id.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<u64> for RecordId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

// ── LocalKey ────────────────────────────────────────────────────────

/// Temporary key for a row created locally and not yet confirmed.
///
/// Never sent to the server and never mistaken for a `RecordId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalKey(Uuid);

impl LocalKey {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LocalKey {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LocalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "local:{}", self.0)
    }
}

// ── RecordKey ───────────────────────────────────────────────────────

/// Row identity: confirmed server id or pending local key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKey {
    Server(RecordId),
    Local(LocalKey),
}

impl RecordKey {
    pub fn server_id(self) -> Option<RecordId> {
        match self {
            Self::Server(id) => Some(id),
            Self::Local(_) => None,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server(id) => write!(f, "{id}"),
            Self::Local(key) => write!(f, "{key}"),
        }
    }
}

impl From<RecordId> for RecordKey {
    fn from(id: RecordId) -> Self {
        Self::Server(id)
    }
}

impl From<LocalKey> for RecordKey {
    fn from(key: LocalKey) -> Self {
        Self::Local(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_parses_trimmed_input() {
        assert_eq!(" 42 ".parse::<RecordId>().ok(), Some(RecordId::new(42)));
        assert!("abc".parse::<RecordId>().is_err());
    }

    #[test]
    fn local_keys_are_unique() {
        assert_ne!(LocalKey::new(), LocalKey::new());
    }

    #[test]
    fn keys_of_different_kinds_never_collide() {
        let server = RecordKey::from(RecordId::new(7));
        let local = RecordKey::from(LocalKey::new());
        assert_ne!(server, local);
        assert_eq!(server.server_id(), Some(RecordId::new(7)));
        assert_eq!(local.server_id(), None);
        assert!(local.to_string().starts_with("local:"));
    }
}
