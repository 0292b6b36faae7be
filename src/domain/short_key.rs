//! The short key value type.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Number of characters in every short key.
pub const KEY_LENGTH: usize = 5;

/// Characters a short key is drawn from: `A-Z` followed by `a-z`.
pub const ALPHABET: &[u8; 52] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// A well-formed short key: exactly [`KEY_LENGTH`] ASCII letters.
///
/// Holding a `ShortKey` only guarantees the shape; whether a mapping exists
/// for it is a question for the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ShortKey(String);

/// Returned when a string does not have the shape of a short key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("short key must be {KEY_LENGTH} ASCII letters, got {0:?}")]
pub struct InvalidShortKey(pub String);

impl ShortKey {
    /// Builds a key from alphabet indices. Each index is reduced modulo the
    /// alphabet size.
    pub fn from_indices(indices: [usize; KEY_LENGTH]) -> Self {
        let key = indices
            .iter()
            .map(|&i| ALPHABET[i % ALPHABET.len()] as char)
            .collect();
        Self(key)
    }

    /// Returns true if `s` has the shape of a short key.
    pub fn is_well_formed(s: &str) -> bool {
        s.len() == KEY_LENGTH && s.bytes().all(|b| b.is_ascii_alphabetic())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Full public URL for this key under `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.0)
    }
}

impl FromStr for ShortKey {
    type Err = InvalidShortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_well_formed(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidShortKey(s.to_string()))
        }
    }
}

impl fmt::Display for ShortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ShortKey> for String {
    fn from(key: ShortKey) -> Self {
        key.0
    }
}
