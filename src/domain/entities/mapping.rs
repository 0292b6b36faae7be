//! Mapping entity: a stored (long URL, short key) pair.

use chrono::{DateTime, Utc};

use crate::domain::short_key::ShortKey;

/// A stored mapping between a long URL and its short key.
///
/// `id` is internal identity and is never rendered to visitors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub id: i64,
    pub long: String,
    pub short: String,
    pub created_at: DateTime<Utc>,
}

impl Mapping {
    /// Creates a new Mapping instance.
    pub fn new(id: i64, long: String, short: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            long,
            short,
            created_at,
        }
    }
}

/// Input data for inserting a new mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMapping {
    pub long: String,
    pub short: ShortKey,
}

impl NewMapping {
    pub fn new(long: impl Into<String>, short: ShortKey) -> Self {
        Self {
            long: long.into(),
            short,
        }
    }
}

/// Outcome of an atomic check-and-insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// No mapping existed for the long URL; this row was inserted.
    Created(Mapping),
    /// A mapping for the long URL already existed; nothing was written.
    Existing(Mapping),
}

impl Claim {
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn into_mapping(self) -> Mapping {
        match self {
            Self::Created(m) | Self::Existing(m) => m,
        }
    }
}
