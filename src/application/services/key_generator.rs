//! Collision-checked short key generation.

use serde_json::json;
use std::sync::Arc;
use tracing::{debug, error};

use crate::domain::repositories::MappingRepository;
use crate::domain::short_key::ShortKey;
use crate::error::AppError;
use crate::utils::key_source::{KeySource, RandomKeySource};

/// Produces short keys that are unused at the time of the check.
///
/// Each attempt samples a candidate from the [`KeySource`] and probes the
/// store with [`MappingRepository::find_by_short`]. After `max_attempts`
/// consecutive collisions generation fails with [`AppError::Exhausted`].
///
/// The check is advisory: a concurrent writer may take the key between the
/// probe and the insert. [`MappingRepository::claim`] reports that case as a
/// conflict and the caller asks for a new key.
#[derive(Clone)]
pub struct KeyGenerator {
    source: Arc<dyn KeySource>,
    max_attempts: u32,
}

impl KeyGenerator {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 100;

    /// Creates a generator backed by the thread-local RNG.
    pub fn new(max_attempts: u32) -> Self {
        Self::with_source(Arc::new(RandomKeySource), max_attempts)
    }

    /// Creates a generator drawing candidates from `source`.
    pub fn with_source(source: Arc<dyn KeySource>, max_attempts: u32) -> Self {
        Self {
            source,
            max_attempts,
        }
    }

    /// Returns a key with no mapping in `repository`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Exhausted`] after `max_attempts` collisions.
    /// Propagates storage errors from the existence checks.
    pub async fn generate<R>(&self, repository: &R) -> Result<ShortKey, AppError>
    where
        R: MappingRepository + ?Sized,
    {
        for attempt in 1..=self.max_attempts {
            let candidate = self.source.next_key();

            if repository
                .find_by_short(candidate.as_str())
                .await?
                .is_none()
            {
                return Ok(candidate);
            }

            metrics::counter!("shortkey_key_collisions_total").increment(1);
            debug!(key = %candidate, attempt, "Short key collision");
        }

        metrics::counter!("shortkey_key_exhausted_total").increment(1);
        error!(
            attempts = self.max_attempts,
            "No unused short key found; key space may be nearly full"
        );

        Err(AppError::exhausted(
            "Failed to generate unique short key",
            json!({ "attempts": self.max_attempts }),
        ))
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Mapping;
    use crate::domain::repositories::MockMappingRepository;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Yields the given keys in order, then repeats the last one.
    struct ScriptedKeys(Mutex<Vec<&'static str>>);

    impl ScriptedKeys {
        fn new(keys: &[&'static str]) -> Arc<Self> {
            let mut keys = keys.to_vec();
            keys.reverse();
            Arc::new(Self(Mutex::new(keys)))
        }
    }

    impl KeySource for ScriptedKeys {
        fn next_key(&self) -> ShortKey {
            let mut keys = self.0.lock().unwrap();
            let key = if keys.len() > 1 {
                keys.pop().unwrap()
            } else {
                keys[0]
            };
            key.parse().unwrap()
        }
    }

    fn taken(short: &str) -> Mapping {
        Mapping::new(1, "https://taken.example".into(), short.into(), Utc::now())
    }

    #[tokio::test]
    async fn test_returns_first_unused_candidate() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_short()
            .withf(|s| s == "AAAAA")
            .times(1)
            .returning(|s| Ok(Some(taken(s))));
        repo.expect_find_by_short()
            .withf(|s| s == "BBBBB")
            .times(1)
            .returning(|_| Ok(None));

        let generator = KeyGenerator::with_source(ScriptedKeys::new(&["AAAAA", "BBBBB"]), 10);
        let key = generator.generate(&repo).await.unwrap();

        assert_eq!(key.as_str(), "BBBBB");
    }

    #[tokio::test]
    async fn test_no_collision_checks_store_once() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_short().times(1).returning(|_| Ok(None));

        let generator = KeyGenerator::default();
        let key = generator.generate(&repo).await.unwrap();

        assert!(ShortKey::is_well_formed(key.as_str()));
    }

    #[tokio::test]
    async fn test_exhausted_after_max_attempts() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_short()
            .times(3)
            .returning(|s| Ok(Some(taken(s))));

        let generator = KeyGenerator::with_source(ScriptedKeys::new(&["AAAAA"]), 3);
        let result = generator.generate(&repo).await;

        assert!(matches!(result, Err(AppError::Exhausted { .. })));
    }

    #[tokio::test]
    async fn test_storage_error_propagates() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_short()
            .times(1)
            .returning(|_| Err(AppError::unavailable("down", json!({}))));

        let generator = KeyGenerator::default();
        let result = generator.generate(&repo).await;

        assert!(matches!(result, Err(AppError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_zero_attempts_is_exhausted() {
        let repo = MockMappingRepository::new();

        let generator = KeyGenerator::new(0);
        let result = generator.generate(&repo).await;

        assert!(matches!(result, Err(AppError::Exhausted { .. })));
    }
}
