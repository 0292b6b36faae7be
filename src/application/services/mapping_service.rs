//! Submit and resolve workflows over the mapping store.

use serde_json::json;
use std::sync::Arc;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{FixedInterval, jitter};
use tracing::{debug, info, warn};

use crate::application::services::KeyGenerator;
use crate::domain::entities::{Claim, Mapping, NewMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;

/// Additional claim attempts after a short key conflict.
const CONFLICT_RETRIES: usize = 2;

/// Base pause between conflict retries, before jitter.
const CONFLICT_BACKOFF_MS: u64 = 5;

/// Service for shortening long URLs and resolving short keys.
///
/// # Idempotence
///
/// Submitting a long URL that already has a mapping returns that mapping;
/// no key is generated and no row is written.
///
/// # Concurrency
///
/// The lookup-then-insert runs through [`MappingRepository::claim`], which is
/// atomic per long URL, so concurrent submissions of the same URL end up with
/// one row and one key. A short key taken by a concurrent writer between
/// generation and insert surfaces as [`AppError::Conflict`] and is retried
/// with a fresh key up to two more times.
pub struct MappingService<R: MappingRepository + ?Sized> {
    repository: Arc<R>,
    generator: KeyGenerator,
}

impl<R: MappingRepository + ?Sized> MappingService<R> {
    /// Creates a new mapping service.
    pub fn new(repository: Arc<R>, generator: KeyGenerator) -> Self {
        Self {
            repository,
            generator,
        }
    }

    /// Returns the mapping for `long_url`, creating it if needed.
    ///
    /// `long_url` is stored and matched verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Exhausted`] if no unused key could be found or
    /// every retry lost a conflict.
    /// Returns [`AppError::Unavailable`] on storage errors.
    pub async fn submit(&self, long_url: &str) -> Result<Mapping, AppError> {
        if let Some(existing) = self.repository.find_by_long(long_url).await? {
            debug!(short = %existing.short, "Long URL already mapped");
            return Ok(existing);
        }

        let strategy = FixedInterval::from_millis(CONFLICT_BACKOFF_MS)
            .map(jitter)
            .take(CONFLICT_RETRIES);

        let mut conflicts = 0usize;
        let claim = RetryIf::start(
            strategy,
            || self.allocate(long_url),
            |e: &AppError| {
                if !e.is_conflict() {
                    return false;
                }
                conflicts += 1;
                metrics::counter!("shortkey_claim_conflicts_total").increment(1);
                debug!(conflicts, "Short key taken by a concurrent writer");
                true
            },
        )
        .await;

        match claim {
            Ok(Claim::Created(mapping)) => {
                metrics::counter!("shortkey_mappings_created_total").increment(1);
                info!(id = mapping.id, short = %mapping.short, "Mapping created");
                Ok(mapping)
            }
            Ok(Claim::Existing(mapping)) => {
                debug!(short = %mapping.short, "Concurrent submission created the mapping first");
                Ok(mapping)
            }
            Err(e) if e.is_conflict() => {
                warn!(conflicts, "Giving up after repeated short key conflicts");
                Err(AppError::exhausted(
                    "Failed to store mapping after repeated key conflicts",
                    json!({ "attempts": CONFLICT_RETRIES + 1, "conflicts": conflicts }),
                ))
            }
            Err(e) => Err(e),
        }
    }

    /// Looks up the mapping for a short key.
    ///
    /// A miss is `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] on storage errors.
    pub async fn resolve(&self, short: &str) -> Result<Option<Mapping>, AppError> {
        let mapping = self.repository.find_by_short(short).await?;
        if mapping.is_none() {
            debug!(short, "Short key not found");
        }
        Ok(mapping)
    }

    /// Lists mappings, newest first.
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Mapping>, AppError> {
        self.repository.list(limit, offset).await
    }

    /// Counts stored mappings.
    pub async fn count(&self) -> Result<i64, AppError> {
        self.repository.count().await
    }

    /// Verifies the store is reachable.
    pub async fn check_storage(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    /// Generates a fresh key and claims it for `long_url`.
    async fn allocate(&self, long_url: &str) -> Result<Claim, AppError> {
        let key = self.generator.generate(self.repository.as_ref()).await?;
        self.repository
            .claim(NewMapping::new(long_url, key))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockMappingRepository;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn create_test_mapping(id: i64, long: &str, short: &str) -> Mapping {
        Mapping::new(id, long.to_string(), short.to_string(), Utc::now())
    }

    fn service(repo: MockMappingRepository) -> MappingService<MockMappingRepository> {
        MappingService::new(Arc::new(repo), KeyGenerator::default())
    }

    #[tokio::test]
    async fn test_submit_creates_mapping() {
        let mut repo = MockMappingRepository::new();

        repo.expect_find_by_long()
            .withf(|long| long == "https://example.com/a")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_find_by_short().times(1).returning(|_| Ok(None));
        repo.expect_claim()
            .withf(|nm| nm.long == "https://example.com/a")
            .times(1)
            .returning(|nm| {
                Ok(Claim::Created(create_test_mapping(
                    1,
                    &nm.long,
                    nm.short.as_str(),
                )))
            });

        let mapping = service(repo).submit("https://example.com/a").await.unwrap();

        assert_eq!(mapping.long, "https://example.com/a");
        assert_eq!(mapping.short.len(), 5);
    }

    #[tokio::test]
    async fn test_submit_existing_long_skips_generation() {
        let mut repo = MockMappingRepository::new();

        let existing = create_test_mapping(7, "https://example.com/a", "aZbQk");
        repo.expect_find_by_long()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_find_by_short().times(0);
        repo.expect_claim().times(0);
        repo.expect_insert().times(0);

        let mapping = service(repo).submit("https://example.com/a").await.unwrap();

        assert_eq!(mapping.id, 7);
        assert_eq!(mapping.short, "aZbQk");
    }

    #[tokio::test]
    async fn test_submit_does_not_normalize() {
        let mut repo = MockMappingRepository::new();

        repo.expect_find_by_long()
            .withf(|long| long == "HTTPS://Example.com/a/")
            .times(1)
            .returning(|_| Ok(None));
        repo.expect_find_by_short().returning(|_| Ok(None));
        repo.expect_claim()
            .withf(|nm| nm.long == "HTTPS://Example.com/a/")
            .times(1)
            .returning(|nm| {
                Ok(Claim::Created(create_test_mapping(
                    1,
                    &nm.long,
                    nm.short.as_str(),
                )))
            });

        let result = service(repo).submit("HTTPS://Example.com/a/").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_submit_lost_race_returns_winner() {
        let mut repo = MockMappingRepository::new();

        repo.expect_find_by_long().times(1).returning(|_| Ok(None));
        repo.expect_find_by_short().returning(|_| Ok(None));
        let winner = create_test_mapping(3, "https://example.com/a", "Winnr");
        repo.expect_claim()
            .times(1)
            .returning(move |_| Ok(Claim::Existing(winner.clone())));

        let mapping = service(repo).submit("https://example.com/a").await.unwrap();

        assert_eq!(mapping.short, "Winnr");
    }

    #[tokio::test]
    async fn test_submit_retries_on_conflict() {
        let mut repo = MockMappingRepository::new();

        repo.expect_find_by_long().times(1).returning(|_| Ok(None));
        repo.expect_find_by_short().times(3).returning(|_| Ok(None));

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        repo.expect_claim().times(3).returning(move |nm| {
            if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(AppError::conflict("taken", json!({})))
            } else {
                Ok(Claim::Created(create_test_mapping(
                    9,
                    &nm.long,
                    nm.short.as_str(),
                )))
            }
        });

        let mapping = service(repo).submit("https://example.com/a").await.unwrap();

        assert_eq!(mapping.id, 9);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_submit_conflicts_escalate_to_exhausted() {
        let mut repo = MockMappingRepository::new();

        repo.expect_find_by_long().times(1).returning(|_| Ok(None));
        repo.expect_find_by_short().returning(|_| Ok(None));
        repo.expect_claim()
            .times(CONFLICT_RETRIES + 1)
            .returning(|_| Err(AppError::conflict("taken", json!({}))));

        let result = service(repo).submit("https://example.com/a").await;

        match result {
            Err(AppError::Exhausted { details, .. }) => {
                assert_eq!(details["attempts"], CONFLICT_RETRIES + 1);
                assert_eq!(details["conflicts"], CONFLICT_RETRIES + 1);
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_submit_storage_error_is_not_retried() {
        let mut repo = MockMappingRepository::new();

        repo.expect_find_by_long().times(1).returning(|_| Ok(None));
        repo.expect_find_by_short().times(1).returning(|_| Ok(None));
        repo.expect_claim()
            .times(1)
            .returning(|_| Err(AppError::unavailable("down", json!({}))));

        let result = service(repo).submit("https://example.com/a").await;

        assert!(matches!(result, Err(AppError::Unavailable { .. })));
    }

    #[tokio::test]
    async fn test_resolve_hit() {
        let mut repo = MockMappingRepository::new();

        let mapping = create_test_mapping(1, "https://example.com/a", "aZbQk");
        repo.expect_find_by_short()
            .withf(|s| s == "aZbQk")
            .times(1)
            .returning(move |_| Ok(Some(mapping.clone())));

        let resolved = service(repo).resolve("aZbQk").await.unwrap();

        assert_eq!(resolved.unwrap().long, "https://example.com/a");
    }

    #[tokio::test]
    async fn test_resolve_miss_is_none() {
        let mut repo = MockMappingRepository::new();
        repo.expect_find_by_short().times(1).returning(|_| Ok(None));

        let resolved = service(repo).resolve("zzzzz").await.unwrap();

        assert!(resolved.is_none());
    }
}
