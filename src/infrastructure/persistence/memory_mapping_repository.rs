//! In-memory implementation of the mapping repository.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::entities::{Claim, Mapping, NewMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;

#[derive(Debug, Default)]
struct Tables {
    rows: Vec<Mapping>,
    /// short key -> index into `rows`
    by_short: HashMap<String, usize>,
    /// long URL -> index of the first row with that URL
    by_long: HashMap<String, usize>,
}

impl Tables {
    fn get(&self, index: Option<&usize>) -> Option<Mapping> {
        index.map(|&i| self.rows[i].clone())
    }

    fn push(&mut self, new_mapping: NewMapping) -> Result<Mapping, AppError> {
        let short = new_mapping.short.into_inner();
        if self.by_short.contains_key(&short) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "mappings_short_key_unique" }),
            ));
        }

        let index = self.rows.len();
        let mapping = Mapping::new(index as i64 + 1, new_mapping.long, short, Utc::now());

        self.by_short.insert(mapping.short.clone(), index);
        self.by_long.entry(mapping.long.clone()).or_insert(index);
        self.rows.push(mapping.clone());

        Ok(mapping)
    }
}

/// Process-local mapping store.
///
/// All tables sit behind one lock, which makes [`MappingRepository::claim`]
/// atomic without further coordination. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryMappingRepository {
    tables: RwLock<Tables>,
}

impl InMemoryMappingRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MappingRepository for InMemoryMappingRepository {
    async fn find_by_long(&self, long: &str) -> Result<Option<Mapping>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.get(tables.by_long.get(long)))
    }

    async fn find_by_short(&self, short: &str) -> Result<Option<Mapping>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables.get(tables.by_short.get(short)))
    }

    async fn insert(&self, new_mapping: NewMapping) -> Result<Mapping, AppError> {
        self.tables.write().await.push(new_mapping)
    }

    async fn claim(&self, new_mapping: NewMapping) -> Result<Claim, AppError> {
        let mut tables = self.tables.write().await;

        if let Some(existing) = tables.get(tables.by_long.get(&new_mapping.long)) {
            return Ok(Claim::Existing(existing));
        }

        tables.push(new_mapping).map(Claim::Created)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.tables.read().await.rows.len() as i64)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Mapping>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .rows
            .iter()
            .rev()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
