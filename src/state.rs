//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::application::services::MappingService;
use crate::domain::repositories::MappingRepository;
use crate::domain::short_key::ShortKey;
use crate::infrastructure::cache::CacheService;

/// State shared by all handlers. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub mapping_service: Arc<MappingService<dyn MappingRepository>>,
    pub cache: Arc<dyn CacheService>,
    /// Public prefix for short URLs, without trailing slash.
    pub base_url: Arc<str>,
}

impl AppState {
    pub fn new(
        mapping_service: Arc<MappingService<dyn MappingRepository>>,
        cache: Arc<dyn CacheService>,
        base_url: &str,
    ) -> Self {
        Self {
            mapping_service,
            cache,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    /// Full public URL for `short`.
    ///
    /// Accepts any string so display pages can render keys they did not mint.
    pub fn short_url(&self, short: &str) -> String {
        match short.parse::<ShortKey>() {
            Ok(key) => key.url(&self.base_url),
            Err(_) => format!("{}/{}", self.base_url, short),
        }
    }
}
