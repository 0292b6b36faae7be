#![allow(dead_code)]

use axum_test::TestServer;
use std::sync::Arc;
use shortkey::application::services::{KeyGenerator, MappingService};
use shortkey::domain::entities::{Mapping, NewMapping};
use shortkey::domain::repositories::MappingRepository;
use shortkey::domain::short_key::ShortKey;
use shortkey::infrastructure::cache::{CacheService, NullCache};
use shortkey::infrastructure::persistence::InMemoryMappingRepository;
use shortkey::routes;
use shortkey::state::AppState;

pub const BASE_URL: &str = "https://s.example.com";

pub fn create_test_state(repo: Arc<InMemoryMappingRepository>) -> AppState {
    create_test_state_with_cache(repo, Arc::new(NullCache))
}

pub fn create_test_state_with_cache(
    repo: Arc<InMemoryMappingRepository>,
    cache: Arc<dyn CacheService>,
) -> AppState {
    let repository: Arc<dyn MappingRepository> = repo;
    let mapping_service = Arc::new(MappingService::new(repository, KeyGenerator::default()));

    AppState::new(mapping_service, cache, BASE_URL)
}

/// Full router over a fresh in-memory store. The store is returned for
/// direct inspection.
pub fn create_test_server() -> (TestServer, Arc<InMemoryMappingRepository>) {
    let repo = Arc::new(InMemoryMappingRepository::new());
    let state = create_test_state(repo.clone());
    let server = TestServer::new(routes::router(state)).unwrap();

    (server, repo)
}

pub async fn create_test_mapping(repo: &InMemoryMappingRepository, long: &str, short: &str) -> Mapping {
    let key: ShortKey = short.parse().unwrap();
    repo.insert(NewMapping::new(long, key)).await.unwrap()
}

/// Extracts the key from a `/display/{key}` location.
pub fn display_key(location: &str) -> String {
    location
        .strip_prefix("/display/")
        .unwrap_or_else(|| panic!("unexpected location: {location}"))
        .to_string()
}
