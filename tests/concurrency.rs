use shortkey::application::services::{KeyGenerator, MappingService};
use shortkey::domain::repositories::MappingRepository;
use shortkey::infrastructure::persistence::InMemoryMappingRepository;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;

const TASKS: usize = 32;

fn service(repo: Arc<InMemoryMappingRepository>) -> Arc<MappingService<dyn MappingRepository>> {
    let repository: Arc<dyn MappingRepository> = repo;
    Arc::new(MappingService::new(repository, KeyGenerator::default()))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_url_yields_one_mapping() {
    let repo = Arc::new(InMemoryMappingRepository::new());
    let service = service(repo.clone());

    let mut tasks = JoinSet::new();
    for _ in 0..TASKS {
        let service = service.clone();
        tasks.spawn(async move { service.submit("https://example.com/hot").await });
    }

    let mut keys = HashSet::new();
    while let Some(result) = tasks.join_next().await {
        keys.insert(result.unwrap().unwrap().short);
    }

    assert_eq!(keys.len(), 1);
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_distinct_urls_get_distinct_keys() {
    let repo = Arc::new(InMemoryMappingRepository::new());
    let service = service(repo.clone());

    let mut tasks = JoinSet::new();
    for i in 0..TASKS {
        let service = service.clone();
        tasks.spawn(async move { service.submit(&format!("https://example.com/{i}")).await });
    }

    let mut keys = HashSet::new();
    while let Some(result) = tasks.join_next().await {
        keys.insert(result.unwrap().unwrap().short);
    }

    assert_eq!(keys.len(), TASKS);
    assert_eq!(repo.count().await.unwrap(), TASKS as i64);
}
