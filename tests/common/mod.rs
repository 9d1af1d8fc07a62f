#![allow(dead_code)]

use chrono::{Duration, Utc};
use cleanlink::application::services::{LinkService, LinkStore};
use cleanlink::domain::entities::NewLink;
use cleanlink::domain::repositories::LinkRepository;
use cleanlink::infrastructure::persistence::{SqliteLinkRepository, open_database};
use cleanlink::state::AppState;
use sqlx::SqlitePool;
use std::sync::Arc;

pub const TEST_DOMAIN: &str = "https://s.example.com";

/// Fresh migrated in-memory database. A single connection keeps it alive.
pub async fn memory_pool() -> SqlitePool {
    open_database("sqlite::memory:", 1).await.unwrap()
}

pub fn create_test_repository(pool: SqlitePool) -> Arc<SqliteLinkRepository> {
    Arc::new(SqliteLinkRepository::new(Arc::new(pool)))
}

pub fn create_test_store(pool: SqlitePool) -> Arc<LinkStore<SqliteLinkRepository>> {
    Arc::new(LinkStore::new(create_test_repository(pool), 6))
}

pub fn create_test_state(pool: SqlitePool) -> AppState {
    let store = create_test_store(pool);
    let link_service = Arc::new(LinkService::new(store, TEST_DOMAIN));

    AppState::new(link_service)
}

pub async fn create_test_link(pool: &SqlitePool, code: &str, url: &str) {
    let repository = SqliteLinkRepository::new(Arc::new(pool.clone()));
    repository.insert(NewLink::new(code, url)).await.unwrap();
}

pub async fn create_aged_link(pool: &SqlitePool, code: &str, url: &str, age_days: i64) {
    let repository = SqliteLinkRepository::new(Arc::new(pool.clone()));
    let created_at = Utc::now() - Duration::days(age_days);

    repository
        .insert(NewLink::created_at(code, url, created_at))
        .await
        .unwrap();
}
