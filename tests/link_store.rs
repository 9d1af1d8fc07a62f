mod common;

use cleanlink::utils::code_generator::is_well_formed;
use std::collections::HashSet;

#[tokio::test]
async fn test_create_then_resolve() {
    let pool = common::memory_pool().await;
    let store = common::create_test_store(pool);

    let url = "https://example.com/articles/42?page=2";
    let code = store.create(url).await.unwrap();

    assert_eq!(store.resolve(&code).await.unwrap().as_deref(), Some(url));
}

#[tokio::test]
async fn test_resolve_unknown_code() {
    let pool = common::memory_pool().await;
    let store = common::create_test_store(pool);

    assert_eq!(store.resolve("zzzzzz").await.unwrap(), None);
}

#[tokio::test]
async fn test_codes_are_well_formed() {
    let pool = common::memory_pool().await;
    let store = common::create_test_store(pool);

    for _ in 0..20 {
        let code = store.create("https://example.com").await.unwrap();
        assert_eq!(code.len(), 6);
        assert!(is_well_formed(&code), "unexpected code {code}");
    }
}

#[tokio::test]
async fn test_same_url_gets_distinct_codes() {
    let pool = common::memory_pool().await;
    let store = common::create_test_store(pool);

    let first = store.create("https://example.com").await.unwrap();
    let second = store.create("https://example.com").await.unwrap();

    assert_ne!(first, second);
    assert_eq!(store.count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_sweep_respects_retention_window() {
    let pool = common::memory_pool().await;
    common::create_aged_link(&pool, "stale1", "https://stale.example", 31).await;
    common::create_aged_link(&pool, "fresh1", "https://fresh.example", 29).await;
    let store = common::create_test_store(pool);

    let deleted = store.sweep_expired(30).await.unwrap();

    assert_eq!(deleted, 1);
    assert_eq!(store.resolve("stale1").await.unwrap(), None);
    assert_eq!(
        store.resolve("fresh1").await.unwrap().as_deref(),
        Some("https://fresh.example")
    );
}

#[tokio::test]
async fn test_sweep_with_out_of_range_retention() {
    let pool = common::memory_pool().await;
    common::create_aged_link(&pool, "ancnt1", "https://ancient.example", 3650).await;
    let store = common::create_test_store(pool);

    assert_eq!(store.sweep_expired(200_000_000).await.unwrap(), 0);
    assert_eq!(store.sweep_expired(u32::MAX).await.unwrap(), 0);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_sweep_with_nothing_expired() {
    let pool = common::memory_pool().await;
    common::create_test_link(&pool, "today1", "https://today.example").await;
    let store = common::create_test_store(pool);

    assert_eq!(store.sweep_expired(30).await.unwrap(), 0);
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_concurrent_creates() {
    let pool = common::memory_pool().await;
    let store = common::create_test_store(pool);

    let mut tasks = Vec::new();
    for i in 0..25 {
        let store = store.clone();
        tasks.push(tokio::spawn(async move {
            let url = format!("https://example.com/{i}");
            let code = store.create(&url).await.unwrap();
            (code, url)
        }));
    }

    let mut codes = HashSet::new();
    for task in tasks {
        let (code, url) = task.await.unwrap();
        assert_eq!(store.resolve(&code).await.unwrap(), Some(url));
        codes.insert(code);
    }

    assert_eq!(codes.len(), 25);
    assert_eq!(store.count().await.unwrap(), 25);
}
