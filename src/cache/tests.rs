use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::*;
use crate::hashing::analysis_key;
use crate::model::Verdict;
use crate::pipeline::AnalysisResult;
use crate::scoring::{CredibilityFingerprint, CredibilityLevel};

fn result(claim: &str, verdict: Verdict) -> AnalysisResult {
    AnalysisResult {
        analysis_id: Uuid::new_v4(),
        claim: claim.to_string(),
        source_url: None,
        verdict,
        confidence: 0.5,
        fingerprint: CredibilityFingerprint {
            overall_credibility: 50.0,
            source_trust: 50.0,
            language_safety: 100.0,
            corroboration_count: 0,
            contradiction_count: 0,
        },
        credibility_level: CredibilityLevel::Medium,
        evidence: Vec::new(),
        explanation: "no evidence found".to_string(),
        cited_sources: Vec::new(),
        suspicious_phrases: Vec::new(),
        source: None,
        degraded: Vec::new(),
        analyzed_at: Utc::now(),
    }
}

#[tokio::test]
async fn test_memory_miss_then_hit() {
    let cache = AnalysisCache::new(16);
    let key = analysis_key("The sky is blue", None, &[]);

    assert_eq!(cache.get(&key).await.unwrap(), CacheLookup::Miss);

    let stored = result("The sky is blue", Verdict::True);
    cache.put(&key, stored.clone()).await.unwrap();

    let lookup = cache.get(&key).await.unwrap();
    assert!(lookup.is_hit());
    assert_eq!(lookup.into_result(), Some(stored));
}

#[tokio::test]
async fn test_put_is_last_write_wins() {
    let cache = AnalysisCache::new(16);
    let key = analysis_key("claim", None, &[]);

    cache.put(&key, result("claim", Verdict::True)).await.unwrap();
    cache.put(&key, result("claim", Verdict::False)).await.unwrap();
    cache.run_pending_tasks();

    let hit = cache.get(&key).await.unwrap().into_result().unwrap();
    assert_eq!(hit.verdict, Verdict::False);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_store_hit_is_promoted() {
    let store = Arc::new(MemoryCacheStore::new());
    let key = analysis_key("claim", None, &[]);

    let writer = AnalysisCache::new(16).with_store(store.clone());
    writer.put(&key, result("claim", Verdict::True)).await.unwrap();
    assert_eq!(store.len(), 1);

    let reader = AnalysisCache::new(16).with_store(store.clone());
    assert!(reader.get(&key).await.unwrap().is_hit());
    assert!(reader.get(&key).await.unwrap().is_hit());
    assert_eq!(store.gets(), 1, "second lookup is served from memory");
}

#[tokio::test]
async fn test_store_errors_surface_but_memory_still_updates() {
    let cache = AnalysisCache::new(16).with_store(Arc::new(FailingCacheStore));
    let key = analysis_key("claim", None, &[]);

    assert!(matches!(
        cache.get(&key).await,
        Err(CacheError::Unavailable { .. })
    ));
    assert!(cache.put(&key, result("claim", Verdict::True)).await.is_err());
    assert!(cache.get(&key).await.unwrap().is_hit());
}

#[tokio::test]
async fn test_clear_empties_both_tiers() {
    let store = Arc::new(MemoryCacheStore::new());
    let cache = AnalysisCache::new(16).with_store(store.clone());
    let key = analysis_key("claim", None, &[]);

    cache.put(&key, result("claim", Verdict::True)).await.unwrap();
    cache.clear().await.unwrap();

    assert!(cache.is_empty());
    assert!(store.is_empty());
    assert_eq!(cache.get(&key).await.unwrap(), CacheLookup::Miss);
}

#[tokio::test]
async fn test_file_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileCacheStore::open(dir.path().join("analysis-cache")).unwrap();
    let key = analysis_key("claim", Some("https://example.com"), &[]);

    assert!(store.get(&key).await.unwrap().is_none());

    let entry = CacheEntry::new(&key, result("claim", Verdict::Ambiguous));
    store.put(&entry).await.unwrap();

    let loaded = store.get(&key).await.unwrap().unwrap();
    assert_eq!(loaded, entry);
    assert!(store.dir().join(format!("{}.json", key.to_hex())).exists());
}

#[tokio::test]
async fn test_file_store_leaves_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileCacheStore::open(dir.path()).unwrap();
    let key = analysis_key("claim", None, &[]);

    for verdict in [Verdict::True, Verdict::False] {
        store
            .put(&CacheEntry::new(&key, result("claim", verdict)))
            .await
            .unwrap();
    }

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![format!("{}.json", key.to_hex())]);
    assert_eq!(
        store.get(&key).await.unwrap().unwrap().result.verdict,
        Verdict::False
    );
}

#[tokio::test]
async fn test_file_store_reports_corrupt_entries() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileCacheStore::open(dir.path()).unwrap();
    let key = analysis_key("claim", None, &[]);
    std::fs::write(dir.path().join(format!("{}.json", key.to_hex())), b"{not json").unwrap();

    assert!(matches!(
        store.get(&key).await,
        Err(CacheError::Corrupt { .. })
    ));
}

#[tokio::test]
async fn test_file_store_rejects_foreign_keys() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileCacheStore::open(dir.path()).unwrap();
    let mut entry = CacheEntry::new(&analysis_key("claim", None, &[]), result("claim", Verdict::True));
    entry.key = "../escape".to_string();

    assert!(matches!(
        store.put(&entry).await,
        Err(CacheError::Corrupt { .. })
    ));
}

#[tokio::test]
async fn test_file_store_clear() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileCacheStore::open(dir.path()).unwrap();
    std::fs::write(dir.path().join("README.txt"), b"keep me").unwrap();

    for claim in ["a", "b", "c"] {
        let key = analysis_key(claim, None, &[]);
        store
            .put(&CacheEntry::new(&key, result(claim, Verdict::True)))
            .await
            .unwrap();
    }

    assert_eq!(store.clear().await.unwrap(), 3);
    assert!(dir.path().join("README.txt").exists());
    assert!(store.get(&analysis_key("a", None, &[])).await.unwrap().is_none());
}
