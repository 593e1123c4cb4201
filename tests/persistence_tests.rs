//! Opening an analyzer from configuration: index persistence and the durable cache.

mod common;

use credlens::config::{Config, INDEX_FILE_NAME};
use credlens::index::IndexStatus;
use credlens::model::{FactCheckRecord, Verdict};
use credlens::pipeline::{AnalysisError, Analyzer};
use serial_test::serial;

use common::fixtures::Workspace;

#[tokio::test]
async fn test_open_builds_and_persists_index() {
    let ws = Workspace::new();
    let config = ws.config();

    let analyzer = Analyzer::open(&config).await.unwrap();
    assert_eq!(analyzer.index().len(), 3);
    assert!(config.index_path().exists());

    let result = analyzer.analyze("Are vaccines safe?", None).await.unwrap();
    assert_eq!(result.verdict, Verdict::True);
    analyzer.close();
}

#[tokio::test]
async fn test_reopen_reuses_persisted_index() {
    let ws = Workspace::new();
    let config = ws.config();

    let first = Analyzer::open(&config).await.unwrap();
    let before = first.analyze("Are vaccines safe?", None).await.unwrap();
    first.close();
    let modified = std::fs::metadata(config.index_path()).unwrap().modified().unwrap();

    let second = Analyzer::open(&config).await.unwrap();
    assert_eq!(second.index_status(), Some(&IndexStatus::Loaded { records: 3 }));
    let after = second.analyze("Are vaccines safe?", None).await.unwrap();

    assert_eq!(
        std::fs::metadata(config.index_path()).unwrap().modified().unwrap(),
        modified
    );
    assert_eq!(before.verdict, after.verdict);
    assert_eq!(before.evidence.len(), after.evidence.len());
}

#[tokio::test]
async fn test_corrupt_index_is_rebuilt() {
    let ws = Workspace::new();
    let config = ws.config();
    std::fs::create_dir_all(&config.storage_path).unwrap();
    std::fs::write(config.index_path(), b"definitely not an index").unwrap();

    let analyzer = Analyzer::open(&config).await.unwrap();

    assert_eq!(analyzer.index().len(), 3);
    let result = analyzer
        .analyze("The moon landing was staged in a studio", None)
        .await
        .unwrap();
    assert_eq!(result.verdict, Verdict::False);
}

#[tokio::test]
async fn test_changed_corpus_triggers_rebuild() {
    let ws = Workspace::new();
    let config = ws.config();
    Analyzer::open(&config).await.unwrap().close();

    std::fs::write(
        ws.corpus_path(),
        r#"[{"claim": "Bananas are berries", "verdict": "TRUE", "source": "Botany Weekly"}]"#,
    )
    .unwrap();

    let analyzer = Analyzer::open(&config).await.unwrap();
    assert_eq!(analyzer.index().len(), 1);

    let result = analyzer.analyze("Are bananas berries?", None).await.unwrap();
    assert_eq!(result.verdict, Verdict::True);
    assert_eq!(result.cited_sources, vec!["Botany Weekly".to_string()]);
}

#[tokio::test]
async fn test_bad_corpus_entries_are_skipped_on_open() {
    let ws = Workspace::new();
    std::fs::write(
        ws.corpus_path(),
        r#"[
          {"claim": "Vaccines are safe and effective", "verdict": "TRUE", "source": "Health Desk"},
          {"claim": "The senator voted twice", "verdict": "PANTS ON FIRE"},
          {"verdict": "FALSE"}
        ]"#,
    )
    .unwrap();

    let analyzer = Analyzer::open(&ws.config()).await.unwrap();

    assert_eq!(analyzer.index().len(), 2);
    match analyzer.index_status() {
        Some(IndexStatus::Rebuilt { report, .. }) => {
            assert_eq!(report.indexed, 2);
            assert_eq!(report.rejected, 1);
        }
        other => panic!("expected a rebuild, got {other:?}"),
    }

    let result = analyzer.analyze("The senator voted twice", None).await.unwrap();
    assert_eq!(result.evidence.len(), 1);
    assert_eq!(result.verdict, Verdict::Ambiguous);
}

#[tokio::test]
async fn test_unparseable_corpus_gives_empty_index() {
    let ws = Workspace::new();
    std::fs::write(ws.corpus_path(), r#"[{"claim": "#).unwrap();

    let analyzer = Analyzer::open(&ws.config()).await.unwrap();

    assert!(analyzer.index().is_empty());
    let result = analyzer.analyze("Are vaccines safe?", None).await.unwrap();
    assert_eq!(result.verdict, Verdict::Unverified);
}

#[tokio::test]
async fn test_open_without_corpus_gives_empty_index() {
    let ws = Workspace::new();
    let config = Config {
        corpus_path: None,
        ..ws.config()
    };

    let analyzer = Analyzer::open(&config).await.unwrap();
    assert!(analyzer.index().is_empty());

    let result = analyzer.analyze("Are vaccines safe?", None).await.unwrap();
    assert_eq!(result.verdict, Verdict::Unverified);
}

#[tokio::test]
async fn test_missing_corpus_is_a_config_error() {
    let ws = Workspace::new();
    let config = Config {
        corpus_path: Some(ws.path().join("nope.json")),
        ..ws.config()
    };

    let err = Analyzer::open(&config).await.unwrap_err();
    assert!(matches!(err, AnalysisError::Config(_)));
}

#[tokio::test]
async fn test_durable_cache_survives_reopen() {
    let ws = Workspace::new();
    let config = Config {
        persist_cache: true,
        ..ws.config()
    };

    let first = Analyzer::open(&config).await.unwrap();
    let original = first.analyze("Are vaccines safe?", None).await.unwrap();
    first.close();

    let second = Analyzer::open(&config).await.unwrap();
    let cached = second.analyze("Are vaccines safe?", None).await.unwrap();
    assert_eq!(cached.analysis_id, original.analysis_id);

    second.clear_cache().await.unwrap();
    let fresh = second.analyze("Are vaccines safe?", None).await.unwrap();
    assert_ne!(fresh.analysis_id, original.analysis_id);
}

#[tokio::test]
async fn test_rebuild_index_persists_new_records() {
    let ws = Workspace::new();
    let config = ws.config();
    let analyzer = Analyzer::open(&config).await.unwrap();

    let report = analyzer
        .rebuild_index(vec![FactCheckRecord::new(
            7,
            "Lightning never strikes the same place twice",
            Verdict::False,
        )])
        .await
        .unwrap();
    assert_eq!(report.indexed, 1);

    let result = analyzer
        .analyze("Lightning never strikes the same place twice", None)
        .await
        .unwrap();
    assert_eq!(result.verdict, Verdict::False);
    assert!(ws.storage_path().join(INDEX_FILE_NAME).exists());
}

#[tokio::test]
#[serial]
async fn test_open_from_environment() {
    let ws = Workspace::new();
    unsafe {
        std::env::set_var("CREDLENS_STORAGE_PATH", ws.storage_path());
        std::env::set_var("CREDLENS_CORPUS_PATH", ws.corpus_path());
        std::env::set_var("CREDLENS_TOP_K", "1");
    }

    let config = Config::from_env();

    unsafe {
        std::env::remove_var("CREDLENS_STORAGE_PATH");
        std::env::remove_var("CREDLENS_CORPUS_PATH");
        std::env::remove_var("CREDLENS_TOP_K");
    }

    let config = config.unwrap();
    assert_eq!(config.top_k, 1);

    let analyzer = Analyzer::open(&config).await.unwrap();
    let result = analyzer.analyze("Are vaccines safe?", None).await.unwrap();
    assert_eq!(result.evidence.len(), 1);
}
