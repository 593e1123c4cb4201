//! Corpus and configuration fixtures.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use credlens::config::Config;
use credlens::embedding::{EmbeddingProvider, SentenceEmbedder};
use credlens::model::{FactCheckRecord, Verdict};
use credlens::pipeline::Analyzer;
use tempfile::TempDir;

pub const CORPUS_JSON: &str = r#"[
  {
    "claim": "Vaccines are safe and effective",
    "verdict": "TRUE",
    "explanation": "Large trials show vaccines are safe.",
    "source": "Health Desk",
    "source_url": "https://www.who.int/news/vaccine-safety"
  },
  {
    "claim": "The moon landing was staged in a studio",
    "verdict": "FALSE",
    "explanation": "Independent tracking confirmed the missions.",
    "source": "Snopes",
    "source_url": "https://www.snopes.com/fact-check/moon-landing"
  },
  {
    "claim": "Drinking coffee reduces the risk of heart disease",
    "verdict": "MIXED",
    "source": "Science Feedback"
  }
]"#;

pub fn records() -> Vec<FactCheckRecord> {
    vec![
        FactCheckRecord::new(1, "Vaccines are safe and effective", Verdict::True)
            .with_source("Health Desk", Some("https://www.who.int/news/vaccine-safety")),
        FactCheckRecord::new(2, "The moon landing was staged in a studio", Verdict::False)
            .with_source("Snopes", Some("https://www.snopes.com/fact-check/moon-landing")),
    ]
}

pub fn stub_embedder() -> Arc<dyn EmbeddingProvider> {
    Arc::new(SentenceEmbedder::stub().expect("stub embedder"))
}

/// An analyzer over [`records`] with the stub embedder and the heuristic stance fallback.
pub fn analyzer() -> Analyzer {
    let analyzer = Analyzer::builder(stub_embedder())
        .build()
        .expect("analyzer should build");
    analyzer.index().build(records()).expect("index should build");
    analyzer
}

/// A storage directory holding `corpus.json`.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        std::fs::write(dir.path().join("corpus.json"), CORPUS_JSON).expect("write corpus");
        Self { dir }
    }

    pub fn corpus_path(&self) -> PathBuf {
        self.dir.path().join("corpus.json")
    }

    pub fn storage_path(&self) -> PathBuf {
        self.dir.path().join("store")
    }

    pub fn config(&self) -> Config {
        Config {
            storage_path: self.storage_path(),
            corpus_path: Some(self.corpus_path()),
            ..Config::default()
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
