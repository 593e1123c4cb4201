use std::collections::HashSet;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::error::CorpusError;
use super::record::FactCheckRecord;

/// Records read from a corpus document, plus the entries that had to be dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    pub records: Vec<FactCheckRecord>,
    /// Entries skipped because they were not valid records or repeated an id.
    pub rejected: usize,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reads a JSON array of fact-check records from `path`.
pub fn load_corpus(path: &Path) -> Result<Corpus, CorpusError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CorpusError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let corpus = parse_corpus(&raw)?;
    info!(
        path = %path.display(),
        records = corpus.len(),
        rejected = corpus.rejected,
        "Loaded fact-check corpus"
    );
    Ok(corpus)
}

/// Parses a corpus document.
///
/// Only a document that is not a JSON array is an error. Entries are parsed one at a time:
/// an entry that is not a valid record, or that repeats an earlier id, is logged and counted
/// in [`Corpus::rejected`].
///
/// When no record carries an id, ids are assigned sequentially from 1 in document order.
pub fn parse_corpus(raw: &str) -> Result<Corpus, CorpusError> {
    let entries: Vec<Value> =
        serde_json::from_str(raw).map_err(|source| CorpusError::Parse { source })?;

    let mut corpus = Corpus {
        records: Vec::with_capacity(entries.len()),
        rejected: 0,
    };
    for (position, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<FactCheckRecord>(entry) {
            Ok(record) => corpus.records.push(record),
            Err(e) => {
                warn!(position, error = %e, "Skipping malformed corpus entry");
                corpus.rejected += 1;
            }
        }
    }

    if corpus.records.iter().all(|r| r.id == 0) {
        for (i, record) in corpus.records.iter_mut().enumerate() {
            record.id = i as u64 + 1;
        }
        debug!(count = corpus.len(), "Assigned sequential corpus ids");
        return Ok(corpus);
    }

    let mut seen = HashSet::with_capacity(corpus.len());
    let before = corpus.len();
    corpus.records.retain(|record| {
        let first = seen.insert(record.id);
        if !first {
            warn!(id = record.id, "Skipping corpus entry with duplicate id");
        }
        first
    });
    corpus.rejected += before - corpus.len();

    Ok(corpus)
}
