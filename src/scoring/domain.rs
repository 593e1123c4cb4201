//! Domain trust table.
//!
//! Hosts are matched by longest suffix, so `news.bbc.com` and `www.bbc.com` both resolve to
//! the `bbc.com` entry. Unknown hosts get [`UNKNOWN_SOURCE_TRUST`].

use serde::{Deserialize, Serialize};
use url::Url;

use super::types::SourceCategory;
use crate::constants::{MAX_SCORE, UNKNOWN_SOURCE_TRUST};

/// Path segments that mark commentary rather than reporting.
const COMMENTARY_MARKERS: &[&str] = &["blog", "opinion", "editorial"];

/// Path segments that mark reporting.
const REPORTING_MARKERS: &[&str] = &["news", "article", "report"];

const COMMENTARY_PENALTY: f32 = 10.0;
const REPORTING_BONUS: f32 = 5.0;

struct DomainEntry {
    suffix: &'static str,
    trust: f32,
    journal: bool,
}

const fn entry(suffix: &'static str, trust: f32) -> DomainEntry {
    DomainEntry {
        suffix,
        trust,
        journal: false,
    }
}

const fn journal(suffix: &'static str, trust: f32) -> DomainEntry {
    DomainEntry {
        suffix,
        trust,
        journal: true,
    }
}

const DOMAINS: &[DomainEntry] = &[
    // Government and international health bodies
    entry("who.int", 95.0),
    entry("cdc.gov", 95.0),
    entry("nih.gov", 94.0),
    entry("nasa.gov", 94.0),
    entry("fda.gov", 93.0),
    entry("noaa.gov", 93.0),
    entry("usgs.gov", 92.0),
    entry("epa.gov", 91.0),
    entry("un.org", 90.0),
    entry("worldbank.org", 88.0),
    entry("oecd.org", 87.0),
    // Wire services and fact-checkers
    entry("reuters.com", 92.0),
    entry("ap.org", 91.0),
    entry("apnews.com", 91.0),
    entry("factcheck.org", 90.0),
    entry("bbc.com", 89.0),
    entry("bbc.co.uk", 89.0),
    entry("snopes.com", 89.0),
    entry("npr.org", 88.0),
    entry("politifact.com", 88.0),
    entry("fullfact.org", 88.0),
    // Journals and scholarly indexes
    journal("nature.com", 98.0),
    journal("science.org", 98.0),
    journal("nejm.org", 97.0),
    journal("thelancet.com", 97.0),
    journal("cell.com", 96.0),
    journal("pnas.org", 96.0),
    journal("bmj.com", 95.0),
    journal("pubmed.ncbi.nlm.nih.gov", 94.0),
    journal("cochranelibrary.com", 93.0),
    journal("cochrane.org", 93.0),
    journal("arxiv.org", 85.0),
    // Major media
    entry("economist.com", 86.0),
    entry("ft.com", 85.0),
    entry("wsj.com", 84.0),
    entry("nytimes.com", 83.0),
    entry("washingtonpost.com", 82.0),
    entry("theguardian.com", 81.0),
    entry("wikipedia.org", 80.0),
    entry("cnn.com", 75.0),
    entry("msnbc.com", 72.0),
    entry("foxnews.com", 70.0),
];

/// What is known about the publisher behind a URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceProfile {
    /// Lowercased host without a leading `www.`; `None` when the URL has no host.
    pub domain: Option<String>,
    /// Trust in `[0, 100]`, path adjustment included.
    pub trust: f32,
    pub category: SourceCategory,
}

/// Looks up `url` in the domain table and applies the path adjustment.
///
/// Scheme-less input (`example.com/a`) is accepted. Anything without a host scores as an
/// unknown commercial source.
pub fn source_profile(url: &str) -> SourceProfile {
    let Some(parsed) = parse_lenient(url) else {
        return SourceProfile {
            domain: None,
            trust: UNKNOWN_SOURCE_TRUST,
            category: SourceCategory::Commercial,
        };
    };

    let domain = parsed.host_str().map(normalize_host);
    let (base, is_journal) = domain
        .as_deref()
        .and_then(lookup)
        .map_or((UNKNOWN_SOURCE_TRUST, false), |e| (e.trust, e.journal));

    let trust = (base + path_adjustment(parsed.path())).clamp(0.0, MAX_SCORE);
    let category = match domain.as_deref() {
        _ if is_journal => SourceCategory::ScientificJournal,
        Some(host) => categorize(host),
        None => SourceCategory::Commercial,
    };

    SourceProfile {
        domain,
        trust,
        category,
    }
}

/// Trust score of `url`, path adjustment included.
pub fn domain_trust(url: &str) -> f32 {
    source_profile(url).trust
}

fn parse_lenient(url: &str) -> Option<Url> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    Url::parse(url)
        .ok()
        .filter(|u| u.host_str().is_some())
        .or_else(|| Url::parse(&format!("https://{url}")).ok())
        .filter(|u| u.host_str().is_some())
}

fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

fn lookup(host: &str) -> Option<&'static DomainEntry> {
    DOMAINS
        .iter()
        .filter(|e| {
            host == e.suffix
                || host
                    .strip_suffix(e.suffix)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
        .max_by_key(|e| e.suffix.len())
}

fn path_adjustment(path: &str) -> f32 {
    let path = path.to_ascii_lowercase();
    let has = |markers: &[&str]| {
        path.split(|c: char| !c.is_ascii_alphanumeric())
            .any(|segment| markers.iter().any(|m| segment.starts_with(m)))
    };

    if has(COMMENTARY_MARKERS) {
        -COMMENTARY_PENALTY
    } else if has(REPORTING_MARKERS) {
        REPORTING_BONUS
    } else {
        0.0
    }
}

fn categorize(host: &str) -> SourceCategory {
    if host.ends_with(".gov") || host.contains(".gov.") {
        SourceCategory::Government
    } else if host.ends_with(".edu") || host.contains(".ac.") {
        SourceCategory::Academic
    } else if host.ends_with(".org") || host.ends_with(".int") {
        SourceCategory::Organization
    } else {
        SourceCategory::Commercial
    }
}
