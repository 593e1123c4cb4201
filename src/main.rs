//! `credlens` command-line entrypoint.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use credlens::config::Config;
use credlens::index::IndexStatus;
use credlens::model::{SuppliedEvidence, load_corpus};
use credlens::pipeline::{AnalysisRequest, AnalysisResult, Analyzer};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// CredLens - evidence-based claim verification
#[derive(Parser, Debug)]
#[command(name = "credlens")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Corpus of prior fact-checks (overrides CREDLENS_CORPUS_PATH)
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    /// Storage directory (overrides CREDLENS_STORAGE_PATH)
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyse one claim and print the result
    Analyze {
        /// The claim text
        claim: String,

        /// URL the claim was published at
        #[arg(long)]
        url: Option<String>,

        /// JSON array of additional evidence
        #[arg(long)]
        evidence: Option<PathBuf>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Rebuild and persist the evidence index from the corpus
    BuildIndex {
        /// Rebuild even when the persisted index already matches the corpus
        #[arg(long)]
        force: bool,
    },

    /// Remove every cached analysis
    ClearCache,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(corpus) = cli.corpus {
        config.corpus_path = Some(corpus);
    }
    if let Some(storage) = cli.storage {
        config.storage_path = storage;
    }
    std::fs::create_dir_all(&config.storage_path).with_context(|| {
        format!(
            "creating storage directory {}",
            config.storage_path.display()
        )
    })?;

    let analyzer = Analyzer::open(&config)
        .await
        .context("failed to open analyzer")?;

    match cli.command {
        Command::Analyze {
            claim,
            url,
            evidence,
            json,
        } => {
            let mut request = AnalysisRequest::new(claim);
            request.source_url = url;
            if let Some(path) = evidence {
                request.evidence = read_evidence(&path)?;
            }

            let result = analyzer.analyze_request(request).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_summary(&result);
            }
        }
        Command::BuildIndex { force } => {
            let path = config
                .corpus_path
                .as_deref()
                .context("build-index needs --corpus or CREDLENS_CORPUS_PATH")?;

            // Opening already loaded or rebuilt the index against this corpus.
            let report = match analyzer.index_status() {
                Some(IndexStatus::Loaded { records }) if !force => {
                    println!(
                        "index at {} is up to date ({records} records)",
                        config.index_path().display()
                    );
                    None
                }
                Some(IndexStatus::Rebuilt { report, .. }) if !force => Some(*report),
                _ => {
                    let corpus = load_corpus(path)?;
                    let mut report = analyzer.rebuild_index(corpus.records).await?;
                    report.rejected = corpus.rejected;
                    Some(report)
                }
            };

            if let Some(report) = report {
                println!(
                    "indexed {} records ({} skipped) into {}",
                    report.indexed,
                    report.skipped(),
                    config.index_path().display()
                );
            }
        }
        Command::ClearCache => {
            analyzer.clear_cache().await?;
            println!("analysis cache cleared");
        }
    }

    analyzer.close();
    Ok(())
}

fn read_evidence(path: &std::path::Path) -> anyhow::Result<Vec<SuppliedEvidence>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading evidence file {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing evidence file {}", path.display()))
}

fn print_summary(result: &AnalysisResult) {
    let fp = &result.fingerprint;
    println!("Verdict:     {} ({:.0}% confidence)", result.verdict, result.confidence * 100.0);
    if !result.verdict.is_decisive() {
        println!("             the available evidence does not settle this claim");
    }
    println!(
        "Credibility: {:.1} ({})",
        fp.overall_credibility, result.credibility_level
    );
    println!(
        "  source trust {:.1} | language safety {:.1} | corroborating {} | contradicting {}",
        fp.source_trust, fp.language_safety, fp.corroboration_count, fp.contradiction_count
    );
    println!("Explanation: {}", result.explanation);

    if !result.evidence.is_empty() {
        println!("Evidence:");
        for item in &result.evidence {
            println!(
                "  [{}] {} ({:.2}, reliability {:.0}): {}",
                item.stance(),
                item.source(),
                item.confidence(),
                item.reliability(),
                item.text()
            );
        }
    }

    if !result.suspicious_phrases.is_empty() {
        println!("Flagged wording:");
        for phrase in &result.suspicious_phrases {
            println!("  \"{}\": {}", phrase.phrase, phrase.reason);
        }
    }
}
