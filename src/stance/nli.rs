use tokenizers::Tokenizer;
use tracing::{debug, info};

use super::config::NliConfig;
use super::error::StanceError;
use super::{StanceClassifier, StanceJudgement};
use crate::embedding::bert::{BertSequenceClassifier, EncodedInput};
use crate::embedding::device::select_device;
use crate::embedding::utils::{check_model_dir, load_tokenizer};
use crate::model::Stance;

/// Natural-language-inference classifier over (premise, hypothesis) pairs.
///
/// Works with any BERT-family checkpoint fine-tuned on MNLI-style labels; the
/// entailment / neutral / contradiction order is read from `config.json`.
pub struct NliClassifier {
    device: candle_core::Device,
    config: NliConfig,
    model: BertSequenceClassifier,
    tokenizer: Tokenizer,
    stances: Vec<Stance>,
}

impl std::fmt::Debug for NliClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NliClassifier")
            .field("device", &format!("{:?}", self.device))
            .field("config", &self.config)
            .field("stances", &self.stances)
            .finish()
    }
}

impl NliClassifier {
    pub fn load(config: NliConfig) -> Result<Self, StanceError> {
        if let Err(reason) = config.validate() {
            return Err(StanceError::InvalidConfig { reason });
        }

        let Some(model_dir) = config.model_dir.clone() else {
            return Err(StanceError::InvalidConfig {
                reason: "model_dir is required".to_string(),
            });
        };

        check_model_dir(&model_dir)?;
        let device = select_device()?;
        debug!(?device, "Selected compute device for NLI classifier");

        info!(model_dir = %model_dir.display(), "Loading NLI model");

        let model = BertSequenceClassifier::load(&model_dir, &device).map_err(|e| {
            StanceError::ModelLoadFailed {
                reason: format!("Failed to load sequence classifier: {}", e),
            }
        })?;

        let stances = model
            .labels()
            .iter()
            .map(|label| {
                label
                    .parse::<Stance>()
                    .map_err(|_| StanceError::InvalidConfig {
                        reason: format!("unsupported NLI label '{}'", label),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let tokenizer = load_tokenizer(&model_dir, config.max_seq_len)?;

        info!(labels = ?model.labels(), "NLI model loaded");

        Ok(Self {
            device,
            config,
            model,
            tokenizer,
            stances,
        })
    }

    pub fn config(&self) -> &NliConfig {
        &self.config
    }
}

impl StanceClassifier for NliClassifier {
    fn classify(&self, premise: &str, hypothesis: &str) -> Result<StanceJudgement, StanceError> {
        let encoding = self.tokenizer.encode((premise, hypothesis), true).map_err(|e| {
            StanceError::TokenizationFailed {
                reason: e.to_string(),
            }
        })?;

        let input = EncodedInput::from_encoding(&encoding, &self.device)?;
        let probs = self.model.probabilities(&input)?;

        let (best, confidence) = probs
            .iter()
            .copied()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .ok_or_else(|| StanceError::InferenceFailed {
                reason: "model produced no logits".to_string(),
            })?;

        let stance = self
            .stances
            .get(best)
            .copied()
            .ok_or_else(|| StanceError::InferenceFailed {
                reason: format!("logit index {} has no label", best),
            })?;

        debug!(
            premise_len = premise.len(),
            hypothesis_len = hypothesis.len(),
            %stance,
            confidence,
            "Classified evidence pair"
        );

        Ok(StanceJudgement::new(stance, confidence))
    }

    fn name(&self) -> &str {
        "nli"
    }
}
