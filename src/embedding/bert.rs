use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use candle::{DType, Device, Result, Tensor};
use candle_core as candle;
use candle_core::IndexOp;
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config};
use serde::Deserialize;

/// Reads `config.json` and memory-maps `model.safetensors` from a model directory.
fn open_model_dir(model_dir: &Path, device: &Device) -> Result<(String, VarBuilder<'static>)> {
    let config_content = std::fs::read_to_string(model_dir.join("config.json"))?;
    let weights_path = model_dir.join("model.safetensors");
    let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };
    Ok((config_content, vb))
}

fn parse_config(content: &str) -> Result<Config> {
    serde_json::from_str(content)
        .map_err(|e| candle::Error::Msg(format!("Failed to parse config: {}", e)))
}

/// Scopes `vb` to the encoder weights, which live under `bert.`, `roberta.` or the root.
fn encoder_scope(vb: &VarBuilder<'static>) -> VarBuilder<'static> {
    if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
        vb.pp("bert")
    } else if vb.contains_tensor("roberta.embeddings.word_embeddings.weight") {
        vb.pp("roberta")
    } else {
        vb.clone()
    }
}

fn tensor_row(ids: &[u32], device: &Device) -> Result<Tensor> {
    Tensor::new(ids, device)?.unsqueeze(0)
}

/// Tokenized single sequence or pair, ready for a forward pass.
pub struct EncodedInput {
    pub input_ids: Tensor,
    pub token_type_ids: Tensor,
    pub attention_mask: Tensor,
}

impl EncodedInput {
    pub fn from_encoding(encoding: &tokenizers::Encoding, device: &Device) -> Result<Self> {
        Ok(Self {
            input_ids: tensor_row(encoding.get_ids(), device)?,
            token_type_ids: tensor_row(encoding.get_type_ids(), device)?,
            attention_mask: tensor_row(encoding.get_attention_mask(), device)?,
        })
    }
}

/// BERT encoder producing mean-pooled sentence embeddings.
#[derive(Clone)]
pub struct BertEncoder {
    model: Arc<BertModel>,
    hidden_size: usize,
}

impl BertEncoder {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let (config_content, vb) = open_model_dir(model_dir.as_ref(), device)?;
        let config = parse_config(&config_content)?;
        let model = BertModel::load(encoder_scope(&vb), &config)?;

        Ok(Self {
            model: Arc::new(model),
            hidden_size: config.hidden_size,
        })
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    /// Returns the attention-masked mean of the last hidden states, shape `[hidden_size]`.
    pub fn embed(&self, input: &EncodedInput) -> Result<Vec<f32>> {
        let hidden = self.model.forward(
            &input.input_ids,
            &input.token_type_ids,
            Some(&input.attention_mask),
        )?;

        let mask = input.attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?.clamp(1e-9f32, f32::MAX)?;
        let pooled = summed.broadcast_div(&counts)?;

        pooled.i(0)?.to_vec1::<f32>()
    }
}

#[derive(Debug, Default, Deserialize)]
struct LabelConfig {
    #[serde(default)]
    id2label: BTreeMap<String, String>,
}

enum ClassificationHead {
    /// BERT style: optional pooler (dense + tanh) then a linear classifier on `[CLS]`.
    Pooled {
        pooler: Option<Linear>,
        classifier: Linear,
    },
    /// RoBERTa style: dense + tanh + out_proj on the first token.
    Projected { dense: Linear, out_proj: Linear },
}

impl ClassificationHead {
    fn load(vb: &VarBuilder<'static>, hidden_size: usize, num_labels: usize) -> Result<Self> {
        if vb.contains_tensor("classifier.out_proj.weight") {
            let head = vb.pp("classifier");
            return Ok(Self::Projected {
                dense: candle_nn::linear(hidden_size, hidden_size, head.pp("dense"))?,
                out_proj: candle_nn::linear(hidden_size, num_labels, head.pp("out_proj"))?,
            });
        }

        let encoder = encoder_scope(vb);
        let pooler = if encoder.contains_tensor("pooler.dense.weight") {
            Some(candle_nn::linear(
                hidden_size,
                hidden_size,
                encoder.pp("pooler").pp("dense"),
            )?)
        } else {
            None
        };

        Ok(Self::Pooled {
            pooler,
            classifier: candle_nn::linear(hidden_size, num_labels, vb.pp("classifier"))?,
        })
    }

    fn forward(&self, first_token: &Tensor) -> Result<Tensor> {
        match self {
            Self::Pooled { pooler, classifier } => match pooler {
                Some(pooler) => classifier.forward(&pooler.forward(first_token)?.tanh()?),
                None => classifier.forward(first_token),
            },
            Self::Projected { dense, out_proj } => {
                out_proj.forward(&dense.forward(first_token)?.tanh()?)
            }
        }
    }
}

struct SequenceClassifierImpl {
    bert: BertModel,
    head: ClassificationHead,
    labels: Vec<String>,
}

/// BERT/RoBERTa sequence classifier with labels taken from `config.json`'s `id2label`.
#[derive(Clone)]
pub struct BertSequenceClassifier(Arc<SequenceClassifierImpl>);

impl BertSequenceClassifier {
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let (config_content, vb) = open_model_dir(model_dir.as_ref(), device)?;
        let config = parse_config(&config_content)?;
        let label_config: LabelConfig = serde_json::from_str(&config_content)
            .map_err(|e| candle::Error::Msg(format!("Failed to parse id2label: {}", e)))?;

        let mut indexed: Vec<(usize, String)> = label_config
            .id2label
            .into_iter()
            .map(|(id, label)| {
                id.parse::<usize>()
                    .map(|i| (i, label))
                    .map_err(|e| candle::Error::Msg(format!("Invalid label id '{}': {}", id, e)))
            })
            .collect::<Result<_>>()?;
        indexed.sort_by_key(|(i, _)| *i);
        let labels: Vec<String> = indexed.into_iter().map(|(_, label)| label).collect();
        if labels.is_empty() {
            return Err(candle::Error::Msg(
                "config.json has no id2label mapping".to_string(),
            ));
        }

        let bert = BertModel::load(encoder_scope(&vb), &config)?;
        let head = ClassificationHead::load(&vb, config.hidden_size, labels.len())?;

        Ok(Self(Arc::new(SequenceClassifierImpl { bert, head, labels })))
    }

    /// Label names in logit order.
    pub fn labels(&self) -> &[String] {
        &self.0.labels
    }

    /// Returns softmax probabilities over [`Self::labels`].
    pub fn probabilities(&self, input: &EncodedInput) -> Result<Vec<f32>> {
        let output = self.0.bert.forward(
            &input.input_ids,
            &input.token_type_ids,
            Some(&input.attention_mask),
        )?;
        let first_token = output.i((.., 0, ..))?;
        let logits = self.0.head.forward(&first_token)?;
        let probs = candle_nn::ops::softmax_last_dim(&logits)?;
        probs.i(0)?.to_vec1::<f32>()
    }
}
