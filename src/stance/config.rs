use std::path::PathBuf;

pub const NLI_MAX_SEQ_LEN: usize = crate::constants::DEFAULT_NLI_MAX_SEQ_LEN;

#[derive(Debug, Clone)]
pub struct NliConfig {
    pub model_dir: Option<PathBuf>,

    pub max_seq_len: usize,
}

impl Default for NliConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            max_seq_len: NLI_MAX_SEQ_LEN,
        }
    }
}

impl NliConfig {
    pub fn new<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: Some(model_dir.into()),
            ..Default::default()
        }
    }

    pub fn with_max_seq_len(mut self, max_seq_len: usize) -> Self {
        self.max_seq_len = max_seq_len;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_seq_len < 8 {
            return Err(format!(
                "max_seq_len must be at least 8, got {}",
                self.max_seq_len
            ));
        }

        if let Some(ref path) = self.model_dir
            && path.as_os_str().is_empty()
        {
            return Err("model_dir cannot be empty when provided".to_string());
        }

        Ok(())
    }
}
