use std::path::PathBuf;

use super::error::EncoderError;

/// Output dimension of the CLIP ViT-B/32 image tower.
pub const CLIP_EMBEDDING_DIM: usize = 512;

/// Input resolution of the CLIP ViT-B/32 image tower.
pub const CLIP_IMAGE_SIZE: usize = 224;

#[derive(Debug, Clone)]
/// Configuration for [`FacadeEncoder`](super::FacadeEncoder).
pub struct EncoderConfig {
    /// Path to the CLIP safetensors weights.
    pub model_path: PathBuf,
    /// Output embedding dimension.
    pub embedding_dim: usize,
    /// Square input resolution fed to the vision tower.
    pub image_size: usize,
    /// If true, run in deterministic stub mode (no model files required).
    pub testing_stub: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::new(),
            embedding_dim: CLIP_EMBEDDING_DIM,
            image_size: CLIP_IMAGE_SIZE,
            testing_stub: false,
        }
    }
}

impl EncoderConfig {
    /// Creates a config for a weights file.
    pub fn new<P: Into<PathBuf>>(model_path: P) -> Self {
        Self {
            model_path: model_path.into(),
            ..Default::default()
        }
    }

    /// Creates a stub config (no model files; produces deterministic embeddings).
    pub fn stub() -> Self {
        Self {
            testing_stub: true,
            ..Default::default()
        }
    }

    /// Validates required fields for non-stub mode.
    pub fn validate(&self) -> Result<(), EncoderError> {
        if self.embedding_dim == 0 || self.image_size == 0 {
            return Err(EncoderError::InvalidConfig {
                reason: "embedding_dim and image_size must be positive".to_string(),
            });
        }

        if self.testing_stub {
            return Ok(());
        }

        if self.model_path.as_os_str().is_empty() {
            return Err(EncoderError::InvalidConfig {
                reason: "model_path is required (stubbing is disabled)".to_string(),
            });
        }

        if !self.model_path.exists() {
            return Err(EncoderError::ModelNotFound {
                path: self.model_path.clone(),
            });
        }

        Ok(())
    }

    /// Returns `true` if the weights file exists.
    pub fn model_available(&self) -> bool {
        !self.model_path.as_os_str().is_empty() && self.model_path.exists()
    }
}
