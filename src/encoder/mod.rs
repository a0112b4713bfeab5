//! Facade image encoder (CLIP vision tower via candle).
//!
//! Use [`EncoderConfig::stub`] for tests/examples without model weights.
//! Both backends decode the photo first, so undecodable bytes surface as
//! [`EncoderError::InvalidImage`] regardless of mode.

/// Encoder configuration.
pub mod config;
/// Device selection (CPU / Metal / CUDA).
pub mod device;
mod error;
/// Image decode + pixel tensor preparation.
pub mod preprocess;


pub use config::{CLIP_EMBEDDING_DIM, CLIP_IMAGE_SIZE, EncoderConfig};
pub use error::EncoderError;

use std::sync::Arc;

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use candle_transformers::models::clip::{ClipConfig, ClipModel};
use tracing::{debug, info, warn};

use crate::vectors::l2_normalize;

use device::select_device;
use preprocess::decode_to_rgb;

enum EncoderBackend {
    Model {
        model: Arc<ClipModel>,
        device: Device,
    },
    Stub,
}

/// Converts raw photo bytes into a fixed-length, L2-normalized query vector.
///
/// Model state is read-only after load; `encode` is safe to call from many
/// threads at once.
pub struct FacadeEncoder {
    backend: EncoderBackend,
    config: EncoderConfig,
}

impl std::fmt::Debug for FacadeEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacadeEncoder")
            .field(
                "backend",
                &match &self.backend {
                    EncoderBackend::Model { device, .. } => format!("Model({:?})", device),
                    EncoderBackend::Stub => "Stub".to_string(),
                },
            )
            .field("embedding_dim", &self.config.embedding_dim)
            .field("image_size", &self.config.image_size)
            .finish()
    }
}

impl FacadeEncoder {
    /// Loads the encoder from a config (stub mode is supported).
    pub fn load(config: EncoderConfig) -> Result<Self, EncoderError> {
        config.validate()?;

        if config.testing_stub {
            warn!("Facade encoder running in STUB mode (testing only)");
            return Ok(Self {
                backend: EncoderBackend::Stub,
                config,
            });
        }

        let device = select_device();
        debug!(?device, "Selected compute device for CLIP");

        if !config.model_available() {
            return Err(EncoderError::ModelNotFound {
                path: config.model_path.clone(),
            });
        }

        let model = Self::load_model(&config, &device)?;

        info!(
            model_path = %config.model_path.display(),
            embedding_dim = config.embedding_dim,
            image_size = config.image_size,
            "CLIP vision encoder loaded"
        );

        Ok(Self {
            backend: EncoderBackend::Model {
                model: Arc::new(model),
                device,
            },
            config,
        })
    }

    fn load_model(config: &EncoderConfig, device: &Device) -> Result<ClipModel, EncoderError> {
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[config.model_path.clone()], DType::F32, device)
                .map_err(|e| EncoderError::ModelLoadFailed {
                    reason: format!("Failed to map safetensors: {}", e),
                })?
        };

        let clip_config = ClipConfig::vit_base_patch32();

        ClipModel::new(vb, &clip_config).map_err(|e| EncoderError::ModelLoadFailed {
            reason: format!("Failed to build CLIP model: {}", e),
        })
    }

    /// Encodes one photo into a unit vector.
    ///
    /// Fails with [`EncoderError::InvalidImage`] when the bytes cannot be
    /// decoded as an image. Normalization is a post-condition: callers never
    /// see an unnormalized vector.
    pub fn encode(&self, image_bytes: &[u8]) -> Result<Vec<f32>, EncoderError> {
        let rgb = decode_to_rgb(image_bytes, self.config.image_size)?;

        let mut embedding = match &self.backend {
            EncoderBackend::Model { model, device } => {
                self.encode_with_model(&rgb, model, device)?
            }
            EncoderBackend::Stub => self.encode_stub(&rgb),
        };

        l2_normalize(&mut embedding);
        Ok(embedding)
    }

    fn encode_with_model(
        &self,
        rgb: &[u8],
        model: &Arc<ClipModel>,
        device: &Device,
    ) -> Result<Vec<f32>, EncoderError> {
        let pixels = preprocess::rgb_to_pixel_tensor(rgb, self.config.image_size, device)?;

        debug!(image_size = self.config.image_size, "Encoding photo (CLIP forward pass)");

        let features = model
            .get_image_features(&pixels)
            .map_err(|e| EncoderError::InferenceFailed {
                reason: format!("CLIP forward pass failed: {}", e),
            })?;

        let embedding = features
            .squeeze(0)
            .and_then(|t| t.to_vec1::<f32>())
            .map_err(|e| EncoderError::InferenceFailed {
                reason: format!("Failed to extract image features: {}", e),
            })?;

        if embedding.len() != self.config.embedding_dim {
            return Err(EncoderError::InvalidConfig {
                reason: format!(
                    "model produced {} dims, config expects {}",
                    embedding.len(),
                    self.config.embedding_dim
                ),
            });
        }

        Ok(embedding)
    }

    /// Deterministic embedding derived from the decoded pixels, for tests.
    fn encode_stub(&self, rgb: &[u8]) -> Vec<f32> {
        debug!(pixel_bytes = rgb.len(), "Generating stub embedding");

        let mut reader = blake3::Hasher::new().update(rgb).finalize_xof();

        let mut bytes = vec![0u8; self.config.embedding_dim * 4];
        reader.fill(&mut bytes);

        bytes
            .chunks_exact(4)
            .map(|chunk| {
                let bits = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                bits as f32 / u32::MAX as f32
            })
            .collect()
    }

    /// Returns the configured output embedding dimension.
    pub fn embedding_dim(&self) -> usize {
        self.config.embedding_dim
    }

    /// Returns `true` if running in stub mode.
    pub fn is_stub(&self) -> bool {
        matches!(self.backend, EncoderBackend::Stub)
    }

    /// Returns the encoder configuration.
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }
}
