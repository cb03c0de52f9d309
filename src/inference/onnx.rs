// Local ONNX scoring backend.
//
// Runs the exported toxic-comment classifier entirely on the local CPU — no
// API calls, no network dependency. The graph takes an `input_ids` tensor of
// shape [batch, seq_len] (int64) and returns one probability per row; the
// final sigmoid is baked into the graph, so outputs are already in [0, 1].

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::Tensor;
use tracing::debug;

use super::traits::ToxicityModel;

/// ONNX-backed classifier. Holds the session behind Arc<Mutex> so inference
/// can be offloaded to spawn_blocking without blocking the async runtime.
pub struct OnnxModel {
    // Arc+Mutex because:
    // 1. ort::Session::run takes &mut self, so we need interior mutability
    // 2. spawn_blocking requires 'static, so we need Arc for shared ownership
    // 3. The ToxicityModel trait requires Send+Sync
    // The lock also serializes concurrent in-flight requests through the
    // session, which ort does not guarantee to be safe to share otherwise.
    session: Arc<Mutex<Session>>,
}

impl OnnxModel {
    /// Load the model artifact. A missing or corrupt artifact is a fatal
    /// startup error — the caller must not start serving without it.
    pub fn load(model_path: &Path) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!(
                "Model file not found: {}\nSet DETOXIC_MODEL_PATH to the exported ONNX artifact.",
                model_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        debug!("Loaded ONNX model from {}", model_path.display());

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
        })
    }
}

#[async_trait]
impl ToxicityModel for OnnxModel {
    /// One forward pass for the whole batch. CPU-bound work runs inside
    /// spawn_blocking so the tokio runtime stays responsive.
    async fn infer(&self, batch: &[Vec<u32>]) -> Result<Vec<f32>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let batch_size = batch.len();
        let seq_len = batch[0].len();
        if batch.iter().any(|seq| seq.len() != seq_len) {
            anyhow::bail!("Ragged batch: all sequences must share one padded length");
        }

        // Flatten to a [batch, seq_len] tensor buffer ('static for spawn_blocking).
        let mut input_ids_flat: Vec<i64> = Vec::with_capacity(batch_size * seq_len);
        for seq in batch {
            input_ids_flat.extend(seq.iter().map(|&id| id as i64));
        }

        let session = Arc::clone(&self.session);

        tokio::task::spawn_blocking(move || {
            let shape = [batch_size as i64, seq_len as i64];
            let input_ids_tensor = Tensor::from_array((shape, input_ids_flat))
                .context("Failed to create input_ids tensor")?;

            let probs = {
                let mut session = session
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

                let outputs = session
                    .run(ort::inputs! { "input_ids" => input_ids_tensor })
                    .context("ONNX inference failed")?;

                // Output shape: [batch_size, 1] — sigmoid probabilities
                let (_out_shape, data) = outputs[0]
                    .try_extract_tensor::<f32>()
                    .context("Failed to extract output tensor")?;

                data.to_vec()
            };

            if probs.len() != batch_size {
                anyhow::bail!(
                    "Model returned {} probabilities for a batch of {}",
                    probs.len(),
                    batch_size
                );
            }

            Ok(probs)
        })
        .await
        .context("spawn_blocking panicked")?
    }
}
