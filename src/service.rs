// Prediction service — orchestrates the full pipeline:
// normalize → encode → pad → infer → threshold.
//
// The batch path issues a single batched inference call rather than looping
// over predict_one, so a batch costs one forward pass. There is no retry and
// no partial-batch recovery: if inference fails, the whole batch fails.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;

use crate::inference::ToxicityModel;
use crate::text::normalize;
use crate::tokenizer::TextEncoder;

/// Classification threshold: strictly greater than this is toxic, so a
/// probability of exactly 0.5 is not.
pub const TOXIC_THRESHOLD: f32 = 0.5;

/// One classification outcome, returned to the caller and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub toxic_probability: f32,
    pub is_toxic: bool,
}

impl Prediction {
    fn from_probability(prob: f32) -> Self {
        Self {
            toxic_probability: prob,
            is_toxic: prob > TOXIC_THRESHOLD,
        }
    }
}

/// The externally exposed prediction pipeline. Stateless apart from the
/// encoder and the shared model handle, so it is freely shared across
/// concurrent requests.
pub struct PredictionService {
    encoder: TextEncoder,
    model: Arc<dyn ToxicityModel>,
}

impl PredictionService {
    pub fn new(encoder: TextEncoder, model: Arc<dyn ToxicityModel>) -> Self {
        Self { encoder, model }
    }

    /// Classify a single comment.
    pub async fn predict_one(&self, comment: &str) -> Result<Prediction> {
        let comments = [comment.to_string()];
        let mut results = self.predict_batch(&comments).await?;
        Ok(results.remove(0))
    }

    /// Classify a batch of comments with one inference call, preserving
    /// input order. An empty batch yields an empty result.
    pub async fn predict_batch(&self, comments: &[String]) -> Result<Vec<Prediction>> {
        if comments.is_empty() {
            return Ok(Vec::new());
        }

        let batch: Vec<Vec<u32>> = comments
            .iter()
            .map(|c| self.encoder.encode_padded(&normalize(Some(c))))
            .collect();

        let probs = self.model.infer(&batch).await?;

        Ok(probs.into_iter().map(Prediction::from_probability).collect())
    }
}
