use anyhow::Result;
use async_trait::async_trait;

/// A pre-trained binary classifier over fixed-length token id sequences.
///
/// Implementations must be length- and order-preserving: one probability in
/// [0, 1] per input sequence, in input order. Every sequence in a batch must
/// already be padded to the same length; ragged batches are a caller bug and
/// may be rejected with an error.
#[async_trait]
pub trait ToxicityModel: Send + Sync {
    /// Score a batch of sequences. An empty batch yields an empty result.
    async fn infer(&self, batch: &[Vec<u32>]) -> Result<Vec<f32>>;
}
