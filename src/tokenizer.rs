// Vocabulary encoding and sequence padding.
//
// The tokenizer is not trained here — it is reconstructed from a persisted
// config (tokenizer_config.json) exported alongside the model. The config
// carries the full word index plus the runtime settings the training
// tokenizer used (lowercasing, filter characters, split delimiter), and the
// encoder honours all of them so token ids match what the model was fed
// during training.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

/// Persisted tokenizer settings, read once at startup and never mutated.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenizerConfig {
    /// Vocabulary cap: only words ranked in [1, max_vocab_size] are kept.
    pub max_vocab_size: u32,
    /// Placeholder substituted for words outside the vocabulary.
    pub oov_token: String,
    /// Characters stripped from input before splitting.
    pub filters: String,
    /// Whether the training tokenizer lowercased its input.
    pub lower: bool,
    /// Token split delimiter (a single space in practice).
    pub split: String,
    /// When true, every character is a token instead of every word.
    pub char_level: bool,
    /// Full word → rank mapping from training (uncapped).
    pub word_index: HashMap<String, u32>,
    /// Fixed model input length; sequences are padded/truncated to this.
    pub max_sequence_length: usize,
}

impl TokenizerConfig {
    /// Load the tokenizer config from a JSON file. Missing or malformed
    /// config is a fatal startup error.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tokenizer config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Malformed tokenizer config {}", path.display()))?;
        debug!(
            vocab_entries = config.word_index.len(),
            max_vocab_size = config.max_vocab_size,
            max_sequence_length = config.max_sequence_length,
            "Loaded tokenizer config"
        );
        Ok(config)
    }
}

/// Immutable word → index mapping, capped at construction time.
///
/// Index 0 is reserved for padding and never appears in the mapping; every
/// retained index lies in [1, max_vocab_size]. Words ranked beyond the cap
/// are dropped from the mapping entirely, so they resolve to the
/// out-of-vocabulary index at lookup like any other unknown word.
pub struct Vocabulary {
    index: HashMap<String, u32>,
    oov_index: u32,
}

impl Vocabulary {
    /// Build the capped vocabulary from a full word index.
    ///
    /// Fails if the out-of-vocabulary token itself is missing from the index
    /// or ranked beyond the cap — without a usable OOV index every unknown
    /// word would be unrepresentable.
    pub fn from_word_index(
        word_index: &HashMap<String, u32>,
        max_vocab_size: u32,
        oov_token: &str,
    ) -> Result<Self> {
        let index: HashMap<String, u32> = word_index
            .iter()
            .filter(|(_, &rank)| rank >= 1 && rank <= max_vocab_size)
            .map(|(word, &rank)| (word.clone(), rank))
            .collect();

        let oov_index = *index.get(oov_token).with_context(|| {
            format!("OOV token {oov_token:?} not in the capped vocabulary")
        })?;

        Ok(Self { index, oov_index })
    }

    /// Look up a token, substituting the OOV index for unknown words.
    pub fn index_of(&self, token: &str) -> u32 {
        self.index.get(token).copied().unwrap_or(self.oov_index)
    }

    pub fn oov_index(&self) -> u32 {
        self.oov_index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Turns normalized text into fixed-length integer sequences.
pub struct TextEncoder {
    vocab: Vocabulary,
    filters: HashSet<char>,
    lower: bool,
    split: String,
    char_level: bool,
    max_sequence_length: usize,
}

impl TextEncoder {
    pub fn from_config(config: &TokenizerConfig) -> Result<Self> {
        let vocab = Vocabulary::from_word_index(
            &config.word_index,
            config.max_vocab_size,
            &config.oov_token,
        )?;
        Ok(Self {
            vocab,
            filters: config.filters.chars().collect(),
            lower: config.lower,
            split: config.split.clone(),
            char_level: config.char_level,
            max_sequence_length: config.max_sequence_length,
        })
    }

    pub fn max_sequence_length(&self) -> usize {
        self.max_sequence_length
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Encode one normalized string into a variable-length token id sequence.
    ///
    /// Empty input yields an empty sequence. Unknown words never fail — they
    /// map to the OOV index.
    pub fn encode(&self, text: &str) -> Vec<u32> {
        let text = if self.lower {
            text.to_lowercase()
        } else {
            text.to_string()
        };
        let text: String = text.chars().filter(|c| !self.filters.contains(c)).collect();

        if self.char_level {
            return text
                .chars()
                .map(|c| self.vocab.index_of(&c.to_string()))
                .collect();
        }

        text.split(self.split.as_str())
            .filter(|t| !t.is_empty())
            .map(|t| self.vocab.index_of(t))
            .collect()
    }

    /// Encode and pad to the configured fixed length.
    pub fn encode_padded(&self, text: &str) -> Vec<u32> {
        pad(&self.encode(text), self.max_sequence_length)
    }
}

/// Fix a sequence to exactly `len` elements: post-truncate when too long,
/// post-pad with zeros when too short.
pub fn pad(seq: &[u32], len: usize) -> Vec<u32> {
    let mut out: Vec<u32> = seq.iter().take(len).copied().collect();
    out.resize(len, 0);
    out
}
