use std::env;
use std::path::PathBuf;

use anyhow::Result;
use tracing::warn;

/// Secret used when TRUSTED_URLS_PASSWORD is unset. Kept for compatibility
/// with existing deployments; startup logs a warning when it is in effect.
pub const DEFAULT_TRUSTED_URLS_PASSWORD: &str = "changeme";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. All paths
/// default to the conventional artifact names in the working directory.
pub struct Config {
    /// Shared secret gating /add_trusted_url (TRUSTED_URLS_PASSWORD env var).
    pub trusted_urls_password: String,
    /// Path to the exported ONNX model artifact.
    pub model_path: PathBuf,
    /// Path to the persisted tokenizer configuration (JSON).
    pub tokenizer_config_path: PathBuf,
    /// Path to the mutable trusted-origin list (YAML).
    pub trusted_urls_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Never fails today, but returns Result so callers don't churn when a
    /// required variable is introduced.
    pub fn load() -> Result<Self> {
        let trusted_urls_password = match env::var("TRUSTED_URLS_PASSWORD") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                warn!(
                    "TRUSTED_URLS_PASSWORD not set — falling back to the insecure \
                     default. Set it in your .env file before exposing the service."
                );
                DEFAULT_TRUSTED_URLS_PASSWORD.to_string()
            }
        };

        Ok(Self {
            trusted_urls_password,
            model_path: env::var("DETOXIC_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("toxic_comment_cnn_model.onnx")),
            tokenizer_config_path: env::var("DETOXIC_TOKENIZER_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("tokenizer_config.json")),
            trusted_urls_path: env::var("DETOXIC_TRUSTED_URLS")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("trusted_urls.yaml")),
        })
    }
}
