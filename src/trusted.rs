// Trusted origin registry — the mutable allow-list behind /add_trusted_url.
//
// The list lives in a YAML file (one `trusted_urls` field), is loaded once at
// startup, and is rewritten wholesale on every successful add. All reads and
// the add sequence go through a single tokio Mutex, so concurrent adds can
// neither lose updates nor slip past the duplicate check.
//
// Persistence order: the file is written first and the in-memory list is
// committed only after the write succeeds. A failed write leaves the list
// exactly as it was.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

/// On-disk shape of the trusted-origin file.
#[derive(Debug, Serialize, Deserialize)]
struct TrustedUrlsFile {
    #[serde(default)]
    trusted_urls: Vec<String>,
}

/// Outcome of an add attempt. Authorization and duplicate failures are
/// expected outcomes, not errors — the HTTP layer reports all three variants
/// with status 200 and a success flag.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// The origin was appended and persisted; carries the updated list.
    Added(Vec<String>),
    /// The presented secret did not match.
    Unauthorized,
    /// The origin was already registered; carries the unchanged list.
    Duplicate(Vec<String>),
}

/// Single synchronized owner of the trusted-origin list.
pub struct TrustedOriginStore {
    path: PathBuf,
    secret: String,
    origins: Mutex<Vec<String>>,
}

impl TrustedOriginStore {
    /// Load the list from disk. A missing or malformed file is a fatal
    /// startup error.
    pub fn load(path: &Path, secret: &str) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read trusted-origin file {}", path.display()))?;
        let file: TrustedUrlsFile = serde_yaml::from_str(&raw)
            .with_context(|| format!("Malformed trusted-origin file {}", path.display()))?;

        info!(
            origins = file.trusted_urls.len(),
            "Loaded trusted origins from {}",
            path.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            secret: secret.to_string(),
            origins: Mutex::new(file.trusted_urls),
        })
    }

    /// Snapshot of the current list.
    pub async fn origins(&self) -> Vec<String> {
        self.origins.lock().await.clone()
    }

    /// Register a new trusted origin.
    ///
    /// The secret check, duplicate check, file rewrite, and in-memory commit
    /// all happen under one lock. Only an actual persistence failure is an
    /// `Err`; rejections are `Ok` outcomes.
    pub async fn add(&self, url: &str, presented_secret: &str) -> Result<AddOutcome> {
        if !secrets_match(&self.secret, presented_secret) {
            return Ok(AddOutcome::Unauthorized);
        }

        let mut origins = self.origins.lock().await;
        if origins.iter().any(|o| o == url) {
            return Ok(AddOutcome::Duplicate(origins.clone()));
        }

        let mut updated = origins.clone();
        updated.push(url.to_string());

        let yaml = serde_yaml::to_string(&TrustedUrlsFile {
            trusted_urls: updated.clone(),
        })
        .context("Failed to serialize trusted-origin list")?;
        tokio::fs::write(&self.path, yaml).await.with_context(|| {
            format!("Failed to persist trusted-origin file {}", self.path.display())
        })?;

        // Write succeeded — now the new list becomes authoritative.
        *origins = updated.clone();
        info!(url, "Registered trusted origin");
        Ok(AddOutcome::Added(updated))
    }
}

/// Constant-time string comparison to prevent timing attacks on the secret.
fn secrets_match(expected: &str, presented: &str) -> bool {
    expected.len() == presented.len()
        && expected
            .bytes()
            .zip(presented.bytes())
            .fold(0u8, |acc, (x, y)| acc | (x ^ y))
            == 0
}
