//! JSON file rule store.
//!
//! Rules persist as a pretty-printed JSON array in stored order. Saves
//! go through a temporary file in the target directory followed by an
//! atomic rename, so a crash mid-write never leaves a truncated store.

// ============================================================================
// Imports
// ============================================================================

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::rules::Rule;

use super::RuleStore;

// ============================================================================
// JsonFileStore
// ============================================================================

/// Rule store backed by a single JSON file.
///
/// # Example
///
/// ```ignore
/// use tabherd::storage::JsonFileStore;
///
/// let store = JsonFileStore::new("/home/user/.config/tabherd/rules.json");
/// let rules = store.load().await?;
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    /// Path of the store file.
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store at the given path.
    ///
    /// The file does not need to exist yet; a missing file loads as an
    /// empty rule list.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the store file path.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RuleStore for JsonFileStore {
    async fn load(&self) -> Result<Vec<Rule>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No rule store yet, starting empty");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(Error::persistence(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        let rules: Vec<Rule> = serde_json::from_slice(&bytes).map_err(|e| {
            Error::persistence(format!("corrupt rule store {}: {e}", self.path.display()))
        })?;

        debug!(path = %self.path.display(), count = rules.len(), "Rules loaded");
        Ok(rules)
    }

    async fn save(&self, rules: &[Rule]) -> Result<()> {
        let json = serde_json::to_vec_pretty(rules)?;
        let path = self.path.clone();
        let count = rules.len();

        let result = tokio::task::spawn_blocking(move || write_atomic(&path, &json)).await;

        match result {
            Ok(Ok(())) => {
                debug!(path = %self.path.display(), count, "Rules saved");
                Ok(())
            }
            Ok(Err(e)) => {
                warn!(path = %self.path.display(), error = %e, "Rule save failed");
                Err(e)
            }
            Err(e) => Err(Error::persistence(format!("store task failed: {e}"))),
        }
    }
}

/// Writes `bytes` to `path` via a sibling temporary file and rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    std::fs::create_dir_all(dir)
        .map_err(|e| Error::persistence(format!("failed to create {}: {e}", dir.display())))?;

    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| Error::persistence(format!("failed to create temp file: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| Error::persistence(format!("failed to write rules: {e}")))?;
    tmp.persist(path)
        .map_err(|e| Error::persistence(format!("failed to replace {}: {e}", path.display())))?;

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
