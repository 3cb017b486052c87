//! JSON document store on the local filesystem
//!
//! The collection lives in a single JSON array. Saves go to a scratch file
//! next to the target which is then renamed over it, so readers always see
//! either the previous or the new document.

use crate::storage::GameStore;
use crate::types::{GameCollection, GameRecord};
use crate::utils::generate_scratch_suffix;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Whole collection stored as one JSON file
#[derive(Debug, Clone)]
pub struct JsonFileGameStore {
    path: PathBuf,
}

impl JsonFileGameStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn scratch_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "games.json".to_string());
        self.path
            .with_file_name(format!(".{}.{}.tmp", file_name, generate_scratch_suffix()))
    }
}

#[async_trait]
impl GameStore for JsonFileGameStore {
    async fn load(&self) -> Result<GameCollection> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No collection at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes)
            .with_context(|| format!("Malformed game collection in {}", self.path.display()))
    }

    async fn save(&self, games: &[GameRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let body = serde_json::to_vec_pretty(games).context("Failed to encode game collection")?;
        let scratch = self.scratch_path();
        tokio::fs::write(&scratch, &body)
            .await
            .with_context(|| format!("Failed to write {}", scratch.display()))?;

        if let Err(e) = tokio::fs::rename(&scratch, &self.path).await {
            let _ = tokio::fs::remove_file(&scratch).await;
            return Err(e).with_context(|| format!("Failed to replace {}", self.path.display()));
        }

        debug!("Saved {} games to {}", games.len(), self.path.display());
        Ok(())
    }
}
