//! Client-side persistence.
//!
//! The browser build of this app kept one local-storage key per concern;
//! here each key is a small versioned JSON document in a data directory.
//! Two documents exist: the selected character (restored once at startup,
//! written through on every mutation) and the bearer token (cleared on
//! session expiry). The companion roster is never persisted.
//!
//! The character write-through is a best-effort side channel: it is not
//! part of the session state's consistency guarantees, and
//! [`ClientStore::save_character_best_effort`] only logs failures.

use crate::character::Character;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current store document version.
const STORE_VERSION: u32 = 1;

const CHARACTER_FILE: &str = "selected_character.json";
const TOKEN_FILE: &str = "token.json";

#[derive(Debug, Serialize, Deserialize)]
struct StoredCharacter {
    version: u32,
    character: Character,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    version: u32,
    token: String,
}

/// Durable client-side key-value store rooted at a directory.
#[derive(Debug, Clone)]
pub struct ClientStore {
    dir: PathBuf,
}

impl ClientStore {
    /// Create a store rooted at the given directory. The directory is
    /// created lazily on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Create a store from the `TAVERNKEEP_DATA_DIR` environment
    /// variable, falling back to `.tavernkeep` in the working directory.
    pub fn from_env() -> Self {
        let dir = std::env::var("TAVERNKEEP_DATA_DIR")
            .unwrap_or_else(|_| ".tavernkeep".to_string());
        Self::new(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    // ========================================================================
    // Selected character
    // ========================================================================

    /// Load the persisted character, or `None` if nothing was saved yet.
    pub async fn load_character(&self) -> Result<Option<Character>, StoreError> {
        match fs::read_to_string(self.dir.join(CHARACTER_FILE)).await {
            Ok(content) => {
                let stored: StoredCharacter = serde_json::from_str(&content)?;
                if stored.version != STORE_VERSION {
                    return Err(StoreError::VersionMismatch {
                        expected: STORE_VERSION,
                        found: stored.version,
                    });
                }
                Ok(Some(stored.character))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the selected character.
    pub async fn save_character(&self, character: &Character) -> Result<(), StoreError> {
        let stored = StoredCharacter {
            version: STORE_VERSION,
            character: character.clone(),
        };
        self.write_document(CHARACTER_FILE, &stored).await
    }

    /// Write-through used after every character mutation. Failures are
    /// logged and swallowed; durable state may lag the session state.
    pub async fn save_character_best_effort(&self, character: &Character) {
        if let Err(e) = self.save_character(character).await {
            tracing::warn!(error = %e, "failed to persist selected character");
        }
    }

    /// Forget the persisted character.
    pub async fn clear_character(&self) -> Result<(), StoreError> {
        self.remove_document(CHARACTER_FILE).await
    }

    // ========================================================================
    // Bearer token
    // ========================================================================

    /// Load the persisted bearer token, if any.
    pub async fn load_token(&self) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.dir.join(TOKEN_FILE)).await {
            Ok(content) => {
                let stored: StoredToken = serde_json::from_str(&content)?;
                if stored.version != STORE_VERSION {
                    return Err(StoreError::VersionMismatch {
                        expected: STORE_VERSION,
                        found: stored.version,
                    });
                }
                Ok(Some(stored.token))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the bearer token.
    pub async fn save_token(&self, token: &str) -> Result<(), StoreError> {
        let stored = StoredToken {
            version: STORE_VERSION,
            token: token.to_string(),
        };
        self.write_document(TOKEN_FILE, &stored).await
    }

    /// Forget the persisted token (used on logout and session expiry).
    pub async fn clear_token(&self) -> Result<(), StoreError> {
        self.remove_document(TOKEN_FILE).await
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn write_document<T: Serialize>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).await?;
        let content = serde_json::to_string_pretty(value)?;
        fs::write(self.dir.join(file), content).await?;
        Ok(())
    }

    async fn remove_document(&self, file: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.dir.join(file)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::sample_character;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_character_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = ClientStore::new(temp_dir.path());

        let mut character = sample_character("Grimjaw");
        character.xp = 250;
        character.level = 2;

        store.save_character(&character).await.expect("save");
        let loaded = store.load_character().await.expect("load");

        assert_eq!(loaded, Some(character));
    }

    #[tokio::test]
    async fn test_load_missing_character_is_none() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = ClientStore::new(temp_dir.path().join("never_written"));

        assert_eq!(store.load_character().await.expect("load"), None);
    }

    #[tokio::test]
    async fn test_version_mismatch_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = ClientStore::new(temp_dir.path());

        store
            .save_character(&sample_character("Grimjaw"))
            .await
            .expect("save");

        // Doctor the version field on disk.
        let path = temp_dir.path().join(CHARACTER_FILE);
        let content = std::fs::read_to_string(&path).unwrap();
        let doctored = content.replace("\"version\": 1", "\"version\": 99");
        std::fs::write(&path, doctored).unwrap();

        let result = store.load_character().await;
        assert!(matches!(
            result,
            Err(StoreError::VersionMismatch {
                expected: 1,
                found: 99
            })
        ));
    }

    #[tokio::test]
    async fn test_clear_character() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = ClientStore::new(temp_dir.path());

        store
            .save_character(&sample_character("Grimjaw"))
            .await
            .expect("save");
        store.clear_character().await.expect("clear");

        assert_eq!(store.load_character().await.expect("load"), None);
        // Clearing twice is fine.
        store.clear_character().await.expect("clear again");
    }

    #[tokio::test]
    async fn test_token_round_trip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = ClientStore::new(temp_dir.path());

        assert_eq!(store.load_token().await.expect("load"), None);

        store.save_token("jwt-abc123").await.expect("save");
        assert_eq!(
            store.load_token().await.expect("load"),
            Some("jwt-abc123".to_string())
        );

        store.clear_token().await.expect("clear");
        assert_eq!(store.load_token().await.expect("load"), None);
    }

    #[tokio::test]
    async fn test_best_effort_save_swallows_failure() {
        // A file where the directory should be makes the write fail.
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let blocked = temp_dir.path().join("blocked");
        std::fs::write(&blocked, b"not a directory").unwrap();

        let store = ClientStore::new(&blocked);
        // Must not panic or error.
        store
            .save_character_best_effort(&sample_character("Grimjaw"))
            .await;
    }
}
