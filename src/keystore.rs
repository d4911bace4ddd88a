// Local API key persistence.
//
// The key lives in config/credentials.toml. Saving writes the file,
// removing deletes it; load tolerates a missing or malformed file and
// falls back to demo mode (no key).

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::CredentialsConfig;

#[derive(Debug, Error)]
pub enum KeyStoreError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize credentials: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Serialize)]
struct CredentialsFile<'a> {
    api_key: &'a str,
}

/// File-backed store for the single API key string.
pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        KeyStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored key. Returns `None` when the file is missing,
    /// unparseable, or holds an empty key.
    pub fn load(&self) -> Option<String> {
        let text = std::fs::read_to_string(&self.path).ok()?;
        let credentials: CredentialsConfig = toml::from_str(&text).ok()?;
        credentials
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }

    /// Persist a key, replacing any previous one.
    pub fn save(&self, key: &str) -> Result<(), KeyStoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| KeyStoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }

        let text = toml::to_string(&CredentialsFile {
            api_key: key.trim(),
        })?;
        std::fs::write(&self.path, text).map_err(|source| KeyStoreError::Write {
            path: self.path.clone(),
            source,
        })?;

        info!("API key saved to {}", self.path.display());
        Ok(())
    }

    /// Remove the stored key, reverting to demo mode. Succeeds when the
    /// file is already gone.
    pub fn clear(&self) -> Result<(), KeyStoreError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|source| KeyStoreError::Remove {
                path: self.path.clone(),
                source,
            })?;
            info!("API key removed from {}", self.path.display());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &Path) -> KeyStore {
        KeyStore::new(dir.join("credentials.toml"))
    }

    #[test]
    fn load_missing_file_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(store_in(tmp.path()).load().is_none());
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());

        store.save("gsk_abc123").unwrap();
        assert_eq!(store.load().as_deref(), Some("gsk_abc123"));
    }

    #[test]
    fn save_trims_whitespace() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());

        store.save("  gsk_padded  ").unwrap();
        assert_eq!(store.load().as_deref(), Some("gsk_padded"));
    }

    #[test]
    fn save_overwrites_previous_key() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());

        store.save("gsk_first").unwrap();
        store.save("gsk_second").unwrap();
        assert_eq!(store.load().as_deref(), Some("gsk_second"));
    }

    #[test]
    fn clear_removes_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());

        store.save("gsk_abc").unwrap();
        store.clear().unwrap();
        assert!(store.load().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn clear_on_missing_file_is_ok() {
        let tmp = tempfile::tempdir().unwrap();
        store_in(tmp.path()).clear().unwrap();
    }

    #[test]
    fn load_tolerates_malformed_file() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        std::fs::write(store.path(), "api_key = [not toml").unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn load_treats_empty_key_as_demo_mode() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store_in(tmp.path());
        std::fs::write(store.path(), r#"api_key = """#).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn save_creates_parent_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let store = KeyStore::new(tmp.path().join("nested/config/credentials.toml"));
        store.save("gsk_nested").unwrap();
        assert_eq!(store.load().as_deref(), Some("gsk_nested"));
    }
}
