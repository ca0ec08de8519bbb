//! Durable storage for the session's token pair
//!
//! The store owns the session: tokens are only ever written through
//! `save_tokens` and removed through `clear_tokens`. Storage problems are
//! deliberately not surfaced as errors; a missing value reads as an absent
//! session.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Where the session's access and refresh tokens live.
///
/// Implementations must tolerate concurrent readers and writers; callers
/// never hold a snapshot across their own suspension points.
pub trait TokenStore: Send + Sync {
    /// Persist both tokens, overwriting any prior values
    fn save_tokens(&self, access_token: &str, refresh_token: &str);

    /// Remove both tokens; idempotent
    fn clear_tokens(&self);

    /// The persisted access token, if any
    fn access_token(&self) -> Option<String>;

    /// The persisted refresh token, if any
    fn refresh_token(&self) -> Option<String>;
}

/// In-process store for ephemeral sessions and tests
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: Mutex<(Option<String>, Option<String>)>,
}

impl MemoryTokenStore {
    /// Create an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn save_tokens(&self, access_token: &str, refresh_token: &str) {
        let mut tokens = self.tokens.lock().unwrap();
        *tokens = (Some(access_token.to_string()), Some(refresh_token.to_string()));
    }

    fn clear_tokens(&self) {
        let mut tokens = self.tokens.lock().unwrap();
        *tokens = (None, None);
    }

    fn access_token(&self) -> Option<String> {
        self.tokens.lock().unwrap().0.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.tokens.lock().unwrap().1.clone()
    }
}

/// On-disk JSON file persisted under fixed keys
#[derive(Serialize, Deserialize, Default)]
struct StoredTokens {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// File-backed store; the session survives process restarts
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Create a store backed by the given file path
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The default per-user location for the session file
    pub fn default_path() -> Option<PathBuf> {
        let dirs = directories::ProjectDirs::from("io", "indiquant", "indiquant")?;
        Some(dirs.data_dir().join("session.json"))
    }

    fn read(&self) -> StoredTokens {
        match std::fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => StoredTokens::default(),
        }
    }

    fn write(&self, tokens: &StoredTokens) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!("failed to create session directory: {}", e);
                return;
            }
        }
        match serde_json::to_vec(tokens) {
            Ok(bytes) => {
                if let Err(e) = std::fs::write(&self.path, bytes) {
                    warn!("failed to persist session: {}", e);
                }
            }
            Err(e) => warn!("failed to encode session: {}", e),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn save_tokens(&self, access_token: &str, refresh_token: &str) {
        self.write(&StoredTokens {
            access_token: Some(access_token.to_string()),
            refresh_token: Some(refresh_token.to_string()),
        });
    }

    fn clear_tokens(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("failed to clear session: {}", e);
            }
        }
    }

    fn access_token(&self) -> Option<String> {
        self.read().access_token
    }

    fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_tokens() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token(), None);

        store.save_tokens("access-1", "refresh-1");
        assert_eq!(store.access_token().as_deref(), Some("access-1"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));

        // overwrite
        store.save_tokens("access-2", "refresh-2");
        assert_eq!(store.access_token().as_deref(), Some("access-2"));

        store.clear_tokens();
        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token(), None);
        // clearing again is fine
        store.clear_tokens();
    }

    #[test]
    fn file_store_round_trips_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileTokenStore::new(&path);
        assert_eq!(store.access_token(), None);

        store.save_tokens("access-1", "refresh-1");
        assert_eq!(store.access_token().as_deref(), Some("access-1"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));

        // a second store over the same file sees the session
        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.access_token().as_deref(), Some("access-1"));

        store.clear_tokens();
        assert_eq!(store.access_token(), None);
        store.clear_tokens();
    }

    #[test]
    fn file_store_ignores_corrupt_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not json").unwrap();

        let store = FileTokenStore::new(&path);
        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token(), None);
    }
}
