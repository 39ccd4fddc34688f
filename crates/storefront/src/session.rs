//! Persisted session marker.
//!
//! A separate record beside the cart blob holding the opaque auth token the
//! catalog API issued. The presentation layer reads it at startup to decide
//! routing; the cart reconciliation service does not depend on it.

use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::cart::StoreError;

/// Fixed file name of the session blob inside the data directory.
const SESSION_FILE: &str = "session.json";

/// An authenticated session.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct Session {
    /// Opaque token issued by the catalog's auth endpoint.
    pub token: SecretString,
    /// Username the token was issued for, when known.
    pub username: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("username", &self.username)
            .finish()
    }
}

/// On-disk layout of the session record.
#[derive(Serialize, Deserialize)]
struct SessionRecord {
    token: String,
    #[serde(default)]
    username: Option<String>,
}

/// File-backed store for the session marker.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store rooted at `data_dir`.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SESSION_FILE),
        }
    }

    /// Load the persisted session, if any. Malformed data loads as absent.
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O faults other than a missing file.
    pub async fn load(&self) -> Result<Option<Session>, StoreError> {
        let blob = match tokio::fs::read_to_string(&self.path).await {
            Ok(blob) => blob,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::Io(err)),
        };

        match serde_json::from_str::<SessionRecord>(&blob) {
            Ok(record) => Ok(Some(Session {
                token: SecretString::from(record.token),
                username: record.username,
            })),
            Err(err) => {
                tracing::warn!(error = %err, "persisted session is malformed; treating as absent");
                Ok(None)
            }
        }
    }

    /// Persist the session, replacing any previous record.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the filesystem write fails.
    pub async fn save(&self, session: &Session) -> Result<(), StoreError> {
        let record = SessionRecord {
            token: session.token.expose_secret().to_string(),
            username: session.username.clone(),
        };
        let blob = serde_json::to_vec(&record)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &blob).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Remove the persisted session (logout). Removing an already-absent
    /// session is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error for I/O faults other than a missing file.
    pub async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Io(err)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        let session = Session {
            token: SecretString::from("tok-123"),
            username: Some("johnd".to_string()),
        };
        store.save(&session).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.token.expose_secret(), "tok-123");
        assert_eq!(loaded.username.as_deref(), Some("johnd"));
    }

    #[tokio::test]
    async fn test_missing_session_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        store.clear().await.unwrap();

        let session = Session {
            token: SecretString::from("tok"),
            username: None,
        };
        store.save(&session).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session {
            token: SecretString::from("super-secret"),
            username: Some("johnd".to_string()),
        };
        let debug_output = format!("{session:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret"));
    }
}
