//! Durable persistence for the cart blob.
//!
//! The cart is stored as a single serialized JSON record under a fixed file
//! name, scoped per installation. Missing or malformed data loads as "no cart
//! yet" rather than an error; only I/O faults surface as failures.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use super::Cart;

/// Fixed file name of the cart blob inside the data directory.
const CART_FILE: &str = "cart.json";

/// Errors that can occur when reading or writing the cart blob.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem read or write failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The cart could not be serialized.
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable key-value persistence of a single cart record.
///
/// `load` returns `Ok(None)` for both missing and malformed payloads; callers
/// substitute an empty cart. `save` failures are reported but must not be
/// treated as fatal - the in-memory cart stays authoritative until the next
/// successful save.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Load the persisted cart, if any.
    async fn load(&self) -> Result<Option<Cart>, StoreError>;

    /// Persist the cart, replacing any previous record.
    async fn save(&self, cart: &Cart) -> Result<(), StoreError>;
}

/// Decode a persisted blob, treating malformed data as absent.
fn decode(blob: &str) -> Option<Cart> {
    match serde_json::from_str::<Cart>(blob) {
        Ok(cart) => Some(cart),
        Err(err) => {
            warn!(error = %err, "persisted cart is malformed; treating as absent");
            None
        }
    }
}

/// File-backed cart store writing a single JSON blob in the data directory.
///
/// Writes go through a temp file and an atomic rename so a crashed write never
/// truncates the previous blob.
#[derive(Debug, Clone)]
pub struct FileCartStore {
    path: PathBuf,
}

impl FileCartStore {
    /// Create a store rooted at `data_dir`. The directory is created on the
    /// first save.
    #[must_use]
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(CART_FILE),
        }
    }

    /// Path of the persisted blob.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CartStore for FileCartStore {
    async fn load(&self) -> Result<Option<Cart>, StoreError> {
        let blob = match tokio::fs::read_to_string(&self.path).await {
            Ok(blob) => blob,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::Io(err)),
        };
        Ok(decode(&blob))
    }

    async fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        let blob = serde_json::to_vec(cart)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &blob).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// In-memory cart store used as a test double.
///
/// Supports save-failure injection and exposes the raw blob plus a save
/// counter so tests can assert which mutations actually issued a write.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    blob: Option<String>,
    fail_saves: bool,
    save_count: usize,
}

impl MemoryCartStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with a raw JSON blob.
    #[must_use]
    pub fn with_blob(blob: &str) -> Self {
        let store = Self::new();
        store.lock().blob = Some(blob.to_string());
        store
    }

    /// Make subsequent saves fail with an I/O error.
    pub fn fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    /// Number of save attempts seen so far (including failed ones).
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.lock().save_count
    }

    /// The currently stored raw blob, if any.
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.lock().blob.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        self.inner.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn load(&self) -> Result<Option<Cart>, StoreError> {
        let blob = self.lock().blob.clone();
        Ok(blob.as_deref().and_then(decode))
    }

    async fn save(&self, cart: &Cart) -> Result<(), StoreError> {
        let blob = serde_json::to_string(cart)?;
        let mut inner = self.lock();
        inner.save_count += 1;
        if inner.fail_saves {
            return Err(StoreError::Io(std::io::Error::other("injected save failure")));
        }
        inner.blob = Some(blob);
        Ok(())
    }
}
