//! Session Store: the single owner of the bearer token.
//!
//! DESIGN
//! ======
//! The token lives in memory for reads and is mirrored to a pluggable
//! [`TokenBackend`] for durability (file for the CLI, `localStorage` in the
//! browser). Every `set`/`clear` bumps a monotonic epoch; in-flight session
//! operations compare epochs before applying a deferred result, so a clear
//! always wins over a response that was already on the wire.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("token storage unavailable: {0}")]
    Unavailable(String),
    #[error("token storage io failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable storage for the token. Contents are opaque and never validated.
pub trait TokenBackend: Send + Sync {
    fn load(&self) -> Result<Option<String>, StoreError>;
    fn save(&self, token: &str) -> Result<(), StoreError>;
    fn remove(&self) -> Result<(), StoreError>;
}

impl<T: TokenBackend + ?Sized> TokenBackend for Arc<T> {
    fn load(&self) -> Result<Option<String>, StoreError> {
        (**self).load()
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        (**self).save(token)
    }

    fn remove(&self) -> Result<(), StoreError> {
        (**self).remove()
    }
}

// =============================================================================
// BACKENDS
// =============================================================================

/// Process-local backend. Shared through `Arc` it survives store rebuilds,
/// which is how tests model a page reload.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    token: Mutex<Option<String>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn with_token(token: &str) -> Self {
        Self { token: Mutex::new(Some(token.to_owned())) }
    }
}

impl TokenBackend for MemoryBackend {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(lock(&self.token).clone())
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        *lock(&self.token) = Some(token.to_owned());
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        *lock(&self.token) = None;
        Ok(())
    }
}

/// Token persisted as a single-line file.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: std::path::PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileBackend {
    #[must_use]
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl TokenBackend for FileBackend {
    fn load(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => {
                let token = raw.trim();
                Ok((!token.is_empty()).then(|| token.to_owned()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(&self.path, token)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn remove(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Callback run after every [`SessionStore::clear`].
pub type ClearListener = Arc<dyn Fn() + Send + Sync>;

pub struct SessionStore {
    backend: Box<dyn TokenBackend>,
    token: Mutex<Option<String>>,
    epoch: AtomicU64,
    clear_listeners: Mutex<Vec<ClearListener>>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("has_token", &self.has_token())
            .field("epoch", &self.epoch())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Build a store, loading any token the backend already holds.
    pub fn new(backend: impl TokenBackend + 'static) -> Self {
        let token = backend.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load persisted token; starting without one");
            None
        });
        Self {
            backend: Box::new(backend),
            token: Mutex::new(token),
            epoch: AtomicU64::new(0),
            clear_listeners: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::default())
    }

    #[must_use]
    pub fn get(&self) -> Option<String> {
        lock(&self.token).clone()
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        lock(&self.token).is_some()
    }

    pub fn set(&self, token: &str) {
        {
            let mut current = lock(&self.token);
            *current = Some(token.to_owned());
            self.epoch.fetch_add(1, Ordering::SeqCst);
        }
        if let Err(e) = self.backend.save(token) {
            tracing::warn!(error = %e, "failed to persist token; session will not survive a restart");
        }
    }

    pub fn clear(&self) {
        {
            let mut current = lock(&self.token);
            *current = None;
            self.epoch.fetch_add(1, Ordering::SeqCst);
        }
        if let Err(e) = self.backend.remove() {
            tracing::warn!(error = %e, "failed to remove persisted token");
        }
        let listeners = lock(&self.clear_listeners).clone();
        for listener in listeners {
            listener();
        }
    }

    /// Run `listener` after every clear, whoever triggered it.
    pub fn on_clear(&self, listener: impl Fn() + Send + Sync + 'static) {
        lock(&self.clear_listeners).push(Arc::new(listener));
    }

    /// Write counter; changes on every `set` and `clear`.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
