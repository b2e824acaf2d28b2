//! Token persistence in browser `localStorage`.
//!
//! SYSTEM CONTEXT
//! ==============
//! The token lives under one key so a reload restores the session before the
//! first render. Outside the browser build the store falls back to memory,
//! which keeps native unit tests and tooling working.

use session::TokenBackend;

/// `localStorage` key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Backend the browser session store persists through.
pub fn browser_backend() -> impl TokenBackend + 'static {
    #[cfg(feature = "csr")]
    {
        LocalStorageBackend
    }
    #[cfg(not(feature = "csr"))]
    {
        session::MemoryBackend::default()
    }
}

#[cfg(feature = "csr")]
pub use local::LocalStorageBackend;

#[cfg(feature = "csr")]
mod local {
    use session::TokenBackend;
    use session::store::StoreError;

    use super::TOKEN_KEY;

    #[derive(Clone, Copy, Debug, Default)]
    pub struct LocalStorageBackend;

    fn storage() -> Result<web_sys::Storage, StoreError> {
        let window = web_sys::window().ok_or_else(|| StoreError::Unavailable("no window".to_owned()))?;
        window
            .local_storage()
            .map_err(|_| StoreError::Unavailable("localStorage access denied".to_owned()))?
            .ok_or_else(|| StoreError::Unavailable("localStorage missing".to_owned()))
    }

    fn denied(op: &str) -> StoreError {
        StoreError::Unavailable(format!("localStorage {op} failed"))
    }

    impl TokenBackend for LocalStorageBackend {
        fn load(&self) -> Result<Option<String>, StoreError> {
            storage()?.get_item(TOKEN_KEY).map_err(|_| denied("read"))
        }

        fn save(&self, token: &str) -> Result<(), StoreError> {
            storage()?.set_item(TOKEN_KEY, token).map_err(|_| denied("write"))
        }

        fn remove(&self) -> Result<(), StoreError> {
            storage()?.remove_item(TOKEN_KEY).map_err(|_| denied("remove"))
        }
    }
}
