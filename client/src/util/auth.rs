//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Builds the browser's session stack (localStorage store, gateway, manager)
//! and keeps the Leptos signal in step with the manager's published state.
//! A 401 anywhere clears the store and sends the window to `/login`.

use std::sync::Arc;

use leptos::prelude::*;
use session::config::DEFAULT_API_URL;
use session::guard::LOGIN_PATH;
use session::{ApiClient, ApiError, AuthSession, ClientConfig, SessionState, SessionStore, UnauthorizedHook};

use crate::util::storage;

/// Backend base URL, baked in at compile time.
pub fn client_config() -> ClientConfig {
    ClientConfig::with_base_url(option_env!("AUTH_API_URL").unwrap_or(DEFAULT_API_URL))
}

/// Assemble the session stack over browser storage.
///
/// # Errors
///
/// Returns [`ApiError::HttpClientBuild`] if the HTTP client cannot be built.
pub fn build_session() -> Result<Arc<AuthSession>, ApiError> {
    let store = Arc::new(SessionStore::new(storage::browser_backend()));
    let on_unauthorized: UnauthorizedHook = Arc::new(redirect_to_login);
    let api = ApiClient::new(client_config(), store, on_unauthorized)?;
    Ok(Arc::new(AuthSession::new(api)))
}

/// Hard navigation to the login view.
pub fn redirect_to_login() {
    #[cfg(feature = "csr")]
    {
        if let Some(window) = web_sys::window() {
            if window.location().pathname().ok().as_deref() != Some(LOGIN_PATH) {
                let _ = window.location().set_href(LOGIN_PATH);
            }
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = LOGIN_PATH;
    }
}

/// Mirror published session snapshots into `state`, then bootstrap.
pub fn install_session_sync(session: &Arc<AuthSession>, state: RwSignal<SessionState>) {
    #[cfg(feature = "csr")]
    {
        let mut updates = session.subscribe();
        leptos::task::spawn_local(async move {
            while updates.changed().await.is_ok() {
                let snapshot = updates.borrow_and_update().clone();
                state.set(snapshot);
            }
        });

        let session = Arc::clone(session);
        leptos::task::spawn_local(async move {
            session.bootstrap().await;
            log::info!("session bootstrapped");
        });
    }
    #[cfg(not(feature = "csr"))]
    {
        state.set(session.state());
    }
}
