//! Auth Session Manager: the single writer of the current-user state.
//!
//! SYSTEM CONTEXT
//! ==============
//! UI layers hold an `Arc<AuthSession>` threaded through construction (Leptos
//! context in the browser, a local in the CLI) and either read snapshots via
//! [`AuthSession::state`] or subscribe to changes via
//! [`AuthSession::subscribe`]. Nothing else mutates the user.
//!
//! STATE MACHINE
//! =============
//! `Bootstrapping -> {Anonymous, Authenticated}`, `Anonymous -> Authenticated`
//! on login/register, `Authenticated -> Anonymous` on logout or after the
//! gateway cleared the token on a 401 (published by the store's clear
//! listener).
//!
//! RACES
//! =====
//! Each step that awaits the network records the store epoch first. If the
//! epoch moved by the time the response arrives (logout, 401 clear, another
//! login), the result is discarded with [`ApiError::Superseded`].

#[cfg(test)]
#[path = "manager_test.rs"]
mod manager_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use crate::error::ApiError;
use crate::gateway::ApiClient;
use crate::types::{Role, User};

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Bootstrapping,
    Anonymous,
    Authenticated,
}

/// Read-only snapshot of the session. `is_authenticated` and `is_admin` are
/// always computed from the user; there is no separate flag to go stale.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    user: Option<User>,
    bootstrapped: bool,
    error: Option<String>,
}

impl SessionState {
    /// Startup state before [`AuthSession::bootstrap`] has finished.
    #[must_use]
    pub fn bootstrapping() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn anonymous() -> Self {
        Self { user: None, bootstrapped: true, error: None }
    }

    #[must_use]
    pub fn authenticated(user: User) -> Self {
        Self { user: Some(user), bootstrapped: true, error: None }
    }

    #[must_use]
    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role == Role::Admin)
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        match (self.bootstrapped, self.user.is_some()) {
            (_, true) => Phase::Authenticated,
            (false, false) => Phase::Bootstrapping,
            (true, false) => Phase::Anonymous,
        }
    }
}

// =============================================================================
// MANAGER
// =============================================================================

#[derive(Debug)]
pub struct AuthSession {
    api: ApiClient,
    state: Arc<watch::Sender<SessionState>>,
    bootstrap_started: AtomicBool,
}

impl AuthSession {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let (state, _) = watch::channel(SessionState::bootstrapping());
        let state = Arc::new(state);

        // Publish the drop as soon as anything (a 401 included) clears the token.
        let publisher = Arc::downgrade(&state);
        api.store().on_clear(move || {
            if let Some(state) = publisher.upgrade() {
                state.send_if_modified(|s| s.user.take().is_some());
            }
        });

        Self { api, state, bootstrap_started: AtomicBool::new(false) }
    }

    /// Gateway for privileged calls made outside the session flows
    /// (admin panel). Its 401 handling still clears this session.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Current snapshot, reconciled with the store first.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.sync_with_store();
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state().is_authenticated()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.state().is_admin()
    }

    /// Restore a session from a persisted token. Only the first call per
    /// manager does anything; later calls return immediately.
    pub async fn bootstrap(&self) {
        if self.bootstrap_started.swap(true, Ordering::SeqCst) {
            return;
        }

        let store = self.api.store();
        if store.has_token() {
            let epoch = store.epoch();
            match self.api.current_user().await {
                Ok(user) if store.epoch() == epoch => {
                    tracing::info!(username = %user.username, "session restored");
                    self.state.send_modify(|s| {
                        s.user = Some(user);
                        s.bootstrapped = true;
                    });
                    return;
                }
                Ok(_) => tracing::debug!("session changed during bootstrap; discarding restored user"),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to restore session; clearing stored token");
                    if store.epoch() == epoch {
                        store.clear();
                    }
                }
            }
        }

        self.state.send_modify(|s| s.bootstrapped = true);
    }

    /// Exchange credentials for a token and load the user.
    ///
    /// # Errors
    ///
    /// Returns the gateway error; its message (or `"Login failed"`) is also
    /// retained on the state until the next attempt or [`Self::clear_error`].
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        self.clear_error();
        match self.sign_in(username, password).await {
            Ok(user) => {
                tracing::info!(username = %user.username, role = %user.role, "signed in");
                Ok(())
            }
            Err(e) => {
                self.record_failure(&e, LOGIN_FAILED);
                Err(e)
            }
        }
    }

    /// Create an account, then sign in with the same credentials.
    ///
    /// # Errors
    ///
    /// A rejected registration never attempts the login. Either failure is
    /// retained as the state error (fallback `"Registration failed"`).
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<(), ApiError> {
        self.clear_error();
        if let Err(e) = self.api.register(username, email, password).await {
            self.record_failure(&e, REGISTRATION_FAILED);
            return Err(e);
        }
        tracing::info!(%username, "account registered");

        // TODO: drop the password replay once /auth/register returns a token.
        match self.sign_in(username, password).await {
            Ok(_) => Ok(()),
            Err(e) => {
                self.record_failure(&e, REGISTRATION_FAILED);
                Err(e)
            }
        }
    }

    /// Drop the token and the user. Local only; always succeeds.
    pub fn logout(&self) {
        self.api.store().clear();
        self.state.send_modify(|s| {
            s.user = None;
            s.error = None;
        });
        tracing::info!("signed out");
    }

    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| s.error.take().is_some());
    }

    /// Drop the user if the token vanished underneath it (gateway 401 clear).
    fn sync_with_store(&self) {
        let has_token = self.api.store().has_token();
        let expired = self.state.send_if_modified(|s| {
            if s.user.is_some() && !has_token {
                s.user = None;
                true
            } else {
                false
            }
        });
        if expired {
            tracing::info!("session expired; user cleared");
        }
    }

    async fn sign_in(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let store = self.api.store();

        let epoch = store.epoch();
        let token = self.api.login(username, password).await?;
        if store.epoch() != epoch {
            return Err(ApiError::Superseded);
        }
        store.set(&token.access_token);

        let epoch = store.epoch();
        let user = match self.api.current_user().await {
            Ok(user) => user,
            Err(e) => {
                // Token and user are set together or not at all.
                if store.epoch() == epoch {
                    store.clear();
                }
                return Err(e);
            }
        };
        if store.epoch() != epoch {
            return Err(ApiError::Superseded);
        }

        self.state.send_modify(|s| {
            s.user = Some(user.clone());
            s.bootstrapped = true;
            s.error = None;
        });
        Ok(user)
    }

    fn record_failure(&self, err: &ApiError, fallback: &str) {
        // The 401 path may have cleared a token that backed a previous user.
        self.sync_with_store();
        if matches!(err, ApiError::Superseded) {
            tracing::debug!("discarding superseded session result");
            return;
        }
        let message = err.message_or(fallback);
        tracing::warn!(error = %err, %message, "session operation failed");
        self.state.send_modify(|s| s.error = Some(message));
    }
}
