//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login redirects
//! and identity-dependent rendering. The signal is a mirror: every write goes
//! through the [`AuthSession`], which republishes and the sync task copies the
//! snapshot in (see `util::auth`).

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::sync::Arc;

use leptos::prelude::*;
use session::guard::{self, Access};
use session::{AuthSession, Role, SessionState};

/// Session handle plus its reactive mirror, provided as context by `App`.
#[derive(Clone)]
pub struct AuthContext {
    pub session: Arc<AuthSession>,
    pub state: RwSignal<SessionState>,
}

impl AuthContext {
    pub fn new(session: Arc<AuthSession>) -> Self {
        let state = RwSignal::new(session.state());
        Self { session, state }
    }

    /// Guard decision for `required`; tracked, so views re-render on change.
    pub fn access(&self, required: Role) -> Access {
        self.state.with(|state| guard::check(state, required))
    }
}

/// Navbar greeting for the signed-in user.
pub fn greeting(state: &SessionState) -> Option<String> {
    state.user().map(|u| format!("Welcome, {}", u.username))
}

/// Route an anonymous visitor away from `/login` and `/register` once signed in.
pub fn should_leave_auth_page(state: &SessionState) -> bool {
    state.is_bootstrapped() && state.is_authenticated()
}
