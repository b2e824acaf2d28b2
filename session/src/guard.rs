//! Access Guard for protected views.
//!
//! A pure function of the session snapshot: no I/O and no navigation of its
//! own. Front ends map each [`Access`] to their rendering (Leptos view,
//! terminal message).

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::manager::SessionState;
use crate::types::Role;

pub const LOGIN_PATH: &str = "/login";
pub const ACCESS_DENIED_MESSAGE: &str = "Access denied. Admin privileges required.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Bootstrap has not finished; show a placeholder.
    Loading,
    /// No session; send the user to [`LOGIN_PATH`].
    RedirectToLogin,
    /// Signed in without the required role. Shown in place, no redirect.
    Denied,
    Granted,
}

/// Decide what a view requiring `required` should do for `state`.
/// `Role::User` means any signed-in account.
#[must_use]
pub fn check(state: &SessionState, required: Role) -> Access {
    if !state.is_bootstrapped() {
        return Access::Loading;
    }
    if !state.is_authenticated() {
        return Access::RedirectToLogin;
    }
    if required == Role::Admin && !state.is_admin() {
        return Access::Denied;
    }
    Access::Granted
}
