//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components read the shared [`AuthContext`](crate::state::auth::AuthContext)
//! from Leptos context and never talk to the backend directly.

pub mod navbar;
pub mod protected_route;
