//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration; access control is applied by
//! wrapping the page in `ProtectedRoute` at the router.

pub mod admin;
pub mod dashboard;
pub mod login;
pub mod register;
