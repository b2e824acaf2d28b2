//! Token session core shared by the browser `client` and the `cli`.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend issues bearer tokens and enforces roles; this crate owns the
//! client half of that contract. Leaf to root:
//!
//! - [`store`] persists the bearer token and versions every write.
//! - [`gateway`] is the only egress point to the REST backend. It attaches the
//!   token and runs the unauthorized policy on any 401.
//! - [`manager`] holds the current user and drives login, register, logout
//!   and startup bootstrap.
//! - [`guard`] decides whether a view renders, redirects or is denied.
//!
//! [`admin`] and [`validation`] serve the admin panel and registration form.

pub mod admin;
pub mod config;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod manager;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod test_backend;

pub use admin::{DirectoryError, DirectoryStats, UserDirectory};
pub use config::ClientConfig;
pub use error::{ApiError, ErrorKind};
pub use gateway::{ApiClient, UnauthorizedHook};
pub use guard::Access;
pub use manager::{AuthSession, Phase, SessionState};
pub use store::{MemoryBackend, SessionStore, TokenBackend};
pub use types::{Role, TokenResponse, User};
