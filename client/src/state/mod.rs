//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `auth` wraps the session handle handed to every page; `admin` holds the
//! admin panel's directory and notices.

pub mod admin;
pub mod auth;
