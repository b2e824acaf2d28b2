//! Browser glue shared across pages.

pub mod auth;
pub mod storage;
