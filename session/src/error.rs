//! Gateway error type.
//!
//! ERROR HANDLING
//! ==============
//! Every backend failure reaches the caller as an [`ApiError`]. The only side
//! effect the gateway performs on its own is the universal 401 session clear.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Coarse classification used by callers deciding how to present a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backend rejected the request (bad credentials, duplicate username, ...).
    Auth,
    /// 401/403: the token is missing, expired or lacks the required role.
    Authorization,
    /// No usable response reached the client.
    Network,
}

/// Errors produced by [`crate::gateway::ApiClient`] operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The backend answered 401. The session has already been cleared.
    #[error("unauthorized: {}", .detail.as_deref().unwrap_or("no detail"))]
    Unauthorized { detail: Option<String> },

    /// The backend answered 403.
    #[error("forbidden: {}", .detail.as_deref().unwrap_or("no detail"))]
    Forbidden { detail: Option<String> },

    /// Any other non-2xx status.
    #[error("request rejected with status {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Rejected { status: u16, detail: Option<String> },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// A 2xx body could not be deserialized.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The session changed while this call was in flight; its result was dropped.
    #[error("session changed while the request was in flight")]
    Superseded,
}

impl ApiError {
    /// Server-supplied `detail`, when the backend sent one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Unauthorized { detail } | Self::Forbidden { detail } | Self::Rejected { detail, .. } => {
                detail.as_deref()
            }
            _ => None,
        }
    }

    /// Human-readable message: the server detail, else `fallback`.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_owned()
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized { .. } | Self::Forbidden { .. } => ErrorKind::Authorization,
            Self::Network(_) | Self::HttpClientBuild(_) => ErrorKind::Network,
            Self::Rejected { .. } | Self::Decode(_) | Self::Superseded => ErrorKind::Auth,
        }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "E_UNAUTHORIZED",
            Self::Forbidden { .. } => "E_FORBIDDEN",
            Self::Rejected { .. } => "E_REJECTED",
            Self::Network(_) => "E_NETWORK",
            Self::Decode(_) => "E_DECODE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Superseded => "E_SUPERSEDED",
        }
    }

    /// Build the error for a non-2xx status and its raw body.
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        let detail = parse_detail(body);
        match status {
            401 => Self::Unauthorized { detail },
            403 => Self::Forbidden { detail },
            _ => Self::Rejected { status, detail },
        }
    }
}

/// Extract a human-readable `detail` from a FastAPI-style error body.
///
/// Accepts `{"detail": "..."}` and the validation shape
/// `{"detail": [{"msg": "...", ...}, ...]}` (first message wins).
#[must_use]
pub fn parse_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
            .map(str::to_owned),
        _ => None,
    }
}
