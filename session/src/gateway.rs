//! API Gateway Client: the single egress point to the auth backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every call reads the [`SessionStore`] and, when a token is present, sends
//! it as `Authorization: Bearer <token>`. A 401 from any endpoint clears the
//! store and then runs the injected [`UnauthorizedHook`] (the browser
//! navigates to `/login`, the CLI prints a sign-in hint). Nothing else is
//! swallowed: every failure is returned to the caller as an [`ApiError`].

#[cfg(test)]
#[path = "gateway_test.rs"]
mod gateway_test;

use std::sync::Arc;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::store::SessionStore;
use crate::types::{LoginRequest, RegisterRequest, Role, RoleUpdate, TokenResponse, User};

pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
pub const CURRENT_USER_PATH: &str = "/auth/me";
pub const USERS_PATH: &str = "/users/";

/// Policy run after the gateway has cleared the session on a 401.
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

fn user_path(user_id: i64) -> String {
    format!("/users/{user_id}")
}

fn user_role_path(user_id: i64) -> String {
    format!("/users/{user_id}/role")
}

// =============================================================================
// CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    store: Arc<SessionStore>,
    on_unauthorized: UnauthorizedHook,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a gateway over `store`, running `on_unauthorized` after every 401.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn new(
        config: ClientConfig,
        store: Arc<SessionStore>,
        on_unauthorized: UnauthorizedHook,
    ) -> Result<Self, ApiError> {
        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder
            .timeout(std::time::Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(std::time::Duration::from_secs(config.timeouts.connect_secs));
        let http = builder.build().map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, config, store, on_unauthorized })
    }

    #[must_use]
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `POST /auth/login`.
    ///
    /// # Errors
    ///
    /// Bad credentials come back as [`ApiError::Unauthorized`] with the
    /// backend's detail.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let req = self
            .http
            .post(self.config.endpoint(LOGIN_PATH))
            .json(&LoginRequest { username, password });
        self.send_json(req).await
    }

    /// `POST /auth/register`. Does not sign in.
    ///
    /// # Errors
    ///
    /// Duplicate usernames and policy violations surface as [`ApiError::Rejected`].
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User, ApiError> {
        let req = self
            .http
            .post(self.config.endpoint(REGISTER_PATH))
            .json(&RegisterRequest { username, email, password });
        self.send_json(req).await
    }

    /// `GET /auth/me` with the stored token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] when the token is missing or stale.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.send_json(self.http.get(self.config.endpoint(CURRENT_USER_PATH))).await
    }

    /// `GET /users/` (admin only).
    ///
    /// # Errors
    ///
    /// Non-admin sessions get [`ApiError::Forbidden`].
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.send_json(self.http.get(self.config.endpoint(USERS_PATH))).await
    }

    /// `PUT /users/{id}/role` (admin only).
    ///
    /// # Errors
    ///
    /// Propagates any non-2xx response as an [`ApiError`].
    pub async fn update_user_role(&self, user_id: i64, role: Role) -> Result<User, ApiError> {
        let req = self
            .http
            .put(self.config.endpoint(&user_role_path(user_id)))
            .json(&RoleUpdate { role });
        self.send_json(req).await
    }

    /// `DELETE /users/{id}` (admin only).
    ///
    /// # Errors
    ///
    /// Propagates any non-2xx response as an [`ApiError`].
    pub async fn delete_user(&self, user_id: i64) -> Result<(), ApiError> {
        self.execute(self.http.delete(self.config.endpoint(&user_path(user_id))))
            .await
            .map(|_| ())
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.store.get() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn execute(&self, req: RequestBuilder) -> Result<String, ApiError> {
        let response = self
            .authorize(req)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status == 401 {
            self.handle_unauthorized();
        }
        let success = (200..300).contains(&status);

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) if success => return Err(ApiError::Network(e.to_string())),
            Err(e) => {
                tracing::debug!(status, error = %e, "failed to read error body");
                String::new()
            }
        };

        if !success {
            let err = ApiError::from_status(status, &body);
            tracing::debug!(status, code = err.error_code(), "backend call failed");
            return Err(err);
        }
        Ok(body)
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let body = self.execute(req).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// The store is empty by the time the hook runs.
    fn handle_unauthorized(&self) {
        tracing::warn!("backend returned 401; clearing session");
        self.store.clear();
        (self.on_unauthorized)();
    }
}
