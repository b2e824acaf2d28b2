//! In-process stand-in for the auth backend, served over real TCP so tests
//! exercise the `reqwest` gateway end to end.

use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::Json;
use serde::Deserialize;

use crate::config::ClientConfig;
use crate::gateway::{ApiClient, UnauthorizedHook};
use crate::store::SessionStore;
use crate::types::{Role, User};

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
pub(crate) struct BackendState {
    accounts: Mutex<Vec<Account>>,
    next_id: AtomicI64,
    revoked: AtomicBool,
    login_delay_ms: AtomicU64,
    pub(crate) list_calls: AtomicUsize,
    pub(crate) me_calls: AtomicUsize,
    pub(crate) login_calls: AtomicUsize,
}

impl BackendState {
    pub(crate) fn seed(&self, id: i64, username: &str, role: Role, password: &str) {
        let user = User {
            id,
            username: username.to_owned(),
            email: format!("{username}@example.com"),
            role,
            is_active: true,
            created_at: "2024-01-15T08:00:00".to_owned(),
            updated_at: None,
        };
        self.accounts.lock().unwrap().push(Account { user, password: password.to_owned() });
        self.next_id.fetch_max(id + 1, Ordering::SeqCst);
    }

    /// Invalidate every issued token, as an expiry would.
    pub(crate) fn revoke_tokens(&self) {
        self.revoked.store(true, Ordering::SeqCst);
    }

    pub(crate) fn delay_login(&self, delay: Duration) {
        self.login_delay_ms.store(u64::try_from(delay.as_millis()).unwrap(), Ordering::SeqCst);
    }

    pub(crate) fn user(&self, id: i64) -> Option<User> {
        self.accounts.lock().unwrap().iter().find(|a| a.user.id == id).map(|a| a.user.clone())
    }

    fn authenticate(&self, headers: &HeaderMap) -> Option<User> {
        if self.revoked.load(Ordering::SeqCst) {
            return None;
        }
        let raw = headers.get("authorization")?.to_str().ok()?;
        let id: i64 = raw.strip_prefix("Bearer token-")?.parse().ok()?;
        self.user(id)
    }
}

pub(crate) struct StubBackend {
    pub(crate) base_url: String,
    pub(crate) state: Arc<BackendState>,
}

impl StubBackend {
    /// Backend seeded with `alice` (id 1, admin) and `dave` (id 7, user).
    pub(crate) async fn spawn() -> Self {
        let state = Arc::new(BackendState::default());
        state.seed(1, "alice", Role::Admin, "Admin123!");
        state.seed(7, "dave", Role::User, "Dave1234!");

        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/register", post(register))
            .route("/auth/me", get(me))
            .route("/users/", get(list_users))
            .route("/users/{id}/role", put(update_role))
            .route("/users/{id}", delete(delete_user))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { base_url: format!("http://{addr}"), state }
    }

    pub(crate) fn config(&self) -> ClientConfig {
        ClientConfig::with_base_url(&self.base_url)
    }

    /// Gateway over `store` whose unauthorized hook counts invocations.
    pub(crate) fn client(&self, store: Arc<SessionStore>) -> (ApiClient, Arc<AtomicUsize>) {
        let redirects = Arc::new(AtomicUsize::new(0));
        let counter = redirects.clone();
        let hook: UnauthorizedHook = Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (ApiClient::new(self.config(), store, hook).unwrap(), redirects)
    }
}

/// URL of a port nothing listens on.
pub(crate) fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// One-shot raw server answering a 401 whose body is cut short.
pub(crate) async fn truncated_unauthorized() -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0_u8; 4096];
        let _ = socket.read(&mut buf).await;
        let _ = socket
            .write_all(b"HTTP/1.1 401 Unauthorized\r\nContent-Length: 100\r\n\r\n{\"det")
            .await;
        let _ = socket.shutdown().await;
    });
    format!("http://{addr}")
}

pub(crate) fn token_for(id: i64) -> String {
    format!("token-{id}")
}

// =============================================================================
// HANDLERS
// =============================================================================

type Shared = State<Arc<BackendState>>;

fn detail(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "detail": message }))).into_response()
}

fn unauthenticated() -> Response {
    detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")
}

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct RegisterBody {
    username: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct RoleBody {
    role: Role,
}

async fn login(State(state): Shared, Json(body): Json<LoginBody>) -> Response {
    state.login_calls.fetch_add(1, Ordering::SeqCst);
    let delay = state.login_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }
    let found = state
        .accounts
        .lock()
        .unwrap()
        .iter()
        .find(|a| a.user.username == body.username && a.password == body.password)
        .map(|a| a.user.id);
    match found {
        Some(id) => Json(serde_json::json!({ "access_token": token_for(id), "token_type": "bearer" })).into_response(),
        None => detail(StatusCode::UNAUTHORIZED, "Incorrect username or password"),
    }
}

async fn register(State(state): Shared, Json(body): Json<RegisterBody>) -> Response {
    if body.password.len() < 8 {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "detail": [{ "loc": ["body", "password"], "msg": "Password must be at least 8 characters long", "type": "value_error" }]
            })),
        )
            .into_response();
    }
    let mut accounts = state.accounts.lock().unwrap();
    if accounts.iter().any(|a| a.user.username == body.username) {
        return detail(StatusCode::BAD_REQUEST, "Username already registered");
    }
    let user = User {
        id: state.next_id.fetch_add(1, Ordering::SeqCst),
        username: body.username,
        email: body.email,
        role: Role::User,
        is_active: true,
        created_at: "2024-06-01T12:00:00".to_owned(),
        updated_at: None,
    };
    accounts.push(Account { user: user.clone(), password: body.password });
    Json(user).into_response()
}

async fn me(State(state): Shared, headers: HeaderMap) -> Response {
    state.me_calls.fetch_add(1, Ordering::SeqCst);
    match state.authenticate(&headers) {
        Some(user) => Json(user).into_response(),
        None => unauthenticated(),
    }
}

fn require_admin(state: &BackendState, headers: &HeaderMap) -> Result<User, Response> {
    let user = state.authenticate(headers).ok_or_else(unauthenticated)?;
    if user.role != Role::Admin {
        return Err(detail(StatusCode::FORBIDDEN, "Not enough permissions"));
    }
    Ok(user)
}

async fn list_users(State(state): Shared, headers: HeaderMap) -> Response {
    state.list_calls.fetch_add(1, Ordering::SeqCst);
    if let Err(resp) = require_admin(&state, &headers) {
        return resp;
    }
    let users: Vec<User> = state.accounts.lock().unwrap().iter().map(|a| a.user.clone()).collect();
    Json(users).into_response()
}

async fn update_role(State(state): Shared, headers: HeaderMap, Path(id): Path<i64>, Json(body): Json<RoleBody>) -> Response {
    let admin = match require_admin(&state, &headers) {
        Ok(admin) => admin,
        Err(resp) => return resp,
    };
    if admin.id == id {
        return detail(StatusCode::BAD_REQUEST, "Cannot change your own role");
    }
    let mut accounts = state.accounts.lock().unwrap();
    match accounts.iter_mut().find(|a| a.user.id == id) {
        Some(account) => {
            account.user.role = body.role;
            Json(account.user.clone()).into_response()
        }
        None => detail(StatusCode::NOT_FOUND, "User not found"),
    }
}

async fn delete_user(State(state): Shared, headers: HeaderMap, Path(id): Path<i64>) -> Response {
    let admin = match require_admin(&state, &headers) {
        Ok(admin) => admin,
        Err(resp) => return resp,
    };
    if admin.id == id {
        return detail(StatusCode::BAD_REQUEST, "Cannot delete your own account");
    }
    let mut accounts = state.accounts.lock().unwrap();
    let before = accounts.len();
    accounts.retain(|a| a.user.id != id);
    if accounts.len() == before {
        return detail(StatusCode::NOT_FOUND, "User not found");
    }
    StatusCode::NO_CONTENT.into_response()
}
