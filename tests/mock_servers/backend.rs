//! Mock Event Hive backend
//!
//! Implements the bearer-authenticated REST endpoints the client calls.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, put},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

struct MockBackendState {
    token: String,
    username: Option<String>,
    is_admin: bool,
    notifications: Vec<Value>,
    deleted_events: Vec<String>,
    /// Requests received, authorized or not
    requests: usize,
    list_delay: Duration,
    read_delay: Duration,
}

type Shared = Arc<RwLock<MockBackendState>>;

pub struct MockBackend {
    addr: SocketAddr,
    state: Shared,
    handle: JoinHandle<()>,
}

impl MockBackend {
    /// Start a mock backend on a random port accepting `token`
    pub async fn start(token: &str) -> Self {
        let state = Arc::new(RwLock::new(MockBackendState {
            token: token.to_string(),
            username: Some("admin".to_string()),
            is_admin: true,
            notifications: Vec::new(),
            deleted_events: Vec::new(),
            requests: 0,
            list_delay: Duration::ZERO,
            read_delay: Duration::ZERO,
        }));

        let app = Router::new()
            .route("/auth/auth", get(handle_auth))
            .route("/events/{id}", delete(handle_delete_event))
            .route("/notifications/admin", get(handle_notifications))
            .route("/notifications/admin/read-all", put(handle_read_all))
            .route("/notifications/admin/{id}/read", put(handle_read_one))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Base URL for `BackendClient::new`
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn set_user(&self, username: Option<&str>, is_admin: bool) {
        let mut state = self.state.write().await;
        state.username = username.map(str::to_string);
        state.is_admin = is_admin;
    }

    pub async fn add_notification(&self, notification: Value) {
        self.state.write().await.notifications.push(notification);
    }

    /// `isRead` flag of a stored notification
    pub async fn is_read(&self, id: &str) -> Option<bool> {
        let state = self.state.read().await;
        state
            .notifications
            .iter()
            .find(|n| id_of(n) == id)
            .and_then(|n| n["isRead"].as_bool())
    }

    pub async fn deleted_events(&self) -> Vec<String> {
        self.state.read().await.deleted_events.clone()
    }

    pub async fn request_count(&self) -> usize {
        self.state.read().await.requests
    }

    /// Hold `GET /notifications/admin` for `delay` before answering
    pub async fn set_list_delay(&self, delay: Duration) {
        self.state.write().await.list_delay = delay;
    }

    /// Hold the mark-read endpoints for `delay` before answering
    pub async fn set_read_delay(&self, delay: Duration) {
        self.state.write().await.read_delay = delay;
    }

    /// Stop the mock server
    pub async fn stop(self) {
        self.handle.abort();
    }
}

fn id_of(notification: &Value) -> String {
    match &notification["id"] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn authorized(state: &Shared, headers: &HeaderMap) -> bool {
    let expected = {
        let mut state = state.write().await;
        state.requests += 1;
        format!("Bearer {}", state.token)
    };
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == expected)
}

async fn handle_auth(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&state, &headers).await {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let state = state.read().await;
    Ok(Json(json!({
        "username": state.username,
        "id": 1,
        "isAdmin": state.is_admin,
    })))
}

async fn handle_delete_event(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> StatusCode {
    if !authorized(&state, &headers).await {
        return StatusCode::UNAUTHORIZED;
    }
    state.write().await.deleted_events.push(id);
    StatusCode::OK
}

async fn handle_notifications(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    if !authorized(&state, &headers).await {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let delay = state.read().await.list_delay;
    tokio::time::sleep(delay).await;
    Ok(Json(Value::Array(state.read().await.notifications.clone())))
}

async fn handle_read_one(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> StatusCode {
    if !authorized(&state, &headers).await {
        return StatusCode::UNAUTHORIZED;
    }
    let delay = state.read().await.read_delay;
    tokio::time::sleep(delay).await;
    let mut state = state.write().await;
    match state.notifications.iter_mut().find(|n| id_of(n) == id) {
        Some(n) => {
            n["isRead"] = Value::Bool(true);
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn handle_read_all(State(state): State<Shared>, headers: HeaderMap) -> StatusCode {
    if !authorized(&state, &headers).await {
        return StatusCode::UNAUTHORIZED;
    }
    let delay = state.read().await.read_delay;
    tokio::time::sleep(delay).await;
    for n in state.write().await.notifications.iter_mut() {
        n["isRead"] = Value::Bool(true);
    }
    StatusCode::OK
}
