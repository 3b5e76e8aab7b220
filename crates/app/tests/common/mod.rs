//! Shared helpers for campus-app integration tests.
//!
//! [`FakeBackend`] is an axum server on an ephemeral port that answers with
//! canned responses keyed by method and path, and records every request it
//! receives.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use campus_app::{AppState, ClientConfig};
use campus_client::session::MemoryStorage;
use campus_client::{ApiClient, Session};
use campus_core::roles::Role;
use campus_core::user::User;

/// A request as seen by the fake backend.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub request_id: Option<String>,
    pub body: Option<serde_json::Value>,
}

#[derive(Default)]
struct FakeState {
    routes: Mutex<HashMap<(Method, String), (StatusCode, String)>>,
    requests: Mutex<Vec<Recorded>>,
}

pub struct FakeBackend {
    base_url: String,
    state: Arc<FakeState>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state = Arc::new(FakeState::default());
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake backend");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake backend");
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
        }
    }

    /// Base URL including the `/api` prefix.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.base_url.clone())
    }

    /// Application state pointed at this backend with `user` signed in.
    pub fn state_for(&self, user: User) -> AppState {
        signed_in(&self.base_url, user)
    }

    /// Answer `method /api{path}` with `status` and a JSON body.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: serde_json::Value) {
        self.respond_raw(method, path, status, body.to_string());
    }

    /// Answer `method /api{path}` with `status` and a verbatim body.
    pub fn respond_raw(&self, method: Method, path: &str, status: u16, body: impl Into<String>) {
        let status = StatusCode::from_u16(status).expect("valid status");
        self.state
            .routes
            .lock()
            .unwrap()
            .insert((method, format!("/api{path}")), (status, body.into()));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }
}

async fn handle(
    State(state): State<Arc<FakeState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: header(AUTHORIZATION.as_str()),
        request_id: header("x-request-id"),
        body: serde_json::from_slice(&body).ok(),
    });

    let canned = state
        .routes
        .lock()
        .unwrap()
        .get(&(method, uri.path().to_string()))
        .cloned();
    match canned {
        Some((status, body)) => (status, [(CONTENT_TYPE, "application/json")], body).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(CONTENT_TYPE, "application/json")],
            r#"{"error":"Route not found"}"#,
        )
            .into_response(),
    }
}

pub fn user(id: i64, name: &str, role: Role) -> User {
    User {
        id,
        name: name.to_string(),
        email: format!("{}@campus.test", name.to_lowercase()),
        phone: None,
        role,
        created_at: None,
    }
}

pub fn config(api_url: &str) -> ClientConfig {
    ClientConfig {
        api_url: api_url.to_string(),
        data_dir: std::env::temp_dir().join("campus-app-tests"),
        poll_interval: std::time::Duration::from_secs(2),
    }
}

/// State backed by in-memory session storage with `user` signed in.
pub fn signed_in(api_url: &str, user: User) -> AppState {
    let state = AppState::with_storage(config(api_url), MemoryStorage::new());
    state
        .session
        .login(Session {
            token: format!("token-{}", user.id),
            user,
        })
        .expect("login");
    state
}

/// State whose backend address refuses connections. Any request made
/// through it fails with a network error.
pub fn offline(user: User) -> AppState {
    signed_in(UNREACHABLE, user)
}

pub const UNREACHABLE: &str = "http://127.0.0.1:1/api";

/// Confirmation prompts for tests.
pub fn yes(_: &str) -> bool {
    true
}

pub fn no(_: &str) -> bool {
    false
}
