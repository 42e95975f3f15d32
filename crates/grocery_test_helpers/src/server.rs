//! In-process fake of the remote item collection
//!
//! Behaves like a json-server `/items` resource:
//! - `GET /items` - list
//! - `POST /items` - append the posted record
//! - `PATCH /items/:id` - merge fields into a record
//! - `DELETE /items/:id` - remove a record
//!
//! Records are kept as raw JSON so tests can seed string ids or malformed
//! data. Failures can be injected per server.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// A request the fake server received
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
struct ServerState {
    items: Arc<Mutex<Vec<Value>>>,
    failure: Arc<Mutex<Option<u16>>>,
    mutation_failure: Arc<Mutex<Option<u16>>>,
    raw_list: Arc<Mutex<Option<String>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl ServerState {
    fn record(&self, method: &str, path: String, body: Option<Value>) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            path,
            body,
        });
    }

    fn injected_failure(&self) -> Option<Response> {
        let status = (*self.failure.lock().unwrap())?;
        Some(failure_response(status))
    }

    fn injected_mutation_failure(&self) -> Option<Response> {
        self.injected_failure().or_else(|| {
            let status = (*self.mutation_failure.lock().unwrap())?;
            Some(failure_response(status))
        })
    }
}

fn failure_response(status: u16) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": "Injected failure" }))).into_response()
}

/// Fake item server running on its own thread and runtime
///
/// Shut down when dropped.
pub struct FakeItemServer {
    addr: SocketAddr,
    state: ServerState,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl FakeItemServer {
    /// Start an empty server
    pub fn start() -> Self {
        Self::with_items(Vec::new())
    }

    /// Start a server seeded with raw item records
    ///
    /// # Example
    ///
    /// ```rust
    /// use grocery_test_helpers::server::FakeItemServer;
    /// use serde_json::json;
    ///
    /// let server = FakeItemServer::with_items(vec![
    ///     json!({"id": 1, "checked": false, "item": "Bread"}),
    /// ]);
    /// assert!(server.url().ends_with("/items"));
    /// ```
    pub fn with_items(items: Vec<Value>) -> Self {
        let state = ServerState::default();
        *state.items.lock().unwrap() = items;

        let listener =
            std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind fake server");
        listener
            .set_nonblocking(true)
            .expect("Failed to set listener non-blocking");
        let addr = listener.local_addr().expect("Failed to read local address");

        let router = create_router(state.clone());
        let (tx, rx) = oneshot::channel::<()>();

        let handle = std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to build fake server runtime");

            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener)
                    .expect("Failed to adopt listener");
                axum::serve(listener, router)
                    .with_graceful_shutdown(async {
                        rx.await.ok();
                    })
                    .await
                    .expect("Fake server failed");
            });
        });

        Self {
            addr,
            state,
            shutdown: Some(tx),
            handle: Some(handle),
        }
    }

    /// Collection URL, e.g. `http://127.0.0.1:PORT/items`
    pub fn url(&self) -> String {
        format!("http://{}/items", self.addr)
    }

    /// Current server-side records
    pub fn items(&self) -> Vec<Value> {
        self.state.items.lock().unwrap().clone()
    }

    /// Answer every subsequent request with `status`
    pub fn fail_with(&self, status: u16) {
        *self.state.failure.lock().unwrap() = Some(status);
    }

    /// Answer every subsequent POST/PATCH/DELETE with `status`; reads still succeed
    pub fn fail_mutations_with(&self, status: u16) {
        *self.state.mutation_failure.lock().unwrap() = Some(status);
    }

    /// Stop injecting failures
    pub fn recover(&self) {
        *self.state.failure.lock().unwrap() = None;
        *self.state.mutation_failure.lock().unwrap() = None;
    }

    /// Answer `GET /items` with `body` verbatim (status 200)
    pub fn serve_raw_list(&self, body: &str) {
        *self.state.raw_list.lock().unwrap() = Some(body.to_string());
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

impl Drop for FakeItemServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn create_router(state: ServerState) -> Router {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/:id", get(get_item).patch(patch_item).delete(delete_item))
        .with_state(state)
}

fn id_matches(record: &Value, id: &str) -> bool {
    match record.get("id") {
        Some(Value::Number(n)) => n.to_string() == id,
        Some(Value::String(s)) => s == id,
        _ => false,
    }
}

fn parse_body(body: &Bytes) -> Result<Value, Response> {
    serde_json::from_slice(body).map_err(|e| {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response()
    })
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({}))).into_response()
}

async fn list_items(State(state): State<ServerState>) -> Response {
    state.record("GET", "/items".to_string(), None);
    if let Some(failure) = state.injected_failure() {
        return failure;
    }
    if let Some(raw) = state.raw_list.lock().unwrap().clone() {
        return (StatusCode::OK, raw).into_response();
    }
    let items = state.items.lock().unwrap().clone();
    Json(Value::Array(items)).into_response()
}

async fn get_item(State(state): State<ServerState>, Path(id): Path<String>) -> Response {
    state.record("GET", format!("/items/{}", id), None);
    if let Some(failure) = state.injected_failure() {
        return failure;
    }
    let items = state.items.lock().unwrap();
    match items.iter().find(|record| id_matches(record, &id)) {
        Some(record) => Json(record.clone()).into_response(),
        None => not_found(),
    }
}

async fn create_item(State(state): State<ServerState>, body: Bytes) -> Response {
    let record = match parse_body(&body) {
        Ok(record) => record,
        Err(response) => return response,
    };
    state.record("POST", "/items".to_string(), Some(record.clone()));
    if let Some(failure) = state.injected_mutation_failure() {
        return failure;
    }
    state.items.lock().unwrap().push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}

async fn patch_item(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Response {
    let patch = match parse_body(&body) {
        Ok(patch) => patch,
        Err(response) => return response,
    };
    state.record("PATCH", format!("/items/{}", id), Some(patch.clone()));
    if let Some(failure) = state.injected_mutation_failure() {
        return failure;
    }

    let mut items = state.items.lock().unwrap();
    let Some(record) = items.iter_mut().find(|record| id_matches(record, &id)) else {
        return not_found();
    };
    if let (Some(target), Value::Object(fields)) = (record.as_object_mut(), patch) {
        for (key, value) in fields {
            target.insert(key, value);
        }
    }
    Json(record.clone()).into_response()
}

async fn delete_item(State(state): State<ServerState>, Path(id): Path<String>) -> Response {
    state.record("DELETE", format!("/items/{}", id), None);
    if let Some(failure) = state.injected_mutation_failure() {
        return failure;
    }

    let mut items = state.items.lock().unwrap();
    match items.iter().position(|record| id_matches(record, &id)) {
        Some(index) => Json(items.remove(index)).into_response(),
        None => not_found(),
    }
}
