#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};

use mediahub_client::config::ClientConfig;
use mediahub_client::session::MemoryStore;
use mediahub_client::AppContext;

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";
pub const LOGIN_TOKEN: &str = "token-admin";
pub const REFRESHED_TOKEN: &str = "token-refreshed";

/// One request as the mock API saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

impl Recorded {
    pub fn query_pairs(&self) -> BTreeMap<String, String> {
        let query = self.query.as_deref().unwrap_or_default();
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

#[derive(Default)]
struct MockState {
    resources: BTreeMap<u64, Value>,
    next_id: u64,
    requests: Vec<Recorded>,
    refresh_fails: bool,
}

/// In-process stand-in for the MediaHub API, served on a free local port
#[derive(Clone, Default)]
pub struct MockApi {
    state: Arc<Mutex<MockState>>,
}

impl MockApi {
    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state poisoned")
    }

    pub fn seed(&self, resources: Vec<Value>) {
        let mut state = self.lock();
        for resource in resources {
            let id = resource["id"].as_u64().expect("seeded resource needs an id");
            state.next_id = state.next_id.max(id);
            state.resources.insert(id, resource);
        }
    }

    pub fn set_refresh_fails(&self, fails: bool) {
        self.lock().refresh_fails = fails;
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.lock().requests.clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("no request recorded")
    }

    pub fn resource(&self, id: u64) -> Option<Value> {
        self.lock().resources.get(&id).cloned()
    }

    fn record(&self, method: &Method, uri: &Uri, headers: &HeaderMap, body: &Bytes) {
        let authorization = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        self.lock().requests.push(Recorded {
            method: method.to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            authorization,
            body: serde_json::from_slice(body).ok(),
        });
    }

    /// Start serving; the task lives as long as the test runtime.
    pub async fn serve(&self) -> Result<String> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {port}"))?;

        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/auth/refresh", post(refresh))
            .route("/api/resources", get(list).post(create))
            .route("/api/resources/:id", get(show).put(update).delete(remove))
            .with_state(self.clone());

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("mock api stopped: {e}");
            }
        });

        Ok(format!("http://127.0.0.1:{port}"))
    }
}

/// Client context against `base_url` with an in-memory session
pub fn context(base_url: &str) -> AppContext {
    AppContext::with_store(&ClientConfig::for_server(base_url), Arc::new(MemoryStore::new()))
        .expect("client context")
}

/// Start a mock API with `resources` and return it with a connected client.
pub async fn start(resources: Vec<Value>) -> Result<(MockApi, AppContext)> {
    let mock = MockApi::default();
    mock.seed(resources);
    let base_url = mock.serve().await?;
    Ok((mock, context(&base_url)))
}

pub fn user_json(username: &str, email: &str) -> Value {
    json!({
        "id": 1,
        "username": username,
        "email": email,
        "is_admin": true,
        "created_at": "2024-01-01T08:00:00Z",
        "updated_at": "2024-01-01T08:00:00Z"
    })
}

/// A stored resource the way the backend returns it, naive timestamps included
pub fn resource_json(id: u64, kind: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "title_en": title,
        "description": "",
        "resource_type": kind,
        "source": "",
        "tags": [],
        "poster_image": "",
        "images": [],
        "videos": [],
        "links": {},
        "tmdb_id": null,
        "stickers": [],
        "liked_by": [],
        "is_approved": false,
        "created_at": "2024-03-01T10:00:00",
        "updated_at": "2024-03-01T10:00:00.250"
    })
}

fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Resource not found" })))
}

async fn login(State(mock): State<MockApi>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> (StatusCode, Json<Value>) {
    mock.record(&method, &uri, &headers, &body);
    let credentials: Value = serde_json::from_slice(&body).unwrap_or_default();

    if credentials["username"] == USERNAME && credentials["password"] == PASSWORD {
        (
            StatusCode::OK,
            Json(json!({
                "data": user_json(USERNAME, "admin@example.com"),
                "token": LOGIN_TOKEN
            })),
        )
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Invalid credentials" })))
    }
}

async fn register(State(mock): State<MockApi>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> (StatusCode, Json<Value>) {
    mock.record(&method, &uri, &headers, &body);
    let request: Value = serde_json::from_slice(&body).unwrap_or_default();
    let username = request["username"].as_str().unwrap_or_default();
    let email = request["email"].as_str().unwrap_or_default();

    (StatusCode::CREATED, Json(json!({ "data": user_json(username, email) })))
}

async fn refresh(State(mock): State<MockApi>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> (StatusCode, Json<Value>) {
    mock.record(&method, &uri, &headers, &body);
    let refresh_fails = mock.lock().refresh_fails;

    if refresh_fails || !headers.contains_key(AUTHORIZATION) {
        (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Token expired" })))
    } else {
        (StatusCode::OK, Json(json!({ "token": REFRESHED_TOKEN })))
    }
}

async fn list(
    State(mock): State<MockApi>,
    Query(params): Query<HashMap<String, String>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    mock.record(&method, &uri, &headers, &body);
    let state = mock.lock();

    let data: Vec<Value> = state
        .resources
        .values()
        .filter(|resource| match params.get("type") {
            Some(kind) => resource["resource_type"] == kind.as_str(),
            None => true,
        })
        .cloned()
        .collect();

    (
        StatusCode::OK,
        Json(json!({
            "total": data.len(),
            "page": params.get("page").and_then(|p| p.parse::<u32>().ok()).unwrap_or(1),
            "limit": params.get("limit").and_then(|l| l.parse::<u32>().ok()).unwrap_or(20),
            "data": data
        })),
    )
}

async fn show(
    State(mock): State<MockApi>,
    Path(id): Path<u64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    mock.record(&method, &uri, &headers, &body);
    match mock.resource(id) {
        Some(resource) => (StatusCode::OK, Json(json!({ "data": resource }))),
        None => not_found(),
    }
}

async fn create(State(mock): State<MockApi>, method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> (StatusCode, Json<Value>) {
    mock.record(&method, &uri, &headers, &body);
    let Ok(Value::Object(mut fields)) = serde_json::from_slice::<Value>(&body) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "Invalid JSON body" })));
    };

    let mut state = mock.lock();
    state.next_id += 1;
    let id = state.next_id;
    fields.insert("id".into(), json!(id));
    fields.insert("created_at".into(), json!("2024-03-02T09:30:00Z"));
    fields.insert("updated_at".into(), json!("2024-03-02T09:30:00Z"));

    let resource = Value::Object(fields);
    state.resources.insert(id, resource.clone());
    (StatusCode::CREATED, Json(json!({ "data": resource })))
}

async fn update(
    State(mock): State<MockApi>,
    Path(id): Path<u64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    mock.record(&method, &uri, &headers, &body);
    let changes: Value = serde_json::from_slice(&body).unwrap_or_default();

    let mut state = mock.lock();
    let Some(Value::Object(stored)) = state.resources.get_mut(&id) else {
        return not_found();
    };
    if let Value::Object(changes) = changes {
        stored.extend(changes);
    }
    let resource = Value::Object(stored.clone());
    (StatusCode::OK, Json(json!({ "data": resource })))
}

async fn remove(
    State(mock): State<MockApi>,
    Path(id): Path<u64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    mock.record(&method, &uri, &headers, &body);
    match mock.lock().resources.remove(&id) {
        Some(_) => (StatusCode::OK, Json(json!({ "message": "Resource deleted" }))),
        None => not_found(),
    }
}
