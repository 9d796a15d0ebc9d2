//! Fake vessel search API for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves:
//! - `GET /datasets/{dataset}/vessels?query=..&offset=..`: the configured
//!   vessels whose name contains any comma-separated part of `query`
//!
//! Entries without a string `name` are always returned, so malformed
//! payloads can be tested. Every request is recorded.
//!
//! # Example
//!
//! ```rust,no_run
//! let api = FakeVesselApi::start().await.unwrap();
//! api.add_vessel("v-1", "Sea Breeze").await;
//! let lookup = HttpLookup::new(&api.base_url(), "indonesia").unwrap();
//! ```

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// One request as seen by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub dataset: String,
    pub query: String,
    pub offset: String,
}

struct ApiState {
    vessels: Vec<serde_json::Value>,
    status: StatusCode,
    /// Per-query response delay; queries not listed answer immediately.
    delays: HashMap<String, Duration>,
    requests: Vec<RecordedRequest>,
}

/// Handle to the running fake vessel API server.
pub struct FakeVesselApi {
    addr: SocketAddr,
    state: Arc<Mutex<ApiState>>,
}

impl FakeVesselApi {
    /// Start the server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(ApiState {
            vessels: Vec::new(),
            status: StatusCode::OK,
            delays: HashMap::new(),
            requests: Vec::new(),
        }));

        let app = Router::new()
            .route("/datasets/{dataset}/vessels", get(search_vessels))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the task a moment to register.
        tokio::time::sleep(Duration::from_millis(5)).await;

        Ok(Self { addr, state })
    }

    /// Start with every fixture vessel registered.
    pub async fn with_fixture_vessels() -> std::io::Result<Self> {
        let api = Self::start().await?;
        for (id, name) in super::fixtures::VESSELS {
            api.add_vessel(id, name).await;
        }
        Ok(api)
    }

    /// Base URL for the API (e.g. `http://127.0.0.1:PORT`).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn add_vessel(&self, id: &str, name: &str) {
        self.add_raw(serde_json::json!({ "vesselId": id, "name": name }))
            .await;
    }

    /// Register an arbitrary JSON entry, well-formed or not.
    pub async fn add_raw(&self, entry: serde_json::Value) {
        self.state.lock().await.vessels.push(entry);
    }

    /// Answer every request with `status` and an empty body.
    pub async fn fail_with(&self, status: StatusCode) {
        self.state.lock().await.status = status;
    }

    /// Hold responses for `query` back by `delay`.
    pub async fn delay_query(&self, query: &str, delay: Duration) {
        self.state
            .lock()
            .await
            .delays
            .insert(query.to_string(), delay);
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().await.requests.clone()
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

async fn search_vessels(
    Path(dataset): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    State(state): State<Arc<Mutex<ApiState>>>,
) -> Response {
    let query = params.get("query").cloned().unwrap_or_default();
    let offset = params.get("offset").cloned().unwrap_or_default();

    let (status, delay, matches) = {
        let mut state = state.lock().await;
        state.requests.push(RecordedRequest {
            dataset,
            query: query.clone(),
            offset,
        });
        let needles: Vec<String> = query
            .split(',')
            .map(|p| p.trim().to_lowercase())
            .filter(|p| !p.is_empty())
            .collect();
        let matches: Vec<serde_json::Value> = state
            .vessels
            .iter()
            .filter(|v| match v.get("name").and_then(|n| n.as_str()) {
                Some(name) => {
                    let name = name.to_lowercase();
                    needles.iter().any(|n| name.contains(n.as_str()))
                }
                None => true,
            })
            .cloned()
            .collect();
        (state.status, state.delays.get(&query).copied(), matches)
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    if status != StatusCode::OK {
        return (status, String::new()).into_response();
    }
    axum::Json(serde_json::json!({ "entries": matches })).into_response()
}
