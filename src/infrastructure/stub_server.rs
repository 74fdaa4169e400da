//! Canned-response HTTP server for exercising the real HTTP stack in tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;

const NOT_FOUND_BODY: &str = r#"{"detail":"Not found."}"#;

#[derive(Clone, Default)]
struct StubState {
    routes: Arc<Mutex<HashMap<String, (u16, String)>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

pub struct StubServer {
    base: String,
    state: StubState,
}

impl StubServer {
    /// Bind an ephemeral port and serve routes until the test runtime shuts down
    pub async fn start() -> Self {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let state = StubState::default();

        let app = Router::new().fallback(respond).with_state(state.clone());
        tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                tracing::error!("stub server error: {err:?}");
            }
        });

        Self { base, state }
    }

    /// Answer `GET path_and_query` with `status` and `body`; unknown paths get 404
    #[must_use]
    pub fn route(self, path_and_query: &str, status: u16, body: &str) -> Self {
        self.state
            .routes
            .lock()
            .unwrap()
            .insert(path_and_query.to_string(), (status, body.to_string()));
        self
    }

    pub fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base, path_and_query)
    }

    /// Request targets received so far, in arrival order
    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    /// URL of a port nothing is listening on
    pub async fn closed_url() -> String {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/pokemon")
    }
}

async fn respond(State(state): State<StubState>, uri: Uri) -> Response {
    let target = uri
        .path_and_query()
        .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string());
    state.requests.lock().unwrap().push(target.clone());

    let (status, body) = state
        .routes
        .lock()
        .unwrap()
        .get(&target)
        .cloned()
        .unwrap_or_else(|| (404, NOT_FOUND_BODY.to_string()));
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
}
