//! Multi-session transport: HTTP listener with server-sent events.
//!
//! Each client opens `GET /sse` and receives a fresh opaque session id plus a
//! server-push event stream. Requests are posted to `POST /messages` with the
//! session id as a routing key; the matching response is pushed onto that
//! session's stream and only that session's stream. Sessions live in a table
//! that is the single piece of shared mutable state in the system - every
//! mutation happens under a lock that is never held across an await point.
//!
//! A session moves `CONNECTING -> OPEN -> CLOSED`: the table entry appears
//! when the stream opens and disappears when the stream is dropped (or when a
//! push hits a closed channel). A request naming an unknown session is a 400
//! for that caller and nothing more; the listener keeps serving everyone
//! else.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use uuid::Uuid;

use super::rpc::{self, JsonRpcRequest};
use super::{SseConfig, TransportError, TransportResult};
use crate::core::McpServer;

/// Capacity of one session's push channel.
const PUSH_BUFFER: usize = 32;

/// Table of open sessions, keyed by session id.
type SessionTable = Arc<Mutex<HashMap<String, mpsc::Sender<String>>>>;

/// SSE transport handler.
pub struct SseTransport {
    config: SseConfig,
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
struct AppState {
    server: McpServer,
    sessions: SessionTable,
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: String,
}

impl SseTransport {
    /// Create a new SSE transport with the given config.
    pub fn new(config: SseConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the SSE transport.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();

        let state = AppState {
            server,
            sessions: Arc::new(Mutex::new(HashMap::new())),
        };

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let app = Router::new()
            .route("/sse", get(open_session))
            .route("/messages", post(post_message))
            .route("/health", get(health_check))
            .layer(cors)
            .with_state(state);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {} (SSE)", addr);
        info!("  -> Connect:  GET  /sse");
        info!("  -> Messages: POST /messages?sessionId=<id>");
        info!("  -> Health:   GET  /health");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Lock the session table, surviving a poisoned lock: the table stays usable
/// even if some handler panicked while holding it.
fn lock_sessions(
    sessions: &Mutex<HashMap<String, mpsc::Sender<String>>>,
) -> MutexGuard<'_, HashMap<String, mpsc::Sender<String>>> {
    sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Allocate a session id and register its push channel.
fn register_session(state: &AppState) -> (String, mpsc::Receiver<String>) {
    let session_id = Uuid::new_v4().to_string();
    let (tx, rx) = mpsc::channel(PUSH_BUFFER);
    lock_sessions(&state.sessions).insert(session_id.clone(), tx);
    info!("New SSE connection established with sessionId: {}", session_id);
    (session_id, rx)
}

/// Removes the session table entry when its stream is dropped.
struct SessionGuard {
    session_id: String,
    sessions: SessionTable,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if lock_sessions(&self.sessions).remove(&self.session_id).is_some() {
            info!("SSE session closed: {}", self.session_id);
        }
    }
}

/// `GET /sse` - open a new session.
///
/// The first event on the stream is `endpoint`, telling the client where to
/// post its correlated requests; every later `message` event carries one
/// JSON-RPC response.
async fn open_session(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (session_id, rx) = register_session(&state);

    let guard = SessionGuard {
        session_id: session_id.clone(),
        sessions: state.sessions.clone(),
    };

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("/messages?sessionId={session_id}"));

    let messages = ReceiverStream::new(rx).map(move |payload| {
        let _open = &guard;
        Ok(Event::default().event("message").data(payload))
    });

    let stream = stream::once(async move { Ok::<_, Infallible>(endpoint) }).chain(messages);

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// `POST /messages?sessionId=<id>` - submit one request for a session.
async fn post_message(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    // Clone the sender out so the lock is released before any await.
    let tx = lock_sessions(&state.sessions).get(&query.session_id).cloned();
    let Some(tx) = tx else {
        warn!("{}", TransportError::SessionNotFound(query.session_id.clone()));
        return (StatusCode::BAD_REQUEST, "No session found for sessionId").into_response();
    };

    let Some(response) = rpc::dispatch(&state.server, request).await else {
        // Notification: consumed, nothing to push.
        return (StatusCode::ACCEPTED, "Accepted").into_response();
    };

    let payload = match serde_json::to_string(&response) {
        Ok(payload) => payload,
        Err(e) => {
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    if tx.send(payload).await.is_err() {
        // The stream side is gone; drop the stale entry eagerly.
        lock_sessions(&state.sessions).remove(&query.session_id);
        warn!("Session {} closed before delivery", query.session_id);
        return (StatusCode::BAD_REQUEST, "Session closed").into_response();
    }

    (StatusCode::ACCEPTED, "Accepted").into_response()
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
