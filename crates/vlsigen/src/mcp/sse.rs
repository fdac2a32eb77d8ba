use crate::prelude::{eprintln, *};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tower_http::cors::{Any, CorsLayer};

/// Open SSE sessions, keyed by the id handed out in the `endpoint` event.
#[derive(Default)]
struct Sessions {
    next_id: AtomicU64,
    senders: Mutex<HashMap<String, mpsc::UnboundedSender<String>>>,
}

impl Sessions {
    fn open(self: &Arc<Self>) -> (SessionGuard, mpsc::UnboundedReceiver<String>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed).to_string();
        let (sender, receiver) = mpsc::unbounded_channel();
        self.lock().insert(id.clone(), sender);

        let guard = SessionGuard {
            id,
            sessions: Arc::clone(self),
        };
        (guard, receiver)
    }

    fn sender(&self, id: &str) -> Option<mpsc::UnboundedSender<String>> {
        self.lock().get(id).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, mpsc::UnboundedSender<String>>> {
        // A poisoned map is still consistent: every operation is a single insert/remove/get.
        self.senders
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Removes its session once the event stream is dropped.
struct SessionGuard {
    id: String,
    sessions: Arc<Sessions>,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.lock().remove(&self.id);
        log::debug!("SSE session {} closed", self.id);
    }
}

#[derive(Clone)]
struct AppState {
    global: crate::Global,
    sessions: Arc<Sessions>,
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    #[serde(rename = "sessionId")]
    session_id: String,
}

/// Serve MCP over HTTP: `GET /sse` opens an event stream whose first event
/// names the endpoint to POST requests to; responses arrive on the stream.
pub async fn run_sse(options: super::cli::SseOptions, global: crate::Global) -> Result<()> {
    let addr = f!("{}:{}", options.host, options.port);

    let state = AppState {
        global: global.clone(),
        sessions: Arc::new(Sessions::default()),
    };

    let app_router = Router::new()
        .route("/sse", get(sse_handler))
        .route("/message", post(message_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    if global.verbose {
        eprintln!("vlsigen MCP server listening on http://{}", addr);
        eprintln!("SSE endpoint: http://{}/sse", addr);
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| f!("Failed to bind to {}", addr))?;

    log::info!("Serving MCP over SSE on {addr}");

    axum::serve(listener, app_router)
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    Ok(())
}

async fn sse_handler(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let (guard, receiver) = state.sessions.open();
    log::debug!("SSE session {} opened", guard.id);

    let endpoint = Event::default()
        .event("endpoint")
        .data(f!("/message?sessionId={}", guard.id));

    let messages = stream::unfold((receiver, guard), |(mut receiver, guard)| async move {
        let message = receiver.recv().await?;
        let event = Event::default().event("message").data(message);
        Some((Ok(event), (receiver, guard)))
    });

    Sse::new(stream::once(async { Ok(endpoint) }).chain(messages)).keep_alive(KeepAlive::default())
}

async fn message_handler(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    body: String,
) -> (StatusCode, String) {
    let Some(sender) = state.sessions.sender(&query.session_id) else {
        return (
            StatusCode::NOT_FOUND,
            f!("Unknown session: {}", query.session_id),
        );
    };

    let Some(response) = super::handle_message(&body, &state.global).await else {
        return (StatusCode::ACCEPTED, String::new());
    };

    let response_json = match serde_json::to_string(&response) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Failed to serialize response: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                f!("Failed to serialize response: {e}"),
            );
        }
    };

    if sender.send(response_json).is_err() {
        return (
            StatusCode::GONE,
            f!("Session {} closed", query.session_id),
        );
    }

    (StatusCode::ACCEPTED, String::new())
}
