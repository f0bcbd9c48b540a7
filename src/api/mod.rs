use crate::stats::StatsCollector;
use crate::store::{AddOutcome, ListKind, ListStore};
use axum::{
    extract::{Json as AxumJson, Path, State},
    http::{header, StatusCode, Uri},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use rust_embed::RustEmbed;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(RustEmbed)]
#[folder = "$OUT_DIR/ui"]
struct Asset;

pub struct PanelState {
    stats: Arc<StatsCollector>,
    store: ListStore,
}

impl PanelState {
    pub fn new(stats: Arc<StatsCollector>, store: ListStore) -> Self {
        Self { stats, store }
    }
}

/// Builds the panel router. Split from the serve loop so tests can drive
/// the app on an ephemeral port.
pub fn panel_router(state: Arc<PanelState>) -> Router {
    Router::new()
        .route("/api/state", get(get_state))
        .route("/api/stats", get(get_stats))
        .route("/api/lists/{kind}", post(add_domain))
        .fallback(static_handler)
        .with_state(state)
}

pub async fn start_panel_server(state: Arc<PanelState>, host: String, port: u16) {
    let app = panel_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Panel server failed to bind {}: {}", addr, e);
            return;
        }
    };
    info!("Panel listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Panel server exited: {}", e);
    }
}

fn read_list_or_empty(state: &PanelState, kind: ListKind) -> Vec<String> {
    state.store.db().read_list(kind).unwrap_or_else(|e| {
        warn!("Panel failed to read {}: {}", kind.key(), e);
        Vec::new()
    })
}

/// Everything the popup renders, in one read. Lists come straight from the
/// persisted store; the count comes from the live collector, which is
/// seeded from the store and ahead of it only by in-flight writes.
async fn get_state(State(state): State<Arc<PanelState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "whitelist": read_list_or_empty(&state, ListKind::Whitelist),
        "blacklist": read_list_or_empty(&state, ListKind::Blacklist),
        "blocked_count": state.stats.blocked(),
    }))
}

async fn get_stats(State(state): State<Arc<PanelState>>) -> impl IntoResponse {
    Json(state.stats.get_snapshot())
}

#[derive(serde::Deserialize)]
struct AddRequest {
    domain: String,
}

async fn add_domain(
    State(state): State<Arc<PanelState>>,
    Path(kind): Path<String>,
    AxumJson(payload): AxumJson<AddRequest>,
) -> impl IntoResponse {
    let Some(kind) = ListKind::from_key(&kind) else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "unknown list" })),
        )
            .into_response();
    };

    let outcome = state.store.add_domain(kind, payload.domain).await;
    let (added, reason) = match outcome {
        AddOutcome::Added => (true, "added"),
        AddOutcome::Duplicate => (false, "duplicate"),
        AddOutcome::Empty => (false, "empty"),
        AddOutcome::Failed => (false, "store_error"),
    };

    let status = if outcome == AddOutcome::Failed {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };
    (
        status,
        Json(serde_json::json!({ "added": added, "reason": reason })),
    )
        .into_response()
}

async fn static_handler(uri: Uri) -> impl IntoResponse {
    let path = uri.path().trim_start_matches('/');
    let path = if path.is_empty() { "index.html" } else { path };

    match Asset::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "404 Not Found").into_response(),
    }
}
