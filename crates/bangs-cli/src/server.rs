//! HTTP redirect service.
//!
//! Every handler takes one registry snapshot from the shared
//! [`BangsManager`] and works on it for the rest of the request, so a reload
//! that lands mid-request is only seen by later requests.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use bangs_core::{BangsManager, Error, Forward, ResolvePolicy, forward};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Owner of the active registry.
    pub manager: Arc<BangsManager>,
    /// Resolution policy from the command line.
    pub policy: ResolvePolicy,
}

impl AppState {
    /// Bundle a manager and a policy.
    pub const fn new(manager: Arc<BangsManager>, policy: ResolvePolicy) -> Self {
        Self { manager, policy }
    }
}

const NO_BANG: &str = "No bang provided for search";
const NO_QUERY: &str = "No query provided for search";

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: Option<String>,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(search_by_query))
        .route("/bang/", get(search_by_query))
        .route("/bang/list", get(list_all))
        .route("/bang/:bang/", get(search_by_bang_only))
        .route("/bang/:bang/*query", get(search_by_path))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind `0.0.0.0:<port>` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the port cannot be bound or the server fails.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, "Listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

async fn search_by_query(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let q = params.q.unwrap_or_default();
    if q.trim().is_empty() {
        return bad_request(NO_QUERY);
    }

    let registry = state.manager.snapshot();
    match registry.search(&q, &state.policy) {
        Ok(forward) => forward_response(&forward),
        Err(err) if err.is_input_error() => {
            error!(error = %err, "Error preparing input");
            text_error(StatusCode::BAD_REQUEST, format!("Error preparing input: {err}"))
        },
        Err(err) => error_response(&err),
    }
}

async fn search_by_bang_only(
    State(state): State<AppState>,
    Path(bang): Path<String>,
) -> Response {
    lookup_path(&state, &bang, "")
}

async fn search_by_path(
    State(state): State<AppState>,
    Path((bang, query)): Path<(String, String)>,
) -> Response {
    lookup_path(&state, &bang, &query)
}

fn lookup_path(state: &AppState, bang: &str, query: &str) -> Response {
    let bang = bang.trim();
    if bang.is_empty() {
        return bad_request(NO_BANG);
    }
    let query = query.trim();
    if query.is_empty() {
        return bad_request(NO_QUERY);
    }

    let registry = state.manager.snapshot();
    let Some(entry) = registry.bangs().lookup(bang) else {
        debug!(bang, "Unknown bang in path");
        return error_response(&Error::UnknownBang(bang.to_string()));
    };

    match forward(&[entry], query) {
        Ok(forward) => forward_response(&forward),
        Err(err) => error_response(&err),
    }
}

async fn list_all(State(state): State<AppState>) -> Response {
    Json(state.manager.list_all_bangs()).into_response()
}

fn forward_response(forward: &Forward) -> Response {
    match forward {
        Forward::Redirect(url) => {
            (StatusCode::FOUND, [(header::LOCATION, url.as_str())]).into_response()
        },
        Forward::MultiTab(urls) => {
            debug!(count = urls.len(), "Opening multiple destinations");
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                forward.to_html(),
            )
                .into_response()
        },
    }
}

fn error_response(err: &Error) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %err, category = err.category(), "Request failed");
    } else {
        debug!(error = %err, category = err.category(), "Rejected request");
    }

    let body = match err {
        Error::UnknownBang(bang) => format!("Unknown bang: '{bang}'"),
        other => other.to_string(),
    };
    text_error(status, body)
}

fn bad_request(msg: &'static str) -> Response {
    error!("{msg}");
    (StatusCode::BAD_REQUEST, msg).into_response()
}

fn text_error(status: StatusCode, body: String) -> Response {
    (status, body).into_response()
}
