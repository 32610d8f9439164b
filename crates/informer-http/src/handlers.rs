//! Route handlers
//!
//! Lister failures never reach the caller: they are logged and rendered as
//! empty lists.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

use informer_k8s::{ListError, ResourceLister};
use informer_types::NamespaceDetail;

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub lister: Arc<dyn ResourceLister>,
}

impl AppState {
    pub fn new(lister: Arc<dyn ResourceLister>) -> Self {
        Self { lister }
    }
}

/// Fail-soft policy: a failed list renders as an empty one
fn names_or_empty(result: Result<Vec<String>, ListError>) -> Vec<String> {
    result.unwrap_or_else(|e| {
        warn!(kind = %e.kind, scope = %e.scope, error = %e.source, "list failed, returning empty result");
        Vec::new()
    })
}

/// Encode `value` as a 200 JSON body. An encoding failure is logged and
/// leaves the body empty; no error payload is sent.
fn json_body<T: Serialize>(value: &T, what: &str) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(e) => {
            error!(error = %e, "error encoding {}", what);
            StatusCode::OK.into_response()
        }
    }
}

pub async fn namespaces(State(state): State<AppState>) -> Response {
    let names = names_or_empty(state.lister.list_namespaces().await);
    json_body(&names, "namespace list")
}

pub async fn namespace_detail(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Response {
    let pods = names_or_empty(state.lister.list_pods(&namespace).await);
    let ingresses = names_or_empty(state.lister.list_ingresses(&namespace).await);
    let detail = NamespaceDetail::new(namespace, pods, ingresses);
    json_body(&detail, "namespace detail")
}

pub async fn pods(State(state): State<AppState>, Path(namespace): Path<String>) -> Response {
    let names = names_or_empty(state.lister.list_pods(&namespace).await);
    json_body(&names, "pod list")
}

pub async fn ingresses(State(state): State<AppState>, Path(namespace): Path<String>) -> Response {
    let names = names_or_empty(state.lister.list_ingresses(&namespace).await);
    json_body(&names, "ingress list")
}

/// Liveness probe; the body is a bare `1`, not JSON
pub async fn health() -> &'static str {
    "1"
}
