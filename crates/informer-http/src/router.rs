use axum::extract::Request;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{self, AppState};

/// Mark every response as JSON, overriding whatever the handler chose
pub async fn json_content_type(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}

/// Reject HEAD on matched routes; axum's `get` would otherwise answer it
pub async fn get_only(request: Request, next: Next) -> Response {
    if request.method() == Method::HEAD {
        return (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, "GET")]).into_response();
    }
    next.run(request).await
}

/// Build the API router. Every route is GET only.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/namespaces", get(handlers::namespaces))
        .route("/namespaces/:namespace", get(handlers::namespace_detail))
        .route("/pods/:namespace", get(handlers::pods))
        .route("/ingresses/:namespace", get(handlers::ingresses))
        .route("/health", get(handlers::health))
        .route_layer(middleware::from_fn(get_only))
        .layer(middleware::from_fn(json_content_type))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use tower::ServiceExt;

    use informer_k8s::{ListError, ResourceKind, ResourceLister, Scope};

    /// In-memory cluster. Namespaces missing from `pods`/`ingresses` fail
    /// the way the API does for an unknown namespace.
    #[derive(Default)]
    struct FakeLister {
        namespaces: Option<Vec<String>>,
        pods: HashMap<String, Vec<String>>,
        ingresses: HashMap<String, Vec<String>>,
        calls: AtomicUsize,
    }

    impl FakeLister {
        fn shop() -> Self {
            let mut lister = FakeLister {
                namespaces: Some(names(&["default", "kube-system", "shop"])),
                ..Default::default()
            };
            lister.pods.insert("shop".into(), names(&["a", "b"]));
            lister.ingresses.insert("shop".into(), names(&["c"]));
            lister.pods.insert("default".into(), Vec::new());
            lister.ingresses.insert("default".into(), Vec::new());
            lister
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ResourceLister for FakeLister {
        async fn list_namespaces(&self) -> Result<Vec<String>, ListError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.namespaces.clone().ok_or_else(|| {
                ListError::new(ResourceKind::Namespace, Scope::Cluster, "connection refused")
            })
        }

        async fn list_pods(&self, namespace: &str) -> Result<Vec<String>, ListError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.pods.get(namespace).cloned().ok_or_else(|| {
                ListError::new(ResourceKind::Pod, Scope::namespaced(namespace), "not found")
            })
        }

        async fn list_ingresses(&self, namespace: &str) -> Result<Vec<String>, ListError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.ingresses.get(namespace).cloned().ok_or_else(|| {
                ListError::new(ResourceKind::Ingress, Scope::namespaced(namespace), "not found")
            })
        }
    }

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    async fn send(
        lister: Arc<FakeLister>,
        method: Method,
        uri: &str,
    ) -> (StatusCode, String, String) {
        let app = router(AppState::new(lister));
        let request = axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    async fn fetch(lister: Arc<FakeLister>, uri: &str) -> (StatusCode, String, String) {
        send(lister, Method::GET, uri).await
    }

    #[tokio::test]
    async fn test_list_namespaces() {
        let (status, content_type, body) =
            fetch(Arc::new(FakeLister::shop()), "/namespaces").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/json");
        assert_eq!(body, r#"["default","kube-system","shop"]"#);
    }

    #[tokio::test]
    async fn test_namespace_detail() {
        let (status, _, body) = fetch(Arc::new(FakeLister::shop()), "/namespaces/shop").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"namespace":"shop","pods":["a","b"],"ingresess":["c"]}"#);
    }

    #[tokio::test]
    async fn test_namespace_detail_unknown_namespace() {
        let (status, _, body) = fetch(Arc::new(FakeLister::shop()), "/namespaces/nope").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"namespace":"nope","pods":[],"ingresess":[]}"#);
    }

    #[tokio::test]
    async fn test_pods_and_ingresses() {
        let lister = Arc::new(FakeLister::shop());

        let (status, _, body) = fetch(lister.clone(), "/pods/shop").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"["a","b"]"#);

        let (status, content_type, body) = fetch(lister, "/ingresses/shop").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/json");
        assert_eq!(body, r#"["c"]"#);
    }

    #[tokio::test]
    async fn test_empty_namespace_returns_empty_array() {
        let (status, _, body) = fetch(Arc::new(FakeLister::shop()), "/pods/default").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_missing_namespace_is_not_404() {
        let lister = Arc::new(FakeLister::shop());

        let (status, _, body) = fetch(lister.clone(), "/pods/doesnotexist").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");

        let (status, _, body) = fetch(lister, "/ingresses/doesnotexist").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_cluster_unreachable_returns_empty_namespaces() {
        let (status, _, body) = fetch(Arc::new(FakeLister::default()), "/namespaces").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "[]");
    }

    #[tokio::test]
    async fn test_health() {
        let lister = Arc::new(FakeLister::shop());
        let (status, content_type, body) = fetch(lister.clone(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "1");
        // the middleware still labels the bare body as JSON
        assert_eq!(content_type, "application/json");
        assert_eq!(lister.calls(), 0);
    }

    #[tokio::test]
    async fn test_post_not_allowed() {
        let lister = Arc::new(FakeLister::shop());

        let (status, _, _) = send(lister.clone(), Method::POST, "/namespaces").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        let (status, _, _) = send(lister.clone(), Method::DELETE, "/pods/shop").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);

        assert_eq!(lister.calls(), 0);
    }

    #[tokio::test]
    async fn test_head_not_allowed() {
        let lister = Arc::new(FakeLister::shop());

        for uri in ["/namespaces", "/namespaces/shop", "/pods/shop", "/health"] {
            let (status, _, body) = send(lister.clone(), Method::HEAD, uri).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "HEAD {uri}");
            assert!(body.is_empty());
        }

        assert_eq!(lister.calls(), 0);
    }

    #[tokio::test]
    async fn test_repeated_requests_are_identical() {
        let lister = Arc::new(FakeLister::shop());
        let (_, _, first) = fetch(lister.clone(), "/namespaces/shop").await;
        let (_, _, second) = fetch(lister, "/namespaces/shop").await;
        assert_eq!(first, second);
    }
}
