//! Request handlers: HTTP verbs in, engine outcomes out.

use crate::config::ServerConfig;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tfstated_core::{EngineError, LockInfo, StateEngine};

/// Response header carrying the state checksum in hex.
pub const CHECKSUM_HEADER: &str = "x-state-checksum";

/// Shared state for all handlers.
#[derive(Clone)]
struct AppState {
    engine: Arc<StateEngine>,
    max_state_bytes: usize,
}

/// Query parameters of the state endpoint.
#[derive(Debug, Default, Deserialize)]
struct StateQuery {
    /// Lock token presented with a write.
    #[serde(rename = "ID")]
    id: Option<String>,
}

/// Body of an unlock request. Clients send their full lock info; only the
/// token matters here, the rest is ignored.
#[derive(Debug, Deserialize)]
struct UnlockRequest {
    #[serde(rename = "ID")]
    id: String,
}

/// Builds the router for a shared engine.
pub fn build_router(engine: Arc<StateEngine>, config: &ServerConfig) -> Router {
    let state = AppState {
        engine,
        max_state_bytes: config.max_state_bytes,
    };

    Router::new()
        .route("/ping", get(ping))
        // The state endpoint answers the custom LOCK/UNLOCK verbs, so it is
        // registered as a catch-all and dispatched on the method name.
        .route("/api/v1/state/default", any(state_dispatch))
        .route(
            "/api/v1/state/default/lock",
            get(lock_status).put(lock_put).delete(lock_delete),
        )
        .with_state(state)
}

async fn ping() -> &'static str {
    "pong"
}

async fn state_dispatch(
    State(app): State<AppState>,
    method: Method,
    Query(query): Query<StateQuery>,
    body: Bytes,
) -> Response {
    match method.as_str() {
        "GET" => read_state(&app),
        "POST" => write_state(&app, query.id.as_deref(), &body),
        "LOCK" => acquire_lock(&app, &body),
        "UNLOCK" => release_lock(&app, &body),
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}

async fn lock_status(State(app): State<AppState>) -> Response {
    match app.engine.lock_status() {
        Some(holder) => Json(holder).into_response(),
        None => error_response("state is not locked", StatusCode::NOT_FOUND),
    }
}

async fn lock_put(State(app): State<AppState>, body: Bytes) -> Response {
    acquire_lock(&app, &body)
}

async fn lock_delete(State(app): State<AppState>, body: Bytes) -> Response {
    release_lock(&app, &body)
}

fn read_state(app: &AppState) -> Response {
    match app.engine.read_state() {
        Ok(doc) => ([(CHECKSUM_HEADER, doc.checksum.to_hex())], doc.content).into_response(),
        Err(err) => engine_error_response(&err),
    }
}

fn write_state(app: &AppState, lock_id: Option<&str>, body: &Bytes) -> Response {
    if body.len() > app.max_state_bytes {
        return error_response(
            &format!(
                "state payload of {} bytes exceeds the {} byte limit",
                body.len(),
                app.max_state_bytes
            ),
            StatusCode::PAYLOAD_TOO_LARGE,
        );
    }

    match app.engine.write_state(body.to_vec(), lock_id) {
        Ok(checksum) => Json(serde_json::json!({ "checksum": checksum.to_hex() })).into_response(),
        Err(err) => engine_error_response(&err),
    }
}

fn acquire_lock(app: &AppState, body: &Bytes) -> Response {
    let info: LockInfo = match serde_json::from_slice(body) {
        Ok(info) => info,
        Err(err) => return error_response(&format!("invalid lock body: {err}"), StatusCode::BAD_REQUEST),
    };

    match app.engine.lock_acquire(info) {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => engine_error_response(&err),
    }
}

fn release_lock(app: &AppState, body: &Bytes) -> Response {
    let request: UnlockRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(err) => {
            return error_response(&format!("invalid unlock body: {err}"), StatusCode::BAD_REQUEST)
        }
    };

    match app.engine.lock_release(&request.id) {
        Ok(()) => StatusCode::OK.into_response(),
        // Nothing to unlock reads as already-unlocked over the wire.
        Err(EngineError::NotLocked) => StatusCode::OK.into_response(),
        Err(err) => engine_error_response(&err),
    }
}

/// Maps an engine outcome to its wire representation.
///
/// A conflict is `423 Locked` carrying the holder's lock info, so the
/// caller can decide whether to wait, retry, or alert a human.
fn engine_error_response(err: &EngineError) -> Response {
    match err {
        EngineError::Conflict { holder } => {
            tracing::info!(holder = %holder, "request conflicts with current lock");
            (StatusCode::LOCKED, Json(holder)).into_response()
        }
        EngineError::NotLocked => error_response("no lock is currently held", StatusCode::CONFLICT),
        EngineError::Storage(storage) => {
            tracing::error!(error = %storage, "storage failure");
            error_response(&storage.to_string(), StatusCode::INTERNAL_SERVER_ERROR)
        }
        EngineError::Malformed { message } => error_response(message, StatusCode::BAD_REQUEST),
    }
}

fn error_response(message: &str, status: StatusCode) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router() -> Router {
        build_router(Arc::new(StateEngine::in_memory()), &ServerConfig::default())
    }

    fn lock_body(id: &str) -> String {
        serde_json::json!({ "ID": id, "Who": "tester@host", "Operation": "apply" }).to_string()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn request(method: &str, uri: &str, body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(body.into())
            .unwrap()
    }

    #[tokio::test]
    async fn ping_pongs() {
        let response = test_router()
            .oneshot(request("GET", "/ping", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn fresh_state_reads_empty_with_checksum() {
        let response = test_router()
            .oneshot(request("GET", "/api/v1/state/default", Body::empty()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let checksum = response.headers()[CHECKSUM_HEADER].to_str().unwrap().to_string();
        assert_eq!(checksum.len(), 64);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn write_then_read_round_trips() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(request("POST", "/api/v1/state/default", "{\"version\": 4}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let written = body_json(response).await;

        let response = router
            .oneshot(request("GET", "/api/v1/state/default", Body::empty()))
            .await
            .unwrap();
        assert_eq!(
            response.headers()[CHECKSUM_HEADER].to_str().unwrap(),
            written["checksum"].as_str().unwrap()
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"{\"version\": 4}");
    }

    #[tokio::test]
    async fn lock_verb_acquires_and_conflicts() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(request("LOCK", "/api/v1/state/default", lock_body("A")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // A second holder is told who won.
        let response = router
            .oneshot(request("LOCK", "/api/v1/state/default", lock_body("B")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::LOCKED);
        let holder = body_json(response).await;
        assert_eq!(holder["ID"], "A");
    }

    #[tokio::test]
    async fn locked_write_requires_token_in_query() {
        let router = test_router();

        router
            .clone()
            .oneshot(request("LOCK", "/api/v1/state/default", lock_body("A")))
            .await
            .unwrap();

        let response = router
            .clone()
            .oneshot(request("POST", "/api/v1/state/default", "v1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::LOCKED);

        let response = router
            .clone()
            .oneshot(request("POST", "/api/v1/state/default?ID=B", "v1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::LOCKED);

        let response = router
            .oneshot(request("POST", "/api/v1/state/default?ID=A", "v1"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unlock_verb_releases_and_reports_conflicts() {
        let router = test_router();

        router
            .clone()
            .oneshot(request("LOCK", "/api/v1/state/default", lock_body("A")))
            .await
            .unwrap();

        let response = router
            .clone()
            .oneshot(request("UNLOCK", "/api/v1/state/default", lock_body("B")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::LOCKED);
        assert_eq!(body_json(response).await["ID"], "A");

        let response = router
            .clone()
            .oneshot(request("UNLOCK", "/api/v1/state/default", lock_body("A")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Releasing again is already-unlocked, not an error.
        let response = router
            .oneshot(request("UNLOCK", "/api/v1/state/default", lock_body("A")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn lock_subpath_aliases_work() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(request("PUT", "/api/v1/state/default/lock", lock_body("A")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .clone()
            .oneshot(request("GET", "/api/v1/state/default/lock", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["ID"], "A");

        let response = router
            .clone()
            .oneshot(request("DELETE", "/api/v1/state/default/lock", lock_body("A")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .oneshot(request("GET", "/api/v1/state/default/lock", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_lock_bodies_are_rejected() {
        let router = test_router();

        let response = router
            .clone()
            .oneshot(request("LOCK", "/api/v1/state/default", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // An empty token is a caller error, not a lock-state answer.
        let response = router
            .clone()
            .oneshot(request("LOCK", "/api/v1/state/default", lock_body("")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = router
            .oneshot(request("UNLOCK", "/api/v1/state/default", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn oversized_write_is_rejected() {
        let engine = Arc::new(StateEngine::in_memory());
        let config = ServerConfig::default().with_max_state_bytes(8);
        let router = build_router(engine, &config);

        let response = router
            .oneshot(request(
                "POST",
                "/api/v1/state/default",
                "way more than eight bytes",
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn unknown_method_is_rejected() {
        let response = test_router()
            .oneshot(request("PATCH", "/api/v1/state/default", Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
