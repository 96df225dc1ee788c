//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`, plus an unversioned `/health`.
//! Middleware: CORS, tracing.

use axum::Router;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Entity registry
        .route("/entities", get(handlers::entity::list_entities))
        .route("/entities/{id}", get(handlers::entity::get_entity))
        // Stateless composition and actions
        .route("/compose", post(handlers::compose::compose_message))
        .route("/actions", post(handlers::action::dispatch_action))
        // Threads
        .route("/threads", get(handlers::thread::list_threads))
        .route("/threads/{id}", delete(handlers::thread::delete_thread))
        .route("/threads/{id}/messages", post(handlers::thread::post_message))
        .route(
            "/threads/{id}/actions",
            post(handlers::thread::dispatch_thread_action),
        )
        .route("/threads/{id}/items", get(handlers::thread::list_items));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use mentionkit_types::config::GlobalConfig;

    use crate::http::extractors::user::USER_HEADER;

    async fn test_router() -> (TempDir, Router) {
        let tmp = TempDir::new().unwrap();
        let state = AppState::open(tmp.path(), GlobalConfig::default(), None)
            .await
            .unwrap();
        (tmp, build_router(state))
    }

    async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str, user: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(user) = user {
            builder = builder.header(USER_HEADER, user);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, user: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(user) = user {
            builder = builder.header(USER_HEADER, user);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (_tmp, router) = test_router().await;
        let (status, body) = send(&router, get("/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn lists_and_fetches_entities() {
        let (_tmp, router) = test_router().await;

        let (status, body) = send(&router, get("/api/v1/entities", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 2);
        assert_eq!(body["data"][0]["id"], "order_123");

        let (status, body) = send(&router, get("/api/v1/entities/order_456", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["fields"]["status"], "processing");

        let (status, body) = send(&router, get("/api/v1/entities/order_999", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["errors"][0]["code"], "ENTITY_NOT_FOUND");
    }

    #[tokio::test]
    async fn compose_injects_found_and_missing_blocks() {
        let (_tmp, router) = test_router().await;
        let req = post_json(
            "/api/v1/compose",
            None,
            json!({ "text": "Compare @order_123 with @order_999" }),
        );

        let (status, body) = send(&router, req).await;
        assert_eq!(status, StatusCode::OK);

        let blocks = body["data"]["injected_blocks"].as_array().unwrap();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].as_str().unwrap().contains("status=shipped"));
        assert!(blocks[1].as_str().unwrap().starts_with("<ENTITY_NOT_FOUND>"));

        let payload = body["data"]["payload"].as_str().unwrap();
        assert!(payload.starts_with("Compare @order_123 with @order_999\n"));
    }

    #[tokio::test]
    async fn action_outcomes_are_reported_in_result() {
        let (_tmp, router) = test_router().await;

        let req = post_json(
            "/api/v1/actions",
            None,
            json!({ "action_name": "apply_theme", "payload": { "colorScheme": "dark" } }),
        );
        let (status, body) = send(&router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "ok");
        assert_eq!(body["data"]["state"], "applied");
        assert_eq!(body["data"]["effect"]["name"], "update_ui_theme");

        let req = post_json("/api/v1/actions", None, json!({ "action_name": "nonexistent" }));
        let (status, body) = send(&router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["status"], "rejected");
        assert_eq!(body["data"]["state"], "rejected");
        assert_eq!(body["data"]["error"], "unknown action 'nonexistent'");
        assert!(body["data"].get("effect").is_none());
    }

    #[tokio::test]
    async fn thread_messages_are_scoped_per_user() {
        let (_tmp, router) = test_router().await;

        let req = post_json(
            "/api/v1/threads/thr_1/messages",
            Some("alice"),
            json!({ "text": "Where is @order_123?" }),
        );
        let (status, body) = send(&router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["item"]["role"], "user");
        assert!(
            body["data"]["item"]["composed_payload"]
                .as_str()
                .unwrap()
                .contains("<ORDER_CONTEXT>")
        );

        let (status, body) = send(&router, get("/api/v1/threads/thr_1/items", Some("alice"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let (status, _) = send(&router, get("/api/v1/threads/thr_1/items", Some("bob"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = send(&router, get("/api/v1/threads", Some("alice"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["title"], "Where is @order_123?");
    }

    #[tokio::test]
    async fn thread_action_appends_reply() {
        let (_tmp, router) = test_router().await;

        let req = post_json(
            "/api/v1/threads/thr_2/actions",
            None,
            json!({ "action_name": "submit_feedback", "payload": { "rating": 5 } }),
        );
        let (status, body) = send(&router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["effect"]["name"], "feedback_received");

        let (_, body) = send(&router, get("/api/v1/threads/thr_2/items", None)).await;
        let items = body["data"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["role"], "assistant");
        assert_eq!(items[0]["text"], "Feedback received. Thank you!");
    }

    #[tokio::test]
    async fn empty_thread_message_is_rejected() {
        let (_tmp, router) = test_router().await;
        let req = post_json("/api/v1/threads/thr_3/messages", None, json!({ "text": "  " }));

        let (status, body) = send(&router, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn delete_thread_removes_items() {
        let (_tmp, router) = test_router().await;
        let req = post_json("/api/v1/threads/thr_4/messages", None, json!({ "text": "hi" }));
        send(&router, req).await;

        let req = Request::builder()
            .method("DELETE")
            .uri("/api/v1/threads/thr_4")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&router, req).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&router, get("/api/v1/threads/thr_4/items", None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
