//! HTTP server wiring

use axum::{
    routing::{get, post},
    Json, Router,
};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use super::api::{self, ApiState};
use crate::config::ServiceConfig;
use crate::managers::SharedBotManager;

/// Build the full router
pub fn build_router(bots: SharedBotManager) -> Router {
    let state = ApiState { bots };

    Router::new()
        .route("/health", get(health))
        .route("/api/user", get(api::get_user))
        .route("/api/bots", get(api::list_bots).post(api::create_bot))
        .route("/api/bots/verify/:bot_id", post(api::verify_bot))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server and serve until the process exits
pub async fn start_web_server(config: &ServiceConfig, bots: SharedBotManager) -> anyhow::Result<()> {
    let app = build_router(bots);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind HTTP server on port {}: {}", config.port, e))?;

    info!("Web server listening on http://{}", listener.local_addr()?);
    info!("Data directory: {}", config.data_dir.display());

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"ok": true, "service": "botkeeper"}))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BotPolicy;
    use crate::managers::create_shared_bot_manager;
    use crate::state::{
        create_shared_state_store, BotRecord, BotStatus, DocumentPaths, FsDocumentStore,
        StateStore, UserInfo,
    };
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn app_in(dir: &std::path::Path, points: u64) -> Router {
        std::fs::write(
            dir.join("user_info.json"),
            format!("{{\"points\": {}, \"userId\": \"guest\"}}", points),
        )
        .unwrap();
        let store = StateStore::load(Arc::new(FsDocumentStore::new(dir)), DocumentPaths::default())
            .await
            .unwrap();
        build_router(create_shared_bot_manager(
            create_shared_state_store(store),
            BotPolicy::default(),
        ))
    }

    /// Send a request to the app and return (status, JSON body).
    async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(dir.path(), 0).await;

        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
    }

    #[tokio::test]
    async fn test_create_list_and_verify_flow() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(dir.path(), 1000).await;

        for name in ["first", "second"] {
            let (status, body) = send(
                &app,
                "POST",
                "/api/bots",
                Some(&format!("{{\"username\": \"{}\", \"isPrivate\": true}}", name)),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["message"], "Bot created successfully");
        }

        let (status, body) = send(&app, "GET", "/api/bots", None).await;
        assert_eq!(status, StatusCode::OK);
        let bots: Vec<BotRecord> = serde_json::from_value(body).unwrap();
        assert_eq!(bots.len(), 2);
        assert_eq!(bots[0].username, "first");
        assert_eq!(bots[1].username, "second");

        let (status, body) = send(&app, "GET", "/api/user", None).await;
        assert_eq!(status, StatusCode::OK);
        let user: UserInfo = serde_json::from_value(body).unwrap();
        assert_eq!(user.points, 500);

        let uri = format!("/api/bots/verify/{}", bots[0].id);
        let (status, body) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Bot verified successfully");

        // Repeat verify is a no-op success
        let (status, _) = send(&app, "POST", &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        // Persisted to disk
        let on_disk = std::fs::read_to_string(dir.path().join("bots.json")).unwrap();
        let saved = crate::state::bot_registry::BotRegistry::from_json(&on_disk).unwrap();
        assert_eq!(saved.find(&bots[0].id).unwrap().status, BotStatus::Verified);
        assert_eq!(saved.find(&bots[1].id).unwrap().status, BotStatus::WaitingForVerification);
    }

    #[tokio::test]
    async fn test_validation_error_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(dir.path(), 100).await;

        let (status, body) = send(
            &app,
            "POST",
            "/api/bots",
            Some("{\"username\": \"alpha\", \"isPrivate\": true}"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "insufficient points");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(dir.path(), 1000).await;

        let (status, body) = send(&app, "POST", "/api/bots", Some("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_verify_unknown_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(dir.path(), 1000).await;

        let (status, body) = send(&app, "POST", "/api/bots/verify/unknown", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Bot not found");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(dir.path(), 0).await;

        let resp = app
            .oneshot(
                Request::builder()
                    .uri("/api/user")
                    .header("origin", "https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }
}
