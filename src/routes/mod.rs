pub mod health;
pub mod itineraries;
pub mod places;
pub mod trips;

use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Body of the delete endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(health::router())
        .merge(trips::router())
        .merge(itineraries::router())
        .merge(places::router());

    let mut app = Router::new().nest("/api", api);
    if let Some(dir) = state.config.static_dir.clone() {
        // Unknown paths get the SPA shell so client-side routes survive a reload.
        let index = ServeFile::new(dir.join("index.html"));
        app = app.fallback_service(ServeDir::new(dir).fallback(index));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::{net::SocketAddr, sync::Arc};

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::{config::AppConfig, services::places::FallbackPlaces, test_support};

    async fn app() -> (Router, tempfile::TempDir) {
        let (store, dir) = test_support::store().await;
        let config = AppConfig {
            database_url: String::new(),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            places_api_key: None,
            static_dir: None,
        };
        let state = AppState::new(config, store.pool().clone(), Arc::new(FallbackPlaces));
        (create_router(state), dir)
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_is_served_under_api() {
        let (app, _dir) = app().await;
        let request = Request::get("/api/health").body(Body::empty()).unwrap();

        let (status, body) = call(app, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
    }

    #[tokio::test]
    async fn missing_required_fields_are_a_json_400() {
        let (app, _dir) = app().await;
        let request = Request::post("/api/trips")
            .header("content-type", "application/json")
            .body(Body::from(json!({ "destination": "Rome" }).to_string()))
            .unwrap();

        let (status, body) = call(app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("Path `name` is required."));
        assert!(message.contains("Path `startDate` is required."));
    }

    #[tokio::test]
    async fn unknown_trip_is_a_json_404() {
        let (app, _dir) = app().await;
        let request = Request::get("/api/trips/nope").body(Body::empty()).unwrap();

        let (status, body) = call(app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Trip not found" }));
    }
}
