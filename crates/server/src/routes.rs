use std::{sync::Arc, time::Duration};

use axum::{middleware, routing::get, Json, Router};
use common::types::Health;
use service::person::PersonServiceApi;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use crate::{errors::panic_response, metrics, openapi::ApiDoc};

pub mod persons;

/// Shared handler state. Handlers see the person facade only through its
/// trait, so tests can swap in their own implementation.
#[derive(Clone)]
pub struct AppState {
    pub persons: Arc<dyn PersonServiceApi>,
}

impl AppState {
    pub fn new(persons: Arc<dyn PersonServiceApi>) -> Self {
        Self { persons }
    }
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router with CORS, tracing, panic recovery and metrics.
/// Requests running longer than `request_timeout` are answered with 408.
pub fn build_router(state: AppState, cors: CorsLayer, request_timeout: Duration) -> Router {
    let persons = Router::new()
        .route("/persons", get(persons::list).post(persons::create))
        .route(
            "/persons/:id",
            get(persons::get).put(persons::update).delete(persons::delete),
        );

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics::metrics_handler))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(persons)
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::from_fn(metrics::track_metrics))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx responses are logged as errors
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
