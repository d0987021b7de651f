//! HTTP router.
//!
//! JSON endpoints are nested under `/api/`; the HTML pages sit at the root.
//!
//! Layer stack (outermost → innermost):
//! 1. CORS (permissive) → 2. Request logging → 3. `Cache-Control: no-store` on `/api`

use std::sync::Arc;

use axum::http::{header, HeaderValue};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::db::EvaluationStore;

/// Build the service router around a storage adapter.
pub fn api_router(store: Arc<dyn EvaluationStore>) -> Router {
    build_router(ApiContext::new(store))
}

fn build_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/prediction", post(endpoints::prediction::predict))
        .route("/evaluacion", post(endpoints::prediction::predict))
        .route(
            "/evaluaciones",
            get(endpoints::evaluations::list).delete(endpoints::evaluations::purge),
        )
        .route("/health", get(endpoints::health::check))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    Router::new()
        .route("/", get(endpoints::pages::landing))
        .route("/formulario.html", get(endpoints::pages::form))
        .route("/ver_historial.html", get(endpoints::pages::history))
        .nest("/api", api)
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::access_log::log_request))
        .layer(CorsLayer::permissive())
}
