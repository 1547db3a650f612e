//! campus-api — HTTP layer over the campus core.
//!
//! The routes are the Decision Consumer of the access model: before a
//! content pointer leaves the server, the handler asks the evaluator
//! and maps the decision through [`error::ensure_allowed`]. The UI may
//! mirror those decisions for presentation, but this layer is the
//! authoritative enforcement point.

pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::http::Method;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use surrealdb::Connection;
use tower_http::cors::{Any, CorsLayer};

pub use state::AppState;

/// Build the full application router.
pub fn router<C: Connection>(state: Arc<AppState<C>>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_origin(Any)
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", routes::auth::router::<C>())
        .nest("/api/courses", routes::courses::router::<C>())
        .nest("/api/lectures", routes::lectures::router::<C>())
        .nest("/api/assignments", routes::assignments::router::<C>())
        .nest("/api/enrollments", routes::enrollments::router::<C>())
        .nest("/api/live", routes::live::router::<C>())
        .nest("/api/chat", routes::chat::router::<C>())
        .nest("/api/admin", routes::admin::router::<C>())
        .layer(cors)
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    service: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "campus-api",
    })
}
