//! HTTP routes of the orphanage API.

pub mod orphanages;
pub mod views;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::uploads::UploadDir;

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub uploads: Arc<UploadDir>,
    pub public_url: Arc<str>,
}

impl AppState {
    pub fn new(pool: SqlitePool, uploads: UploadDir, public_url: &str) -> Self {
        Self {
            pool,
            uploads: Arc::new(uploads),
            public_url: Arc::from(public_url.trim_end_matches('/')),
        }
    }
}

pub fn router(state: AppState, upload_limit_bytes: usize) -> Router {
    let uploads = ServeDir::new(state.uploads.root());

    Router::new()
        .route(
            "/orphanages",
            get(orphanages::index).post(orphanages::create),
        )
        .route("/orphanages/:id", get(orphanages::show))
        .nest_service("/uploads", uploads)
        .layer(DefaultBodyLimit::max(upload_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
