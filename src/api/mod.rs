mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::config::HttpConfig;
use crate::query::QueryService;
use crate::source::DataSource;
use crate::store::{SubmissionRecorder, SubmissionRepository};

/// Shared handler state. Both halves are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub queries: QueryService,
    pub recorder: SubmissionRecorder,
}

impl AppState {
    pub fn new(source: Arc<dyn DataSource>, repository: Arc<dyn SubmissionRepository>) -> Self {
        Self {
            queries: QueryService::new(source),
            recorder: SubmissionRecorder::new(repository),
        }
    }
}

/// Router with permissive CORS and no static files.
pub fn create_router(state: AppState) -> Router {
    build_router(state, &HttpConfig::default())
}

pub fn build_router(state: AppState, config: &HttpConfig) -> Router {
    let mut router = Router::new()
        .route("/get-teams", get(handlers::get_teams))
        .route("/get-qsort-details", get(handlers::get_qsort_details))
        .route("/get-version-data", get(handlers::get_version_data))
        .route("/qsort-data", get(handlers::get_qsort_data))
        .route("/layout", get(handlers::get_layout))
        .route("/submit", post(handlers::submit))
        .route("/health", get(handlers::health));

    if let Some(dir) = &config.static_dir {
        tracing::info!("Serving static files from {}", dir.display());
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(axum::middleware::from_fn(middleware::content_security_policy))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::cors_layer(config.cors_origins.as_deref()))
        .with_state(state)
}
