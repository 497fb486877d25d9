use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::{
    error::AppError,
    models::PageLink,
    services::{
        pages::Page,
        session_store::SessionStore,
        sessions::SharedStore,
    },
    AppState,
};

pub mod pages;
pub mod sessions;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_check))
        .route("/pages", get(list_pages))
        .merge(sessions::routes())
        .merge(pages::routes())
        .layer(DefaultBodyLimit::max(state.config.max_file_size))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn list_pages() -> Json<Vec<PageLink>> {
    Json(Page::ALL.iter().map(Page::link).collect())
}

/// Runs `f` against the session's store on the blocking pool. The store stays
/// locked for the whole call, so one interaction on a session completes
/// before the next one starts.
pub(crate) async fn with_store<T, F>(store: SharedStore, f: F) -> Result<T, AppError>
where
    F: FnOnce(&mut SessionStore) -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = store.lock();
        f(&mut guard)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Session task failed: {}", e)))?
}
