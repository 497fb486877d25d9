use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::sync::Arc;

use super::with_store;
use crate::{
    error::AppError,
    models::PageView,
    services::{
        export,
        pages::{self, Page},
    },
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions/:session_id/pages/:page", get(render_page))
        .route("/sessions/:session_id/pages/:page/download", get(download))
}

async fn render_page(
    State(state): State<Arc<AppState>>,
    Path((session_id, page)): Path<(String, String)>,
) -> Result<Json<PageView>, AppError> {
    let page: Page = page.parse()?;
    let store = state.sessions.get(&session_id)?;

    let start = std::time::Instant::now();
    let view = with_store(store, move |store| pages::render(page, store.get())).await?;
    tracing::debug!(session_id = %session_id, %page, "Rendered in {:?}", start.elapsed());

    Ok(Json(view))
}

/// CSV export of the session's current dataset under the page's file name.
async fn download(
    State(state): State<Arc<AppState>>,
    Path((session_id, page)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let page: Page = page.parse()?;
    let file_name = page
        .download_file_name()
        .ok_or_else(|| AppError::DownloadUnavailable(page.to_string()))?;
    let store = state.sessions.get(&session_id)?;

    let body = with_store(store, |store| export::to_csv(store.get().frame())).await?;
    tracing::info!(session_id = %session_id, %page, bytes = body.len(), "Exported {}", file_name);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file_name)),
        ],
        body,
    ))
}
