use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use bytes::Bytes;
use std::sync::Arc;

use super::with_store;
use crate::{
    error::AppError,
    models::{PageView, SessionCreated},
    services::{
        cleaning::{self, CleaningOptions},
        ingest,
        pages::{self, Page},
        session_store::Dataset,
    },
    AppState,
};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/:session_id", delete(end_session))
        .route("/sessions/:session_id/upload", post(upload))
        .route("/sessions/:session_id/clear", post(clear))
        .route("/sessions/:session_id/clean", post(clean))
}

async fn create_session(State(state): State<Arc<AppState>>) -> (StatusCode, Json<SessionCreated>) {
    let session_id = state.sessions.create();
    (StatusCode::CREATED, Json(SessionCreated { session_id }))
}

async fn end_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.sessions.end(&session_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Home ingestion: parses the multipart `file` field and replaces the
/// session's dataset with it. A failed parse leaves the dataset untouched.
async fn upload(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<PageView>, AppError> {
    let store = state.sessions.get(&session_id)?;
    let (file_name, file_data) = read_file_field(&mut multipart).await?;

    let start = std::time::Instant::now();
    tracing::info!(
        session_id = %session_id,
        file_name = %file_name,
        size_kb = file_data.len() / 1024,
        "Upload received"
    );

    let view = with_store(store, move |store| {
        let df = ingest::parse_upload(&file_name, file_data)?;
        store.replace(Dataset::new(df));
        let notices = vec![format!("File uploaded: {}", file_name)];
        pages::render_with_notices(Page::Home, store.get(), notices)
    })
    .await?;

    tracing::info!(session_id = %session_id, "Upload processed in {:?}", start.elapsed());
    Ok(Json(view))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Malformed upload", e))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::InvalidInput("Uploaded file has no name".to_string()))?;
        let file_data = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read upload", e))?;
        return Ok((file_name, file_data));
    }
    Err(AppError::InvalidInput("No file provided".to_string()))
}

/// Over-limit bodies surface as multipart errors; keep them apart from
/// malformed requests.
fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::InvalidInput(format!("{}: {}", context, err))
    }
}

async fn clear(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<PageView>, AppError> {
    let store = state.sessions.get(&session_id)?;
    let view = with_store(store, |store| {
        store.clear();
        pages::render_with_notices(Page::Home, store.get(), vec!["Data cleared!".to_string()])
    })
    .await?;

    tracing::info!(session_id = %session_id, "Dataset cleared");
    Ok(Json(view))
}

/// Data Overview cleaning toggles. Enabled steps mutate the session dataset.
async fn clean(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    Json(options): Json<CleaningOptions>,
) -> Result<Json<PageView>, AppError> {
    let store = state.sessions.get(&session_id)?;
    tracing::info!(session_id = %session_id, ?options, "Cleaning dataset");

    let view = with_store(store, move |store| {
        let notices = if store.get().is_empty() {
            Vec::new()
        } else {
            cleaning::apply(store, options)?
        };
        pages::render_with_notices(Page::DataOverview, store.get(), notices)
    })
    .await?;
    Ok(Json(view))
}
