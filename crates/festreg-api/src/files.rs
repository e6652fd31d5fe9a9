// Stored file retrieval (rulebook PDFs)

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use uuid::Uuid;

use festreg_core::FestError;
use festreg_storage::Database;

use crate::error::ApiError;

/// App state for file routes
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Create file routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/files/{file_id}", get(download_file))
        .with_state(state)
}

/// GET /files/{file_id} - Download a stored file
#[utoipa::path(
    get,
    path = "/files/{file_id}",
    params(
        ("file_id" = Uuid, Path, description = "File id")
    ),
    responses(
        (status = 200, description = "File bytes with its stored content type"),
        (status = 404, description = "File not found", body = crate::error::ErrorBody)
    ),
    tag = "files"
)]
pub async fn download_file(
    State(state): State<AppState>,
    Path(file_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let file = state
        .db
        .get_file(file_id)
        .await
        .map_err(FestError::internal)?
        .ok_or_else(|| FestError::not_found("file not found"))?;

    let headers = [
        (header::CONTENT_TYPE, file.content_type),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", file.filename),
        ),
    ];

    Ok((headers, file.data).into_response())
}
