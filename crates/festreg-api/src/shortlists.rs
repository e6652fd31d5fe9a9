// Shortlist HTTP routes
//
// Batches are additive: each upload becomes its own shortlist, listed and
// deleted by id; uploading never touches earlier batches.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use festreg_core::{FestError, ListResponse, Shortlist, ShortlistSummary};
use festreg_storage::Database;

use crate::auth::{AdminUser, AuthState};
use crate::error::ApiError;
use crate::services::shortlist::parse_spreadsheet;

/// App state for shortlist routes
#[derive(Clone, FromRef)]
pub struct AppState {
    pub db: Arc<Database>,
    pub auth: AuthState,
}

/// Create shortlist routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/shortlist/upload", post(upload_shortlist))
        .route("/shortlists", get(list_shortlists))
        .route(
            "/shortlists/{shortlist_id}",
            get(get_shortlist).delete(delete_shortlist),
        )
        .with_state(state)
}

/// POST /shortlist/upload - Upload a shortlist spreadsheet (admin)
///
/// Multipart form: a `file` field with the spreadsheet, and an optional
/// `name` field labelling the batch (defaults to the file name).
#[utoipa::path(
    post,
    path = "/shortlist/upload",
    responses(
        (status = 201, description = "Batch stored", body = ShortlistSummary),
        (status = 400, description = "Missing or unparseable spreadsheet", body = crate::error::ErrorBody),
        (status = 403, description = "Admin access required", body = crate::error::ErrorBody)
    ),
    security(("bearer_token" = [])),
    tag = "shortlists"
)]
pub async fn upload_shortlist(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ShortlistSummary>), ApiError> {
    let mut name: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| FestError::validation(format!("invalid multipart payload: {err}")))?
    {
        match field.name() {
            Some("name") => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| FestError::validation(format!("failed to read name: {err}")))?;
                if !value.trim().is_empty() {
                    name = Some(value.trim().to_string());
                }
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or("shortlist").to_string();
                let data = field.bytes().await.map_err(|err| {
                    FestError::validation(format!("failed to read file: {err}"))
                })?;
                file = Some((filename, data.to_vec()));
            }
            _ => {}
        }
    }

    let (filename, data) = file.ok_or_else(|| FestError::validation("missing 'file' field"))?;
    let entries = parse_spreadsheet(&data)?;
    let entry_count = entries.len() as i64;

    let batch_name = name.unwrap_or_else(|| {
        filename
            .rsplit_once('.')
            .map(|(stem, _)| stem.to_string())
            .unwrap_or(filename)
    });

    let row = state
        .db
        .create_shortlist(&batch_name, serde_json::Value::Array(entries))
        .await
        .map_err(FestError::internal)?;

    Ok((
        StatusCode::CREATED,
        Json(ShortlistSummary {
            id: row.id,
            name: row.name,
            uploaded_at: row.uploaded_at,
            entry_count,
        }),
    ))
}

/// GET /shortlists - List shortlist batches
#[utoipa::path(
    get,
    path = "/shortlists",
    responses(
        (status = 200, description = "Batch summaries", body = ListResponse<ShortlistSummary>)
    ),
    tag = "shortlists"
)]
pub async fn list_shortlists(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<ShortlistSummary>>, ApiError> {
    let rows = state
        .db
        .list_shortlists()
        .await
        .map_err(FestError::internal)?;

    Ok(Json(ListResponse::new(
        rows.into_iter().map(ShortlistSummary::from).collect(),
    )))
}

/// GET /shortlists/{shortlist_id} - Fetch one batch with its entries
#[utoipa::path(
    get,
    path = "/shortlists/{shortlist_id}",
    params(
        ("shortlist_id" = Uuid, Path, description = "Shortlist batch id")
    ),
    responses(
        (status = 200, description = "Batch with entries", body = Shortlist),
        (status = 404, description = "Batch not found", body = crate::error::ErrorBody)
    ),
    tag = "shortlists"
)]
pub async fn get_shortlist(
    State(state): State<AppState>,
    Path(shortlist_id): Path<Uuid>,
) -> Result<Json<Shortlist>, ApiError> {
    let row = state
        .db
        .get_shortlist(shortlist_id)
        .await
        .map_err(FestError::internal)?
        .ok_or_else(|| FestError::not_found("shortlist not found"))?;

    Ok(Json(Shortlist::from(row)))
}

/// DELETE /shortlists/{shortlist_id} - Remove a batch (admin)
#[utoipa::path(
    delete,
    path = "/shortlists/{shortlist_id}",
    params(
        ("shortlist_id" = Uuid, Path, description = "Shortlist batch id")
    ),
    responses(
        (status = 204, description = "Batch removed"),
        (status = 404, description = "Batch not found", body = crate::error::ErrorBody)
    ),
    security(("bearer_token" = [])),
    tag = "shortlists"
)]
pub async fn delete_shortlist(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(shortlist_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .db
        .delete_shortlist(shortlist_id)
        .await
        .map_err(FestError::internal)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(FestError::not_found("shortlist not found").into())
    }
}
