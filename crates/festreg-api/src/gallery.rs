// Gallery HTTP routes

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use festreg_core::{CreateGalleryImageRequest, FestError, GalleryImage, ListResponse};
use festreg_storage::Database;

use crate::auth::{AdminUser, AuthState};
use crate::error::ApiError;

/// App state for gallery routes
#[derive(Clone, FromRef)]
pub struct AppState {
    pub db: Arc<Database>,
    pub auth: AuthState,
}

/// Create gallery routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/gallery", post(add_gallery_image).get(list_gallery))
        .route("/gallery/{image_id}", delete(delete_gallery_image))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct GalleryQuery {
    pub sub_fest: Option<String>,
}

/// POST /gallery - Add a gallery image (admin)
#[utoipa::path(
    post,
    path = "/gallery",
    request_body = CreateGalleryImageRequest,
    responses(
        (status = 201, description = "Image added", body = GalleryImage),
        (status = 403, description = "Admin access required", body = crate::error::ErrorBody)
    ),
    security(("bearer_token" = [])),
    tag = "gallery"
)]
pub async fn add_gallery_image(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(req): Json<CreateGalleryImageRequest>,
) -> Result<(StatusCode, Json<GalleryImage>), ApiError> {
    req.validate()?;

    let row = state
        .db
        .create_gallery_image(&req.sub_fest, &req.image_url, req.caption.as_deref())
        .await
        .map_err(FestError::internal)?;

    Ok((StatusCode::CREATED, Json(GalleryImage::from(row))))
}

/// GET /gallery - List gallery images, optionally filtered by sub-fest
#[utoipa::path(
    get,
    path = "/gallery",
    params(
        ("sub_fest" = Option<String>, Query, description = "Filter by sub-fest")
    ),
    responses(
        (status = 200, description = "Gallery images", body = ListResponse<GalleryImage>)
    ),
    tag = "gallery"
)]
pub async fn list_gallery(
    State(state): State<AppState>,
    Query(query): Query<GalleryQuery>,
) -> Result<Json<ListResponse<GalleryImage>>, ApiError> {
    let rows = state
        .db
        .list_gallery_images(query.sub_fest.as_deref())
        .await
        .map_err(FestError::internal)?;

    Ok(Json(ListResponse::new(
        rows.into_iter().map(GalleryImage::from).collect(),
    )))
}

/// DELETE /gallery/{image_id} - Remove a gallery image (admin)
#[utoipa::path(
    delete,
    path = "/gallery/{image_id}",
    params(
        ("image_id" = Uuid, Path, description = "Gallery image id")
    ),
    responses(
        (status = 204, description = "Image removed"),
        (status = 404, description = "Image not found", body = crate::error::ErrorBody)
    ),
    security(("bearer_token" = [])),
    tag = "gallery"
)]
pub async fn delete_gallery_image(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(image_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .db
        .delete_gallery_image(image_id)
        .await
        .map_err(FestError::internal)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(FestError::not_found("gallery image not found").into())
    }
}
