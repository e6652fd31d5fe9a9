// Notification HTTP routes

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use uuid::Uuid;

use festreg_core::{
    CreateNotificationRequest, FestError, ListResponse, Notification,
};
use festreg_storage::Database;

use crate::auth::{AdminUser, AuthState};
use crate::error::ApiError;

/// App state for notification routes
#[derive(Clone, FromRef)]
pub struct AppState {
    pub db: Arc<Database>,
    pub auth: AuthState,
}

/// Create notification routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/notifications",
            post(create_notification).get(list_notifications),
        )
        .route("/notifications/{notification_id}", delete(delete_notification))
        .with_state(state)
}

/// POST /notifications - Publish a notification (admin)
#[utoipa::path(
    post,
    path = "/notifications",
    request_body = CreateNotificationRequest,
    responses(
        (status = 201, description = "Notification published", body = Notification),
        (status = 403, description = "Admin access required", body = crate::error::ErrorBody)
    ),
    security(("bearer_token" = [])),
    tag = "notifications"
)]
pub async fn create_notification(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(req): Json<CreateNotificationRequest>,
) -> Result<(StatusCode, Json<Notification>), ApiError> {
    req.validate()?;

    let row = state
        .db
        .create_notification(&req.title, &req.message, req.image_url.as_deref())
        .await
        .map_err(FestError::internal)?;

    Ok((StatusCode::CREATED, Json(Notification::from(row))))
}

/// GET /notifications - List notifications, newest first
#[utoipa::path(
    get,
    path = "/notifications",
    responses(
        (status = 200, description = "Notifications, newest first", body = ListResponse<Notification>)
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Notification>>, ApiError> {
    let rows = state
        .db
        .list_notifications()
        .await
        .map_err(FestError::internal)?;

    Ok(Json(ListResponse::new(
        rows.into_iter().map(Notification::from).collect(),
    )))
}

/// DELETE /notifications/{notification_id} - Remove a notification (admin)
#[utoipa::path(
    delete,
    path = "/notifications/{notification_id}",
    params(
        ("notification_id" = Uuid, Path, description = "Notification id")
    ),
    responses(
        (status = 204, description = "Notification removed"),
        (status = 404, description = "Notification not found", body = crate::error::ErrorBody)
    ),
    security(("bearer_token" = [])),
    tag = "notifications"
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(notification_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let deleted = state
        .db
        .delete_notification(notification_id)
        .await
        .map_err(FestError::internal)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(FestError::not_found("notification not found").into())
    }
}
