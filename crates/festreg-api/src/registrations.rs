// Registration HTTP routes

use std::sync::Arc;

use axum::{
    extract::{FromRef, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use festreg_core::{CreateRegistrationRequest, ListResponse, Registration};

use crate::auth::{AdminUser, AuthState, CurrentUser};
use crate::error::ApiError;
use crate::services::RegistrationService;

/// App state for registration routes
#[derive(Clone, FromRef)]
pub struct AppState {
    pub service: Arc<RegistrationService>,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(service: Arc<RegistrationService>, auth: AuthState) -> Self {
        Self { service, auth }
    }
}

/// Create registration routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/registrations",
            post(create_registration).get(list_registrations),
        )
        .route("/registrations/my", get(list_my_registrations))
        .route("/registrations/export", get(export_registrations))
        .route("/registrations/reconcile", post(reconcile_counts))
        .route("/registrations/{registration_id}", delete(delete_registration))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct RegistrationsQuery {
    pub event_id: Option<String>,
}

/// Result of a reconciliation sweep.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReconcileResponse {
    /// Number of events whose registered_count was corrected.
    pub events_updated: u64,
}

/// POST /registrations - Register the caller for an event
#[utoipa::path(
    post,
    path = "/registrations",
    request_body = CreateRegistrationRequest,
    responses(
        (status = 201, description = "Registration created", body = Registration),
        (status = 400, description = "Closed event or failed team validation", body = crate::error::ErrorBody),
        (status = 404, description = "Event not found", body = crate::error::ErrorBody),
        (status = 409, description = "Already registered or quota exceeded", body = crate::error::ErrorBody)
    ),
    security(("bearer_token" = [])),
    tag = "registrations"
)]
pub async fn create_registration(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(req): Json<CreateRegistrationRequest>,
) -> Result<(StatusCode, Json<Registration>), ApiError> {
    let registration = state.service.register(&user, req).await?;
    Ok((StatusCode::CREATED, Json(registration)))
}

/// GET /registrations/my - Caller's registrations
#[utoipa::path(
    get,
    path = "/registrations/my",
    responses(
        (status = 200, description = "Caller's registrations", body = ListResponse<Registration>)
    ),
    security(("bearer_token" = [])),
    tag = "registrations"
)]
pub async fn list_my_registrations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<ListResponse<Registration>>, ApiError> {
    let registrations = state.service.list_mine(&user.email).await?;
    Ok(Json(ListResponse::new(registrations)))
}

/// GET /registrations - All registrations, optionally per event (admin)
#[utoipa::path(
    get,
    path = "/registrations",
    params(
        ("event_id" = Option<String>, Query, description = "Filter by event id")
    ),
    responses(
        (status = 200, description = "All registrations", body = ListResponse<Registration>),
        (status = 403, description = "Admin access required", body = crate::error::ErrorBody)
    ),
    security(("bearer_token" = [])),
    tag = "registrations"
)]
pub async fn list_registrations(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<RegistrationsQuery>,
) -> Result<Json<ListResponse<Registration>>, ApiError> {
    let registrations = state.service.list_all(query.event_id.as_deref()).await?;
    Ok(Json(ListResponse::new(registrations)))
}

/// DELETE /registrations/{registration_id} - Remove a registration (admin)
///
/// Decrements the event's registered_count, floored at zero.
#[utoipa::path(
    delete,
    path = "/registrations/{registration_id}",
    params(
        ("registration_id" = Uuid, Path, description = "Registration id")
    ),
    responses(
        (status = 204, description = "Registration removed"),
        (status = 404, description = "Registration not found", body = crate::error::ErrorBody)
    ),
    security(("bearer_token" = [])),
    tag = "registrations"
)]
pub async fn delete_registration(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(registration_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(registration_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /registrations/reconcile - Recompute per-event counters (admin)
#[utoipa::path(
    post,
    path = "/registrations/reconcile",
    responses(
        (status = 200, description = "Counters reconciled", body = ReconcileResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorBody)
    ),
    security(("bearer_token" = [])),
    tag = "registrations"
)]
pub async fn reconcile_counts(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<ReconcileResponse>, ApiError> {
    let events_updated = state.service.reconcile().await?;
    Ok(Json(ReconcileResponse { events_updated }))
}

/// GET /registrations/export - CSV export of registrations (admin)
#[utoipa::path(
    get,
    path = "/registrations/export",
    params(
        ("event_id" = Option<String>, Query, description = "Filter by event id")
    ),
    responses(
        (status = 200, description = "CSV attachment", content_type = "text/csv"),
        (status = 403, description = "Admin access required", body = crate::error::ErrorBody)
    ),
    security(("bearer_token" = [])),
    tag = "registrations"
)]
pub async fn export_registrations(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Query(query): Query<RegistrationsQuery>,
) -> Result<Response, ApiError> {
    let csv_bytes = state.service.export_csv(query.event_id.as_deref()).await?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
        (
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"registrations.csv\"",
        ),
    ];

    Ok((headers, csv_bytes).into_response())
}
