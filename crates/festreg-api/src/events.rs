// Event catalog HTTP routes

use std::sync::Arc;

use axum::{
    extract::{FromRef, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use festreg_core::{
    CreateEventRequest, Event, FestError, ListResponse, UpdateEventRequest,
};

use crate::auth::{AdminUser, AuthState};
use crate::error::ApiError;
use crate::services::EventService;

/// App state for event routes
#[derive(Clone, FromRef)]
pub struct AppState {
    pub service: Arc<EventService>,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(service: Arc<EventService>, auth: AuthState) -> Self {
        Self { service, auth }
    }
}

/// Create event routes
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/events", post(create_event).get(list_events))
        .route(
            "/events/{event_id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/events/{event_id}/rulebooks", post(upload_rulebook))
        .route(
            "/events/{event_id}/rulebooks/{file_id}",
            axum::routing::delete(delete_rulebook),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct ListEventsQuery {
    pub sub_fest: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteEventQuery {
    /// Hard-delete the event and cascade its registrations.
    #[serde(default)]
    pub purge: bool,
}

/// POST /events - Create a new event (admin)
#[utoipa::path(
    post,
    path = "/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 403, description = "Admin access required", body = crate::error::ErrorBody),
        (status = 409, description = "Duplicate event id", body = crate::error::ErrorBody)
    ),
    security(("bearer_token" = [])),
    tag = "events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let event = state.service.create(req).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// GET /events - List active events, optionally filtered by sub-fest
#[utoipa::path(
    get,
    path = "/events",
    params(
        ("sub_fest" = Option<String>, Query, description = "Filter by sub-fest")
    ),
    responses(
        (status = 200, description = "List of active events", body = ListResponse<Event>)
    ),
    tag = "events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<ListEventsQuery>,
) -> Result<Json<ListResponse<Event>>, ApiError> {
    let events = state.service.list(query.sub_fest.as_deref()).await?;
    Ok(Json(ListResponse::new(events)))
}

/// GET /events/{event_id} - Get an active event by id
#[utoipa::path(
    get,
    path = "/events/{event_id}",
    params(
        ("event_id" = String, Path, description = "Event id")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, description = "Event not found", body = crate::error::ErrorBody)
    ),
    tag = "events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    let event = state.service.get(&event_id).await?;
    Ok(Json(event))
}

/// PUT /events/{event_id} - Partially update an event (admin)
#[utoipa::path(
    put,
    path = "/events/{event_id}",
    params(
        ("event_id" = String, Path, description = "Event id")
    ),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 404, description = "Event not found", body = crate::error::ErrorBody)
    ),
    security(("bearer_token" = [])),
    tag = "events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(event_id): Path<String>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<Event>, ApiError> {
    let event = state.service.update(&event_id, req).await?;
    Ok(Json(event))
}

/// DELETE /events/{event_id} - Disable an event, or purge it with ?purge=true (admin)
#[utoipa::path(
    delete,
    path = "/events/{event_id}",
    params(
        ("event_id" = String, Path, description = "Event id"),
        ("purge" = Option<bool>, Query, description = "Hard-delete and cascade registrations")
    ),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = crate::error::ErrorBody)
    ),
    security(("bearer_token" = [])),
    tag = "events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(event_id): Path<String>,
    Query(query): Query<DeleteEventQuery>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(&event_id, query.purge).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /events/{event_id}/rulebooks - Attach a rulebook PDF (admin)
#[utoipa::path(
    post,
    path = "/events/{event_id}/rulebooks",
    params(
        ("event_id" = String, Path, description = "Event id")
    ),
    responses(
        (status = 201, description = "Rulebook attached", body = Event),
        (status = 400, description = "Missing or non-PDF file", body = crate::error::ErrorBody),
        (status = 404, description = "Event not found", body = crate::error::ErrorBody)
    ),
    security(("bearer_token" = [])),
    tag = "events"
)]
pub async fn upload_rulebook(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(event_id): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| FestError::validation(format!("invalid multipart payload: {err}")))?
    {
        if field.name() == Some("file") {
            let filename = field
                .file_name()
                .unwrap_or("rulebook.pdf")
                .to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/pdf")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|err| FestError::validation(format!("failed to read file: {err}")))?
                .to_vec();
            file = Some((filename, content_type, data));
        }
    }

    let (filename, content_type, data) =
        file.ok_or_else(|| FestError::validation("missing 'file' field"))?;

    let event = state
        .service
        .add_rulebook(&event_id, filename, content_type, data)
        .await?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// DELETE /events/{event_id}/rulebooks/{file_id} - Detach a rulebook (admin)
#[utoipa::path(
    delete,
    path = "/events/{event_id}/rulebooks/{file_id}",
    params(
        ("event_id" = String, Path, description = "Event id"),
        ("file_id" = Uuid, Path, description = "Rulebook file id")
    ),
    responses(
        (status = 204, description = "Rulebook removed"),
        (status = 404, description = "Rulebook not found", body = crate::error::ErrorBody)
    ),
    security(("bearer_token" = [])),
    tag = "events"
)]
pub async fn delete_rulebook(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path((event_id, file_id)): Path<(String, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state.service.remove_rulebook(&event_id, file_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
