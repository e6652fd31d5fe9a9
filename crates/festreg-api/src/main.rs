// Festreg API server
// College-fest event registration backend: auth, event catalog,
// registrations, notifications, gallery, shortlists, file storage.

mod auth;
mod error;
mod events;
mod files;
mod gallery;
mod notifications;
mod registrations;
mod services;
mod shortlists;

use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use festreg_core::{
    CreateEventRequest, CreateGalleryImageRequest, CreateNotificationRequest,
    CreateRegistrationRequest, Event, EventType, ForgotPasswordRequest, GalleryImage,
    ListResponse, LoginRequest, MessageResponse, Notification, RegisterRequest, Registration,
    ResetPasswordRequest, Role, Rulebook, Shortlist, ShortlistSummary, TeamMember, TokenResponse,
    UpdateEventRequest, UpdateProfileRequest, User,
};
use festreg_storage::Database;

use crate::auth::AuthState;
use crate::services::{AccountService, EventService, MailConfig, Mailer, RegistrationService};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    mail_configured: bool,
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        mail_configured: state.mail_configured,
    })
}

/// State for health endpoint
#[derive(Clone)]
struct HealthState {
    mail_configured: bool,
}

/// Registers the bearer scheme referenced by the protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::routes::register,
        auth::routes::login,
        auth::routes::me,
        auth::routes::update_me,
        auth::routes::forgot_password,
        auth::routes::reset_password,
        events::create_event,
        events::list_events,
        events::get_event,
        events::update_event,
        events::delete_event,
        events::upload_rulebook,
        events::delete_rulebook,
        registrations::create_registration,
        registrations::list_my_registrations,
        registrations::list_registrations,
        registrations::delete_registration,
        registrations::reconcile_counts,
        registrations::export_registrations,
        notifications::create_notification,
        notifications::list_notifications,
        notifications::delete_notification,
        gallery::add_gallery_image,
        gallery::list_gallery,
        gallery::delete_gallery_image,
        shortlists::upload_shortlist,
        shortlists::list_shortlists,
        shortlists::get_shortlist,
        shortlists::delete_shortlist,
        files::download_file,
    ),
    components(
        schemas(
            User, Role, TokenResponse,
            RegisterRequest, LoginRequest, UpdateProfileRequest,
            ForgotPasswordRequest, ResetPasswordRequest, MessageResponse,
            Event, EventType, Rulebook, CreateEventRequest, UpdateEventRequest,
            Registration, TeamMember, CreateRegistrationRequest,
            registrations::ReconcileResponse,
            Notification, CreateNotificationRequest,
            GalleryImage, CreateGalleryImageRequest,
            Shortlist, ShortlistSummary,
            error::ErrorBody,
            ListResponse<Event>,
            ListResponse<Registration>,
            ListResponse<Notification>,
            ListResponse<GalleryImage>,
            ListResponse<ShortlistSummary>,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Signup, login, profile, password reset"),
        (name = "events", description = "Event catalog management"),
        (name = "registrations", description = "Student registrations, export, reconciliation"),
        (name = "notifications", description = "Announcements"),
        (name = "gallery", description = "Gallery images"),
        (name = "shortlists", description = "Uploaded shortlist batches"),
        (name = "files", description = "Stored file retrieval")
    ),
    info(
        title = "Festreg API",
        version = "0.3.0",
        description = "College-fest event registration backend",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "festreg_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("festreg-api starting...");

    // Initialize database
    let database_url =
        std::env::var("DATABASE_URL").context("DATABASE_URL environment variable required")?;
    let db = Database::from_url(&database_url)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await?;
    tracing::info!("Connected to database");

    let db = Arc::new(db);

    // Load authentication configuration
    let auth_config = Arc::new(auth::AuthConfig::from_env());

    // Mail provider (optional - gracefully degrade if not configured)
    let mail_config = MailConfig::from_env();
    let mailer = Arc::new(Mailer::new(mail_config));
    if mailer.is_configured() {
        tracing::info!("Mail provider configured");
    } else {
        tracing::warn!("MAIL_API_KEY not set; password reset links will be logged instead");
    }

    // Services
    let account_service = Arc::new(AccountService::new(
        db.clone(),
        auth_config.clone(),
        mailer.clone(),
    ));
    let event_service = Arc::new(EventService::new(db.clone()));
    let registration_service = Arc::new(RegistrationService::new(db.clone()));

    // Bootstrap admin account when configured
    account_service
        .bootstrap_admin()
        .await
        .context("Failed to bootstrap admin account")?;

    // Create module-specific states
    let auth_state = AuthState::new(db.clone(), auth_config.clone());
    let auth_routes_state = auth::routes::AppState::new(account_service, auth_state.clone());
    let events_state = events::AppState::new(event_service, auth_state.clone());
    let registrations_state =
        registrations::AppState::new(registration_service, auth_state.clone());
    let notifications_state = notifications::AppState {
        db: db.clone(),
        auth: auth_state.clone(),
    };
    let gallery_state = gallery::AppState {
        db: db.clone(),
        auth: auth_state.clone(),
    };
    let shortlists_state = shortlists::AppState {
        db: db.clone(),
        auth: auth_state.clone(),
    };
    let files_state = files::AppState { db: db.clone() };
    let health_state = HealthState {
        mail_configured: mailer.is_configured(),
    };

    // Load API prefix from environment (default: empty)
    // Example: API_PREFIX="/api" results in routes like /api/events
    let api_prefix = std::env::var("API_PREFIX").unwrap_or_default();
    if !api_prefix.is_empty() {
        tracing::info!(prefix = %api_prefix, "API prefix configured");
    }

    // Load CORS allowed origins from environment (optional)
    // Only needed when the frontend is served from a different origin
    let cors_origins: Vec<HeaderValue> = std::env::var("CORS_ALLOWED_ORIGINS")
        .ok()
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect()
        })
        .unwrap_or_default();

    if cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
    } else {
        tracing::info!(origins = ?cors_origins, "CORS origins configured");
    }

    // Build API routes
    let api_routes = Router::new()
        .merge(auth::routes(auth_routes_state))
        .merge(events::routes(events_state))
        .merge(registrations::routes(registrations_state))
        .merge(notifications::routes(notifications_state))
        .merge(gallery::routes(gallery_state))
        .merge(shortlists::routes(shortlists_state))
        .merge(files::routes(files_state));

    // Build main router with health (not prefixed) and prefixed API routes
    let mut app = Router::new().route("/health", get(health).with_state(health_state));

    // Apply API prefix if configured
    app = app.merge(build_router_with_prefix(api_routes, &api_prefix));

    // Add Swagger UI
    let app =
        app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // Add CORS layer only if origins are configured
    let app = if !cors_origins.is_empty() {
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(cors_origins))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    header::ACCEPT,
                    header::ORIGIN,
                ])
                .allow_credentials(true),
        )
    } else {
        app
    };

    // Add tracing
    let app = app.layer(TraceLayer::new_for_http());

    // Start server
    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Build router with optional API prefix (extracted for testing)
fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn test_routes() -> Router {
        Router::new().route("/events", get(|| async { "ok" }))
    }

    #[tokio::test]
    async fn test_api_prefix_empty() {
        let app = build_router_with_prefix(test_routes(), "");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/events")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"ok");
    }

    #[tokio::test]
    async fn test_api_prefix_set() {
        let app = build_router_with_prefix(test_routes(), "/api");

        // Route should work with prefix
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/events")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 200);

        // Route should NOT work without prefix
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/events")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), 404);
    }
}
