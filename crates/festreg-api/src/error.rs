// HTTP mapping for the festreg error taxonomy

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use festreg_core::FestError;

/// Structured error body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Stable machine-readable kind, e.g. "quota_exceeded".
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Wrapper giving the domain error an axum response mapping.
#[derive(Debug)]
pub struct ApiError(pub FestError);

impl From<FestError> for ApiError {
    fn from(err: FestError) -> Self {
        ApiError(err)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError(FestError::Internal(err))
    }
}

pub fn status_for(err: &FestError) -> StatusCode {
    match err {
        FestError::Validation(_)
        | FestError::RegistrationClosed
        | FestError::TeamMembersRequired
        | FestError::InvalidTeamSize { .. }
        | FestError::DuplicateTeamMember => StatusCode::BAD_REQUEST,
        FestError::Unauthorized(_) | FestError::InvalidToken => StatusCode::UNAUTHORIZED,
        FestError::Forbidden(_) => StatusCode::FORBIDDEN,
        FestError::NotFound(_) => StatusCode::NOT_FOUND,
        FestError::Conflict(_) | FestError::AlreadyRegistered | FestError::QuotaExceeded { .. } => {
            StatusCode::CONFLICT
        }
        FestError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);

        // Internal details go to the log, not the caller.
        let message = if let FestError::Internal(err) = &self.0 {
            tracing::error!(error = ?err, "request failed with internal error");
            "internal server error".to_string()
        } else {
            self.0.to_string()
        };

        let body = ErrorBody {
            error: self.0.kind().to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&FestError::validation("x")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&FestError::RegistrationClosed),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&FestError::TeamMembersRequired),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&FestError::unauthorized("x")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_for(&FestError::InvalidToken), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(&FestError::forbidden("x")), StatusCode::FORBIDDEN);
        assert_eq!(status_for(&FestError::not_found("x")), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&FestError::conflict("x")), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&FestError::AlreadyRegistered),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&FestError::QuotaExceeded {
                quota: 2,
                sub_fest: "CULTURAL-AKANKSHA".to_string()
            }),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&FestError::Internal(anyhow::anyhow!("boom"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
