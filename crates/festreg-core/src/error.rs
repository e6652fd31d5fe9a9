// Error taxonomy for festreg operations

use thiserror::Error;

/// Result type alias for festreg operations
pub type Result<T> = std::result::Result<T, FestError>;

/// Errors surfaced to API callers as structured responses.
///
/// Every failure is terminal for the request; nothing here is retried.
#[derive(Debug, Error)]
pub enum FestError {
    /// Malformed input or violated field constraint
    #[error("{0}")]
    Validation(String),

    /// Duplicate unique key
    #[error("{0}")]
    Conflict(String),

    /// Missing, expired, or unresolvable caller identity
    #[error("{0}")]
    Unauthorized(String),

    /// Caller identity is valid but lacks the required role
    #[error("{0}")]
    Forbidden(String),

    /// Referenced resource does not exist (or is soft-deleted)
    #[error("{0}")]
    NotFound(String),

    /// Event is closed for registration (manual override or past deadline)
    #[error("registration for this event is closed")]
    RegistrationClosed,

    /// A registration for this (event, student) pair already exists
    #[error("already registered for this event")]
    AlreadyRegistered,

    /// Per-sub-fest registration quota reached
    #[error("maximum {quota} events allowed in {sub_fest}")]
    QuotaExceeded { quota: u32, sub_fest: String },

    /// Team event submitted without team members
    #[error("team members are required for team events")]
    TeamMembersRequired,

    /// Team member count outside the event's bounds
    #[error("team size must be between {min} and {max}")]
    InvalidTeamSize { min: i32, max: i32 },

    /// Two team members share an email
    #[error("duplicate team members are not allowed")]
    DuplicateTeamMember,

    /// Token that fails signature/format checks or was already consumed
    #[error("invalid token")]
    InvalidToken,

    /// Unexpected failure; details are logged, not surfaced
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl FestError {
    pub fn validation(msg: impl Into<String>) -> Self {
        FestError::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        FestError::Conflict(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        FestError::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        FestError::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        FestError::NotFound(msg.into())
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        FestError::Internal(err.into())
    }

    /// Stable discriminant used in the JSON error body.
    pub fn kind(&self) -> &'static str {
        match self {
            FestError::Validation(_) => "validation_error",
            FestError::Conflict(_) => "conflict",
            FestError::Unauthorized(_) => "unauthorized",
            FestError::Forbidden(_) => "forbidden",
            FestError::NotFound(_) => "not_found",
            FestError::RegistrationClosed => "registration_closed",
            FestError::AlreadyRegistered => "already_registered",
            FestError::QuotaExceeded { .. } => "quota_exceeded",
            FestError::TeamMembersRequired => "team_members_required",
            FestError::InvalidTeamSize { .. } => "invalid_team_size",
            FestError::DuplicateTeamMember => "duplicate_team_member",
            FestError::InvalidToken => "invalid_token",
            FestError::Internal(_) => "internal_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_stable() {
        assert_eq!(FestError::validation("x").kind(), "validation_error");
        assert_eq!(FestError::conflict("x").kind(), "conflict");
        assert_eq!(FestError::RegistrationClosed.kind(), "registration_closed");
        assert_eq!(FestError::AlreadyRegistered.kind(), "already_registered");
        assert_eq!(
            FestError::QuotaExceeded {
                quota: 2,
                sub_fest: "CULTURAL-AKANKSHA".to_string()
            }
            .kind(),
            "quota_exceeded"
        );
        assert_eq!(
            FestError::InvalidTeamSize { min: 3, max: 4 }.kind(),
            "invalid_team_size"
        );
        assert_eq!(FestError::InvalidToken.kind(), "invalid_token");
    }

    #[test]
    fn test_quota_message_names_quota_and_sub_fest() {
        let err = FestError::QuotaExceeded {
            quota: 4,
            sub_fest: "SPORTS-AHWAAN".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains('4'));
        assert!(msg.contains("SPORTS-AHWAAN"));
    }

    #[test]
    fn test_team_size_message_names_bounds() {
        let msg = FestError::InvalidTeamSize { min: 3, max: 4 }.to_string();
        assert!(msg.contains('3'));
        assert!(msg.contains('4'));
    }
}
