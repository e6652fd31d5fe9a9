// Session token encode/decode (HS256)

use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use festreg_core::{FestError, Role};

/// Session token claims: subject is the account email, role rides along so
/// the frontend can branch without an extra request. The server never
/// trusts the role claim on its own; [`super::extract`] re-resolves the
/// user on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: i64,
}

pub fn issue_token(
    secret: &str,
    email: &str,
    role: Role,
    lifetime: Duration,
) -> anyhow::Result<String> {
    let claims = Claims {
        sub: email.to_string(),
        role: role.to_string(),
        exp: Utc::now().timestamp() + lifetime.as_secs() as i64,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("failed to sign session token")
}

/// Decode and verify a session token. Expiry maps to `Unauthorized` so the
/// client can prompt a re-login; everything else is `InvalidToken`.
pub fn decode_token(secret: &str, token: &str) -> Result<Claims, FestError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|err| match err.kind() {
        ErrorKind::ExpiredSignature => FestError::unauthorized("token expired"),
        _ => FestError::InvalidToken,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_round_trip() {
        let token = issue_token(
            SECRET,
            "asha@college.edu",
            Role::Student,
            Duration::from_secs(3600),
        )
        .unwrap();

        let claims = decode_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, "asha@college.edu");
        assert_eq!(claims.role, "student");
    }

    #[test]
    fn test_admin_role_claim() {
        let token = issue_token(
            SECRET,
            "admin@college.edu",
            Role::Admin,
            Duration::from_secs(3600),
        )
        .unwrap();
        let claims = decode_token(SECRET, &token).unwrap();
        assert_eq!(claims.role, "admin");
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        // jsonwebtoken's default validation allows 60s of leeway; put the
        // expiry well past it.
        let claims = Claims {
            sub: "asha@college.edu".to_string(),
            role: "student".to_string(),
            exp: Utc::now().timestamp() - 300,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            decode_token(SECRET, &token),
            Err(FestError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_wrong_secret_is_invalid_token() {
        let token = issue_token(
            SECRET,
            "asha@college.edu",
            Role::Student,
            Duration::from_secs(3600),
        )
        .unwrap();

        assert!(matches!(
            decode_token("other-secret", &token),
            Err(FestError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_is_invalid_token() {
        assert!(matches!(
            decode_token(SECRET, "definitely.not.a-jwt"),
            Err(FestError::InvalidToken)
        ));
    }
}
