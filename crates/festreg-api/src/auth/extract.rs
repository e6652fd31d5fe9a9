// Request identity extractors
//
// Route modules embed `AuthState` in their own state structs; `CurrentUser`
// and `AdminUser` pull it back out via `FromRef`, so any handler can ask
// for the caller by adding an argument.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use festreg_core::{FestError, Role, User};
use festreg_storage::Database;

use super::{config::AuthConfig, jwt};
use crate::error::ApiError;

/// Shared auth dependencies, cloned into every route module's state.
#[derive(Clone)]
pub struct AuthState {
    pub db: Arc<Database>,
    pub config: Arc<AuthConfig>,
}

impl AuthState {
    pub fn new(db: Arc<Database>, config: Arc<AuthConfig>) -> Self {
        Self { db, config }
    }
}

/// Authenticated caller, any role.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Authenticated caller with the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

fn bearer_token(parts: &Parts) -> Result<&str, FestError> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or_else(|| FestError::unauthorized("missing bearer token"))
}

async fn resolve_user<S>(parts: &mut Parts, state: &S) -> Result<User, FestError>
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    let auth = AuthState::from_ref(state);
    let token = bearer_token(parts)?;
    let claims = jwt::decode_token(&auth.config.jwt_secret, token)?;

    let row = auth
        .db
        .get_user_by_email(&claims.sub)
        .await
        .map_err(FestError::internal)?;

    // A token may outlive its account; treat that as a dead session.
    let row = row.ok_or_else(|| FestError::unauthorized("user no longer exists"))?;

    Ok(User::from(row))
}

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = resolve_user(parts, state).await?;
        Ok(CurrentUser(user))
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = resolve_user(parts, state).await?;
        if user.role != Role::Admin {
            return Err(FestError::forbidden("admin access required").into());
        }
        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_extraction() {
        let parts = parts_with_auth(Some("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&parts).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header_rejected() {
        let parts = parts_with_auth(None);
        assert!(matches!(
            bearer_token(&parts),
            Err(FestError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_non_bearer_scheme_rejected() {
        let parts = parts_with_auth(Some("Basic dXNlcjpwdw=="));
        assert!(bearer_token(&parts).is_err());
    }

    #[test]
    fn test_empty_bearer_rejected() {
        let parts = parts_with_auth(Some("Bearer "));
        assert!(bearer_token(&parts).is_err());
    }
}
