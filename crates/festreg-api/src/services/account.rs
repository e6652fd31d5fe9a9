// Account service: signup, login, profile, password reset flows

use std::sync::Arc;

use chrono::{Duration, Utc};

use festreg_core::{
    FestError, LoginRequest, RegisterRequest, ResetPasswordRequest, Result, Role, TokenResponse,
    UpdateProfileRequest, User,
};
use festreg_storage::{
    hash_password, models::CreateUser, models::UpdateProfile, verify_password, Database,
};

use crate::auth::{config::AuthConfig, jwt, reset};
use crate::services::Mailer;

/// One message for unknown email, wrong password, and unverified account,
/// so login failures reveal nothing about which it was.
const LOGIN_FAILED: &str = "invalid credentials";

pub struct AccountService {
    db: Arc<Database>,
    config: Arc<AuthConfig>,
    mailer: Arc<Mailer>,
}

impl AccountService {
    pub fn new(db: Arc<Database>, config: Arc<AuthConfig>, mailer: Arc<Mailer>) -> Self {
        Self { db, config, mailer }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<TokenResponse> {
        req.validate()?;

        if self
            .db
            .get_user_by_email(&req.email)
            .await
            .map_err(FestError::internal)?
            .is_some()
        {
            return Err(FestError::conflict("email already registered"));
        }

        if self
            .db
            .get_user_by_roll_number(&req.roll_number)
            .await
            .map_err(FestError::internal)?
            .is_some()
        {
            return Err(FestError::conflict("roll number already registered"));
        }

        let password_hash = hash_password(&req.password).map_err(FestError::internal)?;

        let row = self
            .db
            .create_user(CreateUser {
                email: req.email,
                password_hash,
                full_name: req.full_name,
                roll_number: req.roll_number,
                department: req.department,
                year: req.year,
                mobile_number: req.mobile_number,
                role: Role::Student.to_string(),
                // No real email verification is performed; accounts start
                // verified.
                verified: true,
            })
            .await
            .map_err(FestError::internal)?;

        let user = User::from(row);
        let token = self.issue_token(&user)?;
        Ok(TokenResponse { token, user })
    }

    pub async fn login(&self, req: LoginRequest) -> Result<TokenResponse> {
        let row = self
            .db
            .get_user_by_email(&req.email)
            .await
            .map_err(FestError::internal)?
            .ok_or_else(|| FestError::unauthorized(LOGIN_FAILED))?;

        if !verify_password(&req.password, &row.password_hash) {
            return Err(FestError::unauthorized(LOGIN_FAILED));
        }

        if !row.verified {
            return Err(FestError::unauthorized(LOGIN_FAILED));
        }

        let user = User::from(row);
        let token = self.issue_token(&user)?;
        Ok(TokenResponse { token, user })
    }

    pub async fn update_profile(&self, email: &str, req: UpdateProfileRequest) -> Result<User> {
        req.validate()?;

        let row = self
            .db
            .update_profile(
                email,
                UpdateProfile {
                    full_name: req.full_name,
                    department: req.department,
                    year: req.year,
                    mobile_number: req.mobile_number,
                },
            )
            .await
            .map_err(FestError::internal)?
            .ok_or_else(|| FestError::not_found("user not found"))?;

        Ok(User::from(row))
    }

    /// Issue a reset token when the account exists. Callers always get the
    /// same response either way; only the logs know the difference.
    pub async fn forgot_password(&self, email: &str) -> Result<()> {
        let Some(user) = self
            .db
            .get_user_by_email(email)
            .await
            .map_err(FestError::internal)?
        else {
            tracing::debug!(%email, "password reset requested for unknown email");
            return Ok(());
        };

        let generated = reset::generate_reset_token();
        let lifetime = Duration::from_std(self.config.reset_token_lifetime)
            .unwrap_or_else(|_| Duration::hours(1));
        let expires_at = Utc::now() + lifetime;

        self.db
            .create_password_reset(&user.email, &generated.token_hash, expires_at)
            .await
            .map_err(FestError::internal)?;

        if let Err(err) = self
            .mailer
            .send_password_reset(&user.email, &generated.token)
            .await
        {
            // The constant response still stands; the token row stays
            // valid in case the user retries.
            tracing::error!(email = %user.email, error = ?err, "failed to send password reset mail");
        }

        Ok(())
    }

    pub async fn reset_password(&self, req: ResetPasswordRequest) -> Result<()> {
        if !reset::is_valid_reset_token_format(&req.token) {
            return Err(FestError::InvalidToken);
        }
        festreg_core::validate_password(&req.new_password)?;

        let token_hash = reset::hash_reset_token(&req.token);
        let email = self
            .db
            .consume_password_reset(&token_hash)
            .await
            .map_err(FestError::internal)?
            .ok_or(FestError::InvalidToken)?;

        let password_hash = hash_password(&req.new_password).map_err(FestError::internal)?;
        self.db
            .update_password(&email, &password_hash)
            .await
            .map_err(FestError::internal)?;

        Ok(())
    }

    /// Create the bootstrap admin account when configured and absent.
    pub async fn bootstrap_admin(&self) -> anyhow::Result<()> {
        let Some(admin) = &self.config.admin else {
            return Ok(());
        };

        if self.db.get_user_by_email(&admin.email).await?.is_some() {
            return Ok(());
        }

        let password_hash = hash_password(&admin.password)?;
        self.db
            .create_user(CreateUser {
                email: admin.email.clone(),
                password_hash,
                full_name: "Fest Admin".to_string(),
                roll_number: "ADMIN-001".to_string(),
                department: "Administration".to_string(),
                year: 1,
                mobile_number: "0000000000".to_string(),
                role: Role::Admin.to_string(),
                verified: true,
            })
            .await?;

        tracing::info!(email = %admin.email, "bootstrap admin account created");
        Ok(())
    }

    fn issue_token(&self, user: &User) -> Result<String> {
        jwt::issue_token(
            &self.config.jwt_secret,
            &user.email,
            user.role,
            self.config.token_lifetime,
        )
        .map_err(FestError::internal)
    }
}
