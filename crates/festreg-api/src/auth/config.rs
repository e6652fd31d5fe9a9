// Authentication configuration loaded from environment variables.
// Decision: AUTH_ prefix for all auth config, admin bootstrap via env

use std::time::Duration;

/// Bootstrap admin account (created at startup when absent)
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

/// Complete authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Secret key for signing session tokens
    pub jwt_secret: String,
    /// Session token lifetime (default: 7 days)
    pub token_lifetime: Duration,
    /// Password reset token lifetime (default: 1 hour)
    pub reset_token_lifetime: Duration,
    /// Admin account to bootstrap at startup
    pub admin: Option<AdminConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "insecure-dev-secret-change-me".to_string(),
            token_lifetime: Duration::from_secs(7 * 24 * 60 * 60),
            reset_token_lifetime: Duration::from_secs(60 * 60),
            admin: None,
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let jwt_secret = std::env::var("AUTH_JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("AUTH_JWT_SECRET not set, using insecure default");
            "insecure-dev-secret-change-me".to_string()
        });

        let token_lifetime = std::env::var("AUTH_TOKEN_LIFETIME")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(7 * 24 * 60 * 60));

        let reset_token_lifetime = std::env::var("AUTH_RESET_TOKEN_LIFETIME")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(60 * 60));

        let admin = match (
            std::env::var("ADMIN_EMAIL"),
            std::env::var("ADMIN_PASSWORD"),
        ) {
            (Ok(email), Ok(password)) if !email.is_empty() && !password.is_empty() => {
                Some(AdminConfig { email, password })
            }
            _ => None,
        };

        Self {
            jwt_secret,
            token_lifetime,
            reset_token_lifetime,
            admin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lifetimes() {
        let config = AuthConfig::default();
        assert_eq!(config.token_lifetime, Duration::from_secs(7 * 24 * 60 * 60));
        assert_eq!(config.reset_token_lifetime, Duration::from_secs(3600));
        assert!(config.admin.is_none());
    }
}
