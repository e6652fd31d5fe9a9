// Transactional mail over the provider's HTTP API
// Decision: no MAIL_API_KEY means log the reset link instead of failing,
// so local setups work without a mail account

use anyhow::{bail, Context, Result};

/// Mail provider configuration
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Provider API key; mail sending is disabled when absent
    pub api_key: Option<String>,
    /// Provider send endpoint
    pub endpoint: String,
    /// From address for outgoing mail
    pub from: String,
    /// Base URL of the frontend, for building reset links
    pub frontend_base_url: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.resend.com/emails".to_string(),
            from: "Festreg <no-reply@festreg.app>".to_string(),
            frontend_base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl MailConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("MAIL_API_KEY").ok().filter(|s| !s.is_empty()),
            endpoint: std::env::var("MAIL_ENDPOINT").unwrap_or(defaults.endpoint),
            from: std::env::var("MAIL_FROM").unwrap_or(defaults.from),
            frontend_base_url: std::env::var("FRONTEND_BASE_URL")
                .unwrap_or(defaults.frontend_base_url),
        }
    }
}

pub struct Mailer {
    client: reqwest::Client,
    config: MailConfig,
}

impl Mailer {
    pub fn new(config: MailConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    pub fn reset_link(&self, token: &str) -> String {
        format!(
            "{}/reset-password?token={}",
            self.config.frontend_base_url.trim_end_matches('/'),
            token
        )
    }

    /// Send the password reset mail, or log the link when no provider is
    /// configured.
    pub async fn send_password_reset(&self, to: &str, token: &str) -> Result<()> {
        let link = self.reset_link(token);

        let Some(api_key) = &self.config.api_key else {
            tracing::warn!(
                recipient = %to,
                %link,
                "mail provider not configured; logging password reset link instead"
            );
            return Ok(());
        };

        let body = serde_json::json!({
            "from": self.config.from,
            "to": [to],
            "subject": "Reset your festreg password",
            "html": format!(
                "<p>A password reset was requested for this address.</p>\
                 <p><a href=\"{link}\">Reset password</a> (valid for one hour)</p>\
                 <p>If you did not request this, ignore this mail.</p>"
            ),
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .context("failed to call mail provider")?;

        if !response.status().is_success() {
            bail!("mail provider returned {}", response.status());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_link_format() {
        let mailer = Mailer::new(MailConfig {
            frontend_base_url: "https://fest.example.com/".to_string(),
            ..MailConfig::default()
        });
        assert_eq!(
            mailer.reset_link("abc123"),
            "https://fest.example.com/reset-password?token=abc123"
        );
    }

    #[test]
    fn test_unconfigured_mailer_reports_it() {
        let mailer = Mailer::new(MailConfig::default());
        assert!(!mailer.is_configured());
    }
}
