// User account DTOs and identity-field validation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{FestError, Result};

/// Account role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            "admin" => Role::Admin,
            _ => Role::Student,
        }
    }
}

/// User profile as exposed by the API. The password hash never leaves
/// the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub email: String,
    pub full_name: String,
    pub roll_number: String,
    pub department: String,
    pub year: i32,
    pub mobile_number: String,
    pub role: Role,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Signup payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub roll_number: String,
    pub department: String,
    pub year: i32,
    pub mobile_number: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<()> {
        if self.full_name.trim().is_empty() {
            return Err(FestError::validation("full name must not be empty"));
        }
        if self.roll_number.trim().is_empty() {
            return Err(FestError::validation("roll number must not be empty"));
        }
        if self.department.trim().is_empty() {
            return Err(FestError::validation("department must not be empty"));
        }
        validate_email(&self.email)?;
        validate_password(&self.password)?;
        validate_year(self.year)?;
        validate_mobile(&self.mobile_number)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub mobile_number: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.full_name {
            if name.trim().is_empty() {
                return Err(FestError::validation("full name must not be empty"));
            }
        }
        if let Some(department) = &self.department {
            if department.trim().is_empty() {
                return Err(FestError::validation("department must not be empty"));
            }
        }
        if let Some(year) = self.year {
            validate_year(year)?;
        }
        if let Some(mobile) = &self.mobile_number {
            validate_mobile(mobile)?;
        }
        Ok(())
    }
}

/// Issued on successful signup or login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

/// Structural email check. Deliverability is the mail provider's problem;
/// this only rejects values that cannot be an address at all.
pub fn validate_email(email: &str) -> Result<()> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(FestError::validation(format!("invalid email: {email}")))
    }
}

/// Mobile numbers are exactly 10 digits.
pub fn validate_mobile(mobile: &str) -> Result<()> {
    if mobile.len() == 10 && mobile.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(FestError::validation(
            "mobile number must be exactly 10 digits",
        ))
    }
}

/// Study year must fall in 1..=4.
pub fn validate_year(year: i32) -> Result<()> {
    if (1..=4).contains(&year) {
        Ok(())
    } else {
        Err(FestError::validation("year must be between 1 and 4"))
    }
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.len() < 6 {
        return Err(FestError::validation(
            "password must be at least 6 characters",
        ));
    }
    Ok(())
}
