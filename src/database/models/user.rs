use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::FromRow;

use super::ValidationErrors;

pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_digest: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A registration request that passed field validation.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
}

impl Registration {
    pub fn validate(email: Option<&str>, password: Option<&str>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let email = email.map(normalize_email).unwrap_or_default();
        if email.is_empty() {
            errors.add("Email can't be blank");
        } else if !EMAIL_FORMAT.is_match(&email) {
            errors.add("Email is invalid");
        }

        let password = password.unwrap_or_default().to_string();
        if password.is_empty() {
            errors.add("Password can't be blank");
        } else if password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add(format!(
                "Password is too short (minimum is {} characters)",
                MIN_PASSWORD_LENGTH
            ));
        }

        errors.into_result(Self { email, password })
    }
}
