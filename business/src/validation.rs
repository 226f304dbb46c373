//! Form-level input rules.
//!
//! Validation runs before anything is sent: a form with errors never reaches
//! the action layer, so these errors never appear in the directory state.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail as _;

use crate::user::{UserDraft, UserPatch};

/// One failed rule on one form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Credentials entered on the sign-in screen.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_email(&mut errors, "email", &self.email);
        if self.password.is_empty() {
            errors.push(ValidationError::new("password", "Password is required"));
        }
        into_result(errors)
    }
}

impl UserDraft {
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_required(&mut errors, "first_name", &self.first_name, "First Name");
        check_required(&mut errors, "last_name", &self.last_name, "Last Name");
        check_email(&mut errors, "email", &self.email);
        check_avatar(&mut errors, &self.avatar_url);
        into_result(errors)
    }
}

impl UserPatch {
    /// Only fields present in the patch are checked; an empty patch is rejected.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        if self.is_empty() {
            errors.push(ValidationError::new("patch", "Nothing to update"));
        }
        if let Some(first_name) = &self.first_name {
            check_required(&mut errors, "first_name", first_name, "First Name");
        }
        if let Some(last_name) = &self.last_name {
            check_required(&mut errors, "last_name", last_name, "Last Name");
        }
        if let Some(email) = &self.email {
            check_email(&mut errors, "email", email);
        }
        if let Some(avatar_url) = &self.avatar_url {
            check_avatar(&mut errors, avatar_url);
        }
        into_result(errors)
    }
}

fn into_result(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_required(errors: &mut Vec<ValidationError>, field: &'static str, value: &str, label: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::new(field, format!("{label} is required")));
    }
}

fn check_email(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(ValidationError::new(field, "Email is required"));
    } else if !is_valid_email(value) {
        errors.push(ValidationError::new(field, "Invalid email"));
    }
}

fn check_avatar(errors: &mut Vec<ValidationError>, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        errors.push(ValidationError::new(
            "avatar_url",
            "Profile Image Link is required",
        ));
    } else if !is_valid_http_url(value) {
        errors.push(ValidationError::new("avatar_url", "Invalid URL"));
    }
}

pub fn is_valid_email(value: &str) -> bool {
    value.trim().validate_email()
}

pub fn is_valid_http_url(value: &str) -> bool {
    url::Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}
