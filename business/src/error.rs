//! Error taxonomy shared by the client, the stores and the console.
//!
//! Transport libraries fail in many shapes; everything is normalized into
//! these closed enums at the client boundary, before any state transition.

use serde::Deserialize;
use thiserror::Error;

use crate::validation::ValidationError;

/// Failure of a directory call (list, create, update, delete).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// No response reached us: connection refused, DNS, timeout.
    #[error("Network error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("Server error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// The server rejected our credential.
    #[error("Your session has expired, please sign in again")]
    SessionExpired,

    /// A success response whose body did not have the expected shape.
    #[error("Unexpected response from server: {0}")]
    Decode(String),
}

impl DirectoryError {
    /// Map a non-success status and its body to an error.
    ///
    /// 401/403 mean the bearer token was refused.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        if matches!(status, 401 | 403) {
            return Self::SessionExpired;
        }
        Self::Remote {
            status,
            message: error_body_message(body)
                .unwrap_or_else(|| format!("request failed with status {status}")),
        }
    }

    /// The single string a UI shows for this failure.
    pub fn display_message(&self) -> String {
        self.to_string()
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

/// Failure of the authenticate call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Sign in failed: {0}")]
    BadCredentials(String),

    #[error("Could not reach the server: {0}")]
    Transport(String),

    /// The server failed while handling the sign-in (5xx).
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
}

impl AuthError {
    pub fn reason(&self) -> &str {
        match self {
            Self::BadCredentials(reason)
            | Self::Transport(reason)
            | Self::Server {
                message: reason, ..
            } => reason,
        }
    }
}

/// Failure to persist or load a session credential.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Session storage failed: {0}")]
    Storage(String),
}

/// Everything a console operation can report back to the screen that invoked it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("Not signed in")]
    NotAuthenticated,

    #[error("Invalid input: {}", describe(.0))]
    Invalid(Vec<ValidationError>),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl From<Vec<ValidationError>> for ConsoleError {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self::Invalid(errors)
    }
}

fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

/// Pull a human message out of an `{ "error": .. }` or `{ "message": .. }` body.
pub(crate) fn error_body_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_reads_error_field() {
        let err = DirectoryError::from_status(404, br#"{"error":"user not found"}"#);
        assert_eq!(
            err,
            DirectoryError::Remote {
                status: 404,
                message: "user not found".to_owned()
            }
        );
        assert_eq!(err.display_message(), "Server error (404): user not found");
    }

    #[test]
    fn test_from_status_reads_message_field() {
        let err = DirectoryError::from_status(500, br#"{"message":"boom"}"#);
        assert!(matches!(err, DirectoryError::Remote { status: 500, ref message } if message == "boom"));
    }

    #[test]
    fn test_from_status_without_body() {
        let err = DirectoryError::from_status(502, b"");
        assert_eq!(
            err.to_string(),
            "Server error (502): request failed with status 502"
        );
    }

    #[test]
    fn test_unauthorized_is_session_expired() {
        assert!(DirectoryError::from_status(401, b"{}").is_session_expired());
        assert!(DirectoryError::from_status(403, b"").is_session_expired());
        assert!(!DirectoryError::from_status(400, b"").is_session_expired());
    }

    #[test]
    fn test_invalid_lists_every_field() {
        let err = ConsoleError::from(vec![
            ValidationError::new("email", "Invalid email"),
            ValidationError::new("password", "Password is required"),
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid input: email: Invalid email; password: Password is required"
        );
    }

    #[test]
    fn test_auth_error_reason() {
        assert_eq!(
            AuthError::BadCredentials("user not found".to_owned()).reason(),
            "user not found"
        );
    }
}
