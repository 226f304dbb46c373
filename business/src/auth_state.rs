//! Authentication state for the console.
//!
//! Tracks where the sign-in flow is and which email to pre-fill next time.

use roster_states::State;

/// Authentication status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthStatus {
    /// No session.
    #[default]
    SignedOut,
    /// Login request in flight.
    SigningIn,
    /// A credential is held.
    SignedIn { email: Option<String> },
    /// Last attempt was rejected; the message is shown on the login screen.
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub status: AuthStatus,
    /// Email pre-filled on the login form ("remember me").
    pub remembered_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    LoginRequested,
    LoginSucceeded { email: Option<String> },
    LoginFailed { reason: String },
    /// Restored from a saved credential at startup.
    SessionRestored,
    EmailRemembered { email: Option<String> },
    LoggedOut,
}

impl State for AuthState {
    type Event = AuthEvent;
    const TYPE: &'static str = "auth";

    fn reduce(mut self, event: AuthEvent) -> Self {
        match event {
            AuthEvent::LoginRequested => self.status = AuthStatus::SigningIn,
            AuthEvent::LoginSucceeded { email } => self.status = AuthStatus::SignedIn { email },
            AuthEvent::LoginFailed { reason } => self.status = AuthStatus::Failed(reason),
            AuthEvent::SessionRestored => self.status = AuthStatus::SignedIn { email: None },
            AuthEvent::EmailRemembered { email } => self.remembered_email = email,
            // The remembered email outlives the session.
            AuthEvent::LoggedOut => self.status = AuthStatus::SignedOut,
        }
        self
    }
}

impl AuthState {
    pub fn is_signed_in(&self) -> bool {
        matches!(self.status, AuthStatus::SignedIn { .. })
    }

    pub fn is_signing_in(&self) -> bool {
        self.status == AuthStatus::SigningIn
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            AuthStatus::Failed(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn email(&self) -> Option<&str> {
        match &self.status {
            AuthStatus::SignedIn { email } => email.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_flow() {
        let state = AuthState::default().reduce(AuthEvent::LoginRequested);
        assert!(state.is_signing_in());

        let state = state.reduce(AuthEvent::LoginSucceeded {
            email: Some("eve.holt@reqres.in".to_owned()),
        });
        assert!(state.is_signed_in());
        assert_eq!(state.email(), Some("eve.holt@reqres.in"));
        assert!(state.error().is_none());
    }

    #[test]
    fn test_failure_then_retry_clears_error() {
        let state = AuthState::default()
            .reduce(AuthEvent::LoginRequested)
            .reduce(AuthEvent::LoginFailed {
                reason: "user not found".to_owned(),
            });
        assert_eq!(state.error(), Some("user not found"));

        let state = state.reduce(AuthEvent::LoginRequested);
        assert!(state.error().is_none());
    }

    #[test]
    fn test_logout_keeps_remembered_email() {
        let state = AuthState::default()
            .reduce(AuthEvent::EmailRemembered {
                email: Some("eve.holt@reqres.in".to_owned()),
            })
            .reduce(AuthEvent::SessionRestored)
            .reduce(AuthEvent::LoggedOut);

        assert_eq!(state.status, AuthStatus::SignedOut);
        assert_eq!(state.remembered_email.as_deref(), Some("eve.holt@reqres.in"));
    }
}
