//! Session credential and the guard that decides whether the directory is
//! reachable.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::SessionError;

/// Opaque token proving a successful sign-in.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredential {
    pub token: String,
    pub issued_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

// Keep the token out of logs.
impl std::fmt::Debug for SessionCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCredential")
            .field("token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl SessionCredential {
    pub fn new(token: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            issued_at,
            expires_at: None,
        }
    }

    /// Expire the credential `ttl` after it was issued.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| self.issued_at.checked_add_signed(ttl));
        self
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}

/// Where the credential and the remembered sign-in email live between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<SessionCredential>, SessionError>;
    fn save(&self, credential: &SessionCredential) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;

    fn remembered_email(&self) -> Result<Option<String>, SessionError>;
    /// `None` forgets any previously remembered email.
    fn remember_email(&self, email: Option<&str>) -> Result<(), SessionError>;
}

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    credential: Option<SessionCredential>,
    remembered_email: Option<String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with<T>(&self, f: impl FnOnce(&mut MemoryInner) -> T) -> Result<T, SessionError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| SessionError::Storage("session store lock poisoned".to_owned()))?;
        Ok(f(&mut inner))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionCredential>, SessionError> {
        self.with(|inner| inner.credential.clone())
    }

    fn save(&self, credential: &SessionCredential) -> Result<(), SessionError> {
        self.with(|inner| inner.credential = Some(credential.clone()))
    }

    fn clear(&self) -> Result<(), SessionError> {
        self.with(|inner| inner.credential = None)
    }

    fn remembered_email(&self) -> Result<Option<String>, SessionError> {
        self.with(|inner| inner.remembered_email.clone())
    }

    fn remember_email(&self, email: Option<&str>) -> Result<(), SessionError> {
        self.with(|inner| inner.remembered_email = email.map(str::to_owned))
    }
}

/// Holds the current credential and answers "is the user signed in?".
///
/// Writes go through to the backing [`SessionStore`] so a restart can restore
/// the session.
pub struct SessionGuard {
    store: Arc<dyn SessionStore>,
    credential: Option<SessionCredential>,
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard")
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}

impl Default for SessionGuard {
    fn default() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }
}

impl SessionGuard {
    /// A guard with no credential, backed by `store`.
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self {
            store,
            credential: None,
        }
    }

    /// A guard holding whatever credential `store` has saved.
    pub fn restore(store: Arc<dyn SessionStore>) -> Result<Self, SessionError> {
        let credential = store.load()?;
        if credential.is_some() {
            debug!("Restored saved session credential");
        }
        Ok(Self { store, credential })
    }

    pub fn is_authenticated(&self) -> bool {
        self.is_authenticated_at(Utc::now())
    }

    pub fn is_authenticated_at(&self, now: DateTime<Utc>) -> bool {
        self.credential
            .as_ref()
            .is_some_and(|credential| !credential.is_expired_at(now))
    }

    pub fn credential(&self) -> Option<&SessionCredential> {
        self.credential.as_ref()
    }

    /// Token of a live credential; `None` once expired.
    pub fn token(&self) -> Option<&str> {
        self.credential
            .as_ref()
            .filter(|credential| !credential.is_expired_at(Utc::now()))
            .map(|credential| credential.token.as_str())
    }

    pub fn sign_in(&mut self, credential: SessionCredential) -> Result<(), SessionError> {
        self.store.save(&credential)?;
        info!("Session established");
        self.credential = Some(credential);
        Ok(())
    }

    /// Drop the credential. The in-memory credential is cleared even when the
    /// store fails.
    pub fn sign_out(&mut self) -> Result<(), SessionError> {
        self.credential = None;
        self.store.clear()?;
        info!("Session cleared");
        Ok(())
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }
}
