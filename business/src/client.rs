//! Remote directory client.
//!
//! [`DirectoryApi`] is the seam between the action layer and the network. The
//! production implementation, [`HttpDirectoryClient`], speaks the reqres-style
//! REST API:
//!
//! - `GET    /users?page=N`
//! - `POST   /users`
//! - `PUT    /users/{id}`
//! - `DELETE /users/{id}`
//! - `POST   /login`
//!
//! Every transport or status failure is normalized into [`DirectoryError`] or
//! [`AuthError`] here, so nothing above this module sees a `reqwest` error.

use std::num::NonZeroU32;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::config::BusinessConfig;
use crate::error::{AuthError, DirectoryError, error_body_message};
use crate::http::{Client, HttpError, RequestBuilder, Response};
use crate::session::SessionCredential;
use crate::user::{UserDraft, UserId, UserPatch, UserRecord};

const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your credentials.";

/// One page of the remote directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    pub records: Vec<UserRecord>,
    pub page: u32,
    pub page_count: u32,
    pub total_count: u32,
}

#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn list_page(&self, page: NonZeroU32) -> Result<PageResult, DirectoryError>;

    /// Create a user. The returned record always has an id: the server's when
    /// it sent one, a provisional one otherwise.
    async fn create(&self, draft: &UserDraft) -> Result<UserRecord, DirectoryError>;

    /// Update a user. `None` when the server did not echo a full record.
    async fn update(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<Option<UserRecord>, DirectoryError>;

    async fn delete(&self, id: &UserId) -> Result<(), DirectoryError>;

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionCredential, AuthError>;

    /// Attach (or detach) the bearer token sent with directory calls.
    fn set_bearer_token(&self, _token: Option<String>) {}
}

#[derive(Debug, Deserialize)]
struct ListUsersResponse {
    page: u32,
    #[serde(default)]
    total: u32,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    data: Vec<UserRecord>,
}

impl ListUsersResponse {
    /// An empty directory reports zero pages; there is always at least one.
    fn into_page_result(self) -> PageResult {
        PageResult {
            records: self.data,
            page: self.page.max(1),
            page_count: self.total_pages.max(1),
            total_count: self.total,
        }
    }
}

/// Create responses echo whatever the server kept; every field is optional.
#[derive(Debug, Default, Deserialize)]
struct CreateUserResponse {
    id: Option<UserId>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    avatar: Option<String>,
}

impl CreateUserResponse {
    fn merge_into(self, draft: &UserDraft) -> UserRecord {
        let id = self.id.unwrap_or_else(|| {
            let id = UserId::provisional();
            debug!("Create response carried no id, using provisional id {id}");
            id
        });
        UserRecord {
            id,
            first_name: self.first_name.unwrap_or_else(|| draft.first_name.clone()),
            last_name: self.last_name.unwrap_or_else(|| draft.last_name.clone()),
            email: self.email.unwrap_or_else(|| draft.email.clone()),
            avatar_url: self.avatar.unwrap_or_else(|| draft.avatar_url.clone()),
        }
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

/// [`DirectoryApi`] over HTTP.
#[derive(Debug)]
pub struct HttpDirectoryClient {
    config: BusinessConfig,
    http: Client,
    token: RwLock<Option<String>>,
}

impl HttpDirectoryClient {
    pub fn new(config: BusinessConfig) -> Result<Self, HttpError> {
        let http = Client::new(config.request_timeout, config.api_key())?;
        Ok(Self {
            config,
            http,
            token: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &BusinessConfig {
        &self.config
    }

    fn bearer_token(&self) -> Option<String> {
        self.token.read().ok().and_then(|token| token.clone())
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.bearer_token();
        request.bearer(token.as_deref())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, DirectoryError> {
        let method = request.method().clone();
        let url = request.url().to_owned();
        debug!("{method} {url}");

        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| {
                warn!("{method} {url} failed: {e}");
                DirectoryError::Transport(e.to_string())
            })?;

        if !response.is_success() {
            warn!("{method} {url} returned status {}", response.status);
            return Err(DirectoryError::from_status(response.status, &response.body));
        }

        debug!("{method} {url} -> {}", response.status);
        Ok(response)
    }

    fn user_url(&self, id: &UserId) -> String {
        self.config.api_url(&format!("users/{id}"))
    }
}

#[async_trait]
impl DirectoryApi for HttpDirectoryClient {
    async fn list_page(&self, page: NonZeroU32) -> Result<PageResult, DirectoryError> {
        let url = format!("{}?page={page}", self.config.api_url("users"));
        let response = self.send(self.http.get(url)).await?;

        let body: ListUsersResponse = response.json().map_err(|e| {
            DirectoryError::Decode(format!("Failed to parse ListUsersResponse: {e}"))
        })?;

        info!(
            "Loaded page {} of {} ({} user(s))",
            body.page,
            body.total_pages,
            body.data.len()
        );

        Ok(body.into_page_result())
    }

    async fn create(&self, draft: &UserDraft) -> Result<UserRecord, DirectoryError> {
        let request = self
            .http
            .post(self.config.api_url("users"))
            .json(draft)
            .map_err(|e| DirectoryError::Decode(format!("Failed to serialize request: {e}")))?;
        let response = self.send(request).await?;

        let echoed: CreateUserResponse = if response.has_empty_body() {
            CreateUserResponse::default()
        } else {
            response.json().map_err(|e| {
                DirectoryError::Decode(format!("Failed to parse CreateUserResponse: {e}"))
            })?
        };

        let record = echoed.merge_into(draft);
        info!("Created user {}", record.id);
        Ok(record)
    }

    async fn update(
        &self,
        id: &UserId,
        patch: &UserPatch,
    ) -> Result<Option<UserRecord>, DirectoryError> {
        let request = self
            .http
            .put(self.user_url(id))
            .json(patch)
            .map_err(|e| DirectoryError::Decode(format!("Failed to serialize request: {e}")))?;
        let response = self.send(request).await?;

        info!("Updated user {id}");
        if response.has_empty_body() {
            return Ok(None);
        }
        // A partial echo (reqres sends only the patched fields plus `updatedAt`)
        // is not an error.
        Ok(response.json::<UserRecord>().ok())
    }

    async fn delete(&self, id: &UserId) -> Result<(), DirectoryError> {
        self.send(self.http.delete(self.user_url(id))).await?;
        info!("Deleted user {id}");
        Ok(())
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionCredential, AuthError> {
        let url = self.config.api_url("login");
        let request = self
            .http
            .post(url)
            .json(&LoginRequest { email, password })
            .map_err(|e| AuthError::Transport(format!("Failed to serialize request: {e}")))?;

        let response = request.send().await.map_err(|e| {
            warn!("Login request failed: {e}");
            AuthError::Transport(e.to_string())
        })?;

        if response.status >= 500 {
            let message = error_body_message(&response.body)
                .unwrap_or_else(|| format!("request failed with status {}", response.status));
            warn!("Login failed with status {}: {message}", response.status);
            return Err(AuthError::Server {
                status: response.status,
                message,
            });
        }
        if !response.is_success() {
            let reason = error_body_message(&response.body)
                .unwrap_or_else(|| LOGIN_FAILED_MESSAGE.to_owned());
            warn!("Login rejected with status {}: {reason}", response.status);
            return Err(AuthError::BadCredentials(reason));
        }

        let token = response
            .json::<LoginResponse>()
            .ok()
            .and_then(|body| body.token)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| AuthError::BadCredentials(LOGIN_FAILED_MESSAGE.to_owned()))?;

        info!("Signed in as {email}");
        let mut credential = SessionCredential::new(token, Utc::now());
        if let Some(ttl) = self.config.session_ttl {
            credential = credential.with_ttl(ttl);
        }
        Ok(credential)
    }

    fn set_bearer_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = token;
        }
    }
}
