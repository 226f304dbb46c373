//! Test helpers: an in-process [`DirectoryApi`] with scriptable results and a
//! wiremock-backed context for exercising the HTTP client.
//!
//! ```ignore
//! let api = FakeDirectoryApi::new().with_page(page_of(1, 1, vec![sample_user(1, "George", "Bluth")]));
//! let gate = api.gate_page(1);      // page 1 now blocks until `gate.send(())`
//! ```

#![cfg(test)]

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::oneshot;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

use crate::{
    AuthError, BusinessConfig, DirectoryApi, DirectoryError, HttpDirectoryClient, PageResult,
    SessionCredential, UserDraft, UserId, UserPatch, UserRecord,
};

pub const VALID_EMAIL: &str = "eve.holt@reqres.in";
pub const VALID_PASSWORD: &str = "cityslicka";
pub const VALID_TOKEN: &str = "QpwL5tke4Pnpja7X4";

pub fn sample_user(id: u64, first_name: &str, last_name: &str) -> UserRecord {
    UserRecord {
        id: UserId::from(id),
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email: format!(
            "{}.{}@reqres.in",
            first_name.to_lowercase(),
            last_name.to_lowercase()
        ),
        avatar_url: format!("https://reqres.in/img/faces/{id}-image.jpg"),
    }
}

pub fn page_of(page: u32, page_count: u32, records: Vec<UserRecord>) -> PageResult {
    let total_count = page_count * records.len().max(1) as u32;
    PageResult {
        records,
        page,
        page_count,
        total_count,
    }
}

/// Scriptable [`DirectoryApi`]. Never touches the network.
#[derive(Default)]
pub struct FakeDirectoryApi {
    pages: Mutex<HashMap<u32, PageResult>>,
    gates: Mutex<HashMap<u32, oneshot::Receiver<()>>>,
    list_error: Mutex<Option<DirectoryError>>,
    mutation_error: Mutex<Option<DirectoryError>>,
    omit_created_ids: bool,
    next_id: AtomicU64,
    list_calls: Mutex<Vec<u32>>,
    bearer_token: Mutex<Option<String>>,
}

impl FakeDirectoryApi {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(100),
            ..Self::default()
        }
    }

    pub fn with_page(self, page: PageResult) -> Self {
        self.pages.lock().unwrap().insert(page.page, page);
        self
    }

    /// Every list call fails with `error`.
    pub fn failing_lists(self, error: DirectoryError) -> Self {
        *self.list_error.lock().unwrap() = Some(error);
        self
    }

    /// Every create/update/delete fails with `error`.
    pub fn failing_mutations(self, error: DirectoryError) -> Self {
        *self.mutation_error.lock().unwrap() = Some(error);
        self
    }

    /// Created records come back without a server id.
    pub fn without_created_ids(mut self) -> Self {
        self.omit_created_ids = true;
        self
    }

    /// Block the next load of `page` until the returned sender fires.
    pub fn gate_page(&self, page: u32) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(page, rx);
        tx
    }

    pub fn list_calls(&self) -> Vec<u32> {
        self.list_calls.lock().unwrap().clone()
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.bearer_token.lock().unwrap().clone()
    }

    fn mutation_result(&self) -> Result<(), DirectoryError> {
        match self.mutation_error.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DirectoryApi for FakeDirectoryApi {
    async fn list_page(&self, page: NonZeroU32) -> Result<PageResult, DirectoryError> {
        self.list_calls.lock().unwrap().push(page.get());
        let gate = self.gates.lock().unwrap().remove(&page.get());
        if let Some(gate) = gate {
            gate.await.ok();
        }
        if let Some(error) = self.list_error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self
            .pages
            .lock()
            .unwrap()
            .get(&page.get())
            .cloned()
            .unwrap_or_else(|| page_of(page.get(), 1, Vec::new())))
    }

    async fn create(&self, draft: &UserDraft) -> Result<UserRecord, DirectoryError> {
        self.mutation_result()?;
        let id = if self.omit_created_ids {
            UserId::provisional()
        } else {
            UserId::from(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
        };
        Ok(draft.clone().into_record(id))
    }

    async fn update(
        &self,
        _id: &UserId,
        _patch: &UserPatch,
    ) -> Result<Option<UserRecord>, DirectoryError> {
        self.mutation_result()?;
        Ok(None)
    }

    async fn delete(&self, _id: &UserId) -> Result<(), DirectoryError> {
        self.mutation_result()
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionCredential, AuthError> {
        if email == VALID_EMAIL && password == VALID_PASSWORD {
            Ok(SessionCredential::new(VALID_TOKEN, Utc::now()))
        } else {
            Err(AuthError::BadCredentials("user not found".to_owned()))
        }
    }

    fn set_bearer_token(&self, token: Option<String>) {
        *self.bearer_token.lock().unwrap() = token;
    }
}

/// A mock server plus an [`HttpDirectoryClient`] pointed at it.
pub struct TestContext {
    pub mock_server: MockServer,
    pub client: HttpDirectoryClient,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(|config| config).await
    }

    pub async fn with_config(configure: impl FnOnce(BusinessConfig) -> BusinessConfig) -> Self {
        let mock_server = MockServer::start().await;
        let config = configure(BusinessConfig::new(mock_server.uri()));
        let client = HttpDirectoryClient::new(config).expect("client should build");
        Self {
            mock_server,
            client,
        }
    }

    /// Serve `records` as page `page` of `total_pages`.
    pub async fn mock_list_users(&self, page: u32, total_pages: u32, records: &[UserRecord]) {
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "page": page,
                "per_page": 6,
                "total": total_pages * 6,
                "total_pages": total_pages,
                "data": records,
            })))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_login_success(&self, token: &str) {
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": token })),
            )
            .mount(&self.mock_server)
            .await;
    }
}
