//! Shared setup for the business integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use roster_business::{
    BusinessConfig, Console, LoginForm, MemorySessionStore, SessionStore, UserId, UserRecord,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const EMAIL: &str = "eve.holt@reqres.in";
pub const PASSWORD: &str = "cityslicka";
pub const TOKEN: &str = "QpwL5tke4Pnpja7X4";

pub fn init_logging() {
    env_logger::builder().is_test(true).try_init().ok();
}

pub fn user(id: u64, first_name: &str, last_name: &str) -> UserRecord {
    UserRecord {
        id: UserId::from(id),
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email: format!("{}@reqres.in", first_name.to_lowercase()),
        avatar_url: format!("https://reqres.in/img/faces/{id}-image.jpg"),
    }
}

pub fn list_body(page: u32, total_pages: u32, records: &[UserRecord]) -> serde_json::Value {
    serde_json::json!({
        "page": page,
        "per_page": 6,
        "total": total_pages * 6,
        "total_pages": total_pages,
        "data": records,
    })
}

pub async fn mock_page(server: &MockServer, response: ResponseTemplate, page: u32) {
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", page.to_string()))
        .respond_with(response)
        .mount(server)
        .await;
}

pub async fn mock_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "token": TOKEN })))
        .mount(server)
        .await;
}

/// A console pointed at `server`, together with the store it saves to.
pub fn console(server: &MockServer) -> (Console, Arc<dyn SessionStore>) {
    init_logging();
    let store: Arc<dyn SessionStore> = Arc::new(MemorySessionStore::new());
    let config = BusinessConfig::new(server.uri()).with_api_key("reqres-free-v1");
    let console = Console::connect(config, store.clone()).expect("console should build");
    (console, store)
}

pub async fn signed_in_console(server: &MockServer) -> Console {
    mock_login(server).await;
    let (mut console, _store) = console(server);
    console
        .login(LoginForm::new(EMAIL, PASSWORD), false)
        .await
        .expect("login should succeed");
    console
}
