//! Thin HTTP layer over `reqwest`.
//!
//! Responses are fully buffered into a plain [`Response`] (status and body
//! bytes) so callers can inspect a failure body without holding on to the
//! connection.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

/// A buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True when there is no body worth parsing (204, or whitespace only).
    pub fn has_empty_body(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// The request never produced a response.
#[derive(Debug, Clone)]
pub struct HttpError {
    pub message: String,
    pub timed_out: bool,
}

impl HttpError {
    fn from_reqwest(err: &reqwest::Error) -> Self {
        Self {
            message: err.to_string(),
            timed_out: err.is_timeout(),
        }
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.timed_out {
            write!(f, "request timed out: {}", self.message)
        } else {
            f.write_str(&self.message)
        }
    }
}

impl std::error::Error for HttpError {}

/// Shared HTTP client. Clones share the connection pool.
#[derive(Debug, Clone)]
pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    /// `api_key`, when given, is sent as `x-api-key` on every request.
    pub fn new(timeout: Duration, api_key: Option<&str>) -> Result<Self, HttpError> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = api_key {
            let value = HeaderValue::from_str(api_key).map_err(|e| HttpError {
                message: format!("invalid API key: {e}"),
                timed_out: false,
            })?;
            headers.insert("x-api-key", value);
        }

        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(format!("roster/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| HttpError::from_reqwest(&e))?;

        Ok(Self { inner })
    }

    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::GET, url.into())
    }

    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::POST, url.into())
    }

    pub fn put(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::PUT, url.into())
    }

    pub fn delete(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(Method::DELETE, url.into())
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        RequestBuilder {
            inner: self.inner.request(method.clone(), &url),
            method,
            url,
        }
    }
}

#[derive(Debug)]
pub struct RequestBuilder {
    inner: reqwest::RequestBuilder,
    method: Method,
    url: String,
}

impl RequestBuilder {
    /// Attach `Authorization: Bearer <token>` when a token is given.
    pub fn bearer(mut self, token: Option<&str>) -> Self {
        if let Some(token) = token {
            self.inner = self.inner.bearer_auth(token);
        }
        self
    }

    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_vec(value)?;
        self.inner = self
            .inner
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send the request and buffer the full response.
    pub async fn send(self) -> Result<Response, HttpError> {
        let response = self
            .inner
            .send()
            .await
            .map_err(|e| HttpError::from_reqwest(&e))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::from_reqwest(&e))?
            .to_vec();

        Ok(Response { status, body })
    }
}
