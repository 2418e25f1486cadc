//! Standardized HTTP transport
//!
//! JSON client used for every backend and identity-provider call.
//! A non-2xx status is returned as data, not as an error: deciding what a
//! backend status *means* belongs to the response normalizer, not here.
//! Transport failures (unreachable host, aborting timeout) do become errors.

use std::sync::Arc;
use std::time::Duration;

use kernel::error::app_error::{AppError, AppResult};
use reqwest::Method;
use reqwest::header::{CACHE_CONTROL, COOKIE, SET_COOKIE};
use serde::Serialize;
use serde_json::Value;

use crate::cookie::CookieJar;

/// Default request timeout (the abort-controller window)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw reply from a backend: status plus the parsed JSON body.
///
/// `body` is `Null` when the response had no body or was not JSON.
#[derive(Debug, Clone)]
pub struct HttpReply {
    pub status: u16,
    pub body: Value,
}

impl HttpReply {
    /// Whether the status is in the 2xx range
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Top-level `message` field of the body, if present
    pub fn message(&self) -> Option<&str> {
        self.body.get("message")?.as_str()
    }
}

/// JSON HTTP client bound to a base URL.
///
/// Optionally wired to a shared [`CookieJar`]: response `Set-Cookie` headers
/// are recorded and a `Cookie` header is attached to every request (the
/// `credentials: "include"` analog).
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    host: String,
    client: reqwest::Client,
    jar: Option<Arc<CookieJar>>,
}

impl ApiClient {
    /// Create a client with the given base URL and request timeout
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AppError::from)?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            host: host_of(base_url),
            client,
            jar: None,
        })
    }

    /// Create a client with the default 30-second timeout
    pub fn with_default_timeout(base_url: &str) -> AppResult<Self> {
        Self::new(base_url, DEFAULT_TIMEOUT)
    }

    /// Attach a shared cookie jar
    pub fn with_jar(mut self, jar: Arc<CookieJar>) -> Self {
        self.jar = Some(jar);
        self
    }

    /// Hostname the client talks to (for cookie scoping)
    pub fn host(&self) -> &str {
        &self.host
    }

    /// GET a path relative to the base URL
    pub async fn get(&self, path: &str) -> AppResult<HttpReply> {
        self.execute(Method::GET, path, None).await
    }

    /// POST a JSON body to a path relative to the base URL
    pub async fn post_json<B>(&self, path: &str, body: &B) -> AppResult<HttpReply>
    where
        B: Serialize + ?Sized,
    {
        let body = serde_json::to_value(body).map_err(AppError::from)?;
        self.execute(Method::POST, path, Some(body)).await
    }

    /// POST with an empty body
    pub async fn post(&self, path: &str) -> AppResult<HttpReply> {
        self.execute(Method::POST, path, None).await
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> AppResult<HttpReply> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .request(method, &url)
            .header(CACHE_CONTROL, "no-cache");

        if let Some(body) = &body {
            request = request.json(body);
        }

        if let Some(jar) = &self.jar {
            if let Some(header) = jar.cookie_header(&self.host) {
                request = request.header(COOKIE, header);
            }
        }

        let response = request.send().await.map_err(AppError::from)?;
        let status = response.status().as_u16();

        if let Some(jar) = &self.jar {
            for value in response.headers().get_all(SET_COOKIE) {
                if let Ok(raw) = value.to_str() {
                    jar.store(raw, &self.host);
                }
            }
        }

        let text = response.text().await.map_err(AppError::from)?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            // Non-JSON bodies surface as Null; the normalizer rejects them
            serde_json::from_str(&text).unwrap_or(Value::Null)
        };

        Ok(HttpReply { status, body })
    }
}

/// Extract the hostname from a URL (scheme and port stripped)
fn host_of(url: &str) -> String {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?']).next().unwrap_or(rest);
    authority
        .split(':')
        .next()
        .unwrap_or(authority)
        .to_lowercase()
}
