use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// Minimal HTTP method set needed by provider adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Authentication applied to outgoing HTTP requests.
#[derive(Clone, PartialEq, Eq)]
pub enum HttpAuth {
    BearerToken(String),
    Basic { username: String, password: String },
}

impl HttpAuth {
    pub fn apply(&self, headers: &mut BTreeMap<String, String>) {
        match self {
            Self::BearerToken(token) => {
                headers.insert(String::from("authorization"), format!("Bearer {token}"));
            }
            Self::Basic { username, password } => {
                let encoded = BASE64.encode(format!("{username}:{password}"));
                headers.insert(String::from("authorization"), format!("Basic {encoded}"));
            }
        }
    }

    pub const fn scheme(&self) -> &'static str {
        match self {
            Self::BearerToken(_) => "bearer",
            Self::Basic { .. } => "basic",
        }
    }
}

// Credentials stay out of Debug output so requests can be logged safely.
impl std::fmt::Debug for HttpAuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "HttpAuth::{}(<redacted>)", self.scheme())
    }
}

/// HTTP request envelope used by adapter transport calls.
///
/// `url` holds the endpoint without a query string; query parameters live in
/// `query` so request signers can see them unencoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: BTreeMap::new(),
            body: None,
            timeout_ms: 10_000,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets an `application/x-www-form-urlencoded` body.
    pub fn with_form(self, fields: &[(&str, &str)]) -> Self {
        let body = encode_pairs(fields.iter().map(|(name, value)| (*name, *value)));
        self.with_header(
            "content-type",
            "application/x-www-form-urlencoded;charset=UTF-8",
        )
        .with_body(body)
    }

    pub fn with_auth(mut self, auth: &HttpAuth) -> Self {
        auth.apply(&mut self.headers);
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Endpoint plus percent-encoded query string.
    pub fn full_url(&self) -> String {
        if self.query.is_empty() {
            return self.url.clone();
        }

        let query = encode_pairs(
            self.query
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        );
        format!("{}?{query}", self.url)
    }
}

fn encode_pairs<'a>(pairs: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    pairs
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// HTTP response envelope returned by an adapter transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok_json(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Transport-level HTTP error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    message: String,
    timed_out: bool,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: true,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn timed_out(&self) -> bool {
        self.timed_out
    }
}

impl Display for HttpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HttpError {}

/// Adapter transport contract that supports async execution and auth-aware requests.
pub trait HttpClient: Send + Sync {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>>;
}

/// Shared reqwest connection pool used by every live adapter.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Arc<reqwest::Client>,
}

const USER_AGENT: &str = concat!("trucktok/", env!("CARGO_PKG_VERSION"));

impl ReqwestHttpClient {
    /// Client with the `trucktok/<version>` user agent. Falls back to a stock
    /// reqwest client, with a warning, if the configured one cannot be built.
    pub fn new() -> Self {
        Self::with_user_agent(USER_AGENT).unwrap_or_else(|error| {
            tracing::warn!(error = %error, "http client setup failed, using reqwest defaults");
            Self {
                client: Arc::new(reqwest::Client::new()),
            }
        })
    }

    pub fn with_user_agent(user_agent: &str) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|error| HttpError::new(format!("building http client failed: {error}")))?;
        Ok(Self {
            client: Arc::new(client),
        })
    }
}

impl Default for ReqwestHttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        Box::pin(async move {
            let method = match request.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
            };
            let mut builder = self
                .client
                .request(method, request.full_url())
                .timeout(Duration::from_millis(request.timeout_ms));

            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(classify_reqwest_error)?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(|error| {
                HttpError::new(format!("reading body failed: {}", error.without_url()))
            })?;

            Ok(HttpResponse::new(status, body))
        })
    }
}

// URLs are stripped because they may carry an API key.
fn classify_reqwest_error(error: reqwest::Error) -> HttpError {
    let error = error.without_url();
    if error.is_timeout() {
        HttpError::timeout(format!("timed out: {error}"))
    } else if error.is_connect() {
        HttpError::new(format!("connect failed: {error}"))
    } else {
        HttpError::new(format!("send failed: {error}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_auth_populates_authorization_header() {
        let request = HttpRequest::get("https://example.test/search")
            .with_auth(&HttpAuth::BearerToken(String::from("token-123")));

        assert_eq!(
            request.headers.get("authorization").map(String::as_str),
            Some("Bearer token-123")
        );
    }

    #[test]
    fn basic_auth_base64_encodes_key_and_secret() {
        let request = HttpRequest::post("https://example.test/token").with_auth(&HttpAuth::Basic {
            username: String::from("key"),
            password: String::from("secret"),
        });

        assert_eq!(
            request.headers.get("authorization").map(String::as_str),
            Some("Basic a2V5OnNlY3JldA==")
        );
    }

    #[test]
    fn full_url_percent_encodes_query() {
        let request = HttpRequest::get("https://example.test/search")
            .with_query("q", "custom trucks")
            .with_query("id", "a,b");

        assert_eq!(
            request.full_url(),
            "https://example.test/search?q=custom%20trucks&id=a%2Cb"
        );
        assert_eq!(request.query_param("q"), Some("custom trucks"));
    }

    #[test]
    fn form_body_sets_content_type() {
        let request = HttpRequest::post("https://example.test/token")
            .with_form(&[("grant_type", "client_credentials")]);

        assert_eq!(request.body.as_deref(), Some("grant_type=client_credentials"));
        assert_eq!(
            request.headers.get("content-type").map(String::as_str),
            Some("application/x-www-form-urlencoded;charset=UTF-8")
        );
    }

    #[test]
    fn invalid_user_agent_is_reported_instead_of_dropped() {
        let error = ReqwestHttpClient::with_user_agent("bad\nagent").expect_err("newline in header");
        assert!(error.message().contains("building http client failed"));

        assert!(ReqwestHttpClient::with_user_agent(USER_AGENT).is_ok());
    }

    #[test]
    fn debug_output_redacts_credentials() {
        let auth = HttpAuth::BearerToken(String::from("super-secret"));
        let rendered = format!("{auth:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("bearer"));
    }
}
