//! Subtuber HTTP client

pub mod auth;
pub mod catalog;
pub mod error;
pub mod streamers;
pub mod twitch;

use error::ClientError;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use subtuber_core::TokenStore;
use tracing::{debug, error};
use url::Url;

/// Base path used when no override is configured
pub const DEFAULT_BASE_PATH: &str = "/api";

/// Timeout applied to every request on native targets
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Environment variable overriding the API base path
pub const BASE_URL_ENV: &str = "SUBTUBER_API_BASE_URL";

const USER_AGENT: &str = concat!("subtuber-client/", env!("CARGO_PKG_VERSION"));

/// Base path from `SUBTUBER_API_BASE_URL`, falling back to `/api`
pub fn base_path_from_env() -> String {
    std::env::var(BASE_URL_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_PATH.to_string())
}

/// Subtuber API client
///
/// Cloning is cheap; clones share the connection pool and token store.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    tokens: Option<TokenStore>,
}

impl ApiClient {
    /// Create a client for `origin` with the default base path and no token store
    pub fn new(origin: impl Into<String>) -> Result<Self, ClientError> {
        Self::builder().origin(origin).build()
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL, without a trailing slash
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Token store consulted by the request hook
    pub fn token_store(&self) -> Option<&TokenStore> {
        self.tokens.as_ref()
    }

    /// Endpoint label used in error messages, e.g. `/api/streamers`
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.path().trim_end_matches('/'), path)
    }

    /// Create a request builder for a literal path below the base URL
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.request_at(method, &segments)
    }

    /// Create a request builder from path segments; each segment is percent-encoded
    pub fn request_at(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }

        let mut request = self.client.request(method, url);
        if let Some(token) = self.bearer_token() {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        request
    }

    /// Token read at request-build time; empty tokens are not sent
    fn bearer_token(&self) -> Option<String> {
        self.tokens
            .as_ref()?
            .get()
            .filter(|token| !token.is_empty())
    }

    /// Execute a request and return only the decoded payload.
    ///
    /// An empty success body decodes as JSON `null`. Failures are logged and
    /// returned unchanged; there is no retry.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let result = Self::execute_inner(request).await;
        if let Err(err) = &result {
            error!("API error: {err}");
        }
        result
    }

    /// Execute a request, discarding any success body
    pub async fn send(&self, request: RequestBuilder) -> Result<(), ClientError> {
        let result = match request.send().await {
            Ok(response) => Self::check_status(response).await.map(|_| ()),
            Err(err) => Err(err.into()),
        };
        if let Err(err) = &result {
            error!("API error: {err}");
        }
        result
    }

    async fn execute_inner<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let response = Self::check_status(request.send().await?).await?;
        let body = response.bytes().await?;

        if body.is_empty() {
            debug!("Empty response body, decoding as null");
            Ok(serde_json::from_value(serde_json::Value::Null)?)
        } else {
            Ok(serde_json::from_slice(&body)?)
        }
    }

    async fn check_status(response: Response) -> Result<Response, ClientError> {
        let status = response.status();

        if status.is_success() {
            Ok(response)
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url())
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    origin: Option<String>,
    base_path: Option<String>,
    timeout: Option<Duration>,
    tokens: Option<TokenStore>,
    #[cfg(not(target_arch = "wasm32"))]
    cookie_jar: Option<std::sync::Arc<reqwest::cookie::Jar>>,
}

impl ApiClientBuilder {
    /// Set the origin the base path is resolved against
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Set the base path (`SUBTUBER_API_BASE_URL`, else `/api`); an absolute URL replaces the origin
    pub fn base_path(mut self, path: impl Into<String>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the token store read before every request
    pub fn token_store(mut self, tokens: TokenStore) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Share a cookie jar with the client
    #[cfg(not(target_arch = "wasm32"))]
    pub fn cookie_jar(mut self, jar: std::sync::Arc<reqwest::cookie::Jar>) -> Self {
        self.cookie_jar = Some(jar);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ApiClient, ClientError> {
        let base_path = self
            .base_path
            .unwrap_or_else(base_path_from_env);
        let base = resolve_base_url(self.origin.as_deref(), &base_path)?;
        let base_url = Url::parse(&base)
            .map_err(|e| ClientError::Configuration(format!("invalid base url {base}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Configuration(format!(
                "base url {base} cannot carry a path"
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        let mut client_builder = ClientBuilder::new()
            .default_headers(headers)
            .user_agent(USER_AGENT);

        #[cfg(not(target_arch = "wasm32"))]
        {
            client_builder = client_builder.timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT));
            if let Some(jar) = self.cookie_jar {
                client_builder = client_builder.cookie_provider(jar);
            }
        }

        #[cfg(target_arch = "wasm32")]
        let _ = self.timeout; // Timeouts not supported on WASM

        let client = client_builder.build()?;

        Ok(ApiClient {
            client,
            base_url,
            tokens: self.tokens,
        })
    }
}

/// Join `origin` and `base_path`, unless `base_path` is already absolute
fn resolve_base_url(origin: Option<&str>, base_path: &str) -> Result<String, ClientError> {
    let base_path = base_path.trim();
    if base_path.starts_with("http://") || base_path.starts_with("https://") {
        return Ok(base_path.trim_end_matches('/').to_string());
    }

    let origin = origin
        .ok_or_else(|| ClientError::Configuration("base_url is required".into()))?
        .trim_end_matches('/');
    let path = base_path.trim_matches('/');

    if path.is_empty() {
        Ok(origin.to_string())
    } else {
        Ok(format!("{origin}/{path}"))
    }
}
