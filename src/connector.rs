//! Platform API transport.
//!
//! Low-level HTTP handle that carries the base URL and credentials. Every
//! request issued by the resource layer goes through [`Connector::send`],
//! which translates non-success responses into [`PlatformError::Api`].

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, Request, Response};
use serde_json::Value;
use url::Url;

use crate::error::{PlatformError, Result};

const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.platform.sh/api/platform/";
const USER_AGENT: &str = concat!("platformapi/", env!("CARGO_PKG_VERSION"));

/// Options applied when building a request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Body serialized as JSON.
    pub json: Option<Value>,
    /// Query string pairs.
    pub query: Vec<(String, String)>,
    /// Extra headers.
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    /// Options carrying only a JSON body.
    #[must_use]
    pub fn json(body: Value) -> Self {
        Self {
            json: Some(body),
            ..Default::default()
        }
    }

    /// Add a query string pair.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Transport handle for one API endpoint.
///
/// Holds the base URL and the bearer token. Each resource family may live on
/// a different host; use [`Connector::with_base_url`] to derive a handle for
/// another endpoint that shares the connection pool and credentials.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use platformapi::Connector;
///
/// # fn example() -> platformapi::Result<()> {
/// // Create from environment variables
/// let connector = Connector::from_env()?;
///
/// // Or configure manually
/// let connector = Connector::new("your-token", "https://accounts.platform.sh/api/platform/")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Connector {
    http: Client,
    base_url: Arc<Url>,
    token: String,
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl Connector {
    /// Create a connector for the accounts endpoint from environment variables.
    ///
    /// Uses `PLATFORM_API_TOKEN` for authentication and optionally
    /// `PLATFORM_ACCOUNTS_URL` for the base URL (defaults to
    /// `https://accounts.platform.sh/api/platform/`).
    ///
    /// # Errors
    ///
    /// Returns an error if `PLATFORM_API_TOKEN` is not set.
    pub fn from_env() -> Result<Self> {
        let token = env::var("PLATFORM_API_TOKEN").map_err(|_| {
            PlatformError::ConfigMissing(
                "PLATFORM_API_TOKEN environment variable not set".to_string(),
            )
        })?;

        let base_url = env::var("PLATFORM_ACCOUNTS_URL")
            .unwrap_or_else(|_| DEFAULT_ACCOUNTS_URL.to_string());

        Self::new(&token, &base_url)
    }

    /// Create a new connector with the provided token and base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(PlatformError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(normalize_base_url(base_url)?),
            token: token.to_string(),
        })
    }

    /// Derive a connector for another endpoint.
    ///
    /// The new handle shares the HTTP pool and token with `self`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn with_base_url(&self, base_url: &str) -> Result<Self> {
        Ok(Self {
            http: self.http.clone(),
            base_url: Arc::new(normalize_base_url(base_url)?),
            token: self.token.clone(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Scheme, host and port of the base URL (e.g. `https://example.com`).
    pub fn origin(&self) -> String {
        self.base_url.origin().ascii_serialization()
    }

    /// Resolve a URL against the base URL.
    ///
    /// Absolute URLs are returned unchanged.
    pub fn resolve(&self, url: &str) -> Result<Url> {
        Ok(self.base_url.join(url)?)
    }

    /// Build an authenticated request.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be resolved or the request cannot
    /// be built (e.g. an invalid header).
    pub fn create_request(
        &self,
        method: Method,
        url: &str,
        options: RequestOptions,
    ) -> Result<Request> {
        let url = self.resolve(url)?;

        let mut builder = self
            .http
            .request(method, url)
            .bearer_auth(&self.token);

        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        for (name, value) in &options.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &options.json {
            builder = builder.json(body);
        }

        builder.build().map_err(PlatformError::HttpError)
    }

    /// Send a request.
    ///
    /// Non-success responses are returned as [`PlatformError::Api`] carrying
    /// the request method and URL plus the response status and body.
    #[tracing::instrument(skip_all, fields(method = %request.method(), url = %request.url()))]
    pub async fn send(&self, request: Request) -> Result<Response> {
        let method = request.method().clone();
        let url = request.url().clone();

        let response = self
            .http
            .execute(request)
            .await
            .map_err(PlatformError::HttpError)?;

        Self::check_response(&method, &url, response).await
    }

    /// Make a GET request.
    pub async fn get(&self, url: &str, options: RequestOptions) -> Result<Response> {
        let request = self.create_request(Method::GET, url, options)?;
        self.send(request).await
    }

    /// Make a POST request with a JSON body.
    pub async fn post(&self, url: &str, body: Value) -> Result<Response> {
        let request = self.create_request(Method::POST, url, RequestOptions::json(body))?;
        self.send(request).await
    }

    /// Make a PATCH request with a JSON body.
    pub async fn patch(&self, url: &str, body: Value) -> Result<Response> {
        let request = self.create_request(Method::PATCH, url, RequestOptions::json(body))?;
        self.send(request).await
    }

    /// Make a DELETE request.
    pub async fn delete(&self, url: &str) -> Result<Response> {
        let request = self.create_request(Method::DELETE, url, RequestOptions::default())?;
        self.send(request).await
    }

    /// Decode a response body as JSON.
    ///
    /// An empty body decodes to [`Value::Null`].
    pub async fn json(response: Response) -> Result<Value> {
        let body = response.text().await.map_err(PlatformError::HttpError)?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// Check response status and convert errors.
    async fn check_response(method: &Method, url: &Url, response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body, status);
        tracing::debug!(%method, %url, status = status.as_u16(), "request failed");

        Err(PlatformError::Api {
            method: method.to_string(),
            url: url.to_string(),
            status_code: status.as_u16(),
            message,
            body,
        })
    }
}

/// Ensure the base URL parses and ends with `/` so relative paths join below it.
fn normalize_base_url(base_url: &str) -> Result<Url> {
    let base_url_str = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };

    Ok(Url::parse(&base_url_str)?)
}

/// Extract an error message from a failed response body.
fn extract_error_message(body: &str, status: reqwest::StatusCode) -> String {
    if body.is_empty() {
        return format!("HTTP {status}");
    }

    // Try to parse as JSON and extract a message field
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        for key in ["message", "error", "title"] {
            if let Some(msg) = json.get(key).and_then(|m| m.as_str()) {
                return msg.to_string();
            }
        }
    }

    body.to_string()
}
