//! Common utilities for the CDM API client
//!
//! Provides the authenticated transport shared by every endpoint module.

pub mod query;

use crate::error::CdmError;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Paginated response wrapper from the CDM API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    #[serde(default)]
    pub has_more: bool,
    pub data: Vec<T>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// API version prefix of an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V1,
    V2,
    Internal,
}

impl ApiVersion {
    pub fn as_path(self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
            ApiVersion::Internal => "internal",
        }
    }
}

/// Credentials used to build the `Authorization` header
#[derive(Clone)]
pub enum Credentials {
    /// API token, sent as a bearer token
    Token(String),
    /// Username and password, sent as HTTP basic auth
    Basic { username: String, password: String },
}

impl Credentials {
    /// Get authorization header value
    pub fn header_value(&self) -> String {
        match self {
            Credentials::Token(token) => format!("Bearer {}", token),
            Credentials::Basic { username, password } => {
                let encoded = STANDARD.encode(format!("{}:{}", username, password));
                format!("Basic {}", encoded)
            }
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Token(_) => f.write_str("Token(<redacted>)"),
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}

/// HTTP client wrapper with authentication
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    credentials: Credentials,
}

impl HttpClient {
    /// Create a new HTTP client wrapper
    ///
    /// `base_url` is the API root, e.g. `https://10.0.1.10/api`.
    pub fn new(client: Client, base_url: String, credentials: Credentials) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full URL from a versioned endpoint
    ///
    /// Absolute URLs (such as job status links) are returned unchanged.
    pub fn build_url(&self, version: ApiVersion, endpoint: &str) -> String {
        if endpoint.starts_with("http") {
            endpoint.to_string()
        } else {
            format!(
                "{}/{}/{}",
                self.base_url,
                version.as_path(),
                endpoint.trim_start_matches('/')
            )
        }
    }

    /// Get authorization header value
    pub fn auth_header(&self) -> String {
        self.credentials.header_value()
    }

    /// Get the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(
        &self,
        version: ApiVersion,
        endpoint: &str,
    ) -> Result<T, CdmError> {
        self.execute(Method::GET, version, endpoint, None).await
    }

    /// Make a POST request
    pub async fn post<T: DeserializeOwned>(
        &self,
        version: ApiVersion,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<T, CdmError> {
        self.execute(Method::POST, version, endpoint, Some(body)).await
    }

    /// Make a PATCH request
    pub async fn patch<T: DeserializeOwned>(
        &self,
        version: ApiVersion,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<T, CdmError> {
        self.execute(Method::PATCH, version, endpoint, Some(body)).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, version: ApiVersion, endpoint: &str) -> Result<(), CdmError> {
        self.execute::<serde_json::Value>(Method::DELETE, version, endpoint, None)
            .await
            .map(|_| ())
    }

    /// Make a GET request against a path relative to the API root or an
    /// absolute URL (job status links carry their own version prefix)
    pub async fn get_link<T: DeserializeOwned>(&self, link: &str) -> Result<T, CdmError> {
        let url = if link.starts_with("http") {
            link.to_string()
        } else {
            format!("{}/{}", self.base_url, link.trim_start_matches('/'))
        };
        self.send(Method::GET, url, link, None).await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        version: ApiVersion,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, CdmError> {
        let url = self.build_url(version, endpoint);
        self.send(method, url, endpoint, body).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        endpoint: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<T, CdmError> {
        match body {
            Some(body) => debug!("{} {} with body: {}", method, url, body),
            None => debug!("{} {}", method, url),
        }

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("Authorization", self.auth_header())
            .header("Accept", "application/json");
        if let Some(body) = body {
            request = request
                .header("Content-Type", "application/json")
                .json(body);
        }

        let response = request.send().await.map_err(CdmError::Http)?;
        decode_response(&method, endpoint, response).await
    }

    /// Build query string from filters
    pub fn build_query_string(&self, filters: &[(&str, &str)]) -> String {
        build_query_string(filters)
    }
}

/// Build query string from filters
pub fn build_query_string(filters: &[(&str, &str)]) -> String {
    filters
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Map a response onto `T` or the matching `CdmError` variant
///
/// Empty success bodies (204 No Content) decode from JSON `null`, so callers
/// can ask for `()`, `Option<_>` or `serde_json::Value`.
pub(crate) async fn decode_response<T: DeserializeOwned>(
    method: &Method,
    endpoint: &str,
    response: Response,
) -> Result<T, CdmError> {
    let status = response.status();
    let text = response.text().await.map_err(CdmError::Http)?;

    if status.is_success() {
        if text.trim().is_empty() {
            return serde_json::from_value(serde_json::Value::Null).map_err(CdmError::Serialization);
        }
        return serde_json::from_str(&text).map_err(|e| CdmError::Api {
            status: status.as_u16(),
            message: format!(
                "error decoding response body: {} - Response (first 500 chars): {}",
                e,
                text.chars().take(500).collect::<String>()
            ),
        });
    }

    let message = error_message(&text);
    match status.as_u16() {
        404 => Err(CdmError::NotFound(format!("{} {}: {}", method, endpoint, message))),
        401 | 403 => Err(CdmError::Authentication(format!(
            "{} {} failed: {} - {}",
            method, endpoint, status, message
        ))),
        code => Err(CdmError::Api {
            status: code,
            message: format!("{} {} failed: {}", method, endpoint, message),
        }),
    }
}

/// Pull the `message` field out of an API error body, falling back to the raw text
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}
