//! API client for the Rockflint marketplace REST API.
//!
//! `ApiClient::execute` runs one logical call as a small state machine:
//!
//! ```text
//! Attempt(original) -> Success | Unauthorized | Failed
//! Unauthorized      -> Refresh -> Recovered(token) | Failed
//! Recovered         -> Attempt(retry) -> Success | Failed
//! ```
//!
//! There is never more than one retry, and a 401 only enters the refresh
//! branch when the call opted into authentication.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::auth::TokenStore;
use crate::config::ClientConfig;
use crate::models::RefreshGrant;

use super::request::{RequestBody, RequestOptions};
use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Token refresh endpoint (unauthenticated).
pub const TOKEN_REFRESH_PATH: &str = "/api/users/token/refresh/";

/// Default HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Result of sending one request.
enum Attempt {
    Success(Response),
    /// 401 on a call that opted into authentication.
    Unauthorized(Response),
    Failed(Response),
}

/// Result of the refresh procedure.
enum Refresh {
    Recovered(String),
    Failed,
}

/// API client for Rockflint.
/// Clone is cheap: the connection pool and token store are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<TokenStore>,
}

impl ApiClient {
    /// Create a client from runtime configuration.
    pub fn new(config: &ClientConfig, store: Arc<TokenStore>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, &config.base_url, store))
    }

    /// Create a client with the default timeout.
    pub fn with_base_url(base_url: &str, store: Arc<TokenStore>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;
        Ok(Self::with_client(client, base_url, store))
    }

    /// Create a client around an existing `reqwest::Client`, sharing its pool.
    pub fn with_client(client: Client, base_url: &str, store: Arc<TokenStore>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<TokenStore> {
        &self.store
    }

    /// Perform one API call and decode its body.
    ///
    /// A 204 response is never decoded: it resolves to whatever `T`
    /// deserializes from JSON `null` (`()`, `Option<_>`, `Value::Null`).
    pub async fn execute<T: DeserializeOwned>(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> Result<T, ApiError> {
        let response = self.send(path, options).await?;
        Self::decode_success(path, response).await
    }

    /// `execute` for calls whose response body is irrelevant.
    pub async fn execute_unit(&self, path: &str, options: &RequestOptions) -> Result<(), ApiError> {
        self.send(path, options).await.map(|_| ())
    }

    /// Run the attempt/refresh/retry protocol and hand back the successful
    /// response undecoded.
    pub async fn send(&self, path: &str, options: &RequestOptions) -> Result<Response, ApiError> {
        let url = self.url(path)?;
        let token = if options.requires_auth {
            self.store.access_token()
        } else {
            None
        };

        debug!(method = %options.method, path, auth = options.requires_auth, "Sending request");
        let unauthorized = match self.attempt(&url, options, token.as_deref()).await? {
            Attempt::Success(response) => return Ok(response),
            Attempt::Failed(response) => return Err(Self::status_error(response).await),
            Attempt::Unauthorized(response) => response,
        };

        match self.refresh_access_token().await? {
            Refresh::Recovered(token) => {
                debug!(method = %options.method, path, "Retrying with refreshed token");
                match self.attempt(&url, options, Some(&token)).await? {
                    Attempt::Success(response) => Ok(response),
                    Attempt::Unauthorized(response) | Attempt::Failed(response) => {
                        Err(Self::status_error(response).await)
                    }
                }
            }
            Refresh::Failed => Err(Self::status_error(unauthorized).await),
        }
    }

    fn url(&self, path: &str) -> Result<String, ApiError> {
        if !path.starts_with('/') || path.starts_with("//") {
            return Err(ApiError::InvalidRequest(format!(
                "API path must be relative and start with '/': {path:?}"
            )));
        }
        Ok(format!("{}{}", self.base_url, path))
    }

    /// Build headers for one send. JSON content type is the default unless
    /// the body is multipart or the caller chose a content type.
    fn build_headers(options: &RequestOptions, token: Option<&str>) -> Result<HeaderMap, ApiError> {
        let mut headers = options.headers.clone();

        if !headers.contains_key(header::CONTENT_TYPE) && !options.body.is_multipart() {
            headers.insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
        }

        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ApiError::InvalidRequest(format!("unusable access token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        Ok(headers)
    }

    async fn attempt(
        &self,
        url: &str,
        options: &RequestOptions,
        token: Option<&str>,
    ) -> Result<Attempt, ApiError> {
        let headers = Self::build_headers(options, token)?;

        let mut request = self
            .client
            .request(options.method.clone(), url)
            .headers(headers);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        request = match &options.body {
            RequestBody::Empty => request,
            RequestBody::Json(bytes) => request.body(bytes.clone()),
            RequestBody::Multipart(form) => request.multipart(form.to_form()?),
        };

        let response = request.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), url, "Received response");

        Ok(if status.is_success() {
            Attempt::Success(response)
        } else if status == StatusCode::UNAUTHORIZED && options.requires_auth {
            Attempt::Unauthorized(response)
        } else {
            Attempt::Failed(response)
        })
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// A missing refresh token short-circuits without a network call. A
    /// rejected refresh clears the store: the session is over.
    async fn refresh_access_token(&self) -> Result<Refresh, ApiError> {
        let Some(refresh_token) = self.store.refresh_token() else {
            debug!("Unauthorized without a refresh token");
            return Ok(Refresh::Failed);
        };

        let url = self.url(TOKEN_REFRESH_PATH)?;
        let response = self
            .client
            .post(&url)
            .json(&RefreshRequest {
                refresh: &refresh_token,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "Token refresh rejected, clearing session");
            self.store.clear();
            return Ok(Refresh::Failed);
        }

        let grant = match response.bytes().await {
            Ok(body) => serde_json::from_slice::<RefreshGrant>(&body).ok(),
            Err(e) => {
                warn!(error = %e, "Failed to read token refresh response");
                None
            }
        };
        let Some(grant) = grant else {
            warn!("Token refresh response had no access token, clearing session");
            self.store.clear();
            return Ok(Refresh::Failed);
        };

        let rotated = grant.refresh.is_some();
        self.store.set_tokens(
            Some(grant.access.clone()),
            Some(grant.refresh.unwrap_or(refresh_token)),
        );
        info!(rotated, "Access token refreshed");
        Ok(Refresh::Recovered(grant.access))
    }

    async fn decode_success<T: DeserializeOwned>(
        path: &str,
        response: Response,
    ) -> Result<T, ApiError> {
        if response.status() == StatusCode::NO_CONTENT {
            return serde_json::from_value(Value::Null).map_err(|source| ApiError::Decode {
                path: path.to_string(),
                source,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| ApiError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// Error for a non-2xx response. A body that cannot be read or decoded
    /// becomes an empty object; it never masks the status.
    async fn status_error(response: Response) -> ApiError {
        let status = response.status();
        let body = response.bytes().await.unwrap_or_default();
        ApiError::from_status(status, &body)
    }
}
