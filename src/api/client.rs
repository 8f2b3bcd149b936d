//! HTTP client for the TravelBook API
//!
//! Attaches the bearer token held by the token store to every request and
//! maps non-success responses onto [`TravelBookError`]. A 401 clears the
//! stored token before the error is returned.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, trace, warn, Instrument};

use crate::errors::{AuthErrorType, Result, TravelBookError};
use crate::request_span;
use crate::session::TokenStore;

/// Default API root
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Shown on a 401 when the server sends no message
const SESSION_EXPIRED: &str = "Your session has expired. Please log in again";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API root, e.g. `http://localhost:5000/api`
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Log request and response bodies at trace level
    pub verbose: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
            verbose: false,
        }
    }
}

/// Error body sent by the API alongside non-success statuses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Plain `{ "message": ... }` acknowledgement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Authenticated HTTP client for the TravelBook API
#[derive(Debug, Clone)]
pub struct TravelBookClient {
    client: Client,
    config: ClientConfig,
    tokens: Arc<dyn TokenStore>,
}

impl TravelBookClient {
    /// Create a client reading its bearer token from `tokens`
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| TravelBookError::transport(e, "Failed to build HTTP client"))?;

        let config = ClientConfig {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ..config
        };

        Ok(Self { client, config, tokens })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// The token store requests are authenticated from
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    /// Build a request for `path` (relative to the API root), with the
    /// bearer token attached when one is stored
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!("{} {}", method, url);

        let builder = self.client.request(method, &url);
        Ok(match self.tokens.load()? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    /// Send a GET request and deserialize the JSON response
    pub async fn get_json<R: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<R> {
        let request = self.request(Method::GET, path)?;
        self.execute(Method::GET, path, request, fallback).await
    }

    /// Send a GET request with query parameters
    pub async fn get_query<Q: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        query: &Q,
        fallback: &str,
    ) -> Result<R> {
        let request = self.request(Method::GET, path)?.query(query);
        self.execute(Method::GET, path, request, fallback).await
    }

    /// Send a POST request with a JSON body
    pub async fn post_json<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
        fallback: &str,
    ) -> Result<R> {
        self.log_body(body);
        let request = self.request(Method::POST, path)?.json(body);
        self.execute(Method::POST, path, request, fallback).await
    }

    /// Send a PUT request with a JSON body
    pub async fn put_json<T: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
        fallback: &str,
    ) -> Result<R> {
        self.log_body(body);
        let request = self.request(Method::PUT, path)?.json(body);
        self.execute(Method::PUT, path, request, fallback).await
    }

    /// Send a DELETE request
    pub async fn delete_json<R: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<R> {
        let request = self.request(Method::DELETE, path)?;
        self.execute(Method::DELETE, path, request, fallback).await
    }

    fn log_body<T: Serialize + ?Sized>(&self, body: &T) {
        if self.config.verbose {
            let body_json = serde_json::to_string_pretty(body)
                .unwrap_or_else(|_| "<unable to serialize>".to_string());
            trace!("Request body:\n{}", body_json);
        }
    }

    async fn execute<R: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        request: RequestBuilder,
        fallback: &str,
    ) -> Result<R> {
        let span = request_span!(method, path);
        async move {
            let response = request.send().await.map_err(TravelBookError::from)?;
            self.handle_response(response, fallback).await
        }
        .instrument(span)
        .await
    }

    /// Check the status and deserialize the JSON body
    async fn handle_response<R: DeserializeOwned>(
        &self,
        response: Response,
        fallback: &str,
    ) -> Result<R> {
        let status = response.status();
        debug!("Response status: {}", status);

        let body = response.text().await.map_err(TravelBookError::from)?;
        if self.config.verbose {
            trace!("Response body:\n{}", body);
        }

        if !status.is_success() {
            return Err(self.error_for(status, &body, fallback));
        }

        serde_json::from_str(&body).map_err(|source| TravelBookError::Serialization {
            source,
            context: format!("Unexpected response from the TravelBook API ({})", fallback),
        })
    }

    fn error_for(&self, status: StatusCode, body: &str, fallback: &str) -> TravelBookError {
        let server_message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty());

        if status == StatusCode::UNAUTHORIZED {
            if let Err(e) = self.tokens.clear() {
                warn!(error = %e, "Failed to clear stored token");
            } else {
                debug!("Cleared stored token after 401");
            }
            let message = server_message.unwrap_or_else(|| SESSION_EXPIRED.to_string());
            return TravelBookError::unauthorized(message, AuthErrorType::InvalidToken);
        }

        let message = server_message.unwrap_or_else(|| fallback.to_string());
        TravelBookError::api(message, status.as_u16())
    }
}
